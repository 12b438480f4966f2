//! Installing and editing equipment.
//!
//! Every handler follows the same steps: load the design, resolve it against
//! the catalog, validate the proposed installation (excluding the record
//! being edited), reject blocking errors, then upsert and save. Editing keeps
//! the installation id.

use std::path::Path;

use anyhow::{bail, Result};

use shipyard_lib::ids::{upsert_by_id, HasId};
use shipyard_lib::systems::{
    resize_launch_system, set_sensor_quantity, FuelConsumer, InstalledAccommodation,
    InstalledEngine, InstalledFuelTank, InstalledGravitySystem, InstalledLaunchSystem,
    InstalledLifeSupport, InstalledPowerPlant, InstalledSensor, InstalledStoreSystem,
    InstalledWeapon,
};
use shipyard_lib::{
    Error as LibError, FiringArc, GunConfiguration, MountType, ResolvedDesign, ShipDesign,
    ValidationReport,
};

use super::{commit, load_design, ChangeOutcome, Session};

/// What an install command targets: a design file and, when editing, the
/// installation being replaced.
#[derive(Debug, Clone, Copy)]
pub struct Target<'a> {
    pub path: &'a Path,
    pub edit: Option<&'a str>,
}

impl Target<'_> {
    fn action(&self) -> &'static str {
        if self.edit.is_some() {
            "Updated"
        } else {
            "Installed"
        }
    }
}

fn ensure_listed<T: HasId>(list: &[T], edit: Option<&str>) -> Result<()> {
    if let Some(id) = edit {
        if !list.iter().any(|item| item.id() == id) {
            return Err(LibError::UnknownInstallation { id: id.to_string() }.into());
        }
    }
    Ok(())
}

fn keep_id(id: &mut String, edit: Option<&str>) {
    if let Some(existing) = edit {
        *id = existing.to_string();
    }
}

fn finish(
    session: &Session,
    design: &ShipDesign,
    target: Target<'_>,
    id: &str,
    name: &str,
    report: &ValidationReport,
) -> Result<()> {
    commit(
        session,
        design,
        target.path,
        ChangeOutcome {
            action: target.action(),
            id,
            name,
            warnings: report.messages(),
        },
        report,
    )
}

pub fn handle_engine(
    session: &Session,
    target: Target<'_>,
    type_key: &str,
    hull_points: u32,
) -> Result<()> {
    let mut design = load_design(target.path)?;
    let engine = session.catalog.engine(type_key)?;
    ensure_listed(&design.engines, target.edit)?;

    let report = ResolvedDesign::resolve(&design, &session.catalog)?.validate_engine(
        engine,
        hull_points,
        target.edit,
    );
    session.reject_blocking("engine installation", &report)?;

    let mut installed = InstalledEngine::new(engine, hull_points);
    keep_id(&mut installed.id, target.edit);
    let id = installed.id.clone();
    upsert_by_id(&mut design.engines, installed);
    finish(session, &design, target, &id, &engine.name, &report)
}

pub fn handle_power_plant(
    session: &Session,
    target: Target<'_>,
    type_key: &str,
    hull_points: u32,
) -> Result<()> {
    let mut design = load_design(target.path)?;
    let plant = session.catalog.power_plant(type_key)?;
    ensure_listed(&design.power_plants, target.edit)?;

    let report = ResolvedDesign::resolve(&design, &session.catalog)?.validate_power_plant(
        plant,
        hull_points,
        target.edit,
    );
    session.reject_blocking("power plant installation", &report)?;

    let mut installed = InstalledPowerPlant::new(plant, hull_points);
    keep_id(&mut installed.id, target.edit);
    let id = installed.id.clone();
    upsert_by_id(&mut design.power_plants, installed);
    finish(session, &design, target, &id, &plant.name, &report)
}

/// The type a fuel tank feeds, named by catalog id or name.
#[derive(Debug, Clone, Copy)]
pub enum TankFor<'a> {
    Engine(&'a str),
    PowerPlant(&'a str),
}

pub fn handle_fuel_tank(
    session: &Session,
    target: Target<'_>,
    feeds: TankFor<'_>,
    hull_points: u32,
) -> Result<()> {
    let mut design = load_design(target.path)?;
    let consumer = match feeds {
        TankFor::Engine(key) => FuelConsumer::engine(session.catalog.engine(key)?.id.clone()),
        TankFor::PowerPlant(key) => {
            FuelConsumer::power_plant(session.catalog.power_plant(key)?.id.clone())
        }
    };
    ensure_listed(&design.fuel_tanks, target.edit)?;

    let resolved = ResolvedDesign::resolve(&design, &session.catalog)?;
    let (consumer_name, _) = resolved.fuel_consumer(&consumer)?;
    let report = resolved.validate_fuel_tank(&consumer, hull_points, target.edit)?;
    session.reject_blocking("fuel tank installation", &report)?;

    let name = format!("{consumer_name} fuel");
    let mut installed = InstalledFuelTank::new(consumer, hull_points);
    keep_id(&mut installed.id, target.edit);
    let id = installed.id.clone();
    upsert_by_id(&mut design.fuel_tanks, installed);
    finish(session, &design, target, &id, &name, &report)
}

/// Collapse repeated `--arc` flags, keeping the first mention of each arc.
fn distinct_arcs(arcs: Vec<FiringArc>) -> Vec<FiringArc> {
    let mut distinct = Vec::with_capacity(arcs.len());
    for arc in arcs {
        if !distinct.contains(&arc) {
            distinct.push(arc);
        }
    }
    distinct
}

pub fn handle_sensor(
    session: &Session,
    target: Target<'_>,
    type_key: &str,
    quantity: u32,
    extra_hull_points: u32,
    arcs: Vec<FiringArc>,
) -> Result<()> {
    let mut design = load_design(target.path)?;
    let sensor = session.catalog.sensor(type_key)?;
    ensure_listed(&design.sensors, target.edit)?;

    // Without explicit arcs a new sensor takes the first arcs it can cover and
    // an edited one keeps its own, trimmed to the new quantity.
    let existing = target
        .edit
        .and_then(|id| design.sensors.iter().find(|s| s.id == id));
    let mut installed = match existing {
        Some(current) => set_sensor_quantity(current, sensor, quantity),
        None => InstalledSensor::new(sensor, quantity),
    };
    installed.sensor_type_id = sensor.id.clone();
    installed.extra_hull_points = extra_hull_points;
    if !arcs.is_empty() {
        installed.arcs = distinct_arcs(arcs);
    }

    let report = ResolvedDesign::resolve(&design, &session.catalog)?.validate_sensor(
        sensor,
        quantity,
        extra_hull_points,
        &installed.arcs,
        target.edit,
    );
    session.reject_blocking("sensor installation", &report)?;

    let id = installed.id.clone();
    upsert_by_id(&mut design.sensors, installed);
    finish(session, &design, target, &id, &sensor.name, &report)
}

pub struct WeaponRequest<'a> {
    pub type_key: &'a str,
    pub mount: MountType,
    pub guns: GunConfiguration,
    pub concealed: bool,
    pub quantity: u32,
    pub arcs: Vec<FiringArc>,
}

pub fn handle_weapon(
    session: &Session,
    target: Target<'_>,
    request: WeaponRequest<'_>,
) -> Result<()> {
    let mut design = load_design(target.path)?;
    let weapon = session.catalog.weapon(request.type_key)?;
    ensure_listed(&design.weapons, target.edit)?;

    let mut installed = InstalledWeapon::new(weapon, request.mount, request.quantity);
    keep_id(&mut installed.id, target.edit);
    installed.gun_configuration = request.guns;
    installed.concealed = request.concealed;
    if !request.arcs.is_empty() {
        installed.arcs = distinct_arcs(request.arcs);
    } else if let Some(current) = target
        .edit
        .and_then(|id| design.weapons.iter().find(|w| w.id == id))
    {
        installed.arcs = current.arcs.clone();
    }

    let report = ResolvedDesign::resolve(&design, &session.catalog)?.validate_weapon(
        weapon,
        installed.mount,
        installed.gun_configuration,
        installed.concealed,
        installed.quantity,
        &installed.arcs,
        target.edit,
    );
    session.reject_blocking("weapon installation", &report)?;

    let id = installed.id.clone();
    upsert_by_id(&mut design.weapons, installed);
    finish(session, &design, target, &id, &weapon.name, &report)
}

/// Resizing keeps the loadout; the new size must still hold it.
pub fn handle_launcher(
    session: &Session,
    target: Target<'_>,
    type_key: &str,
    quantity: u32,
    extra_hull_points: u32,
) -> Result<()> {
    let mut design = load_design(target.path)?;
    let launcher = session.catalog.launch_system(type_key)?;
    ensure_listed(&design.launch_systems, target.edit)?;

    let existing = target
        .edit
        .and_then(|id| design.launch_systems.iter().find(|l| l.id == id));
    if let Some(current) = existing {
        if current.launch_system_type_id != launcher.id && !current.loadout.is_empty() {
            bail!("unload launcher {} before changing its type", current.id);
        }
    }

    let report = ResolvedDesign::resolve(&design, &session.catalog)?.validate_launch_system(
        launcher,
        quantity,
        extra_hull_points,
        target.edit,
    );
    session.reject_blocking("launch system installation", &report)?;

    let installed = match existing {
        Some(current) => {
            let mut resized = resize_launch_system(
                current,
                launcher,
                quantity,
                extra_hull_points,
                &design.ordnance_designs,
            )?;
            resized.launch_system_type_id = launcher.id.clone();
            resized
        }
        None => InstalledLaunchSystem::new(launcher, quantity, extra_hull_points),
    };
    let id = installed.id.clone();
    upsert_by_id(&mut design.launch_systems, installed);
    finish(session, &design, target, &id, &launcher.name, &report)
}

pub fn handle_life_support(
    session: &Session,
    target: Target<'_>,
    type_key: &str,
    quantity: u32,
) -> Result<()> {
    let mut design = load_design(target.path)?;
    let system = session.catalog.life_support(type_key)?;
    ensure_listed(&design.life_support, target.edit)?;

    let report = ResolvedDesign::resolve(&design, &session.catalog)?.validate_life_support(
        system,
        quantity,
        target.edit,
    );
    session.reject_blocking("life support installation", &report)?;

    let mut installed = InstalledLifeSupport::new(system, quantity);
    keep_id(&mut installed.id, target.edit);
    let id = installed.id.clone();
    upsert_by_id(&mut design.life_support, installed);
    finish(session, &design, target, &id, &system.name, &report)
}

pub fn handle_accommodation(
    session: &Session,
    target: Target<'_>,
    type_key: &str,
    quantity: u32,
) -> Result<()> {
    let mut design = load_design(target.path)?;
    let system = session.catalog.accommodation(type_key)?;
    ensure_listed(&design.accommodations, target.edit)?;

    let report = ResolvedDesign::resolve(&design, &session.catalog)?.validate_accommodation(
        system,
        quantity,
        target.edit,
    );
    session.reject_blocking("accommodation installation", &report)?;

    let mut installed = InstalledAccommodation::new(system, quantity);
    keep_id(&mut installed.id, target.edit);
    let id = installed.id.clone();
    upsert_by_id(&mut design.accommodations, installed);
    finish(session, &design, target, &id, &system.name, &report)
}

pub fn handle_store(
    session: &Session,
    target: Target<'_>,
    type_key: &str,
    quantity: u32,
) -> Result<()> {
    let mut design = load_design(target.path)?;
    let system = session.catalog.store_system(type_key)?;
    ensure_listed(&design.store_systems, target.edit)?;

    let report = ResolvedDesign::resolve(&design, &session.catalog)?.validate_store_system(
        system,
        quantity,
        target.edit,
    );
    session.reject_blocking("store system installation", &report)?;

    let mut installed = InstalledStoreSystem::new(system, quantity);
    keep_id(&mut installed.id, target.edit);
    let id = installed.id.clone();
    upsert_by_id(&mut design.store_systems, installed);
    finish(session, &design, target, &id, &system.name, &report)
}

/// A design holds one gravity provision; `--edit` with its id replaces it.
pub fn handle_gravity(session: &Session, target: Target<'_>, type_key: &str) -> Result<()> {
    let mut design = load_design(target.path)?;
    let gravity = session.catalog.gravity_system(type_key)?;
    ensure_listed(design.gravity.as_slice(), target.edit)?;

    let report = ResolvedDesign::resolve(&design, &session.catalog)?
        .validate_gravity(gravity, target.edit);
    session.reject_blocking("gravity installation", &report)?;

    let mut installed = InstalledGravitySystem::new(gravity);
    keep_id(&mut installed.id, target.edit);
    let id = installed.id.clone();
    design.gravity = Some(installed);
    finish(session, &design, target, &id, &gravity.name, &report)
}
