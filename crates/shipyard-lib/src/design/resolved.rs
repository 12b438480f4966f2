use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{
    allows_ship_class, format_tracks, AccommodationType, Catalog, CatalogEntry, EngineType,
    GravitySystemType, Hull, LaunchSystemType, LifeSupportType, MountRule, MountType,
    PowerPlantType, SensorType, StoreSystemType, WeaponType,
};
use crate::error::{Error, Result};
use crate::sizing::{validate_installation, Budget, Footprint, SizingProfile, UnitProfile};
use crate::systems::arcs::{validate_arcs, ArcLimits, FiringArc};
use crate::systems::ordnance::{total_capacity, used_capacity};
use crate::systems::propulsion::{fuel_tank_footprint, validate_fuel_supply, FuelBurner};
use crate::systems::sensors::{sensor_footprint, validate_sensor_arcs};
use crate::systems::support::gravity_footprint;
use crate::systems::weapons::calculate_weapon_stats;
use crate::systems::{
    FuelConsumer, FuelConsumerKind, GunConfiguration, InstalledAccommodation, InstalledEngine,
    InstalledFuelTank, InstalledGravitySystem, InstalledLaunchSystem, InstalledLifeSupport,
    InstalledPowerPlant, InstalledSensor, InstalledStoreSystem, InstalledWeapon,
};
use crate::validation::{ValidationIssue, ValidationReport};

use super::compliance::audit_technology;
use super::ShipDesign;

/// One row of the design's footprint breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationLine {
    pub id: String,
    pub category: String,
    pub name: String,
    pub footprint: Footprint,
    /// `footprint.power` is generated rather than drawn.
    pub generates_power: bool,
}

impl InstallationLine {
    fn new(id: &str, category: &str, name: &str, footprint: Footprint) -> Self {
        Self {
            id: id.to_string(),
            category: category.to_string(),
            name: name.to_string(),
            footprint,
            generates_power: false,
        }
    }
}

/// A fuel tank bound to the type it feeds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ResolvedTank<'a> {
    pub tank: &'a InstalledFuelTank,
    pub consumer_name: &'a str,
    pub sizing: &'a SizingProfile,
}

/// A design whose installation records are bound to catalog entries.
#[derive(Debug, Clone)]
pub struct ResolvedDesign<'a> {
    pub(crate) design: &'a ShipDesign,
    pub(crate) catalog: &'a Catalog,
    pub(crate) hull: &'a Hull,
    pub(crate) engines: Vec<(&'a InstalledEngine, &'a EngineType)>,
    pub(crate) power_plants: Vec<(&'a InstalledPowerPlant, &'a PowerPlantType)>,
    pub(crate) fuel_tanks: Vec<ResolvedTank<'a>>,
    pub(crate) sensors: Vec<(&'a InstalledSensor, &'a SensorType)>,
    pub(crate) weapons: Vec<(&'a InstalledWeapon, &'a WeaponType, &'a MountRule)>,
    pub(crate) launch_systems: Vec<(&'a InstalledLaunchSystem, &'a LaunchSystemType)>,
    pub(crate) life_support: Vec<(&'a InstalledLifeSupport, &'a LifeSupportType)>,
    pub(crate) accommodations: Vec<(&'a InstalledAccommodation, &'a AccommodationType)>,
    pub(crate) store_systems: Vec<(&'a InstalledStoreSystem, &'a StoreSystemType)>,
    pub(crate) gravity: Option<(&'a InstalledGravitySystem, &'a GravitySystemType)>,
}

fn bind<'a, I, T, F>(records: &'a [I], entries: &'a [T], type_id: F) -> Result<Vec<(&'a I, &'a T)>>
where
    T: CatalogEntry,
    F: Fn(&I) -> &str,
{
    records
        .iter()
        .map(|record| crate::catalog::lookup(entries, type_id(record)).map(|entry| (record, entry)))
        .collect()
}

impl<'a> ResolvedDesign<'a> {
    /// Bind every record of `design` to its catalog type.
    ///
    /// Fails with [`Error::UnknownEquipment`] for ids the catalog lacks.
    pub fn resolve(design: &'a ShipDesign, catalog: &'a Catalog) -> Result<Self> {
        let hull = catalog.hull(&design.hull_id)?;

        let weapons = design
            .weapons
            .iter()
            .map(|installed| -> Result<_> {
                let weapon = catalog.weapon(&installed.weapon_type_id)?;
                let rule = catalog
                    .mount_rule(installed.mount)
                    .ok_or_else(|| Error::UnknownEquipment {
                        kind: "mount rule",
                        name: installed.mount.to_string(),
                        suggestions: Vec::new(),
                    })?;
                Ok((installed, weapon, rule))
            })
            .collect::<Result<Vec<_>>>()?;

        let fuel_tanks = design
            .fuel_tanks
            .iter()
            .map(|tank| -> Result<_> {
                let (consumer_name, sizing) = resolve_fuel_consumer(catalog, &tank.consumer)?;
                Ok(ResolvedTank {
                    tank,
                    consumer_name,
                    sizing,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let gravity = match &design.gravity {
            Some(installed) => Some((
                installed,
                catalog.gravity_system(&installed.gravity_system_type_id)?,
            )),
            None => None,
        };

        let resolved = Self {
            design,
            catalog,
            hull,
            engines: bind(&design.engines, &catalog.engines, |r| &r.engine_type_id)?,
            power_plants: bind(&design.power_plants, &catalog.power_plants, |r| {
                &r.power_plant_type_id
            })?,
            fuel_tanks,
            sensors: bind(&design.sensors, &catalog.sensors, |r| &r.sensor_type_id)?,
            weapons,
            launch_systems: bind(&design.launch_systems, &catalog.launch_systems, |r| {
                &r.launch_system_type_id
            })?,
            life_support: bind(&design.life_support, &catalog.life_support, |r| {
                &r.life_support_type_id
            })?,
            accommodations: bind(&design.accommodations, &catalog.accommodations, |r| {
                &r.accommodation_type_id
            })?,
            store_systems: bind(&design.store_systems, &catalog.store_systems, |r| {
                &r.store_system_type_id
            })?,
            gravity,
        };
        debug!(design = %design.name, hull = %hull.id, "resolved design");
        Ok(resolved)
    }

    pub fn design(&self) -> &'a ShipDesign {
        self.design
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    pub fn hull(&self) -> &'a Hull {
        self.hull
    }

    pub fn engines(&self) -> &[(&'a InstalledEngine, &'a EngineType)] {
        &self.engines
    }

    pub fn power_plants(&self) -> &[(&'a InstalledPowerPlant, &'a PowerPlantType)] {
        &self.power_plants
    }

    pub fn sensors(&self) -> &[(&'a InstalledSensor, &'a SensorType)] {
        &self.sensors
    }

    pub fn weapons(&self) -> &[(&'a InstalledWeapon, &'a WeaponType, &'a MountRule)] {
        &self.weapons
    }

    pub fn launch_systems(&self) -> &[(&'a InstalledLaunchSystem, &'a LaunchSystemType)] {
        &self.launch_systems
    }

    pub(crate) fn fuel_burners(&self) -> Vec<FuelBurner<'a>> {
        self.engines
            .iter()
            .map(|(installed, engine)| FuelBurner::engine(installed, engine))
            .chain(
                self.power_plants
                    .iter()
                    .map(|(installed, plant)| FuelBurner::power_plant(installed, plant)),
            )
            .collect()
    }

    /// Per-installation footprints, hull excluded.
    pub fn lines(&self) -> Vec<InstallationLine> {
        let mut lines = Vec::new();

        for (installed, engine) in &self.engines {
            lines.push(InstallationLine::new(
                &installed.id,
                "engine",
                &engine.name,
                engine.sizing.footprint(installed.hull_points),
            ));
        }
        for (installed, plant) in &self.power_plants {
            let mut line = InstallationLine::new(
                &installed.id,
                "power plant",
                &plant.name,
                plant.sizing.footprint(installed.hull_points),
            );
            line.generates_power = true;
            lines.push(line);
        }
        for resolved in &self.fuel_tanks {
            let footprint = match &resolved.sizing.fuel {
                Some(fuel) => fuel_tank_footprint(fuel, resolved.tank.hull_points),
                None => Footprint::new(resolved.tank.hull_points, 0, 0.0),
            };
            lines.push(InstallationLine::new(
                &resolved.tank.id,
                "fuel tank",
                &format!("{} fuel", resolved.consumer_name),
                footprint,
            ));
        }
        for (installed, sensor) in &self.sensors {
            lines.push(InstallationLine::new(
                &installed.id,
                "sensor",
                &sensor.name,
                sensor_footprint(sensor, installed.quantity, installed.extra_hull_points),
            ));
        }
        for (installed, weapon, rule) in &self.weapons {
            lines.push(InstallationLine::new(
                &installed.id,
                "weapon",
                &weapon.name,
                calculate_weapon_stats(
                    weapon,
                    rule,
                    installed.gun_configuration,
                    installed.concealed,
                    installed.quantity,
                ),
            ));
        }
        for (installed, launcher) in &self.launch_systems {
            lines.push(InstallationLine::new(
                &installed.id,
                "launch system",
                &launcher.name,
                launcher
                    .unit
                    .footprint(installed.quantity, installed.extra_hull_points),
            ));
        }
        for (installed, system) in &self.life_support {
            lines.push(InstallationLine::new(
                &installed.id,
                "life support",
                &system.name,
                system.unit.footprint(installed.quantity, 0),
            ));
        }
        for (installed, system) in &self.accommodations {
            lines.push(InstallationLine::new(
                &installed.id,
                "accommodation",
                &system.name,
                system.unit.footprint(installed.quantity, 0),
            ));
        }
        for (installed, system) in &self.store_systems {
            lines.push(InstallationLine::new(
                &installed.id,
                "store system",
                &system.name,
                system.unit.footprint(installed.quantity, 0),
            ));
        }
        if let Some((installed, gravity)) = self.gravity {
            lines.push(InstallationLine::new(
                &installed.id,
                "gravity",
                &gravity.name,
                gravity_footprint(gravity, self.hull),
            ));
        }

        lines
    }

    /// Hull point and power totals, leaving out the installation `excluding`.
    ///
    /// Totals saturate at `u32::MAX` so an oversized design can never wrap
    /// back under its budget.
    pub fn budget(&self, excluding: Option<&str>) -> Budget {
        let mut budget = Budget {
            hull_points_total: self.hull.hull_points,
            ..Budget::default()
        };
        for line in self.lines() {
            if Some(line.id.as_str()) == excluding {
                continue;
            }
            let footprint = line.footprint;
            budget.hull_points_used = budget.hull_points_used.saturating_add(footprint.hull_points);
            if line.generates_power {
                budget.power_generated = budget.power_generated.saturating_add(footprint.power);
            } else {
                budget.power_used = budget.power_used.saturating_add(footprint.power);
            }
        }
        budget
    }

    /// Technology and ship-class gate shared by every validator.
    fn admit<T: CatalogEntry>(&self, entry: &T) -> ValidationReport {
        let mut report = ValidationReport::new();
        if !self.design.constraints.allows(entry) {
            report.push(ValidationIssue::UnavailableTechnology {
                name: entry.name().to_string(),
                progress_level: entry.progress_level(),
                tracks: format_tracks(entry.tech_tracks()),
            });
        }
        if !allows_ship_class(entry, self.hull.ship_class) {
            report.push(ValidationIssue::ShipClassNotAllowed {
                name: entry.name().to_string(),
                ship_class: self.hull.ship_class.to_string(),
            });
        }
        report
    }

    fn validate_units<T: CatalogEntry>(
        &self,
        entry: &T,
        unit: &UnitProfile,
        quantity: u32,
        extra_hull_points: u32,
        excluding: Option<&str>,
    ) -> ValidationReport {
        let mut report = self.admit(entry);
        if quantity == 0 {
            report.push(ValidationIssue::InvalidQuantity {
                name: entry.name().to_string(),
            });
        }
        if extra_hull_points > 0 && !unit.expandable {
            report.push(ValidationIssue::NotExpandable {
                name: entry.name().to_string(),
            });
        }
        let footprint = unit.footprint(quantity, extra_hull_points);
        report.extend(self.budget(excluding).check_consumer(entry.name(), &footprint));
        report
    }

    pub fn validate_engine(
        &self,
        engine: &EngineType,
        hull_points: u32,
        excluding: Option<&str>,
    ) -> ValidationReport {
        let mut report = self.admit(engine);
        let budget = self.budget(excluding);
        report.extend(validate_installation(
            &engine.name,
            &engine.sizing,
            hull_points,
            self.hull,
            budget.hull_points_used,
            budget.power_remaining(),
        ));
        report
    }

    /// Power plants are supply: the check is that generation still covers
    /// everything drawing power after the change.
    pub fn validate_power_plant(
        &self,
        plant: &PowerPlantType,
        hull_points: u32,
        excluding: Option<&str>,
    ) -> ValidationReport {
        let mut report = self.admit(plant);
        if hull_points < plant.sizing.min_size {
            report.push(ValidationIssue::BelowMinimumSize {
                name: plant.name.clone(),
                min_size: plant.sizing.min_size,
                requested: hull_points,
            });
        }
        let budget = self.budget(excluding);
        report.extend(budget.check_hull_points(&plant.name, hull_points));

        let generated = budget
            .power_generated
            .saturating_add(plant.sizing.footprint(hull_points).power);
        if generated < budget.power_used {
            report.push(ValidationIssue::PowerOverBudget {
                used: budget.power_used,
                generated,
            });
        }
        report
    }

    /// Name and sizing of the type a tank would feed.
    pub fn fuel_consumer(&self, consumer: &FuelConsumer) -> Result<(&'a str, &'a SizingProfile)> {
        resolve_fuel_consumer(self.catalog, consumer)
    }

    pub fn validate_fuel_tank(
        &self,
        consumer: &FuelConsumer,
        hull_points: u32,
        excluding: Option<&str>,
    ) -> Result<ValidationReport> {
        let (name, sizing) = self.fuel_consumer(consumer)?;
        let mut report = ValidationReport::new();
        if sizing.fuel.is_none() {
            report.push(ValidationIssue::FuelNotUsed {
                name: name.to_string(),
            });
        }
        if hull_points == 0 {
            report.push(ValidationIssue::InvalidQuantity {
                name: format!("{name} fuel"),
            });
        }
        report.extend(
            self.budget(excluding)
                .check_hull_points(&format!("{name} fuel"), hull_points),
        );
        Ok(report)
    }

    pub fn validate_sensor(
        &self,
        sensor: &SensorType,
        quantity: u32,
        extra_hull_points: u32,
        arcs: &[FiringArc],
        excluding: Option<&str>,
    ) -> ValidationReport {
        let mut report =
            self.validate_units(sensor, &sensor.unit, quantity, extra_hull_points, excluding);
        report.extend(ValidationReport::from_issue(validate_sensor_arcs(
            sensor, quantity, arcs,
        )));
        report
    }

    /// Arc allowances for `weapon` on `mount` on this hull, if the mount exists.
    pub fn arc_limits(&self, weapon: &WeaponType, mount: MountType) -> Option<ArcLimits> {
        self.catalog
            .mount_rule(mount)
            .map(|rule| ArcLimits::resolve(rule, weapon, self.hull.ship_class))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn validate_weapon(
        &self,
        weapon: &WeaponType,
        mount: MountType,
        guns: GunConfiguration,
        concealed: bool,
        quantity: u32,
        arcs: &[FiringArc],
        excluding: Option<&str>,
    ) -> ValidationReport {
        let mut report = self.admit(weapon);
        if quantity == 0 {
            report.push(ValidationIssue::InvalidQuantity {
                name: weapon.name.clone(),
            });
        }

        let rule = match self.catalog.mount_rule(mount) {
            Some(rule) if rule.allows(weapon, self.design.constraints.progress_level) => rule,
            _ => {
                report.push(ValidationIssue::MountNotAllowed {
                    weapon: weapon.name.clone(),
                    mount: mount.to_string(),
                });
                return report;
            }
        };

        let limits = ArcLimits::resolve(rule, weapon, self.hull.ship_class);
        if let Err(issue) = validate_arcs(arcs, limits, mount.label(), &weapon.name) {
            report.push(issue);
        }

        let footprint = calculate_weapon_stats(weapon, rule, guns, concealed, quantity);
        report.extend(self.budget(excluding).check_consumer(&weapon.name, &footprint));
        report
    }

    /// When editing (`excluding` names an installed launcher) the new size
    /// must still hold that launcher's loadout.
    pub fn validate_launch_system(
        &self,
        launcher: &LaunchSystemType,
        quantity: u32,
        extra_hull_points: u32,
        excluding: Option<&str>,
    ) -> ValidationReport {
        let mut report =
            self.validate_units(launcher, &launcher.unit, quantity, extra_hull_points, excluding);

        let existing = excluding.and_then(|id| {
            self.design
                .launch_systems
                .iter()
                .find(|installed| installed.id == id)
        });
        if let Some(existing) = existing {
            let used = used_capacity(&existing.loadout, &self.design.ordnance_designs);
            let total = total_capacity(launcher, quantity, extra_hull_points);
            if used > total {
                report.push(ValidationIssue::CapacityExceeded {
                    launcher: launcher.name.clone(),
                    required: used,
                    available: total,
                });
            }
        }
        report
    }

    pub fn validate_life_support(
        &self,
        system: &LifeSupportType,
        quantity: u32,
        excluding: Option<&str>,
    ) -> ValidationReport {
        self.validate_units(system, &system.unit, quantity, 0, excluding)
    }

    pub fn validate_accommodation(
        &self,
        system: &AccommodationType,
        quantity: u32,
        excluding: Option<&str>,
    ) -> ValidationReport {
        self.validate_units(system, &system.unit, quantity, 0, excluding)
    }

    pub fn validate_store_system(
        &self,
        system: &StoreSystemType,
        quantity: u32,
        excluding: Option<&str>,
    ) -> ValidationReport {
        self.validate_units(system, &system.unit, quantity, 0, excluding)
    }

    pub fn validate_gravity(
        &self,
        gravity: &GravitySystemType,
        excluding: Option<&str>,
    ) -> ValidationReport {
        let mut report = self.admit(gravity);
        if let Some((installed, current)) = self.gravity {
            if Some(installed.id.as_str()) != excluding {
                report.push(ValidationIssue::GravityAlreadyProvided {
                    current: current.name.clone(),
                });
            }
        }
        let footprint = gravity_footprint(gravity, self.hull);
        report.extend(
            self.budget(excluding)
                .check_hull_points(&gravity.name, footprint.hull_points),
        );
        report
    }

    /// Whole-design check: budgets, fuel, sensors, support, loadouts, arcs
    /// and technology compliance.
    pub fn check(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        let budget = self.budget(None);
        if budget.hull_points_used > budget.hull_points_total {
            report.push(ValidationIssue::HullPointsOverBudget {
                used: budget.hull_points_used,
                total: budget.hull_points_total,
            });
        }
        if budget.power_used > budget.power_generated {
            report.push(ValidationIssue::PowerOverBudget {
                used: budget.power_used,
                generated: budget.power_generated,
            });
        }

        for resolved in &self.fuel_tanks {
            if resolved.sizing.fuel.is_none() {
                report.push(ValidationIssue::FuelNotUsed {
                    name: resolved.consumer_name.to_string(),
                });
            }
        }
        report.extend(validate_fuel_supply(
            &self.fuel_burners(),
            &self.design.fuel_tanks,
        ));

        let summary = self.summary();
        if !summary.sensors.has_active_sensor {
            report.push(ValidationIssue::NoActiveSensor);
        }
        report.extend(summary.support.warnings());

        for (installed, launcher) in &self.launch_systems {
            let used = used_capacity(&installed.loadout, &self.design.ordnance_designs);
            let total = total_capacity(launcher, installed.quantity, installed.extra_hull_points);
            if used > total {
                report.push(ValidationIssue::CapacityExceeded {
                    launcher: launcher.name.clone(),
                    required: used,
                    available: total,
                });
            }
        }

        for (installed, weapon, rule) in &self.weapons {
            let limits = ArcLimits::resolve(rule, weapon, self.hull.ship_class);
            if let Err(issue) =
                validate_arcs(&installed.arcs, limits, installed.mount.label(), &weapon.name)
            {
                report.push(issue);
            }
        }

        report.extend(audit_technology(self));
        report
    }
}

fn resolve_fuel_consumer<'a>(
    catalog: &'a Catalog,
    consumer: &FuelConsumer,
) -> Result<(&'a str, &'a SizingProfile)> {
    match consumer.kind {
        FuelConsumerKind::Engine => {
            let engine = catalog.engine(&consumer.type_id)?;
            Ok((&engine.name, &engine.sizing))
        }
        FuelConsumerKind::PowerPlant => {
            let plant = catalog.power_plant(&consumer.type_id)?;
            Ok((&plant.name, &plant.sizing))
        }
    }
}
