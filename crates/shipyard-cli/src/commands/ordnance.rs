//! Ordnance designs and launcher loadouts.

use std::path::Path;

use anyhow::{anyhow, Result};
use clap::ValueEnum;

use shipyard_lib::catalog::{format_tracks, OrdnanceCategory};
use shipyard_lib::ids::upsert_by_id;
use shipyard_lib::systems::{
    add_ordnance_to_loadout, calculate_ordnance_design, remove_ordnance_from_loadout,
    unload_ordnance,
};
use shipyard_lib::{CatalogEntry, ShipDesign, ValidationIssue, ValidationReport};

use super::{commit, load_design, ChangeOutcome, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Missile,
    Bomb,
    Mine,
}

impl From<CategoryArg> for OrdnanceCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Missile => OrdnanceCategory::Missile,
            CategoryArg::Bomb => OrdnanceCategory::Bomb,
            CategoryArg::Mine => OrdnanceCategory::Mine,
        }
    }
}

pub struct DesignRequest<'a> {
    pub category: CategoryArg,
    pub name: &'a str,
    pub propulsion: &'a str,
    pub warhead: &'a str,
    pub guidance: Option<&'a str>,
}

fn admit<T: CatalogEntry>(design: &ShipDesign, entry: &T, report: &mut ValidationReport) {
    if !design.constraints.allows(entry) {
        report.push(ValidationIssue::UnavailableTechnology {
            name: entry.name().to_string(),
            progress_level: entry.progress_level(),
            tracks: format_tracks(entry.tech_tracks()),
        });
    }
}

/// Compose a missile, bomb or mine from catalog components and store it on
/// the design.
pub fn handle_design(session: &Session, path: &Path, request: DesignRequest<'_>) -> Result<()> {
    let mut design = load_design(path)?;
    let catalog = &session.catalog;
    let propulsion = catalog.propulsion(request.propulsion)?;
    let warhead = catalog.warhead(request.warhead)?;
    let guidance = request
        .guidance
        .map(|key| catalog.guidance(key))
        .transpose()?;

    let mut report = ValidationReport::new();
    admit(&design, propulsion, &mut report);
    admit(&design, warhead, &mut report);
    if let Some(guidance) = guidance {
        admit(&design, guidance, &mut report);
    }
    session.reject_blocking("ordnance design", &report)?;

    let ordnance = match calculate_ordnance_design(
        request.category.into(),
        request.name,
        propulsion,
        warhead,
        guidance,
    ) {
        Ok(ordnance) => ordnance,
        Err(rejected) => {
            session.reject_blocking("ordnance design", &rejected)?;
            return Err(anyhow!("ordnance design rejected"));
        }
    };

    let id = ordnance.id.clone();
    let name = ordnance.name.clone();
    upsert_by_id(&mut design.ordnance_designs, ordnance);
    commit(
        session,
        &design,
        path,
        ChangeOutcome {
            action: "Designed",
            id: &id,
            name: &name,
            warnings: Vec::new(),
        },
        &ValidationReport::new(),
    )
}

/// Load `quantity` rounds of a stored design into a launcher.
pub fn handle_load(
    session: &Session,
    path: &Path,
    launcher_id: &str,
    design_key: &str,
    quantity: u32,
) -> Result<()> {
    let mut design = load_design(path)?;
    let ordnance = design
        .ordnance_design(design_key)
        .cloned()
        .ok_or_else(|| anyhow!("no ordnance design named {design_key}"))?;

    let installed = design.launch_system_mut(launcher_id)?.clone();
    let launch_type = session.catalog.launch_system(&installed.launch_system_type_id)?;
    let loaded = add_ordnance_to_loadout(
        &installed,
        launch_type,
        &ordnance,
        quantity,
        &design.ordnance_designs,
    )
    .or_else(|issue| {
        let report = ValidationReport::from(issue);
        session.reject_blocking("loading ordnance", &report)?;
        Err(anyhow!("loading ordnance rejected"))
    })?;

    *design.launch_system_mut(launcher_id)? = loaded;
    commit(
        session,
        &design,
        path,
        ChangeOutcome {
            action: "Loaded",
            id: launcher_id,
            name: &format!("{quantity} x {}", ordnance.name),
            warnings: Vec::new(),
        },
        &ValidationReport::new(),
    )
}

/// Unload rounds of a design; without a quantity the whole line is removed.
pub fn handle_unload(
    session: &Session,
    path: &Path,
    launcher_id: &str,
    design_key: &str,
    quantity: Option<u32>,
) -> Result<()> {
    let mut design = load_design(path)?;
    let ordnance = design
        .ordnance_design(design_key)
        .cloned()
        .ok_or_else(|| anyhow!("no ordnance design named {design_key}"))?;

    let launcher = design.launch_system_mut(launcher_id)?;
    *launcher = match quantity {
        Some(count) => unload_ordnance(launcher, &ordnance.id, count),
        None => remove_ordnance_from_loadout(launcher, &ordnance.id),
    };

    commit(
        session,
        &design,
        path,
        ChangeOutcome {
            action: "Unloaded",
            id: launcher_id,
            name: &ordnance.name,
            warnings: Vec::new(),
        },
        &ValidationReport::new(),
    )
}

/// Delete a stored design; refused while any launcher carries it.
pub fn handle_delete(session: &Session, path: &Path, design_key: &str) -> Result<()> {
    let mut design = load_design(path)?;
    let ordnance = design
        .ordnance_design(design_key)
        .cloned()
        .ok_or_else(|| anyhow!("no ordnance design named {design_key}"))?;

    if let Err(issue) = design.delete_ordnance_design(&ordnance.id) {
        session.reject_blocking("ordnance deletion", &ValidationReport::from(issue))?;
    }

    commit(
        session,
        &design,
        path,
        ChangeOutcome {
            action: "Deleted",
            id: &ordnance.id,
            name: &ordnance.name,
            warnings: Vec::new(),
        },
        &ValidationReport::new(),
    )
}
