//! The ship design aggregate.
//!
//! [`ShipDesign`] is the stored state: a hull reference, the technology
//! constraints and every installation list. It is also the save-file root.
//! [`ResolvedDesign`] binds a design to a catalog for budgeting, validation
//! and summaries.

mod compliance;
mod persistence;
mod resolved;
mod summary;

use serde::{Deserialize, Serialize};

use crate::catalog::{DesignConstraints, Hull};
use crate::error::{Error, Result};
use crate::ids::{remove_by_id, HasId};
use crate::systems::{
    delete_ordnance_design, InstalledAccommodation, InstalledEngine, InstalledFuelTank,
    InstalledGravitySystem, InstalledLaunchSystem, InstalledLifeSupport, InstalledPowerPlant,
    InstalledSensor, InstalledStoreSystem, InstalledWeapon, OrdnanceDesign,
};
use crate::validation::ValidationIssue;

pub use compliance::audit_technology;
pub use persistence::SAVE_FORMAT_VERSION;
pub use resolved::{InstallationLine, ResolvedDesign};
pub use summary::{DesignSummary, HullSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipDesign {
    pub name: String,
    pub hull_id: String,
    pub constraints: DesignConstraints,
    #[serde(default)]
    pub engines: Vec<InstalledEngine>,
    #[serde(default)]
    pub power_plants: Vec<InstalledPowerPlant>,
    #[serde(default)]
    pub fuel_tanks: Vec<InstalledFuelTank>,
    #[serde(default)]
    pub sensors: Vec<InstalledSensor>,
    #[serde(default)]
    pub weapons: Vec<InstalledWeapon>,
    #[serde(default)]
    pub launch_systems: Vec<InstalledLaunchSystem>,
    #[serde(default)]
    pub ordnance_designs: Vec<OrdnanceDesign>,
    #[serde(default)]
    pub life_support: Vec<InstalledLifeSupport>,
    #[serde(default)]
    pub accommodations: Vec<InstalledAccommodation>,
    #[serde(default)]
    pub store_systems: Vec<InstalledStoreSystem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<InstalledGravitySystem>,
}

impl ShipDesign {
    /// An empty design on `hull`.
    pub fn new(name: impl Into<String>, hull: &Hull, constraints: DesignConstraints) -> Self {
        Self {
            name: name.into(),
            hull_id: hull.id.clone(),
            constraints,
            engines: Vec::new(),
            power_plants: Vec::new(),
            fuel_tanks: Vec::new(),
            sensors: Vec::new(),
            weapons: Vec::new(),
            launch_systems: Vec::new(),
            ordnance_designs: Vec::new(),
            life_support: Vec::new(),
            accommodations: Vec::new(),
            store_systems: Vec::new(),
            gravity: None,
        }
    }

    /// Whether any installation list holds `id`.
    pub fn contains_installation(&self, id: &str) -> bool {
        fn has<T: HasId>(list: &[T], id: &str) -> bool {
            list.iter().any(|item| item.id() == id)
        }

        has(&self.engines, id)
            || has(&self.power_plants, id)
            || has(&self.fuel_tanks, id)
            || has(&self.sensors, id)
            || has(&self.weapons, id)
            || has(&self.launch_systems, id)
            || has(&self.life_support, id)
            || has(&self.accommodations, id)
            || has(&self.store_systems, id)
            || self.gravity.as_ref().is_some_and(|g| g.id == id)
    }

    /// Remove the installation with `id` from whichever list holds it.
    ///
    /// Removing a launch system discards its loadout; the ordnance designs
    /// themselves are kept.
    pub fn remove_installation(&mut self, id: &str) -> Result<()> {
        if self.gravity.as_ref().is_some_and(|g| g.id == id) {
            self.gravity = None;
            return Ok(());
        }

        let removed = remove_by_id(&mut self.engines, id).is_some()
            || remove_by_id(&mut self.power_plants, id).is_some()
            || remove_by_id(&mut self.fuel_tanks, id).is_some()
            || remove_by_id(&mut self.sensors, id).is_some()
            || remove_by_id(&mut self.weapons, id).is_some()
            || remove_by_id(&mut self.launch_systems, id).is_some()
            || remove_by_id(&mut self.life_support, id).is_some()
            || remove_by_id(&mut self.accommodations, id).is_some()
            || remove_by_id(&mut self.store_systems, id).is_some();

        if removed {
            Ok(())
        } else {
            Err(Error::UnknownInstallation { id: id.to_string() })
        }
    }

    pub fn launch_system_mut(&mut self, id: &str) -> Result<&mut InstalledLaunchSystem> {
        self.launch_systems
            .iter_mut()
            .find(|launcher| launcher.id == id)
            .ok_or_else(|| Error::UnknownInstallation { id: id.to_string() })
    }

    pub fn ordnance_design(&self, key: &str) -> Option<&OrdnanceDesign> {
        self.ordnance_designs
            .iter()
            .find(|design| design.id == key)
            .or_else(|| {
                self.ordnance_designs
                    .iter()
                    .find(|design| design.name.eq_ignore_ascii_case(key))
            })
    }

    /// Delete an ordnance design unless a launcher still carries it.
    pub fn delete_ordnance_design(&mut self, design_id: &str) -> std::result::Result<(), ValidationIssue> {
        self.ordnance_designs =
            delete_ordnance_design(&self.ordnance_designs, design_id, &self.launch_systems)?;
        Ok(())
    }
}
