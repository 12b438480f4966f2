//! Equipment catalog loading, validation and lookup.
//!
//! The catalog is injected configuration: it is decoded once from a JSON data
//! file (or the embedded built-in copy) and passed by reference into every
//! calculator. Nothing in the crate keeps a global catalog.
//!
//! - [`types`] - progress levels, tech tracks, ship classes and hulls
//! - [`equipment`] - installable equipment and ordnance component types
//! - [`mounts`] - weapon mount rules
//! - [`filter`] - progress-level / tech-track / ship-class filtering

pub mod equipment;
pub mod filter;
pub mod mounts;
pub mod types;

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub use equipment::{
    AccelerationTable, AccommodationCategory, AccommodationType, EngineType, Firepower,
    GravityKind, GravitySystemType, GuidanceType, LaunchSystemType, LifeSupportType,
    OrdnanceCategory, OrdnanceSize, PowerPlantType, PropulsionType, SensorCategory, SensorType,
    StoreEffect, StoreSystemType, TrackingCapability, WarheadType, WeaponCategory, WeaponType,
};
pub use filter::{
    allows_ship_class, available_for_design, filter_available, filter_for_ship_class,
    is_available, sort_by_progress_level, DesignConstraints,
};
pub use mounts::{MountRule, MountType};
pub use types::{format_tracks, CatalogEntry, Hull, ProgressLevel, ShipClass, TechTrack};

/// Built-in catalog shipped with the crate.
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

/// Minimum similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Every equipment list the calculators draw from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub hulls: Vec<Hull>,
    #[serde(default)]
    pub engines: Vec<EngineType>,
    #[serde(default)]
    pub power_plants: Vec<PowerPlantType>,
    #[serde(default)]
    pub sensors: Vec<SensorType>,
    #[serde(default)]
    pub weapons: Vec<WeaponType>,
    #[serde(default = "mounts::default_mounts")]
    pub weapon_mounts: Vec<MountRule>,
    #[serde(default)]
    pub launch_systems: Vec<LaunchSystemType>,
    #[serde(default)]
    pub propulsion: Vec<PropulsionType>,
    #[serde(default)]
    pub warheads: Vec<WarheadType>,
    #[serde(default)]
    pub guidance: Vec<GuidanceType>,
    #[serde(default)]
    pub life_support: Vec<LifeSupportType>,
    #[serde(default)]
    pub accommodations: Vec<AccommodationType>,
    #[serde(default)]
    pub store_systems: Vec<StoreSystemType>,
    #[serde(default)]
    pub gravity_systems: Vec<GravitySystemType>,
}

impl Catalog {
    /// Load and validate a catalog from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let catalog = Self::from_reader(file)?;
        debug!(path = %path.display(), "loaded catalog");
        Ok(catalog)
    }

    /// Load and validate a catalog from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let catalog: Catalog = serde_json::from_reader(reader)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog embedded in the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG)
    }

    /// Validate every entry and reject duplicate ids within a list.
    pub fn validate(&self) -> Result<()> {
        validate_list(&self.hulls)?;
        validate_list(&self.engines)?;
        validate_list(&self.power_plants)?;
        validate_list(&self.sensors)?;
        validate_list(&self.weapons)?;
        validate_list(&self.launch_systems)?;
        validate_list(&self.propulsion)?;
        validate_list(&self.warheads)?;
        validate_list(&self.guidance)?;
        validate_list(&self.life_support)?;
        validate_list(&self.accommodations)?;
        validate_list(&self.store_systems)?;
        validate_list(&self.gravity_systems)?;

        let mut mounts = HashSet::new();
        for rule in &self.weapon_mounts {
            rule.validate()?;
            if !mounts.insert(rule.mount) {
                return Err(Error::DuplicateEquipmentId {
                    kind: "mount rule",
                    id: rule.mount.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn hull(&self, key: &str) -> Result<&Hull> {
        lookup(&self.hulls, key)
    }

    pub fn engine(&self, key: &str) -> Result<&EngineType> {
        lookup(&self.engines, key)
    }

    pub fn power_plant(&self, key: &str) -> Result<&PowerPlantType> {
        lookup(&self.power_plants, key)
    }

    pub fn sensor(&self, key: &str) -> Result<&SensorType> {
        lookup(&self.sensors, key)
    }

    pub fn weapon(&self, key: &str) -> Result<&WeaponType> {
        lookup(&self.weapons, key)
    }

    pub fn launch_system(&self, key: &str) -> Result<&LaunchSystemType> {
        lookup(&self.launch_systems, key)
    }

    pub fn propulsion(&self, key: &str) -> Result<&PropulsionType> {
        lookup(&self.propulsion, key)
    }

    pub fn warhead(&self, key: &str) -> Result<&WarheadType> {
        lookup(&self.warheads, key)
    }

    pub fn guidance(&self, key: &str) -> Result<&GuidanceType> {
        lookup(&self.guidance, key)
    }

    pub fn life_support(&self, key: &str) -> Result<&LifeSupportType> {
        lookup(&self.life_support, key)
    }

    pub fn accommodation(&self, key: &str) -> Result<&AccommodationType> {
        lookup(&self.accommodations, key)
    }

    pub fn store_system(&self, key: &str) -> Result<&StoreSystemType> {
        lookup(&self.store_systems, key)
    }

    pub fn gravity_system(&self, key: &str) -> Result<&GravitySystemType> {
        lookup(&self.gravity_systems, key)
    }

    /// Mount rule for `mount`, if the catalog defines one.
    pub fn mount_rule(&self, mount: MountType) -> Option<&MountRule> {
        self.weapon_mounts.iter().find(|rule| rule.mount == mount)
    }
}

/// Where a catalog was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOrigin {
    File(PathBuf),
    Builtin,
}

fn validate_list<T: CatalogEntry>(entries: &[T]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        entry.validate()?;
        if !seen.insert(entry.id()) {
            return Err(Error::DuplicateEquipmentId {
                kind: T::KIND,
                id: entry.id().to_string(),
            });
        }
    }
    Ok(())
}

/// Find an entry by exact id.
pub fn find_by_id<'a, T: CatalogEntry>(entries: &'a [T], id: &str) -> Option<&'a T> {
    entries.iter().find(|entry| entry.id() == id)
}

/// Find an entry by id, falling back to a case-insensitive name match.
///
/// Misses produce [`Error::UnknownEquipment`] with close names as suggestions.
pub fn lookup<'a, T: CatalogEntry>(entries: &'a [T], key: &str) -> Result<&'a T> {
    if let Some(entry) = find_by_id(entries, key) {
        return Ok(entry);
    }

    let needle = normalize_name(key);
    if let Some(entry) = entries
        .iter()
        .find(|entry| normalize_name(entry.name()) == needle)
    {
        return Ok(entry);
    }

    Err(Error::UnknownEquipment {
        kind: T::KIND,
        name: key.to_string(),
        suggestions: fuzzy_matches(entries, key, 3),
    })
}

/// Up to `limit` ids or names resembling `key`, best first.
pub fn fuzzy_matches<T: CatalogEntry>(entries: &[T], key: &str, limit: usize) -> Vec<String> {
    let needle = normalize_name(key);
    let mut scored: Vec<(f64, &str)> = entries
        .iter()
        .map(|entry| {
            let by_id = strsim::jaro_winkler(&needle, &normalize_name(entry.id()));
            let by_name = strsim::jaro_winkler(&needle, &normalize_name(entry.name()));
            (by_id.max(by_name), entry.id())
        })
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .collect();

    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, id)| id.to_string())
        .collect()
}

/// Normalize a name for case-insensitive lookup.
fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
