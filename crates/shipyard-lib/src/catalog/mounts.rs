//! Weapon mount rules.
//!
//! Mount rows live in the catalog so their multipliers can be rebalanced from
//! the data file; [`MountRule::defaults`] is used when a file omits them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::equipment::{WeaponCategory, WeaponType};
use super::types::{check_entry, ProgressLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountType {
    Standard,
    Fixed,
    Turret,
    Sponson,
    Bank,
}

impl MountType {
    pub const ALL: [MountType; 5] = [
        MountType::Standard,
        MountType::Fixed,
        MountType::Turret,
        MountType::Sponson,
        MountType::Bank,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MountType::Standard => "standard",
            MountType::Fixed => "fixed",
            MountType::Turret => "turret",
            MountType::Sponson => "sponson",
            MountType::Bank => "bank",
        }
    }
}

impl fmt::Display for MountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        MountType::ALL
            .into_iter()
            .find(|mount| mount.label() == needle)
            .ok_or_else(|| Error::UnknownEquipment {
                kind: "mount type",
                name: s.to_string(),
                suggestions: MountType::ALL.iter().map(|m| m.label().to_string()).collect(),
            })
    }
}

/// Sizing multipliers and arc allowances of one mount type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MountRule {
    pub mount: MountType,
    pub hp_multiplier: f64,
    pub cost_multiplier: f64,
    /// Standard firing arcs the mount may cover.
    pub standard_arcs: usize,
    /// Free zero arcs granted on top of the standard arcs.
    #[serde(default)]
    pub zero_arcs: usize,
    #[serde(default)]
    pub allows_zero_arcs: bool,
    /// Weapon categories allowed on this mount; empty means all.
    #[serde(default)]
    pub weapon_categories: Vec<WeaponCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_progress_level: Option<ProgressLevel>,
}

impl MountRule {
    /// Built-in mount table.
    pub fn defaults() -> Vec<MountRule> {
        vec![
            MountRule {
                mount: MountType::Standard,
                hp_multiplier: 1.0,
                cost_multiplier: 1.0,
                standard_arcs: 1,
                zero_arcs: 1,
                allows_zero_arcs: true,
                weapon_categories: Vec::new(),
                min_progress_level: None,
            },
            MountRule {
                mount: MountType::Fixed,
                hp_multiplier: 0.75,
                cost_multiplier: 0.75,
                standard_arcs: 1,
                zero_arcs: 0,
                allows_zero_arcs: false,
                weapon_categories: Vec::new(),
                min_progress_level: None,
            },
            MountRule {
                mount: MountType::Turret,
                hp_multiplier: 1.25,
                cost_multiplier: 1.5,
                standard_arcs: 3,
                zero_arcs: 2,
                allows_zero_arcs: true,
                weapon_categories: Vec::new(),
                min_progress_level: None,
            },
            MountRule {
                mount: MountType::Sponson,
                hp_multiplier: 1.25,
                cost_multiplier: 1.25,
                standard_arcs: 2,
                zero_arcs: 1,
                allows_zero_arcs: true,
                weapon_categories: Vec::new(),
                min_progress_level: Some(6),
            },
            MountRule {
                mount: MountType::Bank,
                hp_multiplier: 0.75,
                cost_multiplier: 0.9,
                standard_arcs: 1,
                zero_arcs: 0,
                allows_zero_arcs: false,
                weapon_categories: vec![WeaponCategory::Beam, WeaponCategory::Pulse],
                min_progress_level: Some(7),
            },
        ]
    }

    /// Whether `weapon` may use this mount on a design at `progress_level`.
    pub fn allows(&self, weapon: &WeaponType, progress_level: ProgressLevel) -> bool {
        let category_ok =
            self.weapon_categories.is_empty() || self.weapon_categories.contains(&weapon.category);
        let level_ok = self
            .min_progress_level
            .map(|min| progress_level >= min)
            .unwrap_or(true);
        category_ok && level_ok
    }

    pub(crate) fn validate(&self) -> Result<()> {
        check_entry(
            "mount rule",
            self.mount.label(),
            self.mount.label(),
            &[
                (self.hp_multiplier, "hpMultiplier"),
                (self.cost_multiplier, "costMultiplier"),
            ],
        )?;
        if self.standard_arcs == 0 {
            return Err(Error::CatalogValidation {
                message: format!("mount rule '{}' must allow at least one arc", self.mount),
            });
        }
        Ok(())
    }
}

pub(crate) fn default_mounts() -> Vec<MountRule> {
    MountRule::defaults()
}
