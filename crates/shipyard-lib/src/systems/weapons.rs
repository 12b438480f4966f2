//! Weapon installations: mounts, gun configurations and concealment.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{MountRule, MountType, ProgressLevel, WeaponType};
use crate::error::{Error, Result};
use crate::ids::{has_id, new_id};
use crate::sizing::{to_whole, Footprint};

use super::arcs::FiringArc;

/// Hull point and cost multiplier for a concealed installation.
pub const CONCEALMENT_MULTIPLIER: f64 = 1.5;

/// Guns sharing one installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GunConfiguration {
    #[default]
    Single,
    Twin,
    Triple,
    Quadruple,
}

impl GunConfiguration {
    pub const ALL: [GunConfiguration; 4] = [
        GunConfiguration::Single,
        GunConfiguration::Twin,
        GunConfiguration::Triple,
        GunConfiguration::Quadruple,
    ];

    /// Sizing multiplier: each gun after the first counts as half a gun.
    pub fn effective_count(self) -> f64 {
        match self {
            GunConfiguration::Single => 1.0,
            GunConfiguration::Twin => 1.5,
            GunConfiguration::Triple => 2.0,
            GunConfiguration::Quadruple => 2.5,
        }
    }

    pub fn guns(self) -> u32 {
        match self {
            GunConfiguration::Single => 1,
            GunConfiguration::Twin => 2,
            GunConfiguration::Triple => 3,
            GunConfiguration::Quadruple => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GunConfiguration::Single => "single",
            GunConfiguration::Twin => "twin",
            GunConfiguration::Triple => "triple",
            GunConfiguration::Quadruple => "quadruple",
        }
    }
}

impl fmt::Display for GunConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GunConfiguration {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        GunConfiguration::ALL
            .into_iter()
            .find(|config| config.label() == needle || (needle == "quad" && *config == GunConfiguration::Quadruple))
            .ok_or_else(|| Error::UnknownEquipment {
                kind: "gun configuration",
                name: s.to_string(),
                suggestions: GunConfiguration::ALL
                    .iter()
                    .map(|c| c.label().to_string())
                    .collect(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledWeapon {
    pub id: String,
    pub weapon_type_id: String,
    pub mount: MountType,
    #[serde(default)]
    pub gun_configuration: GunConfiguration,
    #[serde(default)]
    pub concealed: bool,
    pub quantity: u32,
    pub arcs: Vec<FiringArc>,
}

has_id!(InstalledWeapon);

impl InstalledWeapon {
    /// A single forward-firing installation on `mount`.
    pub fn new(weapon_type: &WeaponType, mount: MountType, quantity: u32) -> Self {
        Self {
            id: new_id("weapon"),
            weapon_type_id: weapon_type.id.clone(),
            mount,
            gun_configuration: GunConfiguration::Single,
            concealed: false,
            quantity,
            arcs: vec![FiringArc::Forward],
        }
    }
}

/// Footprint of `quantity` installations of `weapon` on `rule`'s mount.
///
/// Hull points and cost scale with the mount multipliers, the effective gun
/// count and concealment. Power scales with the gun count only. Fractional
/// hull points and power round up per installation, before multiplying by
/// quantity.
pub fn calculate_weapon_stats(
    weapon: &WeaponType,
    rule: &MountRule,
    guns: GunConfiguration,
    concealed: bool,
    quantity: u32,
) -> Footprint {
    let concealment = if concealed { CONCEALMENT_MULTIPLIER } else { 1.0 };
    let effective = guns.effective_count();

    let hull_points = weapon.unit.hull_points * rule.hp_multiplier * effective * concealment;
    let cost = weapon.unit.cost * rule.cost_multiplier * effective * concealment;
    let power = weapon.unit.power_required * effective;

    Footprint {
        hull_points: to_whole(hull_points.ceil()).saturating_mul(quantity),
        power: to_whole(power.ceil()).saturating_mul(quantity),
        cost: cost * quantity as f64,
    }
}

/// Mounts `weapon` may use on a design at `progress_level`, in table order.
pub fn eligible_mounts<'a>(
    weapon: &WeaponType,
    rules: &'a [MountRule],
    progress_level: ProgressLevel,
) -> Vec<&'a MountRule> {
    rules
        .iter()
        .filter(|rule| rule.allows(weapon, progress_level))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponSummary {
    pub installations: u32,
    pub guns: u32,
    pub footprint: Footprint,
}

pub fn calculate_weapon_summary(
    weapons: &[(&InstalledWeapon, &WeaponType, &MountRule)],
) -> WeaponSummary {
    weapons
        .iter()
        .fold(WeaponSummary::default(), |mut summary, (installed, weapon, rule)| {
            summary.installations = summary.installations.saturating_add(installed.quantity);
            summary.guns = summary.guns.saturating_add(
                installed.gun_configuration.guns().saturating_mul(installed.quantity),
            );
            summary.footprint += calculate_weapon_stats(
                weapon,
                rule,
                installed.gun_configuration,
                installed.concealed,
                installed.quantity,
            );
            summary
        })
}
