//! Firing arc labels and the weapon arc selection state machine.
//!
//! A weapon covers one or more of six standard arcs. The four horizontal arcs
//! also have a "zero" variant: a free supplementary arc granted by some mounts
//! to `S/L` firepower weapons. Selection follows three rules:
//!
//! - selecting past a limit drops the oldest arc of the same kind
//! - the last standard arc cannot be deselected
//! - deselecting a standard arc also drops its zero variant

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{MountRule, ShipClass, WeaponType};
use crate::error::{Error, Result};
use crate::validation::ValidationIssue;

/// Number of zero arcs a small craft may always use.
pub const SMALL_CRAFT_ZERO_ARCS: usize = 4;

/// Horizontal arcs available to sensors.
pub const SENSOR_ARCS: [FiringArc; 4] = [
    FiringArc::Forward,
    FiringArc::Starboard,
    FiringArc::Aft,
    FiringArc::Port,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringArc {
    Forward,
    Starboard,
    Aft,
    Port,
    Dorsal,
    Ventral,
    ZeroForward,
    ZeroStarboard,
    ZeroAft,
    ZeroPort,
}

impl FiringArc {
    pub const ALL: [FiringArc; 10] = [
        FiringArc::Forward,
        FiringArc::Starboard,
        FiringArc::Aft,
        FiringArc::Port,
        FiringArc::Dorsal,
        FiringArc::Ventral,
        FiringArc::ZeroForward,
        FiringArc::ZeroStarboard,
        FiringArc::ZeroAft,
        FiringArc::ZeroPort,
    ];

    pub fn is_zero(self) -> bool {
        matches!(
            self,
            FiringArc::ZeroForward | FiringArc::ZeroStarboard | FiringArc::ZeroAft | FiringArc::ZeroPort
        )
    }

    /// Zero variant of a horizontal standard arc.
    pub fn zero_variant(self) -> Option<FiringArc> {
        match self {
            FiringArc::Forward => Some(FiringArc::ZeroForward),
            FiringArc::Starboard => Some(FiringArc::ZeroStarboard),
            FiringArc::Aft => Some(FiringArc::ZeroAft),
            FiringArc::Port => Some(FiringArc::ZeroPort),
            _ => None,
        }
    }

    /// Standard arc a zero arc belongs to.
    pub fn standard_variant(self) -> Option<FiringArc> {
        match self {
            FiringArc::ZeroForward => Some(FiringArc::Forward),
            FiringArc::ZeroStarboard => Some(FiringArc::Starboard),
            FiringArc::ZeroAft => Some(FiringArc::Aft),
            FiringArc::ZeroPort => Some(FiringArc::Port),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FiringArc::Forward => "forward",
            FiringArc::Starboard => "starboard",
            FiringArc::Aft => "aft",
            FiringArc::Port => "port",
            FiringArc::Dorsal => "dorsal",
            FiringArc::Ventral => "ventral",
            FiringArc::ZeroForward => "zero-forward",
            FiringArc::ZeroStarboard => "zero-starboard",
            FiringArc::ZeroAft => "zero-aft",
            FiringArc::ZeroPort => "zero-port",
        }
    }
}

impl fmt::Display for FiringArc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FiringArc {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase().replace('_', "-");
        FiringArc::ALL
            .into_iter()
            .find(|arc| arc.label() == needle)
            .ok_or_else(|| Error::UnknownEquipment {
                kind: "firing arc",
                name: s.to_string(),
                suggestions: Vec::new(),
            })
    }
}

/// Arc allowances for one weapon on one mount and hull.
///
/// Outside small craft a zero arc is only usable alongside its standard arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcLimits {
    pub standard: usize,
    pub zero: usize,
    pub zero_allowed: bool,
    pub zero_needs_standard: bool,
}

impl ArcLimits {
    /// Combine mount allowances, weapon eligibility and the small-craft override.
    pub fn resolve(rule: &MountRule, weapon: &WeaponType, ship_class: ShipClass) -> Self {
        let small_craft = ship_class == ShipClass::SmallCraft;
        let zero_allowed =
            weapon.firepower.allows_zero_arcs() && (rule.allows_zero_arcs || small_craft);
        let zero = match (zero_allowed, small_craft) {
            (false, _) => 0,
            (true, true) => SMALL_CRAFT_ZERO_ARCS,
            (true, false) => rule.zero_arcs,
        };
        Self {
            standard: rule.standard_arcs,
            zero,
            zero_allowed,
            zero_needs_standard: !small_craft,
        }
    }
}

fn standard_count(arcs: &[FiringArc]) -> usize {
    arcs.iter().filter(|arc| !arc.is_zero()).count()
}

fn zero_count(arcs: &[FiringArc]) -> usize {
    arcs.iter().filter(|arc| arc.is_zero()).count()
}

/// Remove a standard arc together with its zero variant.
fn without_standard(arcs: &[FiringArc], arc: FiringArc) -> Vec<FiringArc> {
    let zero = arc.zero_variant();
    arcs.iter()
        .copied()
        .filter(|a| *a != arc && Some(*a) != zero)
        .collect()
}

fn has_standard_for(arcs: &[FiringArc], zero: FiringArc) -> bool {
    zero.standard_variant()
        .map(|standard| arcs.contains(&standard))
        .unwrap_or(false)
}

/// First arc that appears more than once.
pub(crate) fn first_duplicate(arcs: &[FiringArc]) -> Option<FiringArc> {
    arcs.iter()
        .enumerate()
        .find(|(index, arc)| arcs[..*index].contains(arc))
        .map(|(_, arc)| *arc)
}

/// Select or deselect `arc`, returning the new arc list.
///
/// Requests the rules forbid leave the list unchanged.
pub fn toggle_weapon_arc(arcs: &[FiringArc], arc: FiringArc, limits: ArcLimits) -> Vec<FiringArc> {
    if arcs.contains(&arc) {
        if arc.is_zero() {
            return arcs.iter().copied().filter(|a| *a != arc).collect();
        }
        if standard_count(arcs) <= 1 {
            return arcs.to_vec();
        }
        return without_standard(arcs, arc);
    }

    let mut next = arcs.to_vec();
    if arc.is_zero() {
        if !limits.zero_allowed || limits.zero == 0 {
            return next;
        }
        if limits.zero_needs_standard && !has_standard_for(&next, arc) {
            return next;
        }
        while zero_count(&next) >= limits.zero {
            if let Some(oldest) = next.iter().position(|a| a.is_zero()) {
                next.remove(oldest);
            }
        }
    } else {
        if limits.standard == 0 {
            return next;
        }
        while standard_count(&next) >= limits.standard {
            if let Some(oldest) = next.iter().copied().find(|a| !a.is_zero()) {
                next = without_standard(&next, oldest);
            }
        }
    }
    next.push(arc);
    next
}

/// First violation of `limits` in `arcs`, if any.
pub fn validate_arcs(
    arcs: &[FiringArc],
    limits: ArcLimits,
    mount: &str,
    weapon: &str,
) -> std::result::Result<(), ValidationIssue> {
    if let Some(arc) = first_duplicate(arcs) {
        return Err(ValidationIssue::DuplicateArc {
            arc: arc.to_string(),
        });
    }

    let standard = standard_count(arcs);
    let zero = zero_count(arcs);

    if standard == 0 {
        return Err(ValidationIssue::NoFiringArc);
    }
    if standard > limits.standard {
        return Err(ValidationIssue::TooManyArcs {
            mount: mount.to_string(),
            limit: limits.standard,
            selected: standard,
        });
    }
    if zero > 0 && !limits.zero_allowed {
        return Err(ValidationIssue::ZeroArcsNotAllowed {
            weapon: weapon.to_string(),
        });
    }
    if zero > limits.zero {
        return Err(ValidationIssue::TooManyZeroArcs {
            limit: limits.zero,
            selected: zero,
        });
    }
    if limits.zero_needs_standard {
        let orphan = arcs
            .iter()
            .copied()
            .find(|arc| arc.is_zero() && !has_standard_for(arcs, *arc));
        if let Some(arc) = orphan {
            return Err(ValidationIssue::ZeroArcWithoutStandard {
                arc: arc.to_string(),
                standard: arc.standard_variant().map(|s| s.to_string()).unwrap_or_default(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Firepower, MountType, WeaponCategory};
    use crate::test_helpers::weapon_type;
    use FiringArc::*;

    fn limits(standard: usize, zero: usize) -> ArcLimits {
        ArcLimits {
            standard,
            zero,
            zero_allowed: zero > 0,
            zero_needs_standard: true,
        }
    }

    fn rule(mount: MountType) -> MountRule {
        MountRule::defaults()
            .into_iter()
            .find(|r| r.mount == mount)
            .expect("default rule")
    }

    #[test]
    fn overflow_replaces_the_oldest_standard_arc() {
        let arcs = vec![Forward, Starboard];
        let next = toggle_weapon_arc(&arcs, Aft, limits(2, 0));
        assert_eq!(next, vec![Starboard, Aft]);
    }

    #[test]
    fn last_standard_arc_cannot_be_removed() {
        let arcs = vec![Forward, ZeroForward];
        assert_eq!(toggle_weapon_arc(&arcs, Forward, limits(1, 1)), arcs);
    }

    #[test]
    fn removing_a_standard_arc_drops_its_zero_variant() {
        let arcs = vec![Forward, ZeroForward, Port, ZeroPort];
        let next = toggle_weapon_arc(&arcs, Forward, limits(3, 2));
        assert_eq!(next, vec![Port, ZeroPort]);
    }

    #[test]
    fn replacing_oldest_standard_arc_cascades_to_zero_variant() {
        let arcs = vec![Forward, ZeroForward];
        let next = toggle_weapon_arc(&arcs, Aft, limits(1, 1));
        assert_eq!(next, vec![Aft]);
    }

    #[test]
    fn zero_arcs_ignored_when_not_allowed() {
        let arcs = vec![Forward];
        assert_eq!(toggle_weapon_arc(&arcs, ZeroForward, limits(1, 0)), arcs);
    }

    #[test]
    fn zero_arc_overflow_replaces_oldest_zero_arc() {
        let arcs = vec![Forward, Aft, ZeroForward];
        let next = toggle_weapon_arc(&arcs, ZeroAft, limits(2, 1));
        assert_eq!(next, vec![Forward, Aft, ZeroAft]);
    }

    #[test]
    fn zero_arc_needs_its_standard_arc() {
        let arcs = vec![Forward];
        assert_eq!(toggle_weapon_arc(&arcs, ZeroAft, limits(1, 1)), arcs);
        assert_eq!(
            validate_arcs(&[Forward, ZeroAft], limits(2, 1), "turret", "Laser"),
            Err(ValidationIssue::ZeroArcWithoutStandard {
                arc: "zero-aft".to_string(),
                standard: "aft".to_string(),
            })
        );
    }

    #[test]
    fn small_craft_zero_arcs_stand_alone() {
        let mut gun = weapon_type("pd", WeaponCategory::Projectile);
        gun.firepower = Firepower::SmallLight;
        let limits = ArcLimits::resolve(&rule(MountType::Fixed), &gun, ShipClass::SmallCraft);
        assert!(!limits.zero_needs_standard);

        let arcs = vec![Forward, ZeroForward];
        let next = toggle_weapon_arc(&arcs, ZeroAft, limits);
        assert_eq!(next, vec![Forward, ZeroForward, ZeroAft]);
        assert!(validate_arcs(&next, limits, "fixed", &gun.name).is_ok());
    }

    #[test]
    fn repeated_arcs_are_rejected() {
        assert_eq!(
            validate_arcs(&[Forward, Forward], limits(2, 0), "turret", "Laser"),
            Err(ValidationIssue::DuplicateArc {
                arc: "forward".to_string(),
            })
        );
        assert_eq!(first_duplicate(&[Forward, Aft, ZeroAft]), None);
    }

    #[test]
    fn small_craft_gets_four_zero_arcs_on_any_mount() {
        let mut gun = weapon_type("pd", WeaponCategory::Projectile);
        gun.firepower = Firepower::SmallLight;
        let fixed = rule(MountType::Fixed);

        let on_frigate = ArcLimits::resolve(&fixed, &gun, ShipClass::Light);
        assert!(!on_frigate.zero_allowed);
        assert_eq!(on_frigate.zero, 0);

        let on_fighter = ArcLimits::resolve(&fixed, &gun, ShipClass::SmallCraft);
        assert!(on_fighter.zero_allowed);
        assert_eq!(on_fighter.zero, SMALL_CRAFT_ZERO_ARCS);
    }

    #[test]
    fn heavy_firepower_never_gets_zero_arcs() {
        let mut gun = weapon_type("cannon", WeaponCategory::Projectile);
        gun.firepower = Firepower::Heavy;
        let limits = ArcLimits::resolve(&rule(MountType::Turret), &gun, ShipClass::SmallCraft);
        assert!(!limits.zero_allowed);
        let err = validate_arcs(&[Forward, ZeroForward], limits, "turret", &gun.name)
            .expect_err("zero arc on heavy weapon");
        assert!(matches!(err, ValidationIssue::ZeroArcsNotAllowed { .. }));
    }

    #[test]
    fn validate_reports_limits() {
        assert_eq!(
            validate_arcs(&[], limits(1, 0), "fixed", "Laser"),
            Err(ValidationIssue::NoFiringArc)
        );
        assert!(matches!(
            validate_arcs(&[Forward, Aft], limits(1, 0), "fixed", "Laser"),
            Err(ValidationIssue::TooManyArcs { limit: 1, selected: 2, .. })
        ));
        assert!(matches!(
            validate_arcs(&[Forward, ZeroForward, ZeroAft], limits(1, 1), "standard", "Laser"),
            Err(ValidationIssue::TooManyZeroArcs { limit: 1, selected: 2 })
        ));
        assert!(validate_arcs(&[Forward, ZeroForward], limits(1, 1), "standard", "Laser").is_ok());
    }

    #[test]
    fn parses_arc_labels() {
        assert_eq!("zero_port".parse::<FiringArc>().expect("known"), ZeroPort);
        assert_eq!("Dorsal".parse::<FiringArc>().expect("known"), Dorsal);
        assert!("up".parse::<FiringArc>().is_err());
    }
}
