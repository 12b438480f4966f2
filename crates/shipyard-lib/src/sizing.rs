//! Generic sizing rules shared by every installable subsystem.
//!
//! Two shapes cover the whole catalog:
//!
//! - [`SizingProfile`]: components bought by the hull point (engines, power
//!   plants). Cost and power scale with the chosen size and an optional
//!   [`FuelProfile`] describes fuel consumption.
//! - [`UnitProfile`]: components bought by the unit (sensors, weapons, launch
//!   systems, support systems), optionally expandable with extra hull points.
//!
//! Both produce a [`Footprint`], which is what budget validation consumes.

use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::catalog::Hull;
use crate::validation::{ValidationIssue, ValidationReport};

/// Hull points, power and cost consumed by one installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Footprint {
    pub hull_points: u32,
    pub power: u32,
    pub cost: f64,
}

impl Footprint {
    pub fn new(hull_points: u32, power: u32, cost: f64) -> Self {
        Self {
            hull_points,
            power,
            cost,
        }
    }
}

impl Add for Footprint {
    type Output = Footprint;

    fn add(self, rhs: Footprint) -> Footprint {
        Footprint {
            hull_points: self.hull_points.saturating_add(rhs.hull_points),
            power: self.power.saturating_add(rhs.power),
            cost: self.cost + rhs.cost,
        }
    }
}

impl AddAssign for Footprint {
    fn add_assign(&mut self, rhs: Footprint) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Footprint {
    fn sum<I: Iterator<Item = Footprint>>(iter: I) -> Footprint {
        iter.fold(Footprint::default(), Add::add)
    }
}

/// How fractional power is turned into whole power points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerRounding {
    #[default]
    Ceil,
    Floor,
    Round,
}

impl PowerRounding {
    pub fn apply(self, value: f64) -> u32 {
        let rounded = match self {
            PowerRounding::Ceil => value.ceil(),
            PowerRounding::Floor => value.floor(),
            PowerRounding::Round => value.round(),
        };
        to_whole(rounded)
    }
}

/// Clamp a float into `u32`, mapping NaN and negatives to zero.
pub(crate) fn to_whole(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Sum whole quantities, pinning at `u32::MAX` instead of wrapping.
pub(crate) fn saturating_sum<I: IntoIterator<Item = u32>>(values: I) -> u32 {
    values.into_iter().fold(0, u32::saturating_add)
}

/// Fuel consumption descriptor for fuel-burning components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelProfile {
    /// Endurance granted per fuel hull point per consuming hull point.
    pub efficiency: f64,
    /// Cost of one hull point of fuel tank for this component.
    #[serde(default)]
    pub tank_cost_per_hull_point: f64,
    /// Fuel-optional components never raise a missing-fuel warning.
    #[serde(default)]
    pub optional: bool,
}

/// Sizing rules for components bought by the hull point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingProfile {
    pub min_size: u32,
    #[serde(default)]
    pub base_cost: f64,
    pub cost_per_hull_point: f64,
    #[serde(default)]
    pub power_per_hull_point: f64,
    #[serde(default)]
    pub power_rounding: PowerRounding,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel: Option<FuelProfile>,
}

impl SizingProfile {
    pub fn footprint(&self, hull_points: u32) -> Footprint {
        Footprint {
            hull_points,
            power: calculate_power(self, hull_points),
            cost: calculate_cost(self, hull_points),
        }
    }

    pub fn requires_fuel(&self) -> bool {
        self.fuel.map(|fuel| !fuel.optional).unwrap_or(false)
    }

    pub(crate) fn numeric_fields(&self) -> Vec<(f64, &'static str)> {
        let mut fields = vec![
            (self.base_cost, "baseCost"),
            (self.cost_per_hull_point, "costPerHullPoint"),
            (self.power_per_hull_point, "powerPerHullPoint"),
        ];
        if let Some(fuel) = self.fuel {
            fields.push((fuel.efficiency, "fuel.efficiency"));
            fields.push((fuel.tank_cost_per_hull_point, "fuel.tankCostPerHullPoint"));
        }
        fields
    }
}

/// Power for a component of the given size, rounded by the profile's rule.
pub fn calculate_power(profile: &SizingProfile, hull_points: u32) -> u32 {
    profile
        .power_rounding
        .apply(hull_points as f64 * profile.power_per_hull_point)
}

/// `base_cost + hull_points * cost_per_hull_point`.
pub fn calculate_cost(profile: &SizingProfile, hull_points: u32) -> f64 {
    profile.base_cost + hull_points as f64 * profile.cost_per_hull_point
}

/// Sizing rules for components bought by the unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitProfile {
    pub hull_points: f64,
    #[serde(default)]
    pub power_required: f64,
    pub cost: f64,
    #[serde(default)]
    pub expandable: bool,
    #[serde(default)]
    pub cost_per_extra_hull_point: f64,
}

impl UnitProfile {
    /// Footprint of `quantity` units plus extra hull points when expandable.
    ///
    /// Extra hull points on a non-expandable profile are ignored here; the
    /// validators report them as [`ValidationIssue::NotExpandable`].
    pub fn footprint(&self, quantity: u32, extra_hull_points: u32) -> Footprint {
        let extra = self.effective_extra(extra_hull_points);
        Footprint {
            hull_points: to_whole((self.hull_points * quantity as f64).ceil()).saturating_add(extra),
            power: to_whole((self.power_required * quantity as f64).ceil()),
            cost: self.cost * quantity as f64 + extra as f64 * self.cost_per_extra_hull_point,
        }
    }

    pub fn effective_extra(&self, extra_hull_points: u32) -> u32 {
        if self.expandable {
            extra_hull_points
        } else {
            0
        }
    }

    pub(crate) fn numeric_fields(&self) -> [(f64, &'static str); 4] {
        [
            (self.hull_points, "hullPoints"),
            (self.power_required, "powerRequired"),
            (self.cost, "cost"),
            (self.cost_per_extra_hull_point, "costPerExtraHullPoint"),
        ]
    }
}

/// Remaining hull point and power budget of a design.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub hull_points_total: u32,
    pub hull_points_used: u32,
    pub power_generated: u32,
    pub power_used: u32,
}

impl Budget {
    pub fn hull_points_remaining(&self) -> u32 {
        self.hull_points_total.saturating_sub(self.hull_points_used)
    }

    /// Signed so an over-drawn design reports a negative remainder.
    pub fn power_remaining(&self) -> i64 {
        self.power_generated as i64 - self.power_used as i64
    }

    /// Check a power-drawing footprint against this budget.
    pub fn check_consumer(&self, name: &str, footprint: &Footprint) -> ValidationReport {
        let mut report = self.check_hull_points(name, footprint.hull_points);
        if footprint.power > 0 && footprint.power as i64 > self.power_remaining() {
            report.push(ValidationIssue::InsufficientPower {
                name: name.to_string(),
                required: footprint.power,
                available: self.power_remaining(),
            });
        }
        report
    }

    /// Check a footprint that occupies hull points but draws no power.
    pub fn check_hull_points(&self, name: &str, hull_points: u32) -> ValidationReport {
        let mut report = ValidationReport::new();
        if self.hull_points_used as u64 + hull_points as u64 > self.hull_points_total as u64 {
            report.push(ValidationIssue::InsufficientHullPoints {
                name: name.to_string(),
                required: hull_points,
                available: self.hull_points_remaining(),
            });
        }
        report
    }
}

/// Validate a hull-point-sized component against a raw budget.
///
/// `hp_already_used` must exclude the component's own prior size when editing.
pub fn validate_installation(
    name: &str,
    profile: &SizingProfile,
    hull_points: u32,
    hull: &Hull,
    hp_already_used: u32,
    remaining_power: i64,
) -> ValidationReport {
    let mut report = ValidationReport::new();

    if hull_points < profile.min_size {
        report.push(ValidationIssue::BelowMinimumSize {
            name: name.to_string(),
            min_size: profile.min_size,
            requested: hull_points,
        });
    }

    if hp_already_used as u64 + hull_points as u64 > hull.hull_points as u64 {
        report.push(ValidationIssue::InsufficientHullPoints {
            name: name.to_string(),
            required: hull_points,
            available: hull.hull_points.saturating_sub(hp_already_used),
        });
    }

    let power = calculate_power(profile, hull_points);
    if power > 0 && power as i64 > remaining_power {
        report.push(ValidationIssue::InsufficientPower {
            name: name.to_string(),
            required: power,
            available: remaining_power,
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::hull_with_points;

    fn engine_profile() -> SizingProfile {
        SizingProfile {
            min_size: 5,
            base_cost: 0.0,
            cost_per_hull_point: 10.0,
            power_per_hull_point: 2.0,
            power_rounding: PowerRounding::Ceil,
            fuel: None,
        }
    }

    #[test]
    fn cost_and_power_scale_with_size() {
        let profile = engine_profile();
        assert_eq!(calculate_power(&profile, 10), 20);
        assert_eq!(calculate_cost(&profile, 10), 100.0);

        let with_base = SizingProfile {
            base_cost: 250.0,
            ..profile
        };
        for hp in [5, 6, 17, 40] {
            assert_eq!(calculate_cost(&with_base, hp), 250.0 + hp as f64 * 10.0);
        }
    }

    #[test]
    fn rounding_rules_apply_to_fractional_power() {
        let mut profile = engine_profile();
        profile.power_per_hull_point = 0.5;
        assert_eq!(calculate_power(&profile, 5), 3);
        profile.power_rounding = PowerRounding::Floor;
        assert_eq!(calculate_power(&profile, 5), 2);
        profile.power_rounding = PowerRounding::Round;
        assert_eq!(calculate_power(&profile, 3), 2);
    }

    #[test]
    fn minimum_size_boundary() {
        let hull = hull_with_points(100);
        let profile = engine_profile();

        let at_min = validate_installation("Ion Drive", &profile, 5, &hull, 0, 100);
        assert!(at_min.is_valid());

        let below = validate_installation("Ion Drive", &profile, 4, &hull, 0, 100);
        assert!(matches!(
            below.issues(),
            [ValidationIssue::BelowMinimumSize { min_size: 5, requested: 4, .. }]
        ));
    }

    #[test]
    fn scenario_engine_on_empty_hull() {
        let hull = hull_with_points(100);
        let profile = engine_profile();
        let footprint = profile.footprint(10);
        assert_eq!(footprint.power, 20);
        assert_eq!(footprint.cost, 100.0);
        assert!(validate_installation("Ion Drive", &profile, 10, &hull, 0, 20).is_valid());

        let short = validate_installation("Ion Drive", &profile, 10, &hull, 0, 19);
        assert!(matches!(
            short.issues(),
            [ValidationIssue::InsufficientPower { required: 20, available: 19, .. }]
        ));
    }

    #[test]
    fn hull_point_budget_is_inclusive() {
        let hull = hull_with_points(100);
        let profile = engine_profile();
        assert!(validate_installation("Ion Drive", &profile, 10, &hull, 90, 100).is_valid());
        let over = validate_installation("Ion Drive", &profile, 11, &hull, 90, 100);
        assert!(matches!(
            over.issues(),
            [ValidationIssue::InsufficientHullPoints { required: 11, available: 10, .. }]
        ));
    }

    #[test]
    fn unit_profile_ignores_extra_when_not_expandable() {
        let unit = UnitProfile {
            hull_points: 1.5,
            power_required: 1.0,
            cost: 200.0,
            expandable: false,
            cost_per_extra_hull_point: 50.0,
        };
        assert_eq!(unit.footprint(3, 4), Footprint::new(5, 3, 600.0));

        let expandable = UnitProfile {
            expandable: true,
            ..unit
        };
        assert_eq!(expandable.footprint(3, 4), Footprint::new(9, 3, 800.0));
    }

    #[test]
    fn budget_reports_negative_power_remaining() {
        let budget = Budget {
            hull_points_total: 50,
            hull_points_used: 10,
            power_generated: 5,
            power_used: 8,
        };
        assert_eq!(budget.power_remaining(), -3);
        let report = budget.check_consumer("Radar", &Footprint::new(1, 0, 0.0));
        assert!(report.is_valid());
        let report = budget.check_consumer("Radar", &Footprint::new(1, 1, 0.0));
        assert!(report.has_blocking_errors());
    }

    #[test]
    fn footprint_sums_pin_at_the_maximum() {
        let huge = Footprint::new(u32::MAX, u32::MAX - 1, 1.0);
        let total: Footprint = [huge, Footprint::new(3, 5, 2.0)].into_iter().sum();
        assert_eq!(total.hull_points, u32::MAX);
        assert_eq!(total.power, u32::MAX);
        assert_eq!(total.cost, 3.0);
        assert_eq!(saturating_sum([u32::MAX, 1, 2]), u32::MAX);
    }
}
