//! Ordnance blueprints and launch system loadouts.
//!
//! An [`OrdnanceDesign`] is composed from a propulsion (or casing), a warhead
//! and, for missiles and mines, a guidance package. Launch systems hold
//! designs in a loadout whose used capacity never exceeds the launcher's
//! total capacity: every operation that could break this returns
//! [`ValidationIssue::CapacityExceeded`] instead.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{
    GuidanceType, LaunchSystemType, OrdnanceCategory, OrdnanceSize, PropulsionType, WarheadType,
};
use crate::ids::{has_id, new_id};
use crate::sizing::{saturating_sum, to_whole, Footprint};
use crate::validation::{ValidationIssue, ValidationReport};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdnanceDesign {
    pub id: String,
    pub name: String,
    pub category: OrdnanceCategory,
    pub size: OrdnanceSize,
    pub propulsion_id: String,
    pub warhead_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance_id: Option<String>,
    pub capacity_required: u32,
    pub total_accuracy: i32,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadoutItem {
    pub design_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledLaunchSystem {
    pub id: String,
    pub launch_system_type_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub extra_hull_points: u32,
    #[serde(default)]
    pub loadout: Vec<LoadoutItem>,
}

has_id!(OrdnanceDesign, InstalledLaunchSystem);

impl InstalledLaunchSystem {
    pub fn new(launch_type: &LaunchSystemType, quantity: u32, extra_hull_points: u32) -> Self {
        Self {
            id: new_id("launcher"),
            launch_system_type_id: launch_type.id.clone(),
            quantity,
            extra_hull_points,
            loadout: Vec::new(),
        }
    }
}

fn check_component(
    report: &mut ValidationReport,
    name: &str,
    categories: &[OrdnanceCategory],
    category: OrdnanceCategory,
) {
    if !categories.contains(&category) {
        report.push(ValidationIssue::ComponentCategoryMismatch {
            component: name.to_string(),
            category: category.to_string(),
        });
    }
}

fn compose_design(
    category: OrdnanceCategory,
    name: &str,
    propulsion: &PropulsionType,
    warhead: &WarheadType,
    guidance: Option<&GuidanceType>,
) -> Result<OrdnanceDesign, ValidationReport> {
    let mut report = ValidationReport::new();

    if name.trim().is_empty() {
        report.push(ValidationIssue::MissingDesignName);
    }
    check_component(&mut report, &propulsion.name, &propulsion.categories, category);
    check_component(&mut report, &warhead.name, &warhead.categories, category);
    match (guidance, category.requires_guidance()) {
        (None, true) => report.push(ValidationIssue::MissingGuidance {
            category: category.to_string(),
        }),
        (Some(_), false) => report.push(ValidationIssue::UnexpectedGuidance {
            category: category.to_string(),
        }),
        (Some(g), true) => check_component(&mut report, &g.name, &g.categories, category),
        (None, false) => {}
    }

    if report.has_blocking_errors() {
        return Err(report);
    }

    let guidance_accuracy = guidance.map(|g| g.accuracy_modifier).unwrap_or(0);
    let guidance_cost = guidance.map(|g| g.cost).unwrap_or(0.0);

    Ok(OrdnanceDesign {
        id: new_id(category.label()),
        name: name.trim().to_string(),
        category,
        size: propulsion.size,
        propulsion_id: propulsion.id.clone(),
        warhead_id: warhead.id.clone(),
        guidance_id: guidance.map(|g| g.id.clone()),
        capacity_required: propulsion.size.capacity_units(),
        total_accuracy: propulsion
            .accuracy_modifier
            .saturating_add(warhead.accuracy_modifier)
            .saturating_add(guidance_accuracy),
        total_cost: propulsion.cost + warhead.cost + guidance_cost,
    })
}

pub fn calculate_missile_design(
    name: &str,
    propulsion: &PropulsionType,
    warhead: &WarheadType,
    guidance: Option<&GuidanceType>,
) -> Result<OrdnanceDesign, ValidationReport> {
    compose_design(OrdnanceCategory::Missile, name, propulsion, warhead, guidance)
}

/// Bombs are unguided; `casing` plays the propulsion role.
pub fn calculate_bomb_design(
    name: &str,
    casing: &PropulsionType,
    warhead: &WarheadType,
) -> Result<OrdnanceDesign, ValidationReport> {
    compose_design(OrdnanceCategory::Bomb, name, casing, warhead, None)
}

pub fn calculate_mine_design(
    name: &str,
    casing: &PropulsionType,
    warhead: &WarheadType,
    guidance: Option<&GuidanceType>,
) -> Result<OrdnanceDesign, ValidationReport> {
    compose_design(OrdnanceCategory::Mine, name, casing, warhead, guidance)
}

/// Dispatch on `category` to the matching design calculator.
pub fn calculate_ordnance_design(
    category: OrdnanceCategory,
    name: &str,
    propulsion: &PropulsionType,
    warhead: &WarheadType,
    guidance: Option<&GuidanceType>,
) -> Result<OrdnanceDesign, ValidationReport> {
    compose_design(category, name, propulsion, warhead, guidance)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSystemStats {
    pub footprint: Footprint,
    pub total_capacity: u32,
}

pub fn total_capacity(launch_type: &LaunchSystemType, quantity: u32, extra_hull_points: u32) -> u32 {
    let extra = launch_type.unit.effective_extra(extra_hull_points);
    let bonus = (extra as f64 * launch_type.capacity_per_extra_hull_point).floor();
    launch_type
        .capacity
        .saturating_mul(quantity)
        .saturating_add(to_whole(bonus))
}

pub fn calculate_launch_system_stats(
    launch_type: &LaunchSystemType,
    quantity: u32,
    extra_hull_points: u32,
) -> LaunchSystemStats {
    LaunchSystemStats {
        footprint: launch_type.unit.footprint(quantity, extra_hull_points),
        total_capacity: total_capacity(launch_type, quantity, extra_hull_points),
    }
}

/// Capacity consumed by `loadout`. Lines naming unknown designs count as zero.
pub fn used_capacity(loadout: &[LoadoutItem], designs: &[OrdnanceDesign]) -> u32 {
    saturating_sum(loadout.iter()
        .map(|item| match designs.iter().find(|d| d.id == item.design_id) {
            Some(design) => design.capacity_required.saturating_mul(item.quantity),
            None => {
                warn!(design_id = %item.design_id, "loadout references unknown ordnance design");
                0
            }
        }))
}

/// Why `quantity` rounds of `design` cannot be added, if they cannot.
pub fn check_load(
    launcher: &InstalledLaunchSystem,
    launch_type: &LaunchSystemType,
    design: &OrdnanceDesign,
    quantity: u32,
    designs: &[OrdnanceDesign],
) -> Result<(), ValidationIssue> {
    if quantity == 0 {
        return Err(ValidationIssue::InvalidQuantity {
            name: design.name.clone(),
        });
    }
    if !launch_type.accepts(design.category) {
        return Err(ValidationIssue::IncompatibleOrdnance {
            launcher: launch_type.name.clone(),
            category: design.category.to_string(),
        });
    }

    let total = total_capacity(launch_type, launcher.quantity, launcher.extra_hull_points);
    let used = used_capacity(&launcher.loadout, designs);
    let required = design.capacity_required.saturating_mul(quantity);
    if used as u64 + required as u64 > total as u64 {
        return Err(ValidationIssue::CapacityExceeded {
            launcher: launch_type.name.clone(),
            required,
            available: total.saturating_sub(used),
        });
    }
    Ok(())
}

pub fn can_load_ordnance(
    launcher: &InstalledLaunchSystem,
    launch_type: &LaunchSystemType,
    design: &OrdnanceDesign,
    quantity: u32,
    designs: &[OrdnanceDesign],
) -> bool {
    check_load(launcher, launch_type, design, quantity, designs).is_ok()
}

/// Load rounds, merging into an existing line for the same design.
pub fn add_ordnance_to_loadout(
    launcher: &InstalledLaunchSystem,
    launch_type: &LaunchSystemType,
    design: &OrdnanceDesign,
    quantity: u32,
    designs: &[OrdnanceDesign],
) -> Result<InstalledLaunchSystem, ValidationIssue> {
    check_load(launcher, launch_type, design, quantity, designs)?;

    let mut next = launcher.clone();
    match next.loadout.iter_mut().find(|item| item.design_id == design.id) {
        Some(item) => item.quantity = item.quantity.saturating_add(quantity),
        None => next.loadout.push(LoadoutItem {
            design_id: design.id.clone(),
            quantity,
        }),
    }
    Ok(next)
}

/// Drop the whole loadout line for `design_id`.
pub fn remove_ordnance_from_loadout(
    launcher: &InstalledLaunchSystem,
    design_id: &str,
) -> InstalledLaunchSystem {
    let mut next = launcher.clone();
    next.loadout.retain(|item| item.design_id != design_id);
    next
}

/// Unload up to `quantity` rounds, dropping the line when it reaches zero.
pub fn unload_ordnance(
    launcher: &InstalledLaunchSystem,
    design_id: &str,
    quantity: u32,
) -> InstalledLaunchSystem {
    let mut next = launcher.clone();
    if let Some(item) = next.loadout.iter_mut().find(|item| item.design_id == design_id) {
        item.quantity = item.quantity.saturating_sub(quantity);
    }
    next.loadout.retain(|item| item.quantity > 0);
    next
}

pub fn is_design_loaded(design_id: &str, launchers: &[InstalledLaunchSystem]) -> bool {
    launchers
        .iter()
        .any(|launcher| launcher.loadout.iter().any(|item| item.design_id == design_id))
}

/// Remove a design, refusing while any launcher still carries it.
pub fn delete_ordnance_design(
    designs: &[OrdnanceDesign],
    design_id: &str,
    launchers: &[InstalledLaunchSystem],
) -> Result<Vec<OrdnanceDesign>, ValidationIssue> {
    if is_design_loaded(design_id, launchers) {
        let name = designs
            .iter()
            .find(|d| d.id == design_id)
            .map(|d| d.name.clone())
            .unwrap_or_else(|| design_id.to_string());
        return Err(ValidationIssue::ReferentialDeleteRejected { design: name });
    }
    Ok(designs.iter().filter(|d| d.id != design_id).cloned().collect())
}

/// Change quantity or expansion, keeping the loadout.
///
/// Rejected when the new capacity could not hold what is already loaded.
pub fn resize_launch_system(
    launcher: &InstalledLaunchSystem,
    launch_type: &LaunchSystemType,
    quantity: u32,
    extra_hull_points: u32,
    designs: &[OrdnanceDesign],
) -> Result<InstalledLaunchSystem, ValidationIssue> {
    let used = used_capacity(&launcher.loadout, designs);
    let total = total_capacity(launch_type, quantity, extra_hull_points);
    if used > total {
        return Err(ValidationIssue::CapacityExceeded {
            launcher: launch_type.name.clone(),
            required: used,
            available: total,
        });
    }

    let mut next = launcher.clone();
    next.quantity = quantity;
    next.extra_hull_points = extra_hull_points;
    Ok(next)
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdnanceSummary {
    pub launchers: u32,
    pub footprint: Footprint,
    pub total_capacity: u32,
    pub used_capacity: u32,
    pub designs: usize,
    pub rounds_loaded: u32,
}

pub fn calculate_ordnance_summary(
    launchers: &[(&InstalledLaunchSystem, &LaunchSystemType)],
    designs: &[OrdnanceDesign],
) -> OrdnanceSummary {
    let mut summary = OrdnanceSummary {
        designs: designs.len(),
        ..OrdnanceSummary::default()
    };
    for (installed, launch_type) in launchers {
        let stats =
            calculate_launch_system_stats(launch_type, installed.quantity, installed.extra_hull_points);
        let rounds = saturating_sum(installed.loadout.iter().map(|item| item.quantity));
        summary.launchers = summary.launchers.saturating_add(installed.quantity);
        summary.footprint += stats.footprint;
        summary.total_capacity = summary.total_capacity.saturating_add(stats.total_capacity);
        summary.used_capacity = summary
            .used_capacity
            .saturating_add(used_capacity(&installed.loadout, designs));
        summary.rounds_loaded = summary.rounds_loaded.saturating_add(rounds);
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{guidance_type, launch_system_type, ordnance_design, propulsion_type, warhead_type};

    fn loaded_launcher() -> (LaunchSystemType, InstalledLaunchSystem, Vec<OrdnanceDesign>) {
        let rack = launch_system_type("rack", 10);
        let designs = vec![ordnance_design("d1", 3), ordnance_design("d2", 5)];
        let launcher = InstalledLaunchSystem::new(&rack, 1, 0);
        let launcher = add_ordnance_to_loadout(&launcher, &rack, &designs[0], 2, &designs)
            .expect("6 of 10 fits");
        (rack, launcher, designs)
    }

    #[test]
    fn rejects_load_that_would_exceed_capacity() {
        let (rack, launcher, designs) = loaded_launcher();
        assert_eq!(used_capacity(&launcher.loadout, &designs), 6);
        assert!(!can_load_ordnance(&launcher, &rack, &designs[1], 1, &designs));
        assert_eq!(
            add_ordnance_to_loadout(&launcher, &rack, &designs[1], 1, &designs),
            Err(ValidationIssue::CapacityExceeded {
                launcher: rack.name.clone(),
                required: 5,
                available: 4,
            })
        );
        assert!(can_load_ordnance(&launcher, &rack, &designs[0], 1, &designs));
    }

    #[test]
    fn add_then_remove_restores_the_loadout() {
        let (rack, launcher, designs) = loaded_launcher();
        let big = InstalledLaunchSystem {
            quantity: 5,
            ..launcher.clone()
        };
        let added = add_ordnance_to_loadout(&big, &rack, &designs[1], 5, &designs).expect("fits");
        assert_eq!(remove_ordnance_from_loadout(&added, "d2"), big);
    }

    #[test]
    fn merges_lines_for_the_same_design() {
        let (rack, launcher, designs) = loaded_launcher();
        let next = add_ordnance_to_loadout(&launcher, &rack, &designs[0], 1, &designs).expect("fits");
        assert_eq!(
            next.loadout,
            vec![LoadoutItem {
                design_id: "d1".to_string(),
                quantity: 3
            }]
        );
    }

    #[test]
    fn unload_decrements_and_drops_empty_lines() {
        let (_, launcher, _) = loaded_launcher();
        let next = unload_ordnance(&launcher, "d1", 1);
        assert_eq!(next.loadout[0].quantity, 1);
        let next = unload_ordnance(&next, "d1", 5);
        assert!(next.loadout.is_empty());
    }

    #[test]
    fn loaded_designs_cannot_be_deleted() {
        let (_, launcher, designs) = loaded_launcher();
        let launchers = vec![launcher];
        assert!(is_design_loaded("d1", &launchers));
        assert!(matches!(
            delete_ordnance_design(&designs, "d1", &launchers),
            Err(ValidationIssue::ReferentialDeleteRejected { .. })
        ));
        let remaining = delete_ordnance_design(&designs, "d2", &launchers).expect("unloaded");
        assert_eq!(remaining.len(), 1);
    }

    #[test]
    fn resize_keeps_loadout_and_rejects_shrinking_below_use() {
        let (mut rack, launcher, designs) = loaded_launcher();
        rack.capacity = 4;
        assert!(matches!(
            resize_launch_system(&launcher, &rack, 1, 0, &designs),
            Err(ValidationIssue::CapacityExceeded { required: 6, available: 4, .. })
        ));
        let resized = resize_launch_system(&launcher, &rack, 2, 0, &designs).expect("8 >= 6");
        assert_eq!(resized.quantity, 2);
        assert_eq!(resized.loadout, launcher.loadout);
    }

    #[test]
    fn capacity_counts_expansion_only_when_expandable() {
        let mut rack = launch_system_type("rack", 10);
        rack.capacity_per_extra_hull_point = 1.5;
        assert_eq!(total_capacity(&rack, 2, 3), 20);
        rack.unit.expandable = true;
        assert_eq!(total_capacity(&rack, 2, 3), 24);
    }

    #[test]
    fn incompatible_category_is_rejected() {
        let (mut rack, launcher, designs) = loaded_launcher();
        rack.ordnance = vec![OrdnanceCategory::Mine];
        assert!(matches!(
            check_load(&launcher, &rack, &designs[0], 1, &designs),
            Err(ValidationIssue::IncompatibleOrdnance { .. })
        ));
    }

    #[test]
    fn missile_design_sums_components() {
        let propulsion = propulsion_type("booster", OrdnanceSize::Medium, -1, 200.0);
        let warhead = warhead_type("he", 0, 300.0);
        let guidance = guidance_type("radar", 2, 500.0);
        let design = calculate_missile_design("Lance", &propulsion, &warhead, Some(&guidance))
            .expect("valid missile");
        assert_eq!(design.capacity_required, 2);
        assert_eq!(design.total_accuracy, 1);
        assert_eq!(design.total_cost, 1000.0);
        assert_eq!(design.guidance_id.as_deref(), Some("radar"));
    }

    #[test]
    fn guidance_rules_per_category() {
        let propulsion = propulsion_type("casing", OrdnanceSize::Heavy, 0, 100.0);
        let warhead = warhead_type("he", 0, 300.0);
        let guidance = guidance_type("radar", 2, 500.0);

        let bomb = calculate_bomb_design("Drop", &propulsion, &warhead).expect("bomb");
        assert_eq!(bomb.capacity_required, 4);
        assert!(bomb.guidance_id.is_none());

        let report = calculate_mine_design("Trap", &propulsion, &warhead, None).expect_err("unguided mine");
        assert!(matches!(report.issues(), [ValidationIssue::MissingGuidance { .. }]));

        let report = calculate_ordnance_design(
            OrdnanceCategory::Bomb,
            "Drop",
            &propulsion,
            &warhead,
            Some(&guidance),
        )
        .expect_err("guided bomb");
        assert!(matches!(report.issues(), [ValidationIssue::UnexpectedGuidance { .. }]));
    }

    #[test]
    fn component_categories_are_checked() {
        let mut propulsion = propulsion_type("booster", OrdnanceSize::Light, 0, 100.0);
        propulsion.categories = vec![OrdnanceCategory::Missile];
        let warhead = warhead_type("he", 0, 300.0);
        let report = calculate_bomb_design("Drop", &propulsion, &warhead).expect_err("missile booster");
        assert!(matches!(
            report.issues(),
            [ValidationIssue::ComponentCategoryMismatch { .. }]
        ));
    }
}
