//! Technology compliance of installed equipment.
//!
//! Tightening a design's progress level or tech tracks never removes what is
//! already installed. Such items are reported as
//! [`ValidationIssue::Grandfathered`] warnings instead.

use std::collections::HashSet;

use crate::catalog::{find_by_id, format_tracks, CatalogEntry, DesignConstraints};
use crate::validation::{ValidationIssue, ValidationReport};

use super::resolved::ResolvedDesign;

struct Audit<'c> {
    constraints: &'c DesignConstraints,
    seen: HashSet<(&'static str, String)>,
    report: ValidationReport,
}

impl Audit<'_> {
    fn visit<T: CatalogEntry>(&mut self, entry: &T) {
        if self.constraints.allows(entry) || !self.seen.insert((T::KIND, entry.id().to_string())) {
            return;
        }
        self.report.push(ValidationIssue::Grandfathered {
            name: entry.name().to_string(),
            progress_level: entry.progress_level(),
            tracks: format_tracks(entry.tech_tracks()),
        });
    }
}

/// One warning per installed type the design's constraints no longer allow.
pub fn audit_technology(resolved: &ResolvedDesign<'_>) -> ValidationReport {
    let design = resolved.design;
    let catalog = resolved.catalog;
    let mut audit = Audit {
        constraints: &design.constraints,
        seen: HashSet::new(),
        report: ValidationReport::new(),
    };

    audit.visit(resolved.hull);
    for (_, entry) in &resolved.engines {
        audit.visit(*entry);
    }
    for (_, entry) in &resolved.power_plants {
        audit.visit(*entry);
    }
    for (_, entry) in &resolved.sensors {
        audit.visit(*entry);
    }
    for (_, entry, _) in &resolved.weapons {
        audit.visit(*entry);
    }
    for (_, entry) in &resolved.launch_systems {
        audit.visit(*entry);
    }
    for (_, entry) in &resolved.life_support {
        audit.visit(*entry);
    }
    for (_, entry) in &resolved.accommodations {
        audit.visit(*entry);
    }
    for (_, entry) in &resolved.store_systems {
        audit.visit(*entry);
    }
    if let Some((_, entry)) = resolved.gravity {
        audit.visit(entry);
    }

    for ordnance in &design.ordnance_designs {
        if let Some(entry) = find_by_id(&catalog.propulsion, &ordnance.propulsion_id) {
            audit.visit(entry);
        }
        if let Some(entry) = find_by_id(&catalog.warheads, &ordnance.warhead_id) {
            audit.visit(entry);
        }
        if let Some(entry) = ordnance
            .guidance_id
            .as_deref()
            .and_then(|id| find_by_id(&catalog.guidance, id))
        {
            audit.visit(entry);
        }
    }

    audit.report
}
