//! Sensor installations: quantity, arc coverage and tracking.

use serde::{Deserialize, Serialize};

use crate::catalog::{ProgressLevel, SensorCategory, SensorType, TrackingCapability};
use crate::ids::{has_id, new_id};
use crate::sizing::Footprint;
use crate::validation::ValidationIssue;

use super::arcs::{first_duplicate, FiringArc, SENSOR_ARCS};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledSensor {
    pub id: String,
    pub sensor_type_id: String,
    pub quantity: u32,
    #[serde(default)]
    pub extra_hull_points: u32,
    #[serde(default)]
    pub arcs: Vec<FiringArc>,
}

has_id!(InstalledSensor);

impl InstalledSensor {
    /// A new installation covering the first arcs its quantity allows.
    pub fn new(sensor_type: &SensorType, quantity: u32) -> Self {
        let arcs = SENSOR_ARCS
            .iter()
            .copied()
            .take(max_arcs_for_quantity(sensor_type, quantity))
            .collect();
        Self {
            id: new_id("sensor"),
            sensor_type_id: sensor_type.id.clone(),
            quantity,
            extra_hull_points: 0,
            arcs,
        }
    }
}

/// Arcs coverable at `quantity`, capped at the four horizontal arcs.
pub fn max_arcs_for_quantity(sensor_type: &SensorType, quantity: u32) -> usize {
    let covered = sensor_type.arcs_covered as usize * quantity as usize;
    covered.min(SENSOR_ARCS.len())
}

pub fn sensor_footprint(sensor_type: &SensorType, quantity: u32, extra_hull_points: u32) -> Footprint {
    sensor_type.unit.footprint(quantity, extra_hull_points)
}

/// Change the quantity, dropping the newest arcs that no longer fit.
pub fn set_sensor_quantity(
    installed: &InstalledSensor,
    sensor_type: &SensorType,
    quantity: u32,
) -> InstalledSensor {
    let limit = max_arcs_for_quantity(sensor_type, quantity);
    let mut next = installed.clone();
    next.quantity = quantity;
    next.arcs.truncate(limit);
    next
}

/// Select or deselect a horizontal arc.
///
/// Selecting past the quantity limit replaces the oldest arc. Non-horizontal
/// arcs are ignored.
pub fn toggle_sensor_arc(
    installed: &InstalledSensor,
    sensor_type: &SensorType,
    arc: FiringArc,
) -> InstalledSensor {
    let mut next = installed.clone();
    if !SENSOR_ARCS.contains(&arc) {
        return next;
    }
    if let Some(index) = next.arcs.iter().position(|a| *a == arc) {
        next.arcs.remove(index);
        return next;
    }

    let limit = max_arcs_for_quantity(sensor_type, installed.quantity);
    if limit == 0 {
        return next;
    }
    while next.arcs.len() >= limit {
        next.arcs.remove(0);
    }
    next.arcs.push(arc);
    next
}

pub fn validate_sensor_arcs(
    sensor_type: &SensorType,
    quantity: u32,
    arcs: &[FiringArc],
) -> Option<ValidationIssue> {
    if let Some(arc) = first_duplicate(arcs) {
        return Some(ValidationIssue::DuplicateArc {
            arc: arc.to_string(),
        });
    }
    let limit = max_arcs_for_quantity(sensor_type, quantity);
    let horizontal = arcs.iter().all(|arc| SENSOR_ARCS.contains(arc));
    if arcs.len() > limit || !horizontal {
        return Some(ValidationIssue::TooManySensorArcs {
            name: sensor_type.name.clone(),
            limit,
            selected: arcs.len(),
        });
    }
    None
}

/// Tracking of `quantity` sensors on a design at `progress_level`.
pub fn sensor_tracking(
    sensor_type: &SensorType,
    quantity: u32,
    progress_level: ProgressLevel,
) -> TrackingCapability {
    sensor_type.tracking_at(progress_level).scaled(quantity)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorSummary {
    pub count: u32,
    pub footprint: Footprint,
    /// Distinct horizontal arcs covered by at least one sensor.
    pub arcs_covered: Vec<FiringArc>,
    pub tracking: TrackingCapability,
    pub has_active_sensor: bool,
}

pub fn calculate_sensor_summary(
    sensors: &[(&InstalledSensor, &SensorType)],
    progress_level: ProgressLevel,
) -> SensorSummary {
    let mut summary = SensorSummary {
        count: 0,
        footprint: Footprint::default(),
        arcs_covered: Vec::new(),
        tracking: TrackingCapability::default(),
        has_active_sensor: false,
    };

    for (installed, sensor_type) in sensors {
        summary.count = summary.count.saturating_add(installed.quantity);
        summary.footprint +=
            sensor_footprint(sensor_type, installed.quantity, installed.extra_hull_points);
        summary.tracking = summary.tracking.combine(sensor_tracking(
            sensor_type,
            installed.quantity,
            progress_level,
        ));
        summary.has_active_sensor |= sensor_type.category == SensorCategory::Active;
        for arc in &installed.arcs {
            if !summary.arcs_covered.contains(arc) {
                summary.arcs_covered.push(*arc);
            }
        }
    }

    summary
        .arcs_covered
        .sort_by_key(|arc| SENSOR_ARCS.iter().position(|a| a == arc));
    summary
}
