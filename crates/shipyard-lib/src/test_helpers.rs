// Test-only builders for `shipyard-lib` tests
#![allow(dead_code)]

use std::collections::BTreeMap;

use crate::catalog::{
    AccelerationTable, AccommodationCategory, AccommodationType, Catalog, EngineType, Firepower,
    GravityKind, GravitySystemType, GuidanceType, Hull, LaunchSystemType, LifeSupportType,
    OrdnanceCategory, OrdnanceSize, PowerPlantType, ProgressLevel, PropulsionType, SensorCategory,
    SensorType, ShipClass, StoreEffect, StoreSystemType, TechTrack, WarheadType, WeaponCategory,
    WeaponType,
};
use crate::sizing::{PowerRounding, SizingProfile, UnitProfile};
use crate::systems::OrdnanceDesign;

const ALL_ORDNANCE: [OrdnanceCategory; 3] = [
    OrdnanceCategory::Missile,
    OrdnanceCategory::Bomb,
    OrdnanceCategory::Mine,
];

/// Catalog shared with the integration tests.
pub fn fixture_catalog() -> Catalog {
    Catalog::from_json_str(include_str!("../../../docs/fixtures/catalog.json"))
        .expect("fixture catalog is valid")
}

pub fn track(code: char) -> TechTrack {
    TechTrack::new(code).expect("valid track letter")
}

/// A light-class hull with no crew requirement.
pub fn hull_with_points(hull_points: u32) -> Hull {
    Hull {
        id: "test-hull".to_string(),
        name: "Test Hull".to_string(),
        ship_class: ShipClass::Light,
        hull_points,
        crew: 0,
        cost: 100_000.0,
        progress_level: 6,
        tech_tracks: Vec::new(),
        description: None,
    }
}

fn unit(hull_points: f64, power_required: f64, cost: f64) -> UnitProfile {
    UnitProfile {
        hull_points,
        power_required,
        cost,
        expandable: false,
        cost_per_extra_hull_point: 0.0,
    }
}

/// Minimum size 5, 2 power per hull point, no fuel.
pub fn engine_type(id: &str, progress_level: ProgressLevel, cost_per_hull_point: f64) -> EngineType {
    EngineType {
        id: id.to_string(),
        name: format!("{id} drive"),
        progress_level,
        tech_tracks: Vec::new(),
        ship_classes: Vec::new(),
        sizing: SizingProfile {
            min_size: 5,
            base_cost: 0.0,
            cost_per_hull_point,
            power_per_hull_point: 2.0,
            power_rounding: PowerRounding::Ceil,
            fuel: None,
        },
        acceleration: AccelerationTable::default(),
        description: None,
    }
}

pub fn power_plant_type(
    id: &str,
    progress_level: ProgressLevel,
    power_per_hull_point: f64,
) -> PowerPlantType {
    PowerPlantType {
        id: id.to_string(),
        name: format!("{id} plant"),
        progress_level,
        tech_tracks: Vec::new(),
        ship_classes: Vec::new(),
        sizing: SizingProfile {
            min_size: 1,
            base_cost: 0.0,
            cost_per_hull_point: 100.0,
            power_per_hull_point,
            power_rounding: PowerRounding::Floor,
            fuel: None,
        },
        description: None,
    }
}

pub fn sensor_type(id: &str, category: SensorCategory, arcs_covered: u8) -> SensorType {
    SensorType {
        id: id.to_string(),
        name: format!("{id} sensor"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        ship_classes: Vec::new(),
        category,
        unit: unit(1.0, 1.0, 2000.0),
        arcs_covered,
        tracking: BTreeMap::new(),
        range: None,
    }
}

/// 2 hull points, 1 power, 1000 per unit, light firepower.
pub fn weapon_type(id: &str, category: WeaponCategory) -> WeaponType {
    WeaponType {
        id: id.to_string(),
        name: format!("{id} weapon"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        ship_classes: Vec::new(),
        category,
        firepower: Firepower::Light,
        unit: unit(2.0, 1.0, 1000.0),
        accuracy: 0,
        range: None,
        damage: None,
    }
}

pub fn launch_system_type(id: &str, capacity: u32) -> LaunchSystemType {
    LaunchSystemType {
        id: id.to_string(),
        name: format!("{id} launcher"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        ship_classes: Vec::new(),
        unit: unit(2.0, 1.0, 3000.0),
        capacity,
        capacity_per_extra_hull_point: 0.0,
        ordnance: ALL_ORDNANCE.to_vec(),
        rate_of_fire: None,
    }
}

pub fn ordnance_design(id: &str, capacity_required: u32) -> OrdnanceDesign {
    OrdnanceDesign {
        id: id.to_string(),
        name: format!("{id} missile"),
        category: OrdnanceCategory::Missile,
        size: OrdnanceSize::Light,
        propulsion_id: "booster".to_string(),
        warhead_id: "he".to_string(),
        guidance_id: Some("seeker".to_string()),
        capacity_required,
        total_accuracy: 0,
        total_cost: 1000.0,
    }
}

pub fn propulsion_type(
    id: &str,
    size: OrdnanceSize,
    accuracy_modifier: i32,
    cost: f64,
) -> PropulsionType {
    PropulsionType {
        id: id.to_string(),
        name: format!("{id} propulsion"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        categories: ALL_ORDNANCE.to_vec(),
        size,
        accuracy_modifier,
        cost,
        range: None,
    }
}

pub fn warhead_type(id: &str, accuracy_modifier: i32, cost: f64) -> WarheadType {
    WarheadType {
        id: id.to_string(),
        name: format!("{id} warhead"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        categories: ALL_ORDNANCE.to_vec(),
        accuracy_modifier,
        cost,
        damage: None,
    }
}

pub fn guidance_type(id: &str, accuracy_modifier: i32, cost: f64) -> GuidanceType {
    GuidanceType {
        id: id.to_string(),
        name: format!("{id} guidance"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        categories: vec![OrdnanceCategory::Missile, OrdnanceCategory::Mine],
        accuracy_modifier,
        cost,
    }
}

pub fn life_support_type(id: &str, coverage_hull_points: u32) -> LifeSupportType {
    LifeSupportType {
        id: id.to_string(),
        name: format!("{id} support"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        ship_classes: Vec::new(),
        unit: unit(1.0, 1.0, 1000.0),
        coverage_hull_points,
    }
}

pub fn accommodation_type(
    id: &str,
    category: AccommodationCategory,
    capacity: u32,
) -> AccommodationType {
    AccommodationType {
        id: id.to_string(),
        name: format!("{id} quarters"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        ship_classes: Vec::new(),
        category,
        unit: unit(1.0, 0.0, 500.0),
        capacity,
    }
}

pub fn store_type(id: &str, effect: StoreEffect) -> StoreSystemType {
    StoreSystemType {
        id: id.to_string(),
        name: format!("{id} stores"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        ship_classes: Vec::new(),
        unit: unit(1.0, 0.0, 250.0),
        effect,
    }
}

pub fn gravity_type(id: &str, kind: GravityKind, hull_percentage: f64) -> GravitySystemType {
    GravitySystemType {
        id: id.to_string(),
        name: format!("{id} gravity"),
        progress_level: 6,
        tech_tracks: Vec::new(),
        ship_classes: Vec::new(),
        kind,
        hull_percentage,
        base_cost: 1000.0,
        cost_per_hull_point: 100.0,
    }
}
