//! Engines, power plants and the fuel tanks that feed them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{EngineType, Hull, PowerPlantType};
use crate::ids::{has_id, new_id};
use crate::sizing::{saturating_sum, Footprint, FuelProfile, SizingProfile};
use crate::validation::{ValidationIssue, ValidationReport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledEngine {
    pub id: String,
    pub engine_type_id: String,
    pub hull_points: u32,
}

impl InstalledEngine {
    pub fn new(engine_type: &EngineType, hull_points: u32) -> Self {
        Self {
            id: new_id("engine"),
            engine_type_id: engine_type.id.clone(),
            hull_points,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledPowerPlant {
    pub id: String,
    pub power_plant_type_id: String,
    pub hull_points: u32,
}

impl InstalledPowerPlant {
    pub fn new(plant_type: &PowerPlantType, hull_points: u32) -> Self {
        Self {
            id: new_id("plant"),
            power_plant_type_id: plant_type.id.clone(),
            hull_points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FuelConsumerKind {
    Engine,
    PowerPlant,
}

impl fmt::Display for FuelConsumerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FuelConsumerKind::Engine => f.write_str("engine"),
            FuelConsumerKind::PowerPlant => f.write_str("power plant"),
        }
    }
}

/// The component type a fuel tank is dedicated to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelConsumer {
    pub kind: FuelConsumerKind,
    pub type_id: String,
}

impl FuelConsumer {
    pub fn engine(type_id: impl Into<String>) -> Self {
        Self {
            kind: FuelConsumerKind::Engine,
            type_id: type_id.into(),
        }
    }

    pub fn power_plant(type_id: impl Into<String>) -> Self {
        Self {
            kind: FuelConsumerKind::PowerPlant,
            type_id: type_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledFuelTank {
    pub id: String,
    pub consumer: FuelConsumer,
    pub hull_points: u32,
}

impl InstalledFuelTank {
    pub fn new(consumer: FuelConsumer, hull_points: u32) -> Self {
        Self {
            id: new_id("fuel"),
            consumer,
            hull_points,
        }
    }
}

has_id!(InstalledEngine, InstalledPowerPlant, InstalledFuelTank);

/// Tank footprint: no power, cost priced by the consumer's fuel profile.
pub fn fuel_tank_footprint(fuel: &FuelProfile, hull_points: u32) -> Footprint {
    Footprint::new(
        hull_points,
        0,
        hull_points as f64 * fuel.tank_cost_per_hull_point,
    )
}

/// Acceleration rating of the installed engines.
///
/// Hull points are summed per engine type, each type's share of the hull is
/// looked up in its acceleration table and the ratings are added.
pub fn calculate_acceleration(engines: &[(&InstalledEngine, &EngineType)], hull: &Hull) -> f64 {
    if hull.hull_points == 0 {
        return 0.0;
    }

    let mut per_type: Vec<(&EngineType, u32)> = Vec::new();
    for (installed, engine_type) in engines {
        match per_type.iter_mut().find(|(t, _)| t.id == engine_type.id) {
            Some((_, hp)) => *hp = hp.saturating_add(installed.hull_points),
            None => per_type.push((engine_type, installed.hull_points)),
        }
    }

    per_type
        .into_iter()
        .map(|(engine_type, hp)| {
            let percentage = hp as f64 / hull.hull_points as f64 * 100.0;
            engine_type.acceleration.rating_for_percentage(percentage)
        })
        .sum()
}

/// Endurance of `fuel_hull_points` of fuel feeding `consumer_hull_points`.
///
/// Zero when nothing consumes the fuel.
pub fn calculate_endurance(fuel_hull_points: u32, efficiency: f64, consumer_hull_points: u32) -> f64 {
    if consumer_hull_points == 0 {
        return 0.0;
    }
    fuel_hull_points as f64 * efficiency / consumer_hull_points as f64
}

/// One installed fuel-burning component, resolved against its type.
#[derive(Debug, Clone, Copy)]
pub struct FuelBurner<'a> {
    pub kind: FuelConsumerKind,
    pub type_id: &'a str,
    pub name: &'a str,
    pub sizing: &'a SizingProfile,
    pub hull_points: u32,
}

impl<'a> FuelBurner<'a> {
    pub fn engine(installed: &InstalledEngine, engine_type: &'a EngineType) -> Self {
        Self {
            kind: FuelConsumerKind::Engine,
            type_id: &engine_type.id,
            name: &engine_type.name,
            sizing: &engine_type.sizing,
            hull_points: installed.hull_points,
        }
    }

    pub fn power_plant(installed: &InstalledPowerPlant, plant_type: &'a PowerPlantType) -> Self {
        Self {
            kind: FuelConsumerKind::PowerPlant,
            type_id: &plant_type.id,
            name: &plant_type.name,
            sizing: &plant_type.sizing,
            hull_points: installed.hull_points,
        }
    }

    fn feeds_from(&self, tank: &InstalledFuelTank) -> bool {
        tank.consumer.kind == self.kind && tank.consumer.type_id == self.type_id
    }
}

/// Fuel state of one fuel-burning component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelEndurance {
    pub kind: FuelConsumerKind,
    pub type_id: String,
    pub name: String,
    pub consumer_hull_points: u32,
    pub fuel_hull_points: u32,
    pub endurance: f64,
}

/// Endurance per fuel-burning type, in first-installed order.
pub fn fuel_endurance(burners: &[FuelBurner<'_>], tanks: &[InstalledFuelTank]) -> Vec<FuelEndurance> {
    let mut rows: Vec<(FuelBurner<'_>, FuelProfile, u32)> = Vec::new();
    for burner in burners {
        let Some(fuel) = burner.sizing.fuel else {
            continue;
        };
        match rows
            .iter_mut()
            .find(|(b, _, _)| b.kind == burner.kind && b.type_id == burner.type_id)
        {
            Some((_, _, hp)) => *hp = hp.saturating_add(burner.hull_points),
            None => rows.push((*burner, fuel, burner.hull_points)),
        }
    }

    rows.into_iter()
        .map(|(burner, fuel, consumer_hp)| {
            let fuel_hp = saturating_sum(
                tanks
                    .iter()
                    .filter(|tank| burner.feeds_from(tank))
                    .map(|tank| tank.hull_points),
            );
            FuelEndurance {
                kind: burner.kind,
                type_id: burner.type_id.to_string(),
                name: burner.name.to_string(),
                consumer_hull_points: consumer_hp,
                fuel_hull_points: fuel_hp,
                endurance: calculate_endurance(fuel_hp, fuel.efficiency, consumer_hp),
            }
        })
        .collect()
}

/// Warn once per fuel-requiring type that has no tank at all.
pub fn validate_fuel_supply(burners: &[FuelBurner<'_>], tanks: &[InstalledFuelTank]) -> ValidationReport {
    let mut report = ValidationReport::new();
    let mut warned: Vec<(FuelConsumerKind, &str)> = Vec::new();

    for burner in burners {
        if !burner.sizing.requires_fuel() || warned.contains(&(burner.kind, burner.type_id)) {
            continue;
        }
        let has_tank = tanks
            .iter()
            .any(|tank| burner.feeds_from(tank) && tank.hull_points > 0);
        if !has_tank {
            warned.push((burner.kind, burner.type_id));
            report.push(ValidationIssue::MissingFuel {
                name: burner.name.to_string(),
            });
        }
    }

    report
}

/// Fuel warnings for the installed engines.
pub fn validate_engine_design(
    engines: &[(&InstalledEngine, &EngineType)],
    tanks: &[InstalledFuelTank],
) -> ValidationReport {
    let burners: Vec<_> = engines
        .iter()
        .map(|(installed, engine_type)| FuelBurner::engine(installed, engine_type))
        .collect();
    validate_fuel_supply(&burners, tanks)
}

/// Fuel warnings for the installed power plants.
pub fn validate_power_plant_design(
    plants: &[(&InstalledPowerPlant, &PowerPlantType)],
    tanks: &[InstalledFuelTank],
) -> ValidationReport {
    let burners: Vec<_> = plants
        .iter()
        .map(|(installed, plant_type)| FuelBurner::power_plant(installed, plant_type))
        .collect();
    validate_fuel_supply(&burners, tanks)
}

/// Total power generated by the installed plants.
pub fn total_power_generated(plants: &[(&InstalledPowerPlant, &PowerPlantType)]) -> u32 {
    saturating_sum(
        plants
            .iter()
            .map(|(installed, plant_type)| plant_type.sizing.footprint(installed.hull_points).power),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::AccelerationTable;
    use crate::test_helpers::{engine_type, hull_with_points, power_plant_type};

    fn fueled_engine(id: &str) -> EngineType {
        let mut engine = engine_type(id, 6, 10.0);
        engine.sizing.fuel = Some(FuelProfile {
            efficiency: 2.0,
            tank_cost_per_hull_point: 500.0,
            optional: false,
        });
        engine
    }

    #[test]
    fn acceleration_sums_hull_points_per_type() {
        let hull = hull_with_points(100);
        let mut ion = engine_type("ion", 6, 10.0);
        ion.acceleration = AccelerationTable {
            at5: 1.0,
            at10: 2.0,
            at15: 3.0,
            at20: 4.0,
            at30: 5.0,
        };
        let a = InstalledEngine::new(&ion, 6);
        let b = InstalledEngine::new(&ion, 6);

        // 12% of the hull: the 10% bucket, not two 5% buckets.
        let rating = calculate_acceleration(&[(&a, &ion), (&b, &ion)], &hull);
        assert_eq!(rating, 2.0);
    }

    #[test]
    fn distinct_engine_types_add_their_ratings() {
        let hull = hull_with_points(100);
        let mut ion = engine_type("ion", 6, 10.0);
        ion.acceleration.at10 = 2.0;
        let mut fusion = engine_type("fusion", 6, 10.0);
        fusion.acceleration.at5 = 1.5;
        let a = InstalledEngine::new(&ion, 10);
        let b = InstalledEngine::new(&fusion, 5);
        assert_eq!(calculate_acceleration(&[(&a, &ion), (&b, &fusion)], &hull), 3.5);
    }

    #[test]
    fn endurance_is_zero_without_consumers() {
        assert_eq!(calculate_endurance(10, 2.0, 0), 0.0);
        assert_eq!(calculate_endurance(10, 2.0, 5), 4.0);
    }

    #[test]
    fn missing_fuel_warns_once_per_type() {
        let engine = fueled_engine("chem");
        let a = InstalledEngine::new(&engine, 5);
        let b = InstalledEngine::new(&engine, 5);
        let report = validate_engine_design(&[(&a, &engine), (&b, &engine)], &[]);
        assert_eq!(
            report.issues(),
            &[ValidationIssue::MissingFuel {
                name: engine.name.clone()
            }]
        );
        assert!(!report.has_blocking_errors());

        let tank = InstalledFuelTank::new(FuelConsumer::engine("chem"), 4);
        assert!(validate_engine_design(&[(&a, &engine)], &[tank]).is_valid());
    }

    #[test]
    fn optional_fuel_never_warns() {
        let mut engine = fueled_engine("hybrid");
        if let Some(fuel) = engine.sizing.fuel.as_mut() {
            fuel.optional = true;
        }
        let a = InstalledEngine::new(&engine, 5);
        assert!(validate_engine_design(&[(&a, &engine)], &[]).is_valid());
    }

    #[test]
    fn tanks_only_feed_their_own_consumer_kind() {
        let engine = fueled_engine("chem");
        let mut plant = power_plant_type("chem", 6, 3.0);
        plant.sizing.fuel = engine.sizing.fuel;
        let e = InstalledEngine::new(&engine, 10);
        let p = InstalledPowerPlant::new(&plant, 5);
        let tank = InstalledFuelTank::new(FuelConsumer::engine("chem"), 5);

        let burners = [FuelBurner::engine(&e, &engine), FuelBurner::power_plant(&p, &plant)];
        let rows = fuel_endurance(&burners, std::slice::from_ref(&tank));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].endurance, 1.0);
        assert_eq!(rows[1].fuel_hull_points, 0);
        assert_eq!(rows[1].endurance, 0.0);

        let report = validate_fuel_supply(&burners, &[tank]);
        assert_eq!(report.issues().len(), 1);
    }

    #[test]
    fn tank_cost_uses_consumer_profile() {
        let engine = fueled_engine("chem");
        let fuel = engine.sizing.fuel.expect("fuel profile");
        assert_eq!(fuel_tank_footprint(&fuel, 4), Footprint::new(4, 0, 2000.0));
    }

    #[test]
    fn plants_generate_power_by_size() {
        let plant = power_plant_type("fusion", 6, 3.0);
        let a = InstalledPowerPlant::new(&plant, 5);
        let b = InstalledPowerPlant::new(&plant, 4);
        assert_eq!(total_power_generated(&[(&a, &plant), (&b, &plant)]), 27);
    }
}
