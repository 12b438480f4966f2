use serde::{Deserialize, Serialize};

use crate::catalog::{DesignConstraints, ShipClass};
use crate::sizing::Budget;
use crate::systems::ordnance::calculate_ordnance_summary;
use crate::systems::propulsion::{calculate_acceleration, fuel_endurance};
use crate::systems::sensors::calculate_sensor_summary;
use crate::systems::support::{calculate_support_summary, SupportSystems};
use crate::systems::weapons::calculate_weapon_summary;
use crate::systems::{FuelEndurance, OrdnanceSummary, SensorSummary, SupportSummary, WeaponSummary};

use super::resolved::{InstallationLine, ResolvedDesign};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HullSummary {
    pub id: String,
    pub name: String,
    pub ship_class: ShipClass,
    pub hull_points: u32,
    pub crew: u32,
    pub cost: f64,
}

/// Every derived total of a design, recomputed from its installation lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSummary {
    pub name: String,
    pub hull: HullSummary,
    pub constraints: DesignConstraints,
    pub budget: Budget,
    pub hull_points_remaining: u32,
    pub power_remaining: i64,
    /// Hull plus every installation.
    pub total_cost: f64,
    pub acceleration: f64,
    pub fuel: Vec<FuelEndurance>,
    pub sensors: SensorSummary,
    pub weapons: WeaponSummary,
    pub ordnance: OrdnanceSummary,
    pub support: SupportSummary,
    pub installations: Vec<InstallationLine>,
}

impl ResolvedDesign<'_> {
    pub fn summary(&self) -> DesignSummary {
        let design = self.design;
        let hull = self.hull;
        let installations = self.lines();
        let budget = self.budget(None);

        DesignSummary {
            name: design.name.clone(),
            hull: HullSummary {
                id: hull.id.clone(),
                name: hull.name.clone(),
                ship_class: hull.ship_class,
                hull_points: hull.hull_points,
                crew: hull.crew,
                cost: hull.cost,
            },
            constraints: design.constraints.clone(),
            budget,
            hull_points_remaining: budget.hull_points_remaining(),
            power_remaining: budget.power_remaining(),
            total_cost: hull.cost + installations.iter().map(|line| line.footprint.cost).sum::<f64>(),
            acceleration: calculate_acceleration(&self.engines, hull),
            fuel: fuel_endurance(&self.fuel_burners(), &design.fuel_tanks),
            sensors: calculate_sensor_summary(&self.sensors, design.constraints.progress_level),
            weapons: calculate_weapon_summary(&self.weapons),
            ordnance: calculate_ordnance_summary(&self.launch_systems, &design.ordnance_designs),
            support: calculate_support_summary(
                SupportSystems {
                    life_support: &self.life_support,
                    accommodations: &self.accommodations,
                    stores: &self.store_systems,
                    gravity: self.gravity,
                },
                hull,
            ),
            installations,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::DesignConstraints;
    use crate::design::{ResolvedDesign, ShipDesign};
    use crate::systems::{InstalledEngine, InstalledPowerPlant, InstalledSensor};
    use crate::test_helpers::fixture_catalog;

    #[test]
    fn totals_include_the_hull_and_every_installation() {
        let catalog = fixture_catalog();
        let hull = catalog.hull("frigate").expect("fixture");
        let mut design = ShipDesign::new("Picket", hull, DesignConstraints::new(6, vec![]));
        design.engines.push(InstalledEngine::new(
            catalog.engine("ion").expect("fixture"),
            10,
        ));
        design.power_plants.push(InstalledPowerPlant::new(
            catalog.power_plant("fusion").expect("fixture"),
            5,
        ));
        design.sensors.push(InstalledSensor::new(
            catalog.sensor("radar").expect("fixture"),
            2,
        ));

        let resolved = ResolvedDesign::resolve(&design, &catalog).expect("resolves");
        let summary = resolved.summary();

        assert_eq!(summary.budget.hull_points_used, 17);
        assert_eq!(summary.budget.power_generated, 25);
        assert_eq!(summary.budget.power_used, 22);
        assert_eq!(summary.power_remaining, 3);
        // hull 1,000,000 + engine 100 + plant 1,500 + radar 4,000
        assert_eq!(summary.total_cost, 1_005_600.0);
        assert_eq!(summary.acceleration, 2.0);
        assert!(summary.sensors.has_active_sensor);
        assert_eq!(summary.installations.len(), 3);
    }
}
