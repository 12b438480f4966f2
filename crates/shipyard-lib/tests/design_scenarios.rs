mod support;

use shipyard_lib::ids::remove_by_id;
use shipyard_lib::sizing::{calculate_cost, calculate_power, validate_installation};
use shipyard_lib::systems::{
    calculate_acceleration, validate_engine_design, InstalledEngine, InstalledPowerPlant,
};
use shipyard_lib::{ResolvedDesign, ValidationIssue};

use support::{fixture_catalog, frigate};

#[test]
fn cost_is_base_plus_per_hull_point_for_every_valid_size() {
    let catalog = fixture_catalog();
    let fusion = catalog.power_plant("fusion").expect("fusion plant");

    for hull_points in fusion.sizing.min_size..=60 {
        assert_eq!(
            calculate_cost(&fusion.sizing, hull_points),
            1000.0 + hull_points as f64 * 100.0
        );
    }
}

#[test]
fn ion_drive_at_ten_hull_points() {
    let catalog = fixture_catalog();
    let ion = catalog.engine("ion").expect("ion drive");
    let hull = catalog.hull("frigate").expect("frigate");

    assert_eq!(calculate_power(&ion.sizing, 10), 20);
    assert_eq!(calculate_cost(&ion.sizing, 10), 100.0);
    assert!(validate_installation(&ion.name, &ion.sizing, 10, hull, 0, 20).is_valid());

    let short = validate_installation(&ion.name, &ion.sizing, 10, hull, 0, 19);
    assert!(matches!(
        short.issues(),
        [ValidationIssue::InsufficientPower { required: 20, available: 19, .. }]
    ));
}

#[test]
fn minimum_size_boundary() {
    let catalog = fixture_catalog();
    let mut design = frigate(&catalog);
    let fusion = catalog.power_plant("fusion").expect("fusion plant");
    design.power_plants.push(InstalledPowerPlant::new(fusion, 10));
    let ion = catalog.engine("ion").expect("ion drive");

    let resolved = ResolvedDesign::resolve(&design, &catalog).expect("resolve");
    assert!(resolved.validate_engine(ion, 5, None).is_valid());

    let report = resolved.validate_engine(ion, 4, None);
    assert!(matches!(
        report.issues(),
        [ValidationIssue::BelowMinimumSize { min_size: 5, requested: 4, .. }]
    ));
}

#[test]
fn acceleration_combines_hull_points_of_one_type() {
    let catalog = fixture_catalog();
    let hull = catalog.hull("frigate").expect("frigate");
    let ion = catalog.engine("ion").expect("ion drive");
    let a = InstalledEngine::new(ion, 7);
    let b = InstalledEngine::new(ion, 8);

    // 15% combined, where 7% and 8% would each only reach the 5% bucket.
    let combined = calculate_acceleration(&[(&a, ion), (&b, ion)], hull);
    assert_eq!(combined, 3.0);

    let naive = calculate_acceleration(&[(&a, ion)], hull) + calculate_acceleration(&[(&b, ion)], hull);
    assert_eq!(naive, 2.0);
}

#[test]
fn distinct_engine_types_add_ratings() {
    let catalog = fixture_catalog();
    let hull = catalog.hull("frigate").expect("frigate");
    let ion = catalog.engine("ion").expect("ion drive");
    let chemical = catalog.engine("chemical").expect("chemical rocket");
    let a = InstalledEngine::new(ion, 10);
    let b = InstalledEngine::new(chemical, 10);

    assert_eq!(calculate_acceleration(&[(&a, ion), (&b, chemical)], hull), 3.0);
}

#[test]
fn fuel_engine_without_tank_is_flagged_by_name() {
    let catalog = fixture_catalog();
    let chemical = catalog.engine("chemical").expect("chemical rocket");
    let installed = InstalledEngine::new(chemical, 10);

    let report = validate_engine_design(&[(&installed, chemical)], &[]);
    assert!(!report.is_valid());
    assert!(!report.has_blocking_errors());
    assert_eq!(report.issues().len(), 1);
    assert!(report.messages()[0].contains("Chemical Rocket"));
}

#[test]
fn editing_excludes_the_installation_being_replaced() {
    let catalog = fixture_catalog();
    let mut design = frigate(&catalog);
    let fusion = catalog.power_plant("fusion").expect("fusion plant");
    let chemical = catalog.engine("chemical").expect("chemical rocket");
    design.power_plants.push(InstalledPowerPlant::new(fusion, 10));
    let engine = InstalledEngine::new(chemical, 85);
    let engine_id = engine.id.clone();
    design.engines.push(engine);

    let resolved = ResolvedDesign::resolve(&design, &catalog).expect("resolve");

    let counted_twice = resolved.validate_engine(chemical, 80, None);
    assert!(counted_twice
        .issues()
        .iter()
        .any(|issue| matches!(issue, ValidationIssue::InsufficientHullPoints { .. })));

    let edit = resolved.validate_engine(chemical, 80, Some(&engine_id));
    assert!(edit.is_valid(), "unexpected issues: {:?}", edit.messages());
}

#[test]
fn shrinking_a_power_plant_below_demand_is_rejected() {
    let catalog = fixture_catalog();
    let mut design = frigate(&catalog);
    let fusion = catalog.power_plant("fusion").expect("fusion plant");
    let ion = catalog.engine("ion").expect("ion drive");
    let plant = InstalledPowerPlant::new(fusion, 10);
    let plant_id = plant.id.clone();
    design.power_plants.push(plant);
    design.engines.push(InstalledEngine::new(ion, 20));

    let resolved = ResolvedDesign::resolve(&design, &catalog).expect("resolve");
    let report = resolved.validate_power_plant(fusion, 7, Some(&plant_id));
    assert!(matches!(
        report.issues(),
        [ValidationIssue::PowerOverBudget { used: 40, generated: 35 }]
    ));
}

#[test]
fn removing_and_re_adding_yields_identical_totals() {
    let catalog = fixture_catalog();
    let mut design = frigate(&catalog);
    let fusion = catalog.power_plant("fusion").expect("fusion plant");
    let ion = catalog.engine("ion").expect("ion drive");
    design.power_plants.push(InstalledPowerPlant::new(fusion, 10));
    let engine = InstalledEngine::new(ion, 20);
    let engine_id = engine.id.clone();
    design.engines.push(engine);

    let before = ResolvedDesign::resolve(&design, &catalog)
        .expect("resolve")
        .summary();

    remove_by_id(&mut design.engines, &engine_id).expect("engine installed");
    design.engines.push(InstalledEngine::new(ion, 20));

    let after = ResolvedDesign::resolve(&design, &catalog)
        .expect("resolve")
        .summary();

    assert_eq!(before.budget, after.budget);
    assert_eq!(before.total_cost, after.total_cost);
    assert_eq!(before.acceleration, after.acceleration);
}

#[test]
fn summary_totals_include_hull_cost() {
    let catalog = fixture_catalog();
    let mut design = frigate(&catalog);
    let fusion = catalog.power_plant("fusion").expect("fusion plant");
    let ion = catalog.engine("ion").expect("ion drive");
    design.power_plants.push(InstalledPowerPlant::new(fusion, 10));
    design.engines.push(InstalledEngine::new(ion, 20));

    let summary = ResolvedDesign::resolve(&design, &catalog)
        .expect("resolve")
        .summary();

    assert_eq!(summary.budget.hull_points_used, 30);
    assert_eq!(summary.hull_points_remaining, 70);
    assert_eq!(summary.budget.power_generated, 50);
    assert_eq!(summary.budget.power_used, 40);
    assert_eq!(summary.power_remaining, 10);
    // Hull 1,000,000 + fusion 2,000 + ion 200.
    assert_eq!(summary.total_cost, 1_002_200.0);
    assert_eq!(summary.acceleration, 4.0);
}

#[test]
fn dangling_catalog_reference_fails_to_resolve() {
    let catalog = fixture_catalog();
    let mut design = frigate(&catalog);
    let ion = catalog.engine("ion").expect("ion drive");
    let mut engine = InstalledEngine::new(ion, 10);
    engine.engine_type_id = "warp-core".to_string();
    design.engines.push(engine);

    let err = ResolvedDesign::resolve(&design, &catalog).expect_err("unknown engine type");
    assert!(err.to_string().contains("warp-core"));
}
