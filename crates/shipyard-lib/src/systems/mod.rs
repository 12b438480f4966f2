//! Per-subsystem installation records and calculators.
//!
//! Each module is pure: it takes resolved `(installation, catalog type)` pairs
//! and returns footprints, summaries or validation issues. Design-wide
//! budgeting lives in [`crate::design`].

pub mod arcs;
pub mod ordnance;
pub mod propulsion;
pub mod sensors;
pub mod support;
pub mod weapons;

pub use arcs::{toggle_weapon_arc, validate_arcs, ArcLimits, FiringArc, SENSOR_ARCS};
pub use ordnance::{
    add_ordnance_to_loadout, calculate_bomb_design, calculate_launch_system_stats,
    calculate_mine_design, calculate_missile_design, calculate_ordnance_design, can_load_ordnance,
    delete_ordnance_design, is_design_loaded, remove_ordnance_from_loadout, resize_launch_system,
    unload_ordnance, used_capacity, InstalledLaunchSystem, LaunchSystemStats, LoadoutItem,
    OrdnanceDesign, OrdnanceSummary,
};
pub use propulsion::{
    calculate_acceleration, calculate_endurance, fuel_endurance, validate_engine_design,
    validate_fuel_supply, validate_power_plant_design, FuelBurner, FuelConsumer, FuelConsumerKind,
    FuelEndurance, InstalledEngine, InstalledFuelTank, InstalledPowerPlant,
};
pub use sensors::{
    max_arcs_for_quantity, set_sensor_quantity, toggle_sensor_arc, InstalledSensor, SensorSummary,
};
pub use support::{
    effective_consumers, gravity_footprint, select_gravity, AccommodationCapacity, Consumption,
    InstalledAccommodation, InstalledGravitySystem, InstalledLifeSupport, InstalledStoreSystem,
    StoreTotals, SupportSummary,
};
pub use weapons::{
    calculate_weapon_stats, eligible_mounts, GunConfiguration, InstalledWeapon, WeaponSummary,
};
