//! Life support, accommodations, stores and gravity.

use serde::{Deserialize, Serialize};

use crate::catalog::{
    AccommodationCategory, AccommodationType, DesignConstraints, GravityKind, GravitySystemType,
    Hull, LifeSupportType, StoreEffect, StoreSystemType,
};
use crate::ids::{has_id, new_id};
use crate::sizing::{saturating_sum, to_whole, Footprint};
use crate::validation::{ValidationIssue, ValidationReport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledLifeSupport {
    pub id: String,
    pub life_support_type_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledAccommodation {
    pub id: String,
    pub accommodation_type_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledStoreSystem {
    pub id: String,
    pub store_system_type_id: String,
    pub quantity: u32,
}

/// The design's single gravity provision. Size derives from the hull.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledGravitySystem {
    pub id: String,
    pub gravity_system_type_id: String,
}

has_id!(
    InstalledLifeSupport,
    InstalledAccommodation,
    InstalledStoreSystem,
    InstalledGravitySystem
);

impl InstalledLifeSupport {
    pub fn new(life_support: &LifeSupportType, quantity: u32) -> Self {
        Self {
            id: new_id("life"),
            life_support_type_id: life_support.id.clone(),
            quantity,
        }
    }
}

impl InstalledAccommodation {
    pub fn new(accommodation: &AccommodationType, quantity: u32) -> Self {
        Self {
            id: new_id("quarters"),
            accommodation_type_id: accommodation.id.clone(),
            quantity,
        }
    }
}

impl InstalledStoreSystem {
    pub fn new(store: &StoreSystemType, quantity: u32) -> Self {
        Self {
            id: new_id("store"),
            store_system_type_id: store.id.clone(),
            quantity,
        }
    }
}

impl InstalledGravitySystem {
    pub fn new(gravity: &GravitySystemType) -> Self {
        Self {
            id: new_id("gravity"),
            gravity_system_type_id: gravity.id.clone(),
        }
    }
}

/// Artificial gravity is free; centrifugal systems take a share of the hull.
pub fn gravity_footprint(gravity: &GravitySystemType, hull: &Hull) -> Footprint {
    match gravity.kind {
        GravityKind::Artificial => Footprint::default(),
        GravityKind::Centrifugal => {
            let hull_points =
                to_whole((hull.hull_points as f64 * gravity.hull_percentage / 100.0).ceil());
            Footprint::new(
                hull_points,
                0,
                gravity.base_cost + hull_points as f64 * gravity.cost_per_hull_point,
            )
        }
    }
}

/// First artificial gravity system the design's technology unlocks.
pub fn free_gravity_available<'a>(
    systems: &'a [GravitySystemType],
    constraints: &DesignConstraints,
) -> Option<&'a GravitySystemType> {
    systems
        .iter()
        .find(|system| system.kind == GravityKind::Artificial && constraints.allows(*system))
}

/// Choose a gravity provision. A second one is rejected until the first is cleared.
pub fn select_gravity(
    current: Option<(&InstalledGravitySystem, &GravitySystemType)>,
    gravity: &GravitySystemType,
) -> Result<InstalledGravitySystem, ValidationIssue> {
    match current {
        Some((_, current_type)) => Err(ValidationIssue::GravityAlreadyProvided {
            current: current_type.name.clone(),
        }),
        None => Ok(InstalledGravitySystem::new(gravity)),
    }
}

/// Summed store effects, each kind independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreTotals {
    pub feeds_people: u32,
    pub reduces_consumption_people: u32,
    pub store_days: u32,
}

impl StoreTotals {
    fn add(&mut self, effect: StoreEffect, quantity: u32) {
        match effect {
            StoreEffect::FeedsPeople { people } => {
                self.feeds_people = self.feeds_people.saturating_add(people.saturating_mul(quantity))
            }
            StoreEffect::ReducesConsumption { people } => {
                self.reduces_consumption_people = self
                    .reduces_consumption_people
                    .saturating_add(people.saturating_mul(quantity))
            }
            StoreEffect::AddsStoreDays { days } => {
                self.store_days = self.store_days.saturating_add(days.saturating_mul(quantity))
            }
        }
    }
}

pub fn calculate_store_totals(stores: &[(&InstalledStoreSystem, &StoreSystemType)]) -> StoreTotals {
    let mut totals = StoreTotals::default();
    for (installed, store) in stores {
        totals.add(store.effect, installed.quantity);
    }
    totals
}

/// How a population is reduced by feeding and recycling stores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consumption {
    pub population: u32,
    pub fed: u32,
    pub recycled: u32,
    pub effective: u32,
}

/// Feeding applies first; recycling is capped at whoever is left.
pub fn effective_consumers(population: u32, feeds: u32, reduces: u32) -> Consumption {
    let fed = feeds.min(population);
    let after_feed = population - fed;
    let recycled = reduces.min(after_feed);
    Consumption {
        population,
        fed,
        recycled,
        effective: after_feed - recycled,
    }
}

/// Housing capacity per accommodation category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationCapacity {
    pub crew: u32,
    pub troop: u32,
    pub passenger: u32,
    pub suspended: u32,
}

impl AccommodationCapacity {
    pub fn get(&self, category: AccommodationCategory) -> u32 {
        match category {
            AccommodationCategory::Crew => self.crew,
            AccommodationCategory::Troop => self.troop,
            AccommodationCategory::Passenger => self.passenger,
            AccommodationCategory::Suspended => self.suspended,
        }
    }

    fn slot(&mut self, category: AccommodationCategory) -> &mut u32 {
        match category {
            AccommodationCategory::Crew => &mut self.crew,
            AccommodationCategory::Troop => &mut self.troop,
            AccommodationCategory::Passenger => &mut self.passenger,
            AccommodationCategory::Suspended => &mut self.suspended,
        }
    }

    /// People awake and eating: everyone except suspended passengers.
    pub fn awake_population(&self, crew: u32) -> u32 {
        crew.saturating_add(self.troop).saturating_add(self.passenger)
    }
}

pub fn calculate_accommodation_capacity(
    accommodations: &[(&InstalledAccommodation, &AccommodationType)],
) -> AccommodationCapacity {
    let mut capacity = AccommodationCapacity::default();
    for (installed, accommodation) in accommodations {
        let slot = capacity.slot(accommodation.category);
        *slot = slot.saturating_add(accommodation.capacity.saturating_mul(installed.quantity));
    }
    capacity
}

pub fn calculate_life_support_coverage(
    life_support: &[(&InstalledLifeSupport, &LifeSupportType)],
) -> u32 {
    saturating_sum(
        life_support
            .iter()
            .map(|(installed, system)| system.coverage_hull_points.saturating_mul(installed.quantity)),
    )
}

/// Resolved support installations of one design.
#[derive(Debug, Clone, Copy)]
pub struct SupportSystems<'a, 'b> {
    pub life_support: &'b [(&'a InstalledLifeSupport, &'a LifeSupportType)],
    pub accommodations: &'b [(&'a InstalledAccommodation, &'a AccommodationType)],
    pub stores: &'b [(&'a InstalledStoreSystem, &'a StoreSystemType)],
    pub gravity: Option<(&'a InstalledGravitySystem, &'a GravitySystemType)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportSummary {
    pub footprint: Footprint,
    pub life_support_coverage: u32,
    pub life_support_required: u32,
    pub accommodations: AccommodationCapacity,
    pub crew_required: u32,
    pub stores: StoreTotals,
    pub consumption: Consumption,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<String>,
}

impl SupportSummary {
    pub fn life_support_adequate(&self) -> bool {
        self.life_support_coverage >= self.life_support_required
    }

    pub fn crew_quarters_adequate(&self) -> bool {
        self.accommodations.crew >= self.crew_required
    }

    /// Design-level warnings for life support and crew quarters shortfalls.
    pub fn warnings(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        if !self.life_support_adequate() {
            report.push(ValidationIssue::InsufficientLifeSupport {
                covered: self.life_support_coverage,
                required: self.life_support_required,
            });
        }
        if !self.crew_quarters_adequate() {
            report.push(ValidationIssue::InsufficientCrewQuarters {
                capacity: self.accommodations.crew,
                crew: self.crew_required,
            });
        }
        report
    }
}

pub fn calculate_support_summary(systems: SupportSystems<'_, '_>, hull: &Hull) -> SupportSummary {
    let footprint: Footprint = systems
        .life_support
        .iter()
        .map(|(installed, system)| system.unit.footprint(installed.quantity, 0))
        .chain(
            systems
                .accommodations
                .iter()
                .map(|(installed, system)| system.unit.footprint(installed.quantity, 0)),
        )
        .chain(
            systems
                .stores
                .iter()
                .map(|(installed, system)| system.unit.footprint(installed.quantity, 0)),
        )
        .chain(systems.gravity.map(|(_, gravity)| gravity_footprint(gravity, hull)))
        .sum();

    let accommodations = calculate_accommodation_capacity(systems.accommodations);
    let stores = calculate_store_totals(systems.stores);
    let consumption = effective_consumers(
        accommodations.awake_population(hull.crew),
        stores.feeds_people,
        stores.reduces_consumption_people,
    );

    SupportSummary {
        footprint,
        life_support_coverage: calculate_life_support_coverage(systems.life_support),
        life_support_required: hull.hull_points,
        accommodations,
        crew_required: hull.crew,
        stores,
        consumption,
        gravity: systems.gravity.map(|(_, gravity)| gravity.name.clone()),
    }
}
