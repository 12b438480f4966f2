//! Equipment type definitions loaded from the catalog data file.
//!
//! Every entry carries the same identity and gating fields (`id`, `name`,
//! `progressLevel`, `techTracks`) plus a sizing profile from
//! [`crate::sizing`] and its category-specific fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sizing::{SizingProfile, UnitProfile};

use super::types::{catalog_entry, check_entry, ProgressLevel, ShipClass, TechTrack};
use super::CatalogEntry;

/// Hull-percentage acceleration ratings of an engine type.
///
/// Keys in the data file are the bucket percentages: `{"5": 1.0, "10": 2.0, ...}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccelerationTable {
    #[serde(rename = "5", default)]
    pub at5: f64,
    #[serde(rename = "10", default)]
    pub at10: f64,
    #[serde(rename = "15", default)]
    pub at15: f64,
    #[serde(rename = "20", default)]
    pub at20: f64,
    #[serde(rename = "30", default)]
    pub at30: f64,
}

impl AccelerationTable {
    /// Bucket thresholds in ascending order.
    pub const BUCKETS: [u32; 5] = [5, 10, 15, 20, 30];

    /// Rating of the nearest bucket at or below `percentage`; zero below 5%.
    pub fn rating_for_percentage(&self, percentage: f64) -> f64 {
        if !percentage.is_finite() {
            return 0.0;
        }
        Self::BUCKETS
            .iter()
            .rev()
            .find(|&&bucket| percentage >= bucket as f64)
            .map(|&bucket| self.rating(bucket))
            .unwrap_or(0.0)
    }

    fn rating(&self, bucket: u32) -> f64 {
        match bucket {
            5 => self.at5,
            10 => self.at10,
            15 => self.at15,
            20 => self.at20,
            30 => self.at30,
            _ => 0.0,
        }
    }

    fn values(&self) -> [f64; 5] {
        [self.at5, self.at10, self.at15, self.at20, self.at30]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default)]
    pub ship_classes: Vec<ShipClass>,
    #[serde(flatten)]
    pub sizing: SizingProfile,
    #[serde(default)]
    pub acceleration: AccelerationTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EngineType {
    fn validate_fields(&self) -> Result<()> {
        let mut fields = self.sizing.numeric_fields();
        fields.extend(self.acceleration.values().map(|v| (v, "acceleration")));
        check_entry(Self::KIND, &self.id, &self.name, &fields)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerPlantType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default)]
    pub ship_classes: Vec<ShipClass>,
    /// `powerPerHullPoint` here is power generated, not drawn.
    #[serde(flatten)]
    pub sizing: SizingProfile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PowerPlantType {
    fn validate_fields(&self) -> Result<()> {
        check_entry(
            Self::KIND,
            &self.id,
            &self.name,
            &self.sizing.numeric_fields(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorCategory {
    Active,
    Passive,
    Remote,
    Special,
}

/// How many contacts a sensor can track.
///
/// The data file encodes unlimited tracking as `-1`; it is kept distinct from
/// `Limited(0)` everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TrackingCapability {
    Limited(u32),
    Unlimited,
}

impl TrackingCapability {
    /// Multiply by an installation quantity.
    pub fn scaled(self, quantity: u32) -> Self {
        match self {
            TrackingCapability::Limited(n) => {
                TrackingCapability::Limited(n.saturating_mul(quantity))
            }
            TrackingCapability::Unlimited => TrackingCapability::Unlimited,
        }
    }

    /// Sum two capabilities; unlimited absorbs everything.
    pub fn combine(self, other: Self) -> Self {
        match (self, other) {
            (TrackingCapability::Limited(a), TrackingCapability::Limited(b)) => {
                TrackingCapability::Limited(a.saturating_add(b))
            }
            _ => TrackingCapability::Unlimited,
        }
    }

    pub fn is_unlimited(self) -> bool {
        matches!(self, TrackingCapability::Unlimited)
    }
}

impl Default for TrackingCapability {
    fn default() -> Self {
        TrackingCapability::Limited(0)
    }
}

impl TryFrom<i64> for TrackingCapability {
    type Error = String;

    fn try_from(value: i64) -> std::result::Result<Self, String> {
        match value {
            -1 => Ok(TrackingCapability::Unlimited),
            v if v >= 0 => u32::try_from(v)
                .map(TrackingCapability::Limited)
                .map_err(|_| format!("tracking value {v} is too large")),
            v => Err(format!("tracking value {v} is invalid; use -1 for unlimited")),
        }
    }
}

impl From<TrackingCapability> for i64 {
    fn from(value: TrackingCapability) -> Self {
        match value {
            TrackingCapability::Limited(n) => n as i64,
            TrackingCapability::Unlimited => -1,
        }
    }
}

impl fmt::Display for TrackingCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackingCapability::Limited(n) => write!(f, "{n}"),
            TrackingCapability::Unlimited => f.write_str("Unlimited"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default)]
    pub ship_classes: Vec<ShipClass>,
    pub category: SensorCategory,
    #[serde(flatten)]
    pub unit: UnitProfile,
    pub arcs_covered: u8,
    /// Tracking capability keyed by the design's progress level.
    #[serde(default)]
    pub tracking: BTreeMap<ProgressLevel, TrackingCapability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl SensorType {
    /// Capability for a design at `progress_level`: the greatest key at or below it.
    pub fn tracking_at(&self, progress_level: ProgressLevel) -> TrackingCapability {
        self.tracking
            .range(..=progress_level)
            .next_back()
            .map(|(_, capability)| *capability)
            .unwrap_or_default()
    }

    fn validate_fields(&self) -> Result<()> {
        check_entry(Self::KIND, &self.id, &self.name, &self.unit.numeric_fields())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponCategory {
    Beam,
    Projectile,
    Pulse,
    Special,
}

impl fmt::Display for WeaponCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WeaponCategory::Beam => "beam",
            WeaponCategory::Projectile => "projectile",
            WeaponCategory::Pulse => "pulse",
            WeaponCategory::Special => "special",
        };
        f.write_str(label)
    }
}

/// Firepower class of a weapon. Only `S/L` weapons may use zero arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Firepower {
    #[serde(rename = "S")]
    Small,
    #[serde(rename = "S/L")]
    SmallLight,
    #[serde(rename = "L")]
    Light,
    #[serde(rename = "M")]
    Medium,
    #[serde(rename = "H")]
    Heavy,
    #[serde(rename = "SH")]
    SuperHeavy,
}

impl Firepower {
    pub fn allows_zero_arcs(self) -> bool {
        matches!(self, Firepower::SmallLight)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default)]
    pub ship_classes: Vec<ShipClass>,
    pub category: WeaponCategory,
    pub firepower: Firepower,
    #[serde(flatten)]
    pub unit: UnitProfile,
    #[serde(default)]
    pub accuracy: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
}

impl WeaponType {
    fn validate_fields(&self) -> Result<()> {
        check_entry(Self::KIND, &self.id, &self.name, &self.unit.numeric_fields())
    }
}

/// Ordnance families a launch system may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdnanceCategory {
    Missile,
    Bomb,
    Mine,
}

impl OrdnanceCategory {
    /// Whether designs of this category must include a guidance component.
    pub fn requires_guidance(self) -> bool {
        !matches!(self, OrdnanceCategory::Bomb)
    }

    pub fn label(self) -> &'static str {
        match self {
            OrdnanceCategory::Missile => "missile",
            OrdnanceCategory::Bomb => "bomb",
            OrdnanceCategory::Mine => "mine",
        }
    }
}

impl fmt::Display for OrdnanceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Size tier of an ordnance design, declared by its propulsion or casing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdnanceSize {
    Light,
    Medium,
    Heavy,
    SuperHeavy,
}

impl OrdnanceSize {
    /// Launch-system capacity units consumed by one round of this size.
    pub fn capacity_units(self) -> u32 {
        match self {
            OrdnanceSize::Light => 1,
            OrdnanceSize::Medium => 2,
            OrdnanceSize::Heavy => 4,
            OrdnanceSize::SuperHeavy => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchSystemType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default)]
    pub ship_classes: Vec<ShipClass>,
    #[serde(flatten)]
    pub unit: UnitProfile,
    /// Capacity units per launcher.
    pub capacity: u32,
    #[serde(default)]
    pub capacity_per_extra_hull_point: f64,
    /// Ordnance categories this launcher accepts.
    pub ordnance: Vec<OrdnanceCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_of_fire: Option<String>,
}

impl LaunchSystemType {
    pub fn accepts(&self, category: OrdnanceCategory) -> bool {
        self.ordnance.contains(&category)
    }

    fn validate_fields(&self) -> Result<()> {
        let mut fields = self.unit.numeric_fields().to_vec();
        fields.push((self.capacity_per_extra_hull_point, "capacityPerExtraHullPoint"));
        check_entry(Self::KIND, &self.id, &self.name, &fields)?;
        if self.ordnance.is_empty() {
            return Err(Error::CatalogValidation {
                message: format!("{} '{}' accepts no ordnance categories", Self::KIND, self.id),
            });
        }
        Ok(())
    }
}

/// Propulsion (missiles) or casing (bombs, mines) component. Declares the size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropulsionType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    pub categories: Vec<OrdnanceCategory>,
    pub size: OrdnanceSize,
    #[serde(default)]
    pub accuracy_modifier: i32,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

impl PropulsionType {
    fn validate_fields(&self) -> Result<()> {
        check_entry(Self::KIND, &self.id, &self.name, &[(self.cost, "cost")])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarheadType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    pub categories: Vec<OrdnanceCategory>,
    #[serde(default)]
    pub accuracy_modifier: i32,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
}

impl WarheadType {
    fn validate_fields(&self) -> Result<()> {
        check_entry(Self::KIND, &self.id, &self.name, &[(self.cost, "cost")])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    pub categories: Vec<OrdnanceCategory>,
    #[serde(default)]
    pub accuracy_modifier: i32,
    pub cost: f64,
}

impl GuidanceType {
    fn validate_fields(&self) -> Result<()> {
        check_entry(Self::KIND, &self.id, &self.name, &[(self.cost, "cost")])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeSupportType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default)]
    pub ship_classes: Vec<ShipClass>,
    #[serde(flatten)]
    pub unit: UnitProfile,
    /// Hull points of ship supported by one unit.
    pub coverage_hull_points: u32,
}

impl LifeSupportType {
    fn validate_fields(&self) -> Result<()> {
        check_entry(Self::KIND, &self.id, &self.name, &self.unit.numeric_fields())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccommodationCategory {
    Crew,
    Troop,
    Passenger,
    Suspended,
}

impl AccommodationCategory {
    pub const ALL: [AccommodationCategory; 4] = [
        AccommodationCategory::Crew,
        AccommodationCategory::Troop,
        AccommodationCategory::Passenger,
        AccommodationCategory::Suspended,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default)]
    pub ship_classes: Vec<ShipClass>,
    pub category: AccommodationCategory,
    #[serde(flatten)]
    pub unit: UnitProfile,
    /// People housed per unit.
    pub capacity: u32,
}

impl AccommodationType {
    fn validate_fields(&self) -> Result<()> {
        check_entry(Self::KIND, &self.id, &self.name, &self.unit.numeric_fields())
    }
}

/// Effect of one store system unit. Effects of the same kind add up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreEffect {
    FeedsPeople { people: u32 },
    ReducesConsumption { people: u32 },
    AddsStoreDays { days: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSystemType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default)]
    pub ship_classes: Vec<ShipClass>,
    #[serde(flatten)]
    pub unit: UnitProfile,
    pub effect: StoreEffect,
}

impl StoreSystemType {
    fn validate_fields(&self) -> Result<()> {
        check_entry(Self::KIND, &self.id, &self.name, &self.unit.numeric_fields())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GravityKind {
    /// Unlocked by technology; occupies no hull points and costs nothing.
    Artificial,
    /// Spun sections sized as a share of the hull.
    Centrifugal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GravitySystemType {
    pub id: String,
    pub name: String,
    pub progress_level: ProgressLevel,
    #[serde(default)]
    pub tech_tracks: Vec<TechTrack>,
    #[serde(default)]
    pub ship_classes: Vec<ShipClass>,
    pub kind: GravityKind,
    /// Share of hull points occupied, for centrifugal systems.
    #[serde(default)]
    pub hull_percentage: f64,
    #[serde(default)]
    pub base_cost: f64,
    #[serde(default)]
    pub cost_per_hull_point: f64,
}

impl GravitySystemType {
    fn validate_fields(&self) -> Result<()> {
        check_entry(
            Self::KIND,
            &self.id,
            &self.name,
            &[
                (self.hull_percentage, "hullPercentage"),
                (self.base_cost, "baseCost"),
                (self.cost_per_hull_point, "costPerHullPoint"),
            ],
        )?;
        if self.hull_percentage > 100.0 {
            return Err(Error::CatalogValidation {
                message: format!("{} '{}': hullPercentage exceeds 100", Self::KIND, self.id),
            });
        }
        Ok(())
    }
}

catalog_entry!(EngineType, "engine type", ship_classes);
catalog_entry!(PowerPlantType, "power plant type", ship_classes);
catalog_entry!(SensorType, "sensor type", ship_classes);
catalog_entry!(WeaponType, "weapon type", ship_classes);
catalog_entry!(LaunchSystemType, "launch system type", ship_classes);
catalog_entry!(PropulsionType, "propulsion type");
catalog_entry!(WarheadType, "warhead type");
catalog_entry!(GuidanceType, "guidance type");
catalog_entry!(LifeSupportType, "life support type", ship_classes);
catalog_entry!(AccommodationType, "accommodation type", ship_classes);
catalog_entry!(StoreSystemType, "store system type", ship_classes);
catalog_entry!(GravitySystemType, "gravity system type", ship_classes);
