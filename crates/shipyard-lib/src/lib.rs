//! Shipyard library entry points.
//!
//! This crate holds the calculation layer of an Alternity starship designer:
//! the equipment catalog and its technology filters, generic sizing rules,
//! per-subsystem calculators (propulsion, sensors, weapons, ordnance, support)
//! and the [`ShipDesign`] aggregate that budgets and validates a whole ship.
//! Front ends (the CLI, tests) should only depend on the items exported here
//! instead of reimplementing rules.
//!
//! Rule violations are reported as [`ValidationReport`]s and never as
//! [`Error`]s; errors are reserved for unreadable files and bad references.

pub mod catalog;
pub mod config;
pub mod design;
pub mod error;
pub mod ids;
pub mod sizing;
pub mod systems;
pub mod validation;

#[cfg(test)]
mod test_helpers;

pub use catalog::{
    find_by_id, lookup, Catalog, CatalogEntry, CatalogOrigin, DesignConstraints, Hull,
    MountRule, MountType, ProgressLevel, ShipClass, TechTrack,
};
pub use config::{default_catalog_path, load_catalog, CATALOG_ENV_VAR};
pub use design::{
    audit_technology, DesignSummary, InstallationLine, ResolvedDesign, ShipDesign,
    SAVE_FORMAT_VERSION,
};
pub use error::{Error, Result};
pub use ids::new_id;
pub use sizing::{Budget, Footprint, SizingProfile, UnitProfile};
pub use systems::{FiringArc, GunConfiguration};
pub use validation::{Severity, ValidationIssue, ValidationOutcome, ValidationReport};
