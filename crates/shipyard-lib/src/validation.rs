//! Validation results shared by every subsystem calculator.
//!
//! Validators never return `Err` and never panic. Each one produces a
//! [`ValidationReport`] that callers inspect: hard errors block an install or
//! edit, warnings are displayed but allow the design to be saved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a caller should treat an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The proposed installation or edit must not be applied.
    Error,
    /// The design is incomplete but may still be saved.
    Warning,
}

/// A single rule violation, rendered as a user-facing English sentence.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationIssue {
    #[error("{name} requires at least {min_size} hull points (requested {requested}).")]
    BelowMinimumSize {
        name: String,
        min_size: u32,
        requested: u32,
    },

    #[error("Not enough hull points: {name} needs {required} but only {available} remain.")]
    InsufficientHullPoints {
        name: String,
        required: u32,
        available: u32,
    },

    #[error("Not enough power: {name} needs {required} but only {available} is available.")]
    InsufficientPower {
        name: String,
        required: u32,
        available: i64,
    },

    #[error("{launcher} cannot hold this ordnance: {required} capacity needed, {available} available.")]
    CapacityExceeded {
        launcher: String,
        required: u32,
        available: u32,
    },

    #[error("{name} requires fuel but has no fuel tank installed.")]
    MissingFuel { name: String },

    #[error("{name} does not use fuel, so a fuel tank cannot be assigned to it.")]
    FuelNotUsed { name: String },

    #[error("Ordnance design {design} is loaded in a launch system; unload it before deleting.")]
    ReferentialDeleteRejected { design: String },

    #[error("{name} requires progress level {progress_level} and tech tracks [{tracks}], which this design does not allow.")]
    UnavailableTechnology {
        name: String,
        progress_level: u8,
        tracks: String,
    },

    #[error("{name} exceeds the current design constraints (progress level {progress_level}, tech tracks [{tracks}]); it remains installed.")]
    Grandfathered {
        name: String,
        progress_level: u8,
        tracks: String,
    },

    #[error("{name} is not available for {ship_class} hulls.")]
    ShipClassNotAllowed { name: String, ship_class: String },

    #[error("Quantity for {name} must be at least 1.")]
    InvalidQuantity { name: String },

    #[error("{name} is not expandable; extra hull points are not allowed.")]
    NotExpandable { name: String },

    #[error("{weapon} cannot use a {mount} mount.")]
    MountNotAllowed { weapon: String, mount: String },

    #[error("At least one firing arc must be selected.")]
    NoFiringArc,

    #[error("A {mount} mount covers at most {limit} firing arc(s); {selected} selected.")]
    TooManyArcs {
        mount: String,
        limit: usize,
        selected: usize,
    },

    #[error("The {arc} arc is selected more than once.")]
    DuplicateArc { arc: String },

    #[error("The {arc} arc requires the {standard} arc to be selected.")]
    ZeroArcWithoutStandard { arc: String, standard: String },

    #[error("{weapon} cannot use zero arcs.")]
    ZeroArcsNotAllowed { weapon: String },

    #[error("At most {limit} zero arc(s) may be selected; {selected} selected.")]
    TooManyZeroArcs { limit: usize, selected: usize },

    #[error("{name} covers at most {limit} arc(s) at this quantity; {selected} selected.")]
    TooManySensorArcs {
        name: String,
        limit: usize,
        selected: usize,
    },

    #[error("{launcher} cannot carry {category} ordnance.")]
    IncompatibleOrdnance { launcher: String, category: String },

    #[error("{component} cannot be used in {category} designs.")]
    ComponentCategoryMismatch { component: String, category: String },

    #[error("{category} designs require a guidance system.")]
    MissingGuidance { category: String },

    #[error("{category} designs do not use a guidance system.")]
    UnexpectedGuidance { category: String },

    #[error("An ordnance design needs a name.")]
    MissingDesignName,

    #[error("The design already has gravity provided by {current}; remove it first.")]
    GravityAlreadyProvided { current: String },

    #[error("The design uses {used} hull points but the hull only has {total}.")]
    HullPointsOverBudget { used: u32, total: u32 },

    #[error("The design draws {used} power but only generates {generated}.")]
    PowerOverBudget { used: u32, generated: u32 },

    #[error("The design has no active sensor.")]
    NoActiveSensor,

    #[error("Life support covers {covered} hull points but the hull has {required}.")]
    InsufficientLifeSupport { covered: u32, required: u32 },

    #[error("Crew quarters hold {capacity} but the hull requires a crew of {crew}.")]
    InsufficientCrewQuarters { capacity: u32, crew: u32 },
}

impl ValidationIssue {
    /// Whether the issue blocks an install or merely warns.
    pub fn severity(&self) -> Severity {
        match self {
            ValidationIssue::MissingFuel { .. }
            | ValidationIssue::Grandfathered { .. }
            | ValidationIssue::NoActiveSensor
            | ValidationIssue::InsufficientLifeSupport { .. }
            | ValidationIssue::InsufficientCrewQuarters { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Ordered collection of issues produced by one validator run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a report from a single optional issue.
    pub fn from_issue(issue: Option<ValidationIssue>) -> Self {
        Self {
            issues: issue.into_iter().collect(),
        }
    }

    pub fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    /// `true` when no issue of any severity was found.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// `true` when at least one issue must block the action.
    pub fn has_blocking_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity() == Severity::Error)
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    /// User-facing messages in the order the issues were found.
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// Serializable `{ valid, errors }` view for front ends.
    pub fn outcome(&self) -> ValidationOutcome {
        ValidationOutcome {
            valid: self.is_valid(),
            errors: self.messages(),
        }
    }
}

impl From<ValidationIssue> for ValidationReport {
    fn from(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

impl FromIterator<ValidationIssue> for ValidationReport {
    fn from_iter<I: IntoIterator<Item = ValidationIssue>>(iter: I) -> Self {
        Self {
            issues: iter.into_iter().collect(),
        }
    }
}

/// Wire shape of a validation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<String>,
}
