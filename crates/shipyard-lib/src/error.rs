use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the shipyard library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// These cover loading and referential-integrity failures. Rule violations
/// found while designing a ship are never raised as errors; they are collected
/// as [`crate::ValidationIssue`]s instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when catalog data fails validation.
    #[error("invalid catalog data: {message}")]
    CatalogValidation { message: String },

    /// Raised when two entries of the same equipment list share an id.
    #[error("duplicate {kind} id encountered: {id}")]
    DuplicateEquipmentId { kind: &'static str, id: String },

    /// Raised when an id or name could not be found in the catalog.
    #[error("unknown {kind}: {name}{}", format_suggestions(.suggestions))]
    UnknownEquipment {
        kind: &'static str,
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a design references an installation id that does not exist.
    #[error("no installation with id {id} in design")]
    UnknownInstallation { id: String },

    /// Raised when a tech track code is not a single letter.
    #[error("invalid tech track code '{code}'; expected a single letter")]
    InvalidTechTrack { code: String },

    /// Raised when a saved design fails structural validation.
    #[error("invalid design file: {message}")]
    DesignValidation { message: String },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for catalog data")]
    ProjectDirsUnavailable,

    /// Raised when a catalog path was given explicitly but does not exist.
    #[error("catalog not found at {path}")]
    CatalogNotFound { path: PathBuf },

    /// Wrapper for JSON decoding and encoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
