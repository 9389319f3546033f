//! Error types for marku-core.
//!
//! [`GradeError`] is what the store, the results service and the exporters
//! hand back to a front end. Validation, duplicate and no-data failures are
//! user-facing; storage failures wrap whatever the backend reported.

use thiserror::Error;

/// Errors produced by subject and results operations.
#[derive(Debug, Error)]
pub enum GradeError {
    /// User input is missing or out of range. Nothing was changed.
    #[error("{0}")]
    Validation(String),

    /// A subject with the same name (ignoring case) already exists.
    #[error("a subject named '{0}' already exists")]
    Duplicate(String),

    /// There are no subjects to work with.
    #[error("no subjects added yet; add at least one subject before calculating")]
    NoData,

    /// Nothing has been calculated yet, so there is nothing to show or export.
    #[error("no calculated results; run calculate first")]
    NoResults,

    /// No subject matches the given id or id prefix.
    #[error("no subject with id '{0}'")]
    NotFound(String),

    /// More than one subject matches the given id prefix.
    #[error("id prefix '{0}' matches more than one subject")]
    AmbiguousId(String),

    /// A stored blob could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage backend failed.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl GradeError {
    /// True for failures caused by what the user typed rather than by the
    /// environment. Front ends show these as plain alerts.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            GradeError::Validation(_)
                | GradeError::Duplicate(_)
                | GradeError::NoData
                | GradeError::NoResults
                | GradeError::NotFound(_)
                | GradeError::AmbiguousId(_)
        )
    }
}

pub type GradeResult<T> = std::result::Result<T, GradeError>;
