//! Error types for timetable-core

use thiserror::Error;

use crate::conflict::Conflict;
use crate::models::{Collection, Field};
use crate::remote::RemoteError;

/// Result type alias using timetable-core's Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur in timetable-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Local mirror I/O failure
    #[error("Local store unavailable: {0}")]
    Store(#[from] libsql::Error),

    /// Filesystem failure while preparing the local mirror
    #[error("Local store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A mirrored row could not be decoded
    #[error("Corrupt record in local store: {0}")]
    CorruptRecord(String),

    /// Remote store could not be reached or rejected the request
    #[error("Remote store unavailable: {0}")]
    Remote(#[from] RemoteError),

    /// Requested identifier is absent
    #[error("{collection} record not found: {id}")]
    NotFound { collection: Collection, id: String },

    /// Caller-supplied data failed validation
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Candidate entry collides with existing entries
    #[error("Scheduling conflict with {} existing entries", .0.len())]
    SchedulingConflict(Vec<Conflict>),

    /// Actor is not allowed to perform the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
}

impl Error {
    /// Whether this error comes from the local mirror itself.
    pub const fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::Store(_) | Self::Io(_) | Self::CorruptRecord(_))
    }
}

/// Field-level validation failures, rejected before any store interaction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select {article} {0}", article = indefinite_article(.0))]
    MissingField(&'static str),

    #[error("End time must be after start time")]
    EndBeforeStart,

    #[error("Day of week must be between 1 (Monday) and 7 (Sunday), got {0}")]
    InvalidDay(u8),

    #[error("Unknown {collection} reference: {id}")]
    UnknownReference { collection: Collection, id: String },

    #[error("{collection} cannot be filtered by {field}")]
    UnsupportedField { collection: Collection, field: Field },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

fn indefinite_article(noun: &str) -> &'static str {
    match noun.chars().next() {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}
