//! Error types for the slug path engine.
//!
//! None of these are fatal to an editing session: validation errors are
//! corrected by the editor, resolution and write-back errors leave the
//! last good path list in place.

use thiserror::Error;

/// Alias candidate rejected by the path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid path `{candidate}`: expected `/` followed by letters, digits, `-`, `.` or `/`")]
pub struct ValidationError {
    pub candidate: String,
}

/// Failure reported by a [`RecordStore`](crate::host::RecordStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record `{0}` not found")]
    NotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Parent chain could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("failed to fetch record `{id}`")]
    Fetch {
        id: String,
        #[source]
        source: StoreError,
    },

    #[error("record `{id}` has no `{field}` value for locale `{locale}`")]
    MissingField {
        id: String,
        field: String,
        locale: String,
    },

    #[error("parent chain exceeds {max_depth} levels at record `{id}`")]
    TooDeep { id: String, max_depth: usize },
}

/// Failure writing the path list back to the host field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to write field value: {0}")]
pub struct HostError(pub String);

/// The session's engine task is no longer running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("editing session already closed")]
    Closed,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
