//! Row-scoped mapping errors.

use thiserror::Error;

/// Failure to derive graph entities from a single source row.
///
/// These are always row-scoped: the caller records the failure and moves on
/// to the next row, it never aborts the batch.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("row has no usable GlobalEventID (missing or non-numeric)")]
    MissingEventId,
}

/// Result type for mapping operations.
pub type MapResult<T> = Result<T, MapError>;
