use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level error type for code that mixes both collection layers
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionError {
    #[error("Map error: {0}")]
    Map(#[from] MapError),

    #[error("Multiset error: {0}")]
    Multiset(#[from] MultisetError),
}

/// Ordered map errors
///
/// Lookups and removals on the map never fail; they return `None` instead.
/// The only error is internal corruption detected during checked enumeration.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapError {
    #[error("Keys and values out of sync: {keys} keys, {values} values")]
    InvariantViolation { keys: usize, values: usize },
}

/// Counting multiset errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MultisetError {
    #[error("Element not found")]
    NotFound,
}

/// Result type aliases for convenience
pub type CollectionResult<T> = Result<T, CollectionError>;
pub type MapResult<T> = Result<T, MapError>;
pub type MultisetResult<T> = Result<T, MultisetError>;

impl MapError {
    pub fn out_of_sync(keys: usize, values: usize) -> Self {
        Self::InvariantViolation { keys, values }
    }
}
