// Tally Library - Core Module Organization
//
// Two layered collections: a sorted map kept in parallel vectors, and a
// counting multiset built on top of it.

// Error types shared by both layers
pub mod errors;

// Collections, leaves first
pub mod ordered_map;
pub mod multiset;

// Re-export common types for convenient access
pub use crate::errors::{
    CollectionError, CollectionResult, MapError, MapResult, MultisetError, MultisetResult,
};
pub use crate::multiset::CountingMultiset;
pub use crate::ordered_map::OrderedMap;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
