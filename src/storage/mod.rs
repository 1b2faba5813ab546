//! Persistence adapter - maps logical datasets to JSON files and loads/saves them.
//!
//! The adapter is a codec, not a cache: the [`crate::core::state::StateStore`]
//! owns the in-memory copy and calls in here whenever it needs to read or
//! overwrite a file.

/// Dataset keys and their on-disk locations
pub mod dataset;
/// JSON load/save with atomic replace
pub mod json_store;

pub use dataset::{DataFiles, Dataset};
pub use json_store::JsonStore;
