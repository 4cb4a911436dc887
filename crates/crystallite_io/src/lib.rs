//! # Crystallite IO
//!
//! Persistence layer for the Crystallite simulation.
//!
//! This crate provides:
//! - Structured error handling with custom error types
//! - Validated JSON serialization helpers
//! - Snapshot save/load, plain or gzip-compressed

/// Error types and result aliases for I/O operations
pub mod error;
/// Validated serialization helpers for JSON
pub mod serialization;
/// World snapshot files (`.json` and `.json.gz`)
pub mod snapshot;

pub use error::{IoError, Result};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
pub use snapshot::{load_snapshot, save_snapshot, SnapshotPersistence};
