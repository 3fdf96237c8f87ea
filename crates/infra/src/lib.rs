//! # Lapse Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - State stores (JSON files, in-memory, debounced writer)
//! - Configuration loading
//! - Tracing initialisation
//! - JSON/CSV export and JSON import
//! - Screen lock signal sources
//!
//! ## Architecture
//! - Implements traits defined in `lapse-core`
//! - Contains all "impure" code (file I/O, stdin, subscriber setup)

pub mod config;
pub mod errors;
pub mod export;
pub mod observability;
pub mod platform;
pub mod storage;

// Re-export commonly used items
pub use errors::InfraError;
pub use platform::{LineLockSource, UnsupportedLockSource};
pub use storage::{DebouncedStore, JsonFileStore, MemoryStore};
