//! `StateStore` implementations
//!
//! - [`JsonFileStore`]: one pretty-printed `<key>.json` file per key
//! - [`MemoryStore`]: process-local, records every write for inspection
//! - [`DebouncedStore`]: coalesces debounced writes in front of another store

mod debounced;
mod json_file;
mod memory;

pub use debounced::DebouncedStore;
pub use json_file::JsonFileStore;
pub use memory::{MemoryStore, WriteRecord};
