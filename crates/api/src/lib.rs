//! # Lapse App
//!
//! Application layer - command-line surface and main entry point.
//!
//! This crate contains:
//! - Commands (the named operations, each timed and logged)
//! - Application context (owner of the tracker and idle services)
//! - The clap command-line definition and text rendering
//! - The long-running `watch` loop
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core` and `infra`
//! - Wires file storage and the lock signal source into the core services

pub mod cli;
pub mod commands;
pub mod context;
pub mod runtime;
pub mod utils;

// Re-export for convenience
pub use context::{AppContext, ProcessRole, StartupReport};
