//! Command plumbing shared by every command module

pub mod command_helpers;
pub mod logging;
