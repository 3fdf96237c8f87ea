//! Commands - the named operations the CLI dispatches to
//!
//! Every command takes the [`AppContext`](crate::context::AppContext) and
//! runs through [`execute_command`](crate::utils::command_helpers::execute_command)
//! for timing and outcome logging.

mod away;
mod projects;
mod sessions;
mod signal;
mod timer;
mod totals;
mod transfer;

pub use away::*;
pub use projects::*;
pub use sessions::*;
pub use signal::*;
pub use timer::*;
pub use totals::*;
pub use transfer::*;
