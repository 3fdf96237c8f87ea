//! Project, session and active timer bookkeeping

pub mod display;
pub mod ports;
pub mod session_store;
pub mod timer;

pub use display::LiveTimerDisplay;
pub use session_store::{ProjectTotal, SessionStore};
pub use timer::TimerStatus;
