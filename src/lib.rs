//! Focus Timer - A state-managed HTTP server driving a pomodoro countdown
//!
//! This library provides a countdown timer core (duration configuration,
//! start/pause/resume/reset, per-second tick progress, completion event)
//! and the HTTP surface that controls and observes it.

pub mod api;
pub mod config;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::AppState;
pub use utils::signals::shutdown_signal;
