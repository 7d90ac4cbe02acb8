//! State management module
//!
//! This module contains the countdown core and its surrounding session
//! state.

pub mod app_state;
pub mod countdown;
pub mod presets;
pub mod snapshot;

// Re-export main types
pub use app_state::AppState;
pub use countdown::{Countdown, Phase, Presenter, TickScheduler};
pub use presets::{Mode, Presets};
pub use snapshot::TimerSnapshot;
