//! Timer snapshot published to watchers and the status endpoint

use serde::{Deserialize, Serialize};

use super::countdown::Phase;
use super::presets::Mode;

/// Point-in-time view of the countdown, the presenter-facing shape of the
/// core state: remaining/total seconds plus the derived progress percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: Mode,
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    /// Elapsed share of the session: `(total - remaining) / total * 100`
    pub progress_percent: f64,
    /// True once a run has counted down to zero, until the countdown is
    /// reset or given a new duration
    pub completed: bool,
}

impl TimerSnapshot {
    pub fn new(mode: Mode, phase: Phase, remaining_seconds: u64, total_seconds: u64) -> Self {
        let progress_percent = if total_seconds > 0 {
            (total_seconds - remaining_seconds) as f64 / total_seconds as f64 * 100.0
        } else {
            0.0
        };
        let completed = phase == Phase::Idle && total_seconds > 0 && remaining_seconds == 0;
        Self {
            mode,
            phase,
            remaining_seconds,
            total_seconds,
            progress_percent,
            completed,
        }
    }
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self::new(Mode::Focus, Phase::Idle, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_tracks_elapsed_share() {
        let snap = TimerSnapshot::new(Mode::Focus, Phase::Running, 225, 300);
        assert!((snap.progress_percent - 25.0).abs() < f64::EPSILON);
        assert!(!snap.completed);
    }

    #[test]
    fn zero_total_has_zero_progress() {
        let snap = TimerSnapshot::default();
        assert_eq!(snap.progress_percent, 0.0);
        assert!(!snap.completed);
    }

    #[test]
    fn completed_requires_idle_at_zero() {
        assert!(TimerSnapshot::new(Mode::Short, Phase::Idle, 0, 300).completed);
        assert!(!TimerSnapshot::new(Mode::Short, Phase::Paused, 0, 300).completed);
        assert!(!TimerSnapshot::new(Mode::Short, Phase::Idle, 300, 300).completed);
    }
}
