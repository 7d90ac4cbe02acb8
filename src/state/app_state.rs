//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::tasks::ticker::{ArmCommand, IntervalScheduler};

use super::{
    countdown::{Countdown, Phase, Presenter},
    presets::{Mode, Presets},
    snapshot::TimerSnapshot,
};

/// Production presenter: renders the countdown into the log stream.
/// Snapshot publication rides on [`AppState`] after each operation.
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn on_tick(&mut self, remaining_seconds: u64, total_seconds: u64) {
        debug!("Countdown at {}/{} seconds", remaining_seconds, total_seconds);
    }

    fn on_complete(&mut self) {
        info!("Time is up!");
    }
}

type AppCountdown = Countdown<IntervalScheduler, LogPresenter>;

/// Session-level state next to the countdown: which preset mode is active
/// and the current preset table.
#[derive(Debug, Clone)]
struct SessionState {
    mode: Mode,
    presets: Presets,
}

/// Main application state shared between the HTTP handlers and the ticker
/// task.
///
/// Lock order: when both locks are needed, `session` is acquired before
/// `timer` and held across the timer update, so the active mode and the
/// applied duration cannot diverge under concurrent requests.
pub struct AppState {
    /// Countdown core
    timer: Mutex<AppCountdown>,
    /// Active mode and preset minute values
    session: Mutex<SessionState>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Receiver side of the scheduler's arming channel, cloned by the
    /// ticker task
    schedule_rx: watch::Receiver<Option<ArmCommand>>,
    /// Channel for timer snapshot updates
    timer_update_tx: watch::Sender<TimerSnapshot>,
    /// Keep the receiver alive to prevent channel closure
    _timer_update_rx: watch::Receiver<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState with the countdown preset to the focus mode
    /// duration.
    pub fn new(port: u16, host: String, presets: Presets) -> Arc<Self> {
        let (schedule_tx, schedule_rx) = watch::channel(None);
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerSnapshot::default());

        let mut timer = Countdown::new(IntervalScheduler::new(schedule_tx), LogPresenter);
        let mode = Mode::default();
        timer.set_duration(presets.minutes(mode));

        let state = Arc::new(Self {
            timer: Mutex::new(timer),
            session: Mutex::new(SessionState { mode, presets }),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            schedule_rx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        });

        // Publish the initial snapshot so early watchers see the preset
        // duration rather than the channel default.
        if let Ok(snapshot) = state.snapshot() {
            let _ = state.timer_update_tx.send(snapshot);
        }

        state
    }

    /// Record the action, publish the snapshot, and hand it back. Called
    /// after all locks are released.
    fn finish(
        &self,
        action: Option<&str>,
        mode: Mode,
        phase: Phase,
        remaining: u64,
        total: u64,
    ) -> TimerSnapshot {
        let snapshot = TimerSnapshot::new(mode, phase, remaining, total);

        if let Some(action) = action {
            if let Ok(mut last_action) = self.last_action.lock() {
                *last_action = Some(action.to_string());
            }
            if let Ok(mut last_time) = self.last_action_time.lock() {
                *last_time = Some(Utc::now());
            }
        }

        if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
            warn!("Failed to send timer update: {}", e);
        }

        snapshot
    }

    /// Apply an operation to the countdown and publish the resulting
    /// snapshot. `action` is recorded for the status endpoint when the
    /// operation came from an external event.
    fn with_timer<F>(&self, action: Option<&str>, operation: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut AppCountdown),
    {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        operation(&mut timer);
        let (phase, remaining, total) = (
            timer.phase(),
            timer.remaining_seconds(),
            timer.total_seconds(),
        );
        drop(timer); // Release the lock early

        let mode = self.current_mode()?;
        Ok(self.finish(action, mode, phase, remaining, total))
    }

    /// Mutate the session and apply the resulting duration to the
    /// countdown in one critical section, per the documented lock order.
    fn with_session_and_timer<F>(
        &self,
        action: &str,
        mutation: F,
    ) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut SessionState) -> u64,
    {
        let mut session = self
            .session
            .lock()
            .map_err(|e| format!("Failed to lock session: {}", e))?;
        let minutes = mutation(&mut session);
        let mode = session.mode;

        let mut timer = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;
        timer.stop();
        timer.set_duration(minutes);
        let (phase, remaining, total) = (
            timer.phase(),
            timer.remaining_seconds(),
            timer.total_seconds(),
        );
        drop(timer);
        drop(session);

        Ok(self.finish(Some(action), mode, phase, remaining, total))
    }

    /// Start or resume the countdown
    pub fn start(&self) -> Result<TimerSnapshot, String> {
        info!("Starting countdown");
        self.with_timer(Some("start"), |timer| timer.start())
    }

    /// Pause the countdown, preserving the remaining time
    pub fn pause(&self) -> Result<TimerSnapshot, String> {
        info!("Pausing countdown");
        self.with_timer(Some("pause"), |timer| timer.pause())
    }

    /// Reset the countdown to the full session duration
    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        info!("Resetting countdown");
        self.with_timer(Some("reset"), |timer| timer.reset())
    }

    /// Switch to a preset mode. Selecting the already active mode is a
    /// no-op; otherwise the countdown is stopped and the new preset
    /// duration applied.
    pub fn select_mode(&self, mode: Mode) -> Result<TimerSnapshot, String> {
        {
            let session = self
                .session
                .lock()
                .map_err(|e| format!("Failed to lock session: {}", e))?;
            if session.mode == mode {
                drop(session);
                return self.snapshot();
            }
        }

        info!("Switching to {} mode", mode.as_str());
        self.with_session_and_timer(mode.as_str(), |session| {
            session.mode = mode;
            session.presets.minutes(mode)
        })
    }

    /// Replace the preset table and re-apply the active mode's new
    /// duration. Presets must already be validated by the caller.
    pub fn apply_presets(&self, presets: Presets) -> Result<TimerSnapshot, String> {
        info!(
            "Applying presets: focus={}m short={}m long={}m",
            presets.focus, presets.short, presets.long
        );
        self.with_session_and_timer("presets", move |session| {
            session.presets = presets;
            session.presets.minutes(session.mode)
        })
    }

    /// One periodic firing from the ticker task. Not an external action,
    /// so last-action tracking is left alone.
    pub fn tick(&self) -> Result<TimerSnapshot, String> {
        self.with_timer(None, |timer| timer.tick())
    }

    /// Read-only snapshot of the current countdown state
    pub fn snapshot(&self) -> Result<TimerSnapshot, String> {
        let timer = self
            .timer
            .lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;
        let (phase, remaining, total) = (
            timer.phase(),
            timer.remaining_seconds(),
            timer.total_seconds(),
        );
        drop(timer);

        Ok(TimerSnapshot::new(
            self.current_mode()?,
            phase,
            remaining,
            total,
        ))
    }

    /// Get the current preset table
    pub fn presets(&self) -> Result<Presets, String> {
        self.session
            .lock()
            .map(|session| session.presets)
            .map_err(|e| format!("Failed to lock session: {}", e))
    }

    fn current_mode(&self) -> Result<Mode, String> {
        self.session
            .lock()
            .map(|session| session.mode)
            .map_err(|e| format!("Failed to lock session: {}", e))
    }

    /// Subscribe to the scheduler's arming channel (used by the ticker
    /// task)
    pub fn subscribe_schedule(&self) -> watch::Receiver<Option<ArmCommand>> {
        self.schedule_rx.clone()
    }

    /// Subscribe to timer snapshot updates
    pub fn subscribe_updates(&self) -> watch::Receiver<TimerSnapshot> {
        self.timer_update_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
