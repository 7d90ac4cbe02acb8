//! Countdown core state machine

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed period between firings: one second of countdown per tick.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Periodic scheduling primitive consumed by the countdown.
///
/// `schedule` registers a callback source firing once per `period` and
/// returns an opaque handle; `cancel` revokes that registration. The
/// countdown holds at most one live handle at a time.
pub trait TickScheduler {
    type Handle;

    fn schedule(&mut self, period: Duration) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

/// Display callbacks provided by the embedding layer.
pub trait Presenter {
    /// Called with the new remaining value on every decrement, on reset,
    /// and when a new duration is applied.
    fn on_tick(&mut self, remaining_seconds: u64, total_seconds: u64);

    /// Called once per run-to-completion cycle when the countdown hits zero.
    fn on_complete(&mut self);
}

/// Countdown phase. `Idle` and `Paused` differ only in history:
/// a paused countdown was stopped mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Running,
    Paused,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Paused => "paused",
        }
    }
}

/// Countdown timer state machine.
///
/// Owns the configured duration, the remaining time, and the scheduling
/// handle. All mutation happens through the five operations plus `tick`;
/// none of them can fail, and misuse (double `start`, `pause` while idle)
/// is absorbed as a no-op.
pub struct Countdown<S: TickScheduler, P: Presenter> {
    total_seconds: u64,
    remaining_seconds: u64,
    phase: Phase,
    /// Live scheduling registration; `Some` iff the phase is `Running`.
    handle: Option<S::Handle>,
    scheduler: S,
    presenter: P,
}

impl<S: TickScheduler, P: Presenter> Countdown<S, P> {
    /// Create an idle countdown with zero duration.
    pub fn new(scheduler: S, presenter: P) -> Self {
        Self {
            total_seconds: 0,
            remaining_seconds: 0,
            phase: Phase::Idle,
            handle: None,
            scheduler,
            presenter,
        }
    }

    /// Apply a new session duration and notify the presenter of the
    /// restored display value. Does not touch the running state; callers
    /// that want a clean slate call [`stop`](Self::stop) first.
    pub fn set_duration(&mut self, minutes: u64) {
        // Saturate rather than overflow; the boundary caps sane durations
        // long before this matters.
        self.total_seconds = minutes.saturating_mul(60);
        self.remaining_seconds = self.total_seconds;
        // A stopped countdown given a new duration is a fresh session, not
        // a paused one.
        if self.handle.is_none() {
            self.phase = Phase::Idle;
        }
        self.presenter
            .on_tick(self.remaining_seconds, self.total_seconds);
    }

    /// Begin (or resume) counting down. No-op if already running; only one
    /// scheduling handle may be live at a time.
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.handle = Some(self.scheduler.schedule(TICK_PERIOD));
        self.phase = Phase::Running;
    }

    /// One periodic firing. Ignored unless running, so a firing already in
    /// flight when the countdown was cancelled has no effect.
    pub fn tick(&mut self) {
        if self.handle.is_none() {
            return;
        }
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            self.presenter
                .on_tick(self.remaining_seconds, self.total_seconds);
        } else {
            self.stop();
            self.phase = Phase::Idle;
            self.presenter.on_complete();
        }
    }

    /// Cancel scheduling and preserve the remaining time. Idempotent when
    /// not running.
    pub fn pause(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.scheduler.cancel(handle);
            self.phase = Phase::Paused;
        }
    }

    /// Alias for [`pause`](Self::pause): cancels scheduling without
    /// resetting the remaining time.
    pub fn stop(&mut self) {
        self.pause();
    }

    /// Stop scheduling, restore the full duration, and notify the
    /// presenter of the restored display value.
    pub fn reset(&mut self) {
        self.stop();
        self.phase = Phase::Idle;
        self.remaining_seconds = self.total_seconds;
        self.presenter
            .on_tick(self.remaining_seconds, self.total_seconds);
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct SchedulerLog {
        scheduled: u32,
        cancelled: u32,
        active: Vec<u32>,
    }

    struct FakeScheduler {
        log: Rc<RefCell<SchedulerLog>>,
        next_handle: u32,
    }

    impl FakeScheduler {
        fn new() -> (Self, Rc<RefCell<SchedulerLog>>) {
            let log = Rc::new(RefCell::new(SchedulerLog::default()));
            (
                Self {
                    log: Rc::clone(&log),
                    next_handle: 0,
                },
                log,
            )
        }
    }

    impl TickScheduler for FakeScheduler {
        type Handle = u32;

        fn schedule(&mut self, period: Duration) -> u32 {
            assert_eq!(period, TICK_PERIOD);
            self.next_handle += 1;
            let mut log = self.log.borrow_mut();
            log.scheduled += 1;
            log.active.push(self.next_handle);
            self.next_handle
        }

        fn cancel(&mut self, handle: u32) {
            let mut log = self.log.borrow_mut();
            log.cancelled += 1;
            log.active.retain(|&h| h != handle);
        }
    }

    #[derive(Default)]
    struct PresenterLog {
        ticks: Vec<(u64, u64)>,
        completions: u32,
    }

    struct RecordingPresenter {
        log: Rc<RefCell<PresenterLog>>,
    }

    impl RecordingPresenter {
        fn new() -> (Self, Rc<RefCell<PresenterLog>>) {
            let log = Rc::new(RefCell::new(PresenterLog::default()));
            (
                Self {
                    log: Rc::clone(&log),
                },
                log,
            )
        }
    }

    impl Presenter for RecordingPresenter {
        fn on_tick(&mut self, remaining_seconds: u64, total_seconds: u64) {
            self.log
                .borrow_mut()
                .ticks
                .push((remaining_seconds, total_seconds));
        }

        fn on_complete(&mut self) {
            self.log.borrow_mut().completions += 1;
        }
    }

    fn countdown() -> (
        Countdown<FakeScheduler, RecordingPresenter>,
        Rc<RefCell<SchedulerLog>>,
        Rc<RefCell<PresenterLog>>,
    ) {
        let (scheduler, sched_log) = FakeScheduler::new();
        let (presenter, pres_log) = RecordingPresenter::new();
        (Countdown::new(scheduler, presenter), sched_log, pres_log)
    }

    #[test]
    fn set_duration_fills_remaining_and_notifies() {
        let (mut timer, _, pres) = countdown();
        for minutes in [1u64, 5, 25, 90] {
            timer.set_duration(minutes);
            assert_eq!(timer.total_seconds(), minutes * 60);
            assert_eq!(timer.remaining_seconds(), minutes * 60);
            assert_eq!(
                pres.borrow().ticks.last(),
                Some(&(minutes * 60, minutes * 60))
            );
        }
    }

    #[test]
    fn runs_to_completion_exactly_once() {
        let (mut timer, sched, pres) = countdown();
        timer.set_duration(1);
        timer.start();
        assert_eq!(timer.phase(), Phase::Running);

        for _ in 0..60 {
            timer.tick();
        }
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(pres.borrow().completions, 0);
        assert_eq!(pres.borrow().ticks.last(), Some(&(0, 60)));

        // The firing after reaching zero completes the run.
        timer.tick();
        assert_eq!(pres.borrow().completions, 1);
        assert!(!timer.is_running());
        assert_eq!(timer.phase(), Phase::Idle);
        assert!(sched.borrow().active.is_empty());

        // Further firings are no-ops once the schedule is cancelled.
        timer.tick();
        assert_eq!(pres.borrow().completions, 1);
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn pause_preserves_remaining_and_start_resumes() {
        let (mut timer, _, _) = countdown();
        timer.set_duration(5);
        timer.start();
        for _ in 0..10 {
            timer.tick();
        }
        assert_eq!(timer.remaining_seconds(), 290);

        timer.pause();
        assert_eq!(timer.phase(), Phase::Paused);
        // Firings between pause and resume must not decrement.
        timer.tick();
        timer.tick();
        assert_eq!(timer.remaining_seconds(), 290);

        timer.start();
        for _ in 0..10 {
            timer.tick();
        }
        assert_eq!(timer.remaining_seconds(), 280);
    }

    #[test]
    fn reset_restores_duration_and_notifies_once() {
        let (mut timer, _, pres) = countdown();
        timer.set_duration(2);
        timer.start();
        for _ in 0..30 {
            timer.tick();
        }
        assert_eq!(timer.remaining_seconds(), 90);

        let ticks_before = pres.borrow().ticks.len();
        timer.reset();
        assert_eq!(timer.remaining_seconds(), 120);
        assert_eq!(timer.total_seconds(), 120);
        assert!(!timer.is_running());
        assert_eq!(timer.phase(), Phase::Idle);
        assert_eq!(pres.borrow().ticks.len(), ticks_before + 1);
        assert_eq!(pres.borrow().ticks.last(), Some(&(120, 120)));
    }

    #[test]
    fn start_is_idempotent_while_running() {
        let (mut timer, sched, _) = countdown();
        timer.set_duration(1);
        timer.start();
        timer.start();
        assert_eq!(sched.borrow().scheduled, 1);
        assert_eq!(sched.borrow().active.len(), 1);

        // One decrement per firing, never doubled.
        timer.tick();
        assert_eq!(timer.remaining_seconds(), 59);
    }

    #[test]
    fn pause_is_idempotent_when_not_running() {
        let (mut timer, sched, _) = countdown();
        timer.set_duration(1);
        timer.pause();
        timer.pause();
        assert_eq!(sched.borrow().cancelled, 0);
        assert_eq!(timer.phase(), Phase::Idle);
        assert_eq!(timer.remaining_seconds(), 60);
    }

    #[test]
    fn final_decrement_notifies_zero_before_completing() {
        let (mut timer, _, pres) = countdown();
        timer.set_duration(1);
        timer.start();
        for _ in 0..59 {
            timer.tick();
        }
        assert_eq!(timer.remaining_seconds(), 1);

        timer.tick();
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(pres.borrow().ticks.last(), Some(&(0, 60)));
        assert_eq!(pres.borrow().completions, 0);

        timer.tick();
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(pres.borrow().completions, 1);
    }

    #[test]
    fn absurd_duration_saturates_instead_of_overflowing() {
        let (mut timer, _, _) = countdown();
        timer.set_duration(u64::MAX);
        assert_eq!(timer.total_seconds(), u64::MAX);
        assert_eq!(timer.remaining_seconds(), u64::MAX);
    }

    #[test]
    fn zero_duration_completes_on_first_firing() {
        let (mut timer, _, pres) = countdown();
        timer.start();
        timer.tick();
        assert_eq!(pres.borrow().completions, 1);
        assert!(!timer.is_running());
    }

    #[test]
    fn restart_after_completion_is_a_fresh_cycle() {
        let (mut timer, sched, pres) = countdown();
        timer.set_duration(1);
        timer.start();
        for _ in 0..61 {
            timer.tick();
        }
        assert_eq!(pres.borrow().completions, 1);

        timer.reset();
        timer.start();
        assert_eq!(sched.borrow().scheduled, 2);
        for _ in 0..61 {
            timer.tick();
        }
        assert_eq!(pres.borrow().completions, 2);
    }
}
