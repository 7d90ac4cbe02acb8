//! Ticker background task and the scheduler that arms it

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::state::{countdown::TickScheduler, AppState};

/// Arming command published by the scheduler: which registration is live
/// and how often it should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmCommand {
    pub generation: u64,
    pub period: Duration,
}

/// Production [`TickScheduler`]: arms and disarms the ticker task through
/// a watch channel. Handles are generation counters, so a stale cancel
/// never disarms a newer registration.
pub struct IntervalScheduler {
    arm_tx: watch::Sender<Option<ArmCommand>>,
    next_generation: u64,
}

impl IntervalScheduler {
    pub fn new(arm_tx: watch::Sender<Option<ArmCommand>>) -> Self {
        Self {
            arm_tx,
            next_generation: 0,
        }
    }
}

impl TickScheduler for IntervalScheduler {
    type Handle = u64;

    fn schedule(&mut self, period: Duration) -> u64 {
        self.next_generation += 1;
        let generation = self.next_generation;
        self.arm_tx.send_replace(Some(ArmCommand { generation, period }));
        generation
    }

    fn cancel(&mut self, handle: u64) {
        self.arm_tx.send_if_modified(|armed| {
            if armed.map(|cmd| cmd.generation) == Some(handle) {
                *armed = None;
                true
            } else {
                false
            }
        });
    }
}

/// Background task that fires the countdown's periodic ticks based on the
/// scheduler's arming channel.
pub async fn ticker_task(state: Arc<AppState>) {
    info!("Starting ticker task");

    let mut arm_rx = state.subscribe_schedule();

    loop {
        // Wait until a registration is armed
        let armed = loop {
            if let Some(cmd) = *arm_rx.borrow_and_update() {
                break cmd;
            }
            if arm_rx.changed().await.is_err() {
                info!("Scheduler channel closed, ticker task exiting");
                return;
            }
        };

        debug!(
            "Registration {} armed with period {:?}",
            armed.generation, armed.period
        );

        let mut interval = tokio::time::interval(armed.period);
        // The first interval tick fires immediately and is not an elapsed
        // period.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = state.tick() {
                        error!("Failed to apply tick: {}", e);
                    }
                }
                changed = arm_rx.changed() => {
                    if changed.is_err() {
                        info!("Scheduler channel closed, ticker task exiting");
                        return;
                    }
                    let current = (*arm_rx.borrow_and_update()).map(|cmd| cmd.generation);
                    if current != Some(armed.generation) {
                        debug!("Registration {} disarmed", armed.generation);
                        break;
                    }
                }
            }
        }
    }
}
