//! Per-session countdown clock.
//!
//! The clock is a detached task that sends one [`Command::Tick`] per period to
//! the session worker and exits after the requested number of ticks. The
//! worker applies each tick through the core, which ignores ticks from an
//! earlier generation.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace};

use pairs_core::Generation;

use super::session::Command;

/// At most one running clock; starting a new one cancels the old one.
pub struct Countdown {
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl Countdown {
    pub fn new(period: Duration) -> Self {
        Self { period, task: None }
    }

    /// Starts a clock of `seconds` ticks for `generation`, replacing any running clock.
    pub fn start(
        &mut self,
        generation: Generation,
        seconds: u32,
        commands: mpsc::WeakSender<Command>,
    ) {
        self.stop();

        let period = self.period;
        debug!(target: "runtime::timer", %generation, seconds, "Countdown started");

        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for _ in 0..seconds {
                interval.tick().await;

                let Some(tx) = commands.upgrade() else {
                    trace!(target: "runtime::timer", "Worker gone, countdown exiting");
                    return;
                };
                if tx.send(Command::Tick { generation }).await.is_err() {
                    return;
                }
            }
        }));
    }

    /// Cancels the running clock. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!(target: "runtime::timer", "Countdown stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.stop();
    }
}
