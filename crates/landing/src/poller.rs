//! Repeating tick tasks that drive time-based phase changes.

use parking_lot::Mutex;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A closure run every `period` on the tokio runtime until cancelled,
/// dropped, or the closure returns `ControlFlow::Break`.
///
/// The first run happens one full period after spawning. Slow runs delay
/// the schedule instead of bursting to catch up.
pub struct ScheduledTask {
    period: Duration,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ScheduledTask {
    pub fn spawn<F>(period: Duration, mut task: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {
                        if cancelled.is_cancelled() {
                            break;
                        }
                        if task().is_break() {
                            break;
                        }
                    }
                }
            }
        });
        Self {
            period,
            token,
            handle,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stop future runs. A run already executing on another worker may
    /// still finish; callers that need a hard cut-off must also guard the
    /// state the closure touches.
    pub fn cancel(&self) {
        self.token.cancel();
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ScheduledTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

type TickFn = dyn Fn() -> ControlFlow<()> + Send + Sync;

/// Owns the one repeating tick of a page session. Changing the period
/// replaces the running task; stopping cancels it for good.
pub struct PollingController {
    on_tick: Arc<TickFn>,
    task: Mutex<Option<ScheduledTask>>,
    stopped: Mutex<bool>,
}

impl PollingController {
    pub fn new<F>(on_tick: F) -> Self
    where
        F: Fn() -> ControlFlow<()> + Send + Sync + 'static,
    {
        Self {
            on_tick: Arc::new(on_tick),
            task: Mutex::new(None),
            stopped: Mutex::new(false),
        }
    }

    /// Start ticking at `period`, cancelling any previous schedule first.
    /// Does nothing once the controller has been stopped.
    pub fn start(&self, period: Duration) {
        let stopped = self.stopped.lock();
        if *stopped {
            return;
        }
        let mut task = self.task.lock();
        if let Some(previous) = task.take() {
            previous.cancel();
        }
        let on_tick = Arc::clone(&self.on_tick);
        *task = Some(ScheduledTask::spawn(period, move || on_tick()));
        debug!(period_ms = period.as_millis() as u64, "Polling started");
    }

    pub fn set_period(&self, period: Duration) {
        if self.period() == Some(period) {
            return;
        }
        self.start(period);
    }

    pub fn period(&self) -> Option<Duration> {
        self.task.lock().as_ref().map(ScheduledTask::period)
    }

    pub fn stop(&self) {
        let mut stopped = self.stopped.lock();
        *stopped = true;
        if let Some(task) = self.task.lock().take() {
            task.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .map(|t| !t.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.stop();
    }
}
