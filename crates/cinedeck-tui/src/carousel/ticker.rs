//! Owned auto-advance timer.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Shortest accepted interval.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// One auto-advance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselTick;

/// Background task sending a [`CarouselTick`] every interval.
///
/// The task is aborted when the handle is dropped, so a ticker never
/// outlives the view that started it.
#[derive(Debug)]
pub struct AutoAdvanceTicker {
    handle: JoinHandle<()>,
}

impl AutoAdvanceTicker {
    /// Spawns the ticker. The first tick arrives one interval after start.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(interval: Duration, sender: UnboundedSender<CarouselTick>) -> Self {
        let interval = interval.max(MIN_INTERVAL);
        let handle = tokio::spawn(async move {
            let start = Instant::now()
                .checked_add(interval)
                .unwrap_or_else(Instant::now);
            let mut ticks = tokio::time::interval_at(start, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if sender.send(CarouselTick).is_err() {
                    tracing::debug!("tick receiver closed, stopping auto-advance");
                    break;
                }
            }
        });
        Self { handle }
    }

    /// Stops the ticker.
    pub fn stop(self) {
        drop(self);
    }

    /// Whether the task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AutoAdvanceTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
