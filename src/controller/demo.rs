use std::time::Duration;

use tokio::task::JoinHandle;

use crate::config::DemoConfig;

/// Delay before the first demo phase after the widget mounts.
pub const DEMO_START_DELAY: Duration = Duration::from_millis(100);

/// Repeating demo animation schedule.
#[derive(Debug, Clone)]
pub struct DemoCycle {
    pub active_phase: Duration,
    pub rest_phase: Duration,
}

impl DemoCycle {
    pub fn new(active_phase: Duration, rest_phase: Duration) -> Self {
        Self {
            active_phase,
            rest_phase,
        }
    }
}

impl Default for DemoCycle {
    fn default() -> Self {
        Self {
            active_phase: Duration::from_millis(2600),
            rest_phase: Duration::from_millis(1400),
        }
    }
}

impl From<&DemoConfig> for DemoCycle {
    fn from(cfg: &DemoConfig) -> Self {
        Self {
            active_phase: Duration::from_millis(cfg.active_phase_ms),
            rest_phase: Duration::from_millis(cfg.rest_phase_ms),
        }
    }
}

/// Phase of the scripted recording animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoPhase {
    Active,
    Resting,
}

/// Owns the single task driving the demo animation.
///
/// Cancelling (or dropping) the scheduler aborts the task, so no pending
/// phase transition can fire into a stale session afterwards.
pub struct DemoScheduler {
    task: JoinHandle<()>,
}

impl DemoScheduler {
    pub fn spawn<F>(cycle: DemoCycle, on_phase: F) -> Self
    where
        F: Fn(DemoPhase) + Send + Sync + 'static,
    {
        let task = tokio::spawn(async move {
            tokio::time::sleep(DEMO_START_DELAY).await;
            loop {
                on_phase(DemoPhase::Active);
                tokio::time::sleep(cycle.active_phase).await;
                on_phase(DemoPhase::Resting);
                tokio::time::sleep(cycle.rest_phase).await;
            }
        });

        Self { task }
    }

    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for DemoScheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}
