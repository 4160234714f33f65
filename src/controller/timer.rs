use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

/// One-second tick counter for the active session.
///
/// Increments the shared counter once per second while running. The counter
/// belongs to the controller so the UI can read it without locking; the
/// timer resets it to 0 on start, on stop, and on drop, so it is never
/// non-zero while the controller is idle.
pub struct SessionTimer {
    elapsed: Arc<AtomicU64>,
    tick_task: JoinHandle<()>,
}

impl SessionTimer {
    pub fn start(elapsed: Arc<AtomicU64>) -> Self {
        elapsed.store(0, Ordering::SeqCst);

        let counter = Arc::clone(&elapsed);
        let tick_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // The first tick of a tokio interval completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        Self {
            elapsed,
            tick_task,
        }
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    /// Cancel the tick task, reset the shared counter, and return the final
    /// whole-second count.
    pub fn stop(self) -> u64 {
        self.tick_task.abort();
        self.elapsed.swap(0, Ordering::SeqCst)
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.tick_task.abort();
        self.elapsed.store(0, Ordering::SeqCst);
    }
}
