//! Tokio Sweep Task
//!
//! Runs the expiration sweep as a task on an existing tokio runtime, for
//! callers that would rather not dedicate an OS thread to it.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::tasks::Sweep;

/// Handle to a sweep task. Stopping signals the task through a watch channel.
#[derive(Debug)]
pub struct TaskSweeper {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl TaskSweeper {
    /// Signals the task to exit. Does not wait for it.
    pub fn stop(&mut self) {
        // Fails only if the task already exited and dropped its receiver.
        let _ = self.stop_tx.send(true);
    }

    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns a task on `runtime` that calls `target.sweep()` once per `interval`.
///
/// The sweep holds only std locks for bounded map operations, so it runs
/// inline on the runtime.
pub fn spawn_sweep_task<S: Sweep>(
    runtime: &Handle,
    target: Arc<S>,
    interval: Duration,
) -> TaskSweeper {
    let (stop_tx, mut stop_rx) = watch::channel(false);

    let handle = runtime.spawn(async move {
        info!("Starting TTL sweep task with interval of {:?}", interval);

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = target.sweep();
                    if removed > 0 {
                        info!("TTL sweep: removed {} expired entries", removed);
                    } else {
                        debug!("TTL sweep: no expired entries found");
                    }
                }
                // Either a stop request or the handle was dropped.
                _ = stop_rx.changed() => break,
            }
        }

        debug!("TTL sweep task exiting");
    });

    TaskSweeper { stop_tx, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::test_support::CountingSweep;

    #[tokio::test]
    async fn test_sweep_task_ticks() {
        let target = Arc::new(CountingSweep::default());
        let mut sweeper = spawn_sweep_task(
            &Handle::current(),
            target.clone(),
            Duration::from_millis(20),
        );

        tokio::time::sleep(Duration::from_millis(150)).await;
        sweeper.stop();

        assert!(target.runs() >= 2, "expected several sweeps, got {}", target.runs());
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_stopped() {
        let target = Arc::new(CountingSweep::default());
        let mut sweeper = spawn_sweep_task(
            &Handle::current(),
            target.clone(),
            Duration::from_secs(3600),
        );

        sweeper.stop();

        // Wait a bit and verify task is finished
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(sweeper.is_finished(), "Task should be finished after stop");
        assert_eq!(target.runs(), 0);
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_task() {
        let target = Arc::new(CountingSweep::default());
        let sweeper = spawn_sweep_task(
            &Handle::current(),
            target.clone(),
            Duration::from_millis(10),
        );
        drop(sweeper);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(Arc::strong_count(&target), 1);
    }
}
