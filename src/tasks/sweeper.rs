//! Thread Sweeper
//!
//! Runs the expiration sweep on a dedicated OS thread.

use std::io;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::tasks::Sweep;

const THREAD_NAME: &str = "ttl-cache-sweeper";

/// Handle to a sweeper thread. Stopping disconnects the stop channel and
/// joins the thread.
#[derive(Debug)]
pub struct ThreadSweeper {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ThreadSweeper {
    /// Signals the thread to exit and waits for it.
    pub fn stop(&mut self) {
        // Dropping the sender wakes the thread with `Disconnected`.
        self.stop_tx.take();

        if let Some(handle) = self.handle.take() {
            // A value's destructor running inside a sweep may drop the cache.
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                warn!("Sweeper thread panicked");
            }
        }
    }

    /// Returns true once the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for ThreadSweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns a thread that calls `target.sweep()` once per `interval`.
///
/// Between ticks the thread blocks on the stop channel, so it costs nothing
/// while idle and wakes immediately when stopped.
///
/// # Arguments
/// * `target` - What to sweep; the thread keeps its own `Arc` until it exits
/// * `interval` - Time to wait between two sweeps
///
/// # Returns
/// A handle that stops and joins the thread when stopped or dropped.
///
/// # Example
/// ```ignore
/// let sweeper = spawn_sweeper_thread(shared.clone(), Duration::from_secs(60))?;
/// // Later, during shutdown:
/// drop(sweeper);
/// ```
pub fn spawn_sweeper_thread<S: Sweep>(
    target: Arc<S>,
    interval: Duration,
) -> io::Result<ThreadSweeper> {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();

    let handle = thread::Builder::new()
        .name(THREAD_NAME.to_string())
        .spawn(move || {
            info!("Starting TTL sweeper thread with interval of {:?}", interval);

            loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let removed = target.sweep();
                        if removed > 0 {
                            info!("TTL sweep: removed {} expired entries", removed);
                        } else {
                            debug!("TTL sweep: no expired entries found");
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            debug!("TTL sweeper thread exiting");
        })?;

    Ok(ThreadSweeper {
        stop_tx: Some(stop_tx),
        handle: Some(handle),
    })
}
