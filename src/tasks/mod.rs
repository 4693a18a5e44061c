//! Background Tasks Module
//!
//! Drives the periodic expiration sweep, either on a dedicated thread or as a
//! task on a tokio runtime. Both drivers block between ticks and stop when
//! signalled.

mod sweep_task;
mod sweeper;

pub use sweep_task::{spawn_sweep_task, TaskSweeper};
pub use sweeper::{spawn_sweeper_thread, ThreadSweeper};

/// One pass of the expiration sweep.
pub trait Sweep: Send + Sync + 'static {
    /// Evicts whatever has expired, returning the number of evicted entries.
    fn sweep(&self) -> usize;
}

// == Sweeper Handle ==
/// Owning handle to a running sweeper, whichever way it is driven.
#[derive(Debug)]
pub enum SweeperHandle {
    /// Sweeper running on its own OS thread
    Thread(ThreadSweeper),
    /// Sweeper running as a tokio task
    Task(TaskSweeper),
}

impl SweeperHandle {
    /// Signals the sweeper to stop. Thread sweepers are joined.
    pub fn stop(&mut self) {
        match self {
            SweeperHandle::Thread(sweeper) => sweeper.stop(),
            SweeperHandle::Task(sweeper) => sweeper.stop(),
        }
    }

    /// Returns true once the sweeper loop has exited.
    pub fn is_finished(&self) -> bool {
        match self {
            SweeperHandle::Thread(sweeper) => sweeper.is_finished(),
            SweeperHandle::Task(sweeper) => sweeper.is_finished(),
        }
    }
}

impl From<ThreadSweeper> for SweeperHandle {
    fn from(sweeper: ThreadSweeper) -> Self {
        SweeperHandle::Thread(sweeper)
    }
}

impl From<TaskSweeper> for SweeperHandle {
    fn from(sweeper: TaskSweeper) -> Self {
        SweeperHandle::Task(sweeper)
    }
}
