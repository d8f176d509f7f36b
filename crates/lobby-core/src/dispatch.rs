//! UI dispatch queue: marshals work onto the thread that owns UI state.
//!
//! Worker tasks hold a [`UiHandle`] and post closures; the UI loop owns the
//! matching [`UiQueue`] and runs them, so every callback that touches the
//! interface executes on one thread in posting order.

use tokio::sync::mpsc;
use tracing::debug;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Create a connected handle/queue pair.
pub fn ui_channel() -> (UiHandle, UiQueue) {
    let (tx, rx) = mpsc::unbounded_channel();
    (UiHandle { tx }, UiQueue { rx })
}

/// Sending half. Cheap to clone, safe to use from any task.
#[derive(Clone)]
pub struct UiHandle {
    tx: mpsc::UnboundedSender<Job>,
}

impl UiHandle {
    /// Post `job` to the UI thread. Returns `false` (and drops the job) if
    /// the queue is gone.
    pub fn post(&self, job: impl FnOnce() + Send + 'static) -> bool {
        if self.tx.send(Box::new(job)).is_err() {
            debug!("UI queue closed; dropping job");
            return false;
        }
        true
    }
}

/// Receiving half, owned by the UI thread.
pub struct UiQueue {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl UiQueue {
    /// Run every job that is already queued without waiting. Returns how
    /// many ran.
    pub fn run_pending(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    /// Wait for the next job and run it. Returns `false` once every
    /// [`UiHandle`] has been dropped and the queue is empty.
    pub async fn run_next(&mut self) -> bool {
        match self.rx.recv().await {
            Some(job) => {
                job();
                true
            }
            None => false,
        }
    }
}
