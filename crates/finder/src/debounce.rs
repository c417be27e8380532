//! Cancellable, single-flight scheduled task.
//!
//! At most one task is pending at a time. Scheduling a new task aborts the
//! pending one first, so only the last task of a burst ever starts, once the
//! delay has passed without another `schedule` call.
//!
//! Aborting only stops a task that is still waiting out its delay. A task
//! that has already started runs to completion; callers that must discard
//! its effect need their own staleness check (see `SearchSession`).

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

struct Pending {
    handle: JoinHandle<()>,
    started: Arc<AtomicBool>,
}

impl Pending {
    fn is_waiting(&self) -> bool {
        !self.started.load(Ordering::SeqCst) && !self.handle.is_finished()
    }
}

pub struct Debouncer {
    delay: Duration,
    runtime: Handle,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `task` after the delay, replacing any pending task.
    ///
    /// `task` is synchronous; once it starts it cannot be aborted halfway.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        let started = Arc::new(AtomicBool::new(false));
        let flag = started.clone();
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            flag.store(true, Ordering::SeqCst);
            task();
        });
        self.pending = Some(Pending { handle, started });
    }

    /// Abort the pending task, if any.
    ///
    /// Returns true only if the task was still waiting out its delay, i.e.
    /// it is now guaranteed never to start.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                let was_waiting = pending.is_waiting();
                pending.handle.abort();
                was_waiting
            }
            None => false,
        }
    }

    /// Whether a task is still waiting out its delay
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(Pending::is_waiting)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
