//! Delayed execution for the computer's reply. The timer owns at most
//! one pending task; scheduling again, cancelling, or dropping the
//! timer aborts whatever was pending.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::trace;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(800);

#[derive(Debug, Default)]
pub struct ComputerTimer {
    pending: Option<JoinHandle<()>>,
}

impl ComputerTimer {
    pub fn new() -> ComputerTimer {
        ComputerTimer { pending: None }
    }

    /// Run `task` after `delay`, replacing any pending task. The task
    /// should carry the session generation it was armed under and let
    /// the session discard it if that generation has passed.
    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        trace!(?delay, "arming computer reply timer");
        self.pending = Some(tokio::spawn(async move {
            sleep(delay).await;
            task();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for ComputerTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
