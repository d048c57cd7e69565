//! Background tasks for the feed loops
//!
//! Loops run on the ambient tokio runtime and are handed back as an
//! [`AsyncHandle`] so callers can poll or cancel them without naming tokio.

use crate::prelude::Future;
use ::tokio::task::JoinHandle;

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

struct TokioHandle(JoinHandle<()>);

impl AsyncHandle for TokioHandle {
    fn is_finished(&self) -> bool {
        self.0.is_finished()
    }

    fn cancel(&self) {
        self.0.abort();
    }
}

/// Spawns a future on the current tokio runtime.
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    log::trace!("spawning background task");
    Box::new(TokioHandle(::tokio::spawn(future)))
}

/// Sleeps on the tokio timer.
pub async fn async_delay(duration: std::time::Duration) {
    ::tokio::time::sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    };
    use std::time::Duration;

    #[::tokio::test]
    async fn test_spawned_task_runs() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        let handle = spawn(async move {
            flag.store(true, Ordering::SeqCst);
        });

        while !handle.is_finished() {
            async_delay(Duration::from_millis(1)).await;
        }
        assert!(ran.load(Ordering::SeqCst));
    }

    #[::tokio::test]
    async fn test_cancel_stops_task() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();

        let handle = spawn(async move {
            async_delay(Duration::from_secs(60)).await;
            flag.store(true, Ordering::SeqCst);
        });
        handle.cancel();

        async_delay(Duration::from_millis(20)).await;
        assert!(handle.is_finished());
        assert!(!ran.load(Ordering::SeqCst));
    }
}
