//! Real-time driver for the timer scheduler.
//!
//! The store never spawns anything on its own; somebody has to call
//! [`ToastStore::tick`]. A GUI loop can do that on every frame. Headless
//! callers spawn this driver instead: it sleeps until the next deadline and
//! wakes early whenever a dispatch may have armed a sooner one.
//!
//! The store must use a clock that agrees with tokio's timer
//! ([`SystemClock`](super::SystemClock) or [`TokioClock`](super::TokioClock)).

use std::future::Future;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::store::ToastStore;

/// Fire timers until `shutdown` resolves.
pub async fn run<F>(store: ToastStore, shutdown: F)
where
    F: Future<Output = ()>,
{
    let wake = store.wake_handle();
    tokio::pin!(shutdown);
    debug!("timer driver started");

    loop {
        let deadline = store.next_deadline();
        let sleep = async {
            match deadline {
                Some(at) => tokio::time::sleep_until(Instant::from_std(at)).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = &mut shutdown => break,
            _ = sleep => {
                store.tick();
            }
            _ = wake.notified() => {}
        }
    }

    debug!("timer driver stopped");
}

/// A driver running on the tokio runtime. Dropping it aborts the task.
#[derive(Debug)]
pub struct DriverHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

/// Spawn [`run`] onto the current tokio runtime.
pub fn spawn(store: ToastStore) -> DriverHandle {
    let (tx, rx) = oneshot::channel::<()>();
    let task = tokio::spawn(run(store, async move {
        let _ = rx.await;
    }));
    DriverHandle {
        shutdown: Some(tx),
        task,
    }
}

impl DriverHandle {
    /// Stop the driver and wait for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.task).await;
    }
}

impl Drop for DriverHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
