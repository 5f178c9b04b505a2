use crate::modules::sync::core::status::WatcherStatus;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Owner of a running watcher. `stop` is the teardown path; dropping the handle cancels
/// the watcher as well, without waiting for its cleanup.
pub struct WatcherHandle {
    id: Uuid,
    alive: Arc<AtomicBool>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
    status: watch::Receiver<WatcherStatus>,
}

impl WatcherHandle {
    pub(crate) fn running(
        id: Uuid,
        alive: Arc<AtomicBool>,
        cancel: CancellationToken,
        task: JoinHandle<()>,
        status: watch::Receiver<WatcherStatus>,
    ) -> Self {
        Self {
            id,
            alive,
            cancel,
            task: Some(task),
            status,
        }
    }

    /// A handle for a watcher that never started (no backend, no resources).
    pub(crate) fn inert(id: Uuid, resources: Vec<String>) -> Self {
        let (_, status) = watch::channel(WatcherStatus::new(id, resources, false));
        Self {
            id,
            alive: Arc::new(AtomicBool::new(false)),
            cancel: CancellationToken::new(),
            task: None,
            status,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_running(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
            && self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn status(&self) -> WatcherStatus {
        self.status.borrow().clone()
    }

    /// Cancels the timer and any in-flight fetch, removes push listeners and waits for
    /// the watcher task to finish. No callback fires once this returns.
    pub async fn stop(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                if err.is_panic() {
                    tracing::error!(watcher_id = %self.id, "watcher task panicked during teardown");
                }
            }
        }
        tracing::debug!(watcher_id = %self.id, "watcher stopped");
    }

    fn shutdown(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.cancel.cancel();
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
