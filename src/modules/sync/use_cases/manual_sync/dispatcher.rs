// Process-wide manual sync dispatcher.
//
// Purpose
// - Let any caller request an immediate re-check of every live watcher.
//
// Responsibilities
// - Collapse bursts: the first trigger after a quiet period is broadcast at once, further
//   triggers inside the debounce window fold into one trailing broadcast when it closes.
// - Stay a no-op when nobody listens.
//
// Boundaries
// - Constructed once by the composition root and handed to watchers explicitly.

use crate::modules::sync::core::config::DispatcherConfig;
use crate::modules::sync::core::events::SyncEvent;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, sleep_until};

const SYNC_EVENT_CAPACITY: usize = 16;

pub struct SyncDispatcher {
    requests: mpsc::UnboundedSender<()>,
    events: broadcast::Sender<SyncEvent>,
    passes: Arc<AtomicUsize>,
}

impl SyncDispatcher {
    /// Must be called from within a tokio runtime; spawns the debounce task.
    pub fn new(config: DispatcherConfig) -> Self {
        let (requests, requests_rx) = mpsc::unbounded_channel();
        let (events, _) = broadcast::channel(SYNC_EVENT_CAPACITY);
        let passes = Arc::new(AtomicUsize::new(0));
        tokio::spawn(run_debounce(
            requests_rx,
            events.clone(),
            passes.clone(),
            config,
        ));
        Self {
            requests,
            events,
            passes,
        }
    }

    /// Requests a re-check of every live watcher. Never blocks and never fails.
    pub fn trigger_sync(&self) {
        if self.requests.send(()).is_err() {
            tracing::debug!("sync dispatcher stopped, trigger ignored");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.events.receiver_count()
    }

    /// Number of re-check passes broadcast so far.
    pub fn passes(&self) -> usize {
        self.passes.load(Ordering::SeqCst)
    }
}

async fn run_debounce(
    mut requests: mpsc::UnboundedReceiver<()>,
    events: broadcast::Sender<SyncEvent>,
    passes: Arc<AtomicUsize>,
    config: DispatcherConfig,
) {
    while requests.recv().await.is_some() {
        broadcast_pass(&events, &passes);

        loop {
            let deadline = Instant::now() + config.debounce;
            let mut pending = 0usize;
            loop {
                tokio::select! {
                    _ = sleep_until(deadline) => break,
                    request = requests.recv() => match request {
                        Some(()) => pending += 1,
                        None => return,
                    },
                }
            }
            if pending == 0 {
                break;
            }
            tracing::debug!(collapsed = pending, "manual sync burst collapsed");
            broadcast_pass(&events, &passes);
        }
    }
}

fn broadcast_pass(events: &broadcast::Sender<SyncEvent>, passes: &AtomicUsize) {
    passes.fetch_add(1, Ordering::SeqCst);
    match events.send(SyncEvent::now()) {
        Ok(receivers) => tracing::debug!(receivers, "manual sync broadcast"),
        Err(_) => tracing::debug!("manual sync requested with no active watcher"),
    }
}
