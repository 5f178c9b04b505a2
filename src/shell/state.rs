use crate::modules::sync::core::status::WatcherStatus;
use crate::modules::sync::use_cases::manual_sync::dispatcher::SyncDispatcher;
use crate::modules::sync::use_cases::watch_resources::context::{SyncBackend, WatcherContext};
use crate::modules::sync::use_cases::watch_resources::handle::WatcherHandle;
use crate::shared::infrastructure::change_feed::in_memory::InMemoryChangeFeed;
use crate::shared::infrastructure::resource_store::postgrest::PostgrestResourceStore;
use crate::shell::config::SyncSettings;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Handles of the watchers the process started, kept for status reporting and shutdown.
#[derive(Default)]
pub struct WatcherRegistry {
    handles: RwLock<Vec<WatcherHandle>>,
}

impl WatcherRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, handle: WatcherHandle) {
        self.handles.write().await.push(handle);
    }

    pub async fn statuses(&self) -> Vec<WatcherStatus> {
        self.handles
            .read()
            .await
            .iter()
            .map(WatcherHandle::status)
            .collect()
    }

    pub async fn stop_all(&self) {
        let handles: Vec<WatcherHandle> = self.handles.write().await.drain(..).collect();
        for handle in handles {
            handle.stop().await;
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<SyncDispatcher>,
    pub feed: Arc<InMemoryChangeFeed>,
    pub context: WatcherContext,
    pub watchers: Arc<WatcherRegistry>,
}

impl AppState {
    /// Wires the PostgREST store when a backend is configured; otherwise watchers stay inert.
    pub fn from_settings(settings: &SyncSettings) -> Self {
        let dispatcher = Arc::new(SyncDispatcher::new(settings.dispatcher));
        let feed = Arc::new(InMemoryChangeFeed::new());
        let context = match settings.backend() {
            Some((url, key)) => {
                let backend = SyncBackend::new(Arc::new(PostgrestResourceStore::new(url, key)))
                    .with_feed(feed.clone());
                WatcherContext::new(backend, dispatcher.clone())
            }
            None => {
                tracing::warn!("SYNC_BACKEND_URL or SYNC_BACKEND_KEY missing, sync disabled");
                WatcherContext::unconfigured(dispatcher.clone())
            }
        };
        Self::new(dispatcher, feed, context)
    }

    pub fn new(
        dispatcher: Arc<SyncDispatcher>,
        feed: Arc<InMemoryChangeFeed>,
        context: WatcherContext,
    ) -> Self {
        Self {
            dispatcher,
            feed,
            context,
            watchers: Arc::new(WatcherRegistry::new()),
        }
    }
}
