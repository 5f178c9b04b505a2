use crate::modules::sync::use_cases::manual_sync::dispatcher::SyncDispatcher;
use crate::shared::infrastructure::change_feed::ChangeFeed;
use crate::shared::infrastructure::resource_store::ResourceStore;
use std::sync::Arc;

/// The backend a watcher talks to. The change feed is optional; polling alone is enough.
#[derive(Clone)]
pub struct SyncBackend {
    pub store: Arc<dyn ResourceStore>,
    pub feed: Option<Arc<dyn ChangeFeed>>,
}

impl SyncBackend {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store, feed: None }
    }

    pub fn with_feed(mut self, feed: Arc<dyn ChangeFeed>) -> Self {
        self.feed = Some(feed);
        self
    }
}

/// Collaborators shared by every watcher of the process.
#[derive(Clone)]
pub struct WatcherContext {
    /// None when no backend is configured; watchers then stay inert.
    pub backend: Option<SyncBackend>,
    pub dispatcher: Arc<SyncDispatcher>,
}

impl WatcherContext {
    pub fn new(backend: SyncBackend, dispatcher: Arc<SyncDispatcher>) -> Self {
        Self {
            backend: Some(backend),
            dispatcher,
        }
    }

    pub fn unconfigured(dispatcher: Arc<SyncDispatcher>) -> Self {
        Self {
            backend: None,
            dispatcher,
        }
    }
}
