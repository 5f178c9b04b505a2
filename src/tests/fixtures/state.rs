use crate::modules::sync::core::config::DispatcherConfig;
use crate::modules::sync::use_cases::manual_sync::dispatcher::SyncDispatcher;
use crate::modules::sync::use_cases::watch_resources::context::{SyncBackend, WatcherContext};
use crate::shared::infrastructure::change_feed::in_memory::InMemoryChangeFeed;
use crate::shared::infrastructure::resource_store::in_memory::InMemoryResourceStore;
use crate::shell::state::AppState;
use std::sync::Arc;

/// App state over in-memory adapters, with the store returned for inspection.
pub fn make_test_state() -> (AppState, Arc<InMemoryResourceStore>) {
    let store = Arc::new(InMemoryResourceStore::new());
    let feed = Arc::new(InMemoryChangeFeed::new());
    let dispatcher = Arc::new(SyncDispatcher::new(DispatcherConfig::default()));
    let backend = SyncBackend::new(store.clone()).with_feed(feed.clone());
    let context = WatcherContext::new(backend, dispatcher.clone());
    (AppState::new(dispatcher, feed, context), store)
}
