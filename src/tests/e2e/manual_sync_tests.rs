use crate::modules::sync::core::config::{DispatcherConfig, WatcherConfig};
use crate::modules::sync::use_cases::manual_sync::dispatcher::SyncDispatcher;
use crate::modules::sync::use_cases::watch_resources::context::{SyncBackend, WatcherContext};
use crate::modules::sync::use_cases::watch_resources::watcher::Watcher;
use crate::shared::infrastructure::resource_store::in_memory::InMemoryResourceStore;
use crate::tests::fixtures::callbacks::CallCounter;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

async fn context() -> (WatcherContext, Arc<InMemoryResourceStore>) {
    let store = Arc::new(InMemoryResourceStore::new());
    store.touch("products").await;
    store.touch("sales").await;
    let dispatcher = Arc::new(SyncDispatcher::new(DispatcherConfig::default()));
    let context = WatcherContext::new(SyncBackend::new(store.clone()), dispatcher);
    (context, store)
}

#[tokio::test(start_paused = true)]
async fn a_burst_of_triggers_results_in_fewer_re_check_passes() {
    let (context, store) = context().await;
    let products = CallCounter::new();
    let sales = CallCounter::new();
    let first = Watcher::start(["products"], products.on_change(), WatcherConfig::default(), &context);
    let second = Watcher::start(["sales"], sales.on_change(), WatcherConfig::default(), &context);
    sleep(Duration::from_millis(10)).await;
    let seeded_fetches = store.fetch_count();

    for _ in 0..5 {
        context.dispatcher.trigger_sync();
        sleep(Duration::from_millis(40)).await;
    }
    sleep(Duration::from_millis(1_500)).await;

    let passes = context.dispatcher.passes();
    assert!((1..5).contains(&passes), "got {passes} passes");
    assert_eq!(store.fetch_count() - seeded_fetches, passes * 2);
    first.stop().await;
    second.stop().await;
}

#[tokio::test(start_paused = true)]
async fn a_change_made_during_a_burst_is_picked_up_after_it_settles() {
    let (context, store) = context().await;
    let counter = CallCounter::new();
    let handle = Watcher::start(["products"], counter.on_change(), WatcherConfig::default(), &context);
    sleep(Duration::from_millis(10)).await;

    context.dispatcher.trigger_sync();
    sleep(Duration::from_millis(10)).await;
    store.touch("products").await;
    context.dispatcher.trigger_sync();
    sleep(Duration::from_millis(1_500)).await;

    assert_eq!(counter.count(), 1);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn triggering_without_watchers_is_harmless() {
    let (context, store) = context().await;

    context.dispatcher.trigger_sync();
    context.dispatcher.trigger_sync();
    sleep(Duration::from_millis(1_500)).await;

    assert_eq!(store.fetch_count(), 0);
    assert_eq!(context.dispatcher.receiver_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn a_stopped_watcher_ignores_later_triggers() {
    let (context, store) = context().await;
    let counter = CallCounter::new();
    let handle = Watcher::start(["products"], counter.on_change(), WatcherConfig::default(), &context);
    sleep(Duration::from_millis(10)).await;
    handle.stop().await;

    store.touch("products").await;
    context.dispatcher.trigger_sync();
    sleep(Duration::from_millis(1_500)).await;

    assert_eq!(store.fetch_count(), 1);
    assert_eq!(counter.count(), 0);
}
