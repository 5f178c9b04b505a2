use crate::modules::sync::core::config::{DispatcherConfig, WatcherConfig};
use crate::modules::sync::core::events::ChangeNotification;
use crate::modules::sync::use_cases::manual_sync::dispatcher::SyncDispatcher;
use crate::modules::sync::use_cases::watch_resources::context::{SyncBackend, WatcherContext};
use crate::modules::sync::use_cases::watch_resources::watcher::Watcher;
use crate::shared::infrastructure::change_feed::in_memory::InMemoryChangeFeed;
use crate::shared::infrastructure::resource_store::in_memory::InMemoryResourceStore;
use crate::tests::fixtures::callbacks::CallCounter;
use crate::tests::fixtures::resources::{retail_resource_names, retail_resources};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

const POLL: Duration = Duration::from_millis(5_000);

async fn retail_store() -> Arc<InMemoryResourceStore> {
    let store = Arc::new(InMemoryResourceStore::new());
    for name in retail_resource_names() {
        store.touch(&name).await;
    }
    store
}

fn dispatcher() -> Arc<SyncDispatcher> {
    Arc::new(SyncDispatcher::new(DispatcherConfig::default()))
}

#[tokio::test(start_paused = true)]
async fn a_pos_screen_is_told_once_when_a_sale_is_recorded() {
    let store = retail_store().await;
    let context = WatcherContext::new(SyncBackend::new(store.clone()), dispatcher());
    let counter = CallCounter::new();
    let handle = Watcher::start(
        retail_resources(),
        counter.on_change(),
        WatcherConfig::default(),
        &context,
    );
    sleep(Duration::from_millis(10)).await;
    assert_eq!(counter.count(), 0);

    store.touch("sales").await;
    store.touch("cash_movements").await;
    sleep(POLL).await;
    assert_eq!(counter.count(), 1);

    sleep(POLL * 3).await;
    assert_eq!(counter.count(), 1);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn a_timed_out_resource_does_not_mask_another_change() {
    let store = retail_store().await;
    let context = WatcherContext::new(SyncBackend::new(store.clone()), dispatcher());
    let counter = CallCounter::new();
    let config = WatcherConfig::default()
        .with_poll_interval(Duration::from_millis(10_000))
        .with_fetch_timeout(Duration::from_millis(1_000));
    let handle = Watcher::start(["clients", "products"], counter.on_change(), config, &context);
    sleep(Duration::from_millis(10)).await;

    store.set_resource_delay_ms("clients", 3_000).await;
    store.touch("products").await;
    sleep(Duration::from_millis(12_000)).await;

    assert_eq!(counter.count(), 1);
    assert!(handle.is_running());
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn an_offline_network_skips_cycles_until_it_returns() {
    let store = retail_store().await;
    let context = WatcherContext::new(SyncBackend::new(store.clone()), dispatcher());
    let counter = CallCounter::new();
    let handle = Watcher::start(["products"], counter.on_change(), WatcherConfig::default(), &context);
    sleep(Duration::from_millis(10)).await;

    store.set_network_online(false);
    store.touch("products").await;
    sleep(POLL * 2).await;
    assert_eq!(store.fetch_count(), 1);
    assert_eq!(counter.count(), 0);

    store.set_network_online(true);
    sleep(POLL).await;
    assert_eq!(counter.count(), 1);
    handle.stop().await;
}

#[tokio::test(start_paused = true)]
async fn watchers_keep_their_own_baselines() {
    let store = retail_store().await;
    let context = WatcherContext::new(SyncBackend::new(store.clone()), dispatcher());
    let inventory = CallCounter::new();
    let clients = CallCounter::new();
    let first = Watcher::start(["products"], inventory.on_change(), WatcherConfig::default(), &context);
    let second = Watcher::start(["clients"], clients.on_change(), WatcherConfig::default(), &context);
    sleep(Duration::from_millis(10)).await;

    store.touch("clients").await;
    sleep(POLL).await;

    assert_eq!(inventory.count(), 0);
    assert_eq!(clients.count(), 1);
    first.stop().await;
    second.stop().await;
}

#[tokio::test(start_paused = true)]
async fn push_and_poll_together_report_a_single_change() {
    let store = retail_store().await;
    let feed = Arc::new(InMemoryChangeFeed::new());
    let backend = SyncBackend::new(store.clone()).with_feed(feed.clone());
    let context = WatcherContext::new(backend, dispatcher());
    let counter = CallCounter::new();
    let handle = Watcher::start(["return_vouchers"], counter.on_change(), WatcherConfig::default(), &context);
    sleep(Duration::from_millis(10)).await;

    let committed_at = store.touch("return_vouchers").await;
    for _ in 0..3 {
        feed.publish(ChangeNotification::at("return_vouchers", committed_at))
            .await;
    }
    sleep(POLL * 2).await;

    assert_eq!(counter.count(), 1);
    handle.stop().await;
    assert_eq!(feed.total_listeners().await, 0);
}

#[tokio::test(start_paused = true)]
async fn without_a_backend_nothing_is_fetched() {
    let store = retail_store().await;
    let context = WatcherContext::unconfigured(dispatcher());
    let counter = CallCounter::new();
    let handle = Watcher::start(
        retail_resources(),
        counter.on_change(),
        WatcherConfig::default(),
        &context,
    );
    context.dispatcher.trigger_sync();
    sleep(POLL * 3).await;

    assert!(!handle.is_running());
    assert_eq!(store.fetch_count(), 0);
    assert_eq!(counter.count(), 0);
    assert_eq!(handle.status().polls, 0);
}

#[tokio::test(start_paused = true)]
async fn a_change_pushed_without_commit_time_is_not_reported_again_by_polling() {
    let store = retail_store().await;
    let feed = Arc::new(InMemoryChangeFeed::new());
    let backend = SyncBackend::new(store.clone()).with_feed(feed.clone());
    let context = WatcherContext::new(backend, dispatcher());
    let counter = CallCounter::new();
    let handle = Watcher::start(["delivery_receipts"], counter.on_change(), WatcherConfig::default(), &context);
    sleep(Duration::from_millis(10)).await;

    store.touch("delivery_receipts").await;
    feed.publish(ChangeNotification::new("delivery_receipts")).await;
    sleep(POLL * 3).await;

    assert_eq!(counter.count(), 1);
    handle.stop().await;
}
