// Data-change watcher.
//
// Purpose
// - Tell a consumer "your data may be stale" without it managing timers or subscriptions.
//
// Responsibilities
// - Poll every watched resource right away and then on a fixed interval.
// - Re-check on every manual sync broadcast.
// - Debounce push notifications into one callback per burst, bounded by a maximum wait.
// - Coalesce push and poll: a change already reported by one path is not reported again
//   by the other.
// - Invoke on_change at most once per poll cycle, never after teardown.
//
// Ordering
// - One task per watcher owns the state map, so polls never overlap and per-resource
//   updates are never interleaved. Missed ticks are skipped, not queued.

use crate::modules::sync::core::config::WatcherConfig;
use crate::modules::sync::core::events::{ChangeNotification, SyncEvent};
use crate::modules::sync::core::resource::{WatchedResource, dedup_resources};
use crate::modules::sync::core::state::WatcherState;
use crate::modules::sync::core::status::WatcherStatus;
use crate::modules::sync::use_cases::watch_resources::context::{SyncBackend, WatcherContext};
use crate::modules::sync::use_cases::watch_resources::handle::WatcherHandle;
use crate::modules::sync::use_cases::watch_resources::poll::{PollReport, poll_once};
use crate::shared::infrastructure::change_feed::{ChangeFeed, SubscriptionId};
use crate::shared::infrastructure::resource_store::ResourceStore;
use chrono::Utc;
use std::ops::ControlFlow;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior, interval, sleep_until};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

pub type OnChange = Arc<dyn Fn() + Send + Sync + 'static>;

pub struct Watcher;

impl Watcher {
    /// Starts watching `resources`. Never fails: without a backend or without resources
    /// the returned handle is inert. Must be called from within a tokio runtime.
    pub fn start<I, R>(
        resources: I,
        on_change: OnChange,
        config: WatcherConfig,
        context: &WatcherContext,
    ) -> WatcherHandle
    where
        I: IntoIterator<Item = R>,
        R: Into<WatchedResource>,
    {
        let id = Uuid::now_v7();
        let resources = dedup_resources(resources);
        let names: Vec<String> = resources.iter().map(|r| r.name.clone()).collect();

        if resources.is_empty() {
            tracing::warn!(watcher_id = %id, "no resources to watch, watcher disabled");
            return WatcherHandle::inert(id, names);
        }
        let Some(SyncBackend { store, feed }) = context.backend.clone() else {
            tracing::info!(watcher_id = %id, "no backend configured, watcher disabled");
            return WatcherHandle::inert(id, names);
        };

        let alive = Arc::new(AtomicBool::new(true));
        let cancel = CancellationToken::new();
        let (status_tx, status_rx) = watch::channel(WatcherStatus::new(id, names.clone(), true));
        // Subscribe before spawning so a trigger right after start is not lost.
        let sync_rx = context.dispatcher.subscribe();

        let task = WatcherTask {
            id,
            resources,
            on_change,
            config,
            store,
            feed,
            state: WatcherState::new(),
            push: PushBurst::default(),
            alive: alive.clone(),
            cancel: cancel.clone(),
            status: status_tx,
        };
        tracing::info!(watcher_id = %id, resources = ?names, "watcher started");
        let join = tokio::spawn(task.run(sync_rx));

        WatcherHandle::running(id, alive, cancel, join, status_rx)
    }
}

/// Push notifications absorbed since the last `on_change`.
#[derive(Debug, Default)]
struct PushBurst {
    started_at: Option<Instant>,
    deadline: Option<Instant>,
    /// A `committed_at` moved the baseline forward.
    advanced: bool,
    /// Resources notified without `committed_at`; re-fetched before firing.
    unconfirmed: Vec<String>,
}

impl PushBurst {
    fn is_pending(&self) -> bool {
        self.advanced || !self.unconfirmed.is_empty()
    }

    fn arm(&mut self, now: Instant, config: &WatcherConfig) {
        let started_at = *self.started_at.get_or_insert(now);
        self.deadline = Some((now + config.push_debounce).min(started_at + config.push_max_wait));
    }
}

struct WatcherTask {
    id: Uuid,
    resources: Vec<WatchedResource>,
    on_change: OnChange,
    config: WatcherConfig,
    store: Arc<dyn ResourceStore>,
    feed: Option<Arc<dyn ChangeFeed>>,
    state: WatcherState,
    push: PushBurst,
    alive: Arc<AtomicBool>,
    cancel: CancellationToken,
    status: watch::Sender<WatcherStatus>,
}

impl WatcherTask {
    async fn run(mut self, mut sync_rx: broadcast::Receiver<SyncEvent>) {
        let (push_tx, mut push_rx) = mpsc::unbounded_channel();
        let mut subscriptions = Vec::new();
        let cancelled = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => true,
            _ = self.subscribe_push(&push_tx, &mut subscriptions) => false,
        };
        if cancelled {
            self.finish(subscriptions).await;
            return;
        }

        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut sync_open = true;

        loop {
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if self.poll_and_notify().await.is_break() {
                        break;
                    }
                }
                event = sync_rx.recv(), if sync_open => match event {
                    Ok(_) | Err(RecvError::Lagged(_)) => {
                        tracing::debug!(watcher_id = %self.id, "manual sync received");
                        if self.poll_and_notify().await.is_break() {
                            break;
                        }
                    }
                    Err(RecvError::Closed) => sync_open = false,
                },
                Some(notification) = push_rx.recv() => self.absorb(notification),
                _ = sleep_until(self.push.deadline.unwrap_or_else(Instant::now)), if self.push.deadline.is_some() => {
                    if self.flush_push().await.is_break() {
                        break;
                    }
                }
            }
        }

        self.finish(subscriptions).await;
    }

    async fn finish(&self, subscriptions: Vec<SubscriptionId>) {
        self.unsubscribe_push(subscriptions).await;
        self.status.send_modify(|status| status.running = false);
        tracing::debug!(watcher_id = %self.id, "watcher task finished");
    }

    /// Fills `subscriptions` as it goes so a cancelled start still unsubscribes.
    async fn subscribe_push(
        &self,
        sink: &mpsc::UnboundedSender<ChangeNotification>,
        subscriptions: &mut Vec<SubscriptionId>,
    ) {
        let Some(feed) = &self.feed else {
            return;
        };
        for resource in &self.resources {
            match feed.subscribe(&resource.name, sink.clone()).await {
                Ok(id) => subscriptions.push(id),
                Err(err) => tracing::warn!(
                    watcher_id = %self.id,
                    resource = %resource.name,
                    error = %err,
                    "push subscription failed, relying on polling"
                ),
            }
        }
    }

    async fn unsubscribe_push(&self, subscriptions: Vec<SubscriptionId>) {
        let Some(feed) = &self.feed else {
            return;
        };
        for subscription in subscriptions {
            if let Err(err) = feed.unsubscribe(subscription).await {
                tracing::warn!(watcher_id = %self.id, error = %err, "push unsubscribe failed");
            }
        }
    }

    async fn poll_and_notify(&mut self) -> ControlFlow<()> {
        let report = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return ControlFlow::Break(()),
            report = poll_once(
                self.store.as_ref(),
                &self.resources,
                &mut self.state,
                self.config.fetch_timeout,
            ) => report,
        };
        self.record_poll(&report);
        if report.has_changes() {
            self.push = PushBurst::default();
            self.notify();
        }
        ControlFlow::Continue(())
    }

    fn absorb(&mut self, notification: ChangeNotification) {
        tracing::debug!(
            watcher_id = %self.id,
            resource = %notification.resource,
            "push notification received"
        );
        match notification.committed_at {
            Some(committed_at) => {
                if self.state.record(&notification.resource, committed_at) {
                    self.push.advanced = true;
                } else {
                    tracing::debug!(
                        watcher_id = %self.id,
                        resource = %notification.resource,
                        "pushed change already known"
                    );
                }
            }
            None => {
                if !self.push.unconfirmed.contains(&notification.resource) {
                    self.push.unconfirmed.push(notification.resource);
                }
            }
        }
        if self.push.is_pending() {
            self.push.arm(Instant::now(), &self.config);
        }
    }

    /// Ends a push burst with one `on_change`. Resources notified without a commit time
    /// are re-fetched first so the next poll does not report the same change.
    async fn flush_push(&mut self) -> ControlFlow<()> {
        let burst = std::mem::take(&mut self.push);
        if !burst.unconfirmed.is_empty() {
            let resources: Vec<WatchedResource> = self
                .resources
                .iter()
                .filter(|resource| burst.unconfirmed.contains(&resource.name))
                .cloned()
                .collect();
            let report = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => return ControlFlow::Break(()),
                report = poll_once(
                    self.store.as_ref(),
                    &resources,
                    &mut self.state,
                    self.config.fetch_timeout,
                ) => report,
            };
            tracing::debug!(
                watcher_id = %self.id,
                refreshed = report.changed.len(),
                "baseline refreshed after push"
            );
        }
        self.notify();
        ControlFlow::Continue(())
    }

    fn record_poll(&self, report: &PollReport) {
        if report.skipped_offline {
            return;
        }
        self.status.send_modify(|status| {
            status.polls += 1;
            status.last_polled_at = Some(Utc::now());
        });
    }

    fn notify(&self) {
        if !self.alive.load(Ordering::SeqCst) || self.cancel.is_cancelled() {
            tracing::debug!(watcher_id = %self.id, "change discarded after teardown");
            return;
        }
        self.status.send_modify(|status| {
            status.changes_detected += 1;
            status.last_change_at = Some(Utc::now());
        });
        let on_change = &self.on_change;
        if catch_unwind(AssertUnwindSafe(|| on_change())).is_err() {
            tracing::error!(watcher_id = %self.id, "on_change panicked, watcher keeps running");
        }
    }
}
