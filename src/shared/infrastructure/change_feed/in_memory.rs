// In process publish/subscribe keyed by resource name.
//
// Used as the change feed of the binary (fed by the inbound webhook) and in tests.

use crate::modules::sync::core::events::ChangeNotification;
use crate::shared::infrastructure::change_feed::{ChangeFeed, ChangeFeedError, SubscriptionId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

struct Listener {
    id: SubscriptionId,
    sink: UnboundedSender<ChangeNotification>,
}

#[derive(Default)]
pub struct InMemoryChangeFeed {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
    is_offline: AtomicBool,
}

impl InMemoryChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    /// Fans a notification out to every listener of its resource. Returns how many
    /// listeners received it.
    pub async fn publish(&self, notification: ChangeNotification) -> usize {
        let mut guard = self.listeners.write().await;
        let Some(listeners) = guard.get_mut(&notification.resource) else {
            return 0;
        };
        listeners.retain(|listener| listener.sink.send(notification.clone()).is_ok());
        let delivered = listeners.len();
        if listeners.is_empty() {
            guard.remove(&notification.resource);
        }
        delivered
    }

    pub async fn listener_count(&self, resource: &str) -> usize {
        self.listeners
            .read()
            .await
            .get(resource)
            .map(Vec::len)
            .unwrap_or(0)
    }

    pub async fn total_listeners(&self) -> usize {
        self.listeners.read().await.values().map(Vec::len).sum()
    }
}

#[async_trait::async_trait]
impl ChangeFeed for InMemoryChangeFeed {
    async fn subscribe(
        &self,
        resource: &str,
        sink: UnboundedSender<ChangeNotification>,
    ) -> Result<SubscriptionId, ChangeFeedError> {
        if self.is_offline.load(Ordering::SeqCst) {
            return Err(ChangeFeedError::Unavailable("Change feed offline".into()));
        }
        let id = SubscriptionId::new();
        self.listeners
            .write()
            .await
            .entry(resource.to_string())
            .or_default()
            .push(Listener { id, sink });
        Ok(id)
    }

    async fn unsubscribe(&self, subscription: SubscriptionId) -> Result<(), ChangeFeedError> {
        let mut guard = self.listeners.write().await;
        let mut found = false;
        guard.retain(|_, listeners| {
            let before = listeners.len();
            listeners.retain(|listener| listener.id != subscription);
            found |= listeners.len() != before;
            !listeners.is_empty()
        });
        if found {
            Ok(())
        } else {
            Err(ChangeFeedError::UnknownSubscription(subscription))
        }
    }
}
