// Port for push-style "a row in this resource changed" notifications.
//
// Responsibilities
// - Deliver notifications for one resource into the sink handed over on subscribe.
// - Stop delivering once unsubscribed. A closed sink may be pruned silently.

use crate::modules::sync::core::events::ChangeNotification;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub Uuid);

impl SubscriptionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChangeFeedError {
    #[error("change feed unavailable: {0}")]
    Unavailable(String),

    #[error("unknown subscription {0}")]
    UnknownSubscription(SubscriptionId),
}

#[async_trait]
pub trait ChangeFeed: Send + Sync {
    async fn subscribe(
        &self,
        resource: &str,
        sink: UnboundedSender<ChangeNotification>,
    ) -> Result<SubscriptionId, ChangeFeedError>;

    async fn unsubscribe(&self, subscription: SubscriptionId) -> Result<(), ChangeFeedError>;
}

pub mod in_memory;
