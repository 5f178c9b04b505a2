use crate::modules::sync::core::resource::Timestamp;
use serde::{Deserialize, Serialize};

/// Broadcast request to re-check every watched resource now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEvent {
    pub requested_at: Option<Timestamp>,
}

impl SyncEvent {
    pub fn now() -> Self {
        Self {
            requested_at: Some(chrono::Utc::now()),
        }
    }
}

/// "A row in `resource` changed", as delivered by a change feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    pub resource: String,
    pub committed_at: Option<Timestamp>,
}

impl ChangeNotification {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            committed_at: None,
        }
    }

    pub fn at(resource: impl Into<String>, committed_at: Timestamp) -> Self {
        Self {
            resource: resource.into(),
            committed_at: Some(committed_at),
        }
    }
}
