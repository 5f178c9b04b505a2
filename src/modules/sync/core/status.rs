use crate::modules::sync::core::resource::Timestamp;
use serde::Serialize;
use uuid::Uuid;

/// Snapshot a watcher publishes after every poll and every notification, used to render
/// a "last synced" indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatcherStatus {
    pub watcher_id: Uuid,
    pub resources: Vec<String>,
    pub running: bool,
    pub polls: u64,
    pub changes_detected: u64,
    pub last_polled_at: Option<Timestamp>,
    pub last_change_at: Option<Timestamp>,
}

impl WatcherStatus {
    pub fn new(watcher_id: Uuid, resources: Vec<String>, running: bool) -> Self {
        Self {
            watcher_id,
            resources,
            running,
            polls: 0,
            changes_detected: 0,
            last_polled_at: None,
            last_change_at: None,
        }
    }
}
