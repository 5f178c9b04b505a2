// Port for reading the staleness marker of a backend collection.
//
// Purpose
// - Answer "what is the most recent timestamp in this resource?" without the watcher
//   knowing how the backend is reached.
//
// Boundaries
// - Never returns domain rows. Only the single newest timestamp, or None when empty.
// - Implementations must be cancel safe: the watcher drops in-flight calls on teardown
//   and on timeout.

use crate::modules::sync::core::resource::{Timestamp, WatchedResource};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResourceStoreError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("backend unreachable: {0}")]
    Unreachable(String),

    #[error("could not decode response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn latest_timestamp(
        &self,
        resource: &WatchedResource,
    ) -> Result<Option<Timestamp>, ResourceStoreError>;

    /// Whether the network is up at all. When false the watcher skips the whole cycle.
    fn is_online(&self) -> bool {
        true
    }
}

pub mod in_memory;
pub mod postgrest;
