// In memory implementation of the ResourceStore port.
//
// Purpose
// - Drive watcher tests and local development without a hosted backend.
//
// Responsibilities
// - Keep the newest timestamp per resource.
// - Simulate an unreachable backend, an offline network, slow responses and
//   per-resource failures.
// - Count fetches so tests can assert that no call was made.

use crate::modules::sync::core::resource::{Timestamp, WatchedResource};
use crate::shared::infrastructure::resource_store::{ResourceStore, ResourceStoreError};
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryResourceStore {
    latest: RwLock<HashMap<String, Option<Timestamp>>>,
    failing: RwLock<HashSet<String>>,
    slow: RwLock<HashMap<String, u64>>,
    is_offline: AtomicBool,
    network_down: AtomicBool,
    delay_ms: AtomicU64,
    fetches: AtomicUsize,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_resources(names: &[&str]) -> Self {
        let store = Self::new();
        for name in names {
            store.set_latest(name, None).await;
        }
        store
    }

    pub async fn set_latest(&self, resource: &str, latest: Option<Timestamp>) {
        self.latest
            .write()
            .await
            .insert(resource.to_string(), latest);
    }

    /// Simulates a write to `resource` and returns its new timestamp. Always strictly
    /// greater than the previous one.
    pub async fn touch(&self, resource: &str) -> Timestamp {
        let mut guard = self.latest.write().await;
        let previous = guard.get(resource).copied().flatten();
        let now = Utc::now();
        let next = match previous {
            Some(previous) if now <= previous => previous + ChronoDuration::milliseconds(1),
            _ => now,
        };
        guard.insert(resource.to_string(), Some(next));
        next
    }

    pub async fn remove(&self, resource: &str) {
        self.latest.write().await.remove(resource);
    }

    pub async fn set_failing(&self, resource: &str, failing: bool) {
        let mut guard = self.failing.write().await;
        if failing {
            guard.insert(resource.to_string());
        } else {
            guard.remove(resource);
        }
    }

    pub fn toggle_offline(&self) {
        self.is_offline.fetch_xor(true, Ordering::SeqCst);
    }

    pub fn set_network_online(&self, online: bool) {
        self.network_down.store(!online, Ordering::SeqCst);
    }

    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    /// Delays answers for one resource. The larger of this and the global delay applies.
    pub async fn set_resource_delay_ms(&self, resource: &str, delay_ms: u64) {
        self.slow
            .write()
            .await
            .insert(resource.to_string(), delay_ms);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn latest_timestamp(
        &self,
        resource: &WatchedResource,
    ) -> Result<Option<Timestamp>, ResourceStoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let resource_delay_ms = self
            .slow
            .read()
            .await
            .get(&resource.name)
            .copied()
            .unwrap_or(0);
        let delay_ms = self.delay_ms.load(Ordering::SeqCst).max(resource_delay_ms);
        if delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }

        if self.is_offline.load(Ordering::SeqCst) {
            return Err(ResourceStoreError::Unreachable("Resource store offline".into()));
        }
        if self.failing.read().await.contains(&resource.name) {
            return Err(ResourceStoreError::Unreachable(format!(
                "{} is failing",
                resource.name
            )));
        }

        self.latest
            .read()
            .await
            .get(&resource.name)
            .copied()
            .ok_or_else(|| ResourceStoreError::NotFound(resource.name.clone()))
    }

    fn is_online(&self) -> bool {
        !self.network_down.load(Ordering::SeqCst)
    }
}
