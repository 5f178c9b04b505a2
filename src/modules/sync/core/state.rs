// Last-seen timestamps of one watcher.
//
// Baseline policy
// - The first successful observation of a resource only seeds its baseline, even when the
//   resource is empty. A key present in the map means "seeded".
// - After seeding, a resource changed iff the fetched value is Some and differs from the
//   stored one. A fetched None never counts as a change and keeps the stored value.

use crate::modules::sync::core::resource::Timestamp;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Seeded,
    Unchanged,
    Changed,
}

#[derive(Debug, Default, Clone)]
pub struct WatcherState {
    last_seen: HashMap<String, Option<Timestamp>>,
}

impl WatcherState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, resource: &str, fetched: Option<Timestamp>) -> Observation {
        match self.last_seen.get_mut(resource) {
            None => {
                self.last_seen.insert(resource.to_string(), fetched);
                Observation::Seeded
            }
            Some(stored) => match fetched {
                Some(ts) if *stored != Some(ts) => {
                    *stored = Some(ts);
                    Observation::Changed
                }
                _ => Observation::Unchanged,
            },
        }
    }

    /// Stores a timestamp learned from a push notification so the next poll does not
    /// report the same change again. Never moves a seeded value backwards.
    ///
    /// Returns `false` when the baseline already covers `committed_at`.
    pub fn record(&mut self, resource: &str, committed_at: Timestamp) -> bool {
        let entry = self.last_seen.entry(resource.to_string()).or_insert(None);
        match *entry {
            Some(stored) if stored >= committed_at => false,
            _ => {
                *entry = Some(committed_at);
                true
            }
        }
    }

    pub fn last_seen(&self, resource: &str) -> Option<Timestamp> {
        self.last_seen.get(resource).copied().flatten()
    }

    pub fn is_seeded(&self, resource: &str) -> bool {
        self.last_seen.contains_key(resource)
    }
}
