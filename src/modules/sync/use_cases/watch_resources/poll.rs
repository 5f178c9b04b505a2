// One poll step: fetch the newest timestamp of every watched resource and fold the
// results into the watcher state.
//
// Failures never escape. An unreachable, missing or slow resource is skipped for this
// cycle only; an offline network skips the whole cycle.

use crate::modules::sync::core::resource::WatchedResource;
use crate::modules::sync::core::state::{Observation, WatcherState};
use crate::shared::infrastructure::resource_store::ResourceStore;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub seeded: Vec<String>,
    pub changed: Vec<String>,
    pub unchanged: Vec<String>,
    pub failed: Vec<String>,
    pub skipped_offline: bool,
}

impl PollReport {
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

pub async fn poll_once(
    store: &dyn ResourceStore,
    resources: &[WatchedResource],
    state: &mut WatcherState,
    fetch_timeout: Duration,
) -> PollReport {
    let mut report = PollReport::default();

    if !store.is_online() {
        tracing::debug!("network offline, skipping poll cycle");
        report.skipped_offline = true;
        return report;
    }

    for resource in resources {
        let name = resource.name.clone();
        match timeout(fetch_timeout, store.latest_timestamp(resource)).await {
            Ok(Ok(latest)) => match state.observe(&name, latest) {
                Observation::Seeded => report.seeded.push(name),
                Observation::Unchanged => report.unchanged.push(name),
                Observation::Changed => {
                    tracing::debug!(resource = %name, latest = ?latest, "resource changed");
                    report.changed.push(name);
                }
            },
            Ok(Err(err)) => {
                tracing::warn!(resource = %name, error = %err, "skipping resource this cycle");
                report.failed.push(name);
            }
            Err(_) => {
                tracing::warn!(
                    resource = %name,
                    timeout_ms = fetch_timeout.as_millis() as u64,
                    "fetch timed out, skipping resource this cycle"
                );
                report.failed.push(name);
            }
        }
    }

    report
}
