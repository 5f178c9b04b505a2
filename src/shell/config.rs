use crate::modules::sync::core::config::{DispatcherConfig, WatcherConfig};
use crate::modules::sync::core::resource::WatchedResource;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";

const DEFAULT_RESOURCES: &[&str] = &[
    "products",
    "clients",
    "suppliers",
    "sales",
    "cash_registers",
    "cash_movements",
    "return_vouchers",
    "delivery_receipts",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a number of milliseconds, got {value:?}")]
    InvalidMillis { key: &'static str, value: String },

    #[error("{key} must be greater than zero")]
    Zero { key: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub backend_url: Option<String>,
    pub backend_key: Option<String>,
    pub watcher: WatcherConfig,
    pub dispatcher: DispatcherConfig,
    pub resources: Vec<WatchedResource>,
    pub http_addr: String,
}

impl SyncSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let defaults = WatcherConfig::default();
        let watcher = WatcherConfig {
            poll_interval: millis(&lookup, "SYNC_POLL_INTERVAL_MS", defaults.poll_interval)?,
            fetch_timeout: millis(&lookup, "SYNC_FETCH_TIMEOUT_MS", defaults.fetch_timeout)?,
            push_debounce: millis(&lookup, "SYNC_PUSH_DEBOUNCE_MS", defaults.push_debounce)?,
            push_max_wait: millis(&lookup, "SYNC_PUSH_MAX_WAIT_MS", defaults.push_max_wait)?,
        };
        let dispatcher = DispatcherConfig {
            debounce: millis(
                &lookup,
                "SYNC_MANUAL_DEBOUNCE_MS",
                DispatcherConfig::default().debounce,
            )?,
        };

        let resources = match non_blank("SYNC_RESOURCES") {
            Some(list) => list.split(',').filter_map(WatchedResource::parse).collect(),
            None => DEFAULT_RESOURCES
                .iter()
                .copied()
                .map(WatchedResource::from)
                .collect(),
        };

        Ok(Self {
            backend_url: non_blank("SYNC_BACKEND_URL"),
            backend_key: non_blank("SYNC_BACKEND_KEY"),
            watcher,
            dispatcher,
            resources,
            http_addr: non_blank("SYNC_HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
        })
    }

    /// URL and key of the hosted backend, when both are set.
    pub fn backend(&self) -> Option<(&str, &str)> {
        match (&self.backend_url, &self.backend_key) {
            (Some(url), Some(key)) => Some((url.as_str(), key.as_str())),
            _ => None,
        }
    }
}

fn millis<F>(lookup: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key).filter(|value| !value.trim().is_empty()) else {
        return Ok(default);
    };
    let value: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidMillis {
        key,
        value: raw.clone(),
    })?;
    if value == 0 {
        return Err(ConfigError::Zero { key });
    }
    Ok(Duration::from_millis(value))
}
