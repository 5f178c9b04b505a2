use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5_000);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_PUSH_DEBOUNCE: Duration = Duration::from_millis(100);
pub const DEFAULT_PUSH_MAX_WAIT: Duration = Duration::from_millis(1_000);
pub const DEFAULT_MANUAL_DEBOUNCE: Duration = Duration::from_millis(1_000);

/// Timing knobs of a single watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherConfig {
    pub poll_interval: Duration,
    /// Upper bound for one `latest_timestamp` call.
    pub fetch_timeout: Duration,
    /// Quiet period after the last push notification before `on_change` runs.
    pub push_debounce: Duration,
    /// Longest a continuous push burst may hold back `on_change`.
    pub push_max_wait: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            push_debounce: DEFAULT_PUSH_DEBOUNCE,
            push_max_wait: DEFAULT_PUSH_MAX_WAIT,
        }
    }
}

impl WatcherConfig {
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_fetch_timeout(mut self, fetch_timeout: Duration) -> Self {
        self.fetch_timeout = fetch_timeout;
        self
    }

    pub fn with_push_debounce(mut self, push_debounce: Duration) -> Self {
        self.push_debounce = push_debounce;
        self
    }

    pub fn with_push_max_wait(mut self, push_max_wait: Duration) -> Self {
        self.push_max_wait = push_max_wait;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Window in which repeated manual triggers collapse into one trailing pass.
    pub debounce: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_MANUAL_DEBOUNCE,
        }
    }
}
