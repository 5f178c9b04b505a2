use crate::modules::sync::use_cases::watch_resources::watcher::OnChange;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts on_change invocations across clones.
#[derive(Clone, Default)]
pub struct CallCounter {
    calls: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn on_change(&self) -> OnChange {
        let calls = self.calls.clone();
        Arc::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    }

    /// Counts, then panics, like a consumer whose refresh blew up.
    pub fn on_change_panicking(&self) -> OnChange {
        let calls = self.calls.clone();
        Arc::new(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            panic!("refresh failed");
        })
    }
}
