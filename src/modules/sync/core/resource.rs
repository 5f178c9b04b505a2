use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Modification-time column most tables of the retail backend carry.
pub const DEFAULT_TIMESTAMP_FIELD: &str = "updated_at";

pub type Timestamp = DateTime<Utc>;

/// A named collection in the backend plus the column that marks its last modification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchedResource {
    pub name: String,
    pub timestamp_field: String,
}

impl WatchedResource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            timestamp_field: DEFAULT_TIMESTAMP_FIELD.to_string(),
        }
    }

    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }

    /// Parses `name` or `name:field`. Blank input yields `None`.
    pub fn parse(descriptor: &str) -> Option<Self> {
        let descriptor = descriptor.trim();
        if descriptor.is_empty() {
            return None;
        }
        match descriptor.split_once(':') {
            Some((name, field)) if !name.trim().is_empty() && !field.trim().is_empty() => {
                Some(Self::new(name.trim()).with_timestamp_field(field.trim()))
            }
            Some((name, _)) if !name.trim().is_empty() => Some(Self::new(name.trim())),
            Some(_) => None,
            None => Some(Self::new(descriptor)),
        }
    }
}

impl From<&str> for WatchedResource {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for WatchedResource {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Collapses duplicate names, keeping the first descriptor seen for each.
pub fn dedup_resources<I, R>(resources: I) -> Vec<WatchedResource>
where
    I: IntoIterator<Item = R>,
    R: Into<WatchedResource>,
{
    let mut out: Vec<WatchedResource> = Vec::new();
    for resource in resources.into_iter().map(Into::into) {
        if !out.iter().any(|r| r.name == resource.name) {
            out.push(resource);
        }
    }
    out
}
