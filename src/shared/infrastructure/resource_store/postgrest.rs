use crate::modules::sync::core::resource::{Timestamp, WatchedResource};
use crate::shared::infrastructure::resource_store::{ResourceStore, ResourceStoreError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};

/// Reads the newest timestamp of a table exposed through a PostgREST-style REST endpoint.
#[derive(Debug, Clone)]
pub struct PostgrestResourceStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PostgrestResourceStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, resource: &WatchedResource) -> String {
        format!("{}/rest/v1/{}", self.base_url, resource.name)
    }
}

#[async_trait]
impl ResourceStore for PostgrestResourceStore {
    async fn latest_timestamp(
        &self,
        resource: &WatchedResource,
    ) -> Result<Option<Timestamp>, ResourceStoreError> {
        let field = resource.timestamp_field.as_str();
        let response = self
            .client
            .get(self.endpoint(resource))
            .query(&[
                ("select", field.to_string()),
                ("order", format!("{field}.desc.nullslast")),
                ("limit", "1".to_string()),
            ])
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|err| ResourceStoreError::Unreachable(err.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ResourceStoreError::NotFound(resource.name.clone())),
            status if !status.is_success() => {
                return Err(ResourceStoreError::Unreachable(format!(
                    "{} answered {status}",
                    resource.name
                )));
            }
            _ => {}
        }

        let rows: Vec<Map<String, Value>> = response
            .json()
            .await
            .map_err(|err| ResourceStoreError::Decode(err.to_string()))?;

        match rows.first().and_then(|row| row.get(field)) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(raw)) => parse_timestamp(raw).map(Some),
            Some(other) => Err(ResourceStoreError::Decode(format!(
                "{field} is not a timestamp: {other}"
            ))),
        }
    }
}

/// Accepts RFC 3339 (`timestamptz`) and zone-less (`timestamp`) values, the latter read as UTC.
fn parse_timestamp(raw: &str) -> Result<Timestamp, ResourceStoreError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| naive.and_utc())
        .map_err(|err| ResourceStoreError::Decode(format!("{raw}: {err}")))
}
