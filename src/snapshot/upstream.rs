use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::errors::SnapshotError;
use super::models::PlayerId;

/// What the upstream said about an identifier
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamResponse {
    /// Raw snapshot json, not yet decoded
    Payload(String),
    InvalidIdentifier,
}

#[async_trait]
pub trait UpstreamApi: Send + Sync {
    async fn fetch_snapshot(&self, player_id: &PlayerId) -> Result<UpstreamResponse, SnapshotError>;
}

/// Returns true for the structured "invalid id" error body.
///
/// The upstream answers unknown ids with an object carrying a `detail`
/// message and no `player` section.
pub fn is_invalid_identifier_body(body: &str) -> bool {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map.contains_key("detail") && !map.contains_key("player"),
        _ => false,
    }
}

/// HTTP client for `GET {base}/sr_info_parsed/{id}?lang={lang}`
pub struct HttpUpstreamApi {
    client: reqwest::Client,
    base_url: String,
    lang: String,
}

impl HttpUpstreamApi {
    pub fn new(client: reqwest::Client, base_url: &str, lang: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            lang: lang.to_string(),
        }
    }

    fn snapshot_url(&self, player_id: &PlayerId) -> String {
        format!("{}/sr_info_parsed/{}", self.base_url, player_id)
    }
}

#[async_trait]
impl UpstreamApi for HttpUpstreamApi {
    #[instrument(skip(self), fields(player_id = %player_id))]
    async fn fetch_snapshot(&self, player_id: &PlayerId) -> Result<UpstreamResponse, SnapshotError> {
        let response = self
            .client
            .get(self.snapshot_url(player_id))
            .query(&[("lang", self.lang.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if is_invalid_identifier_body(&body) {
            debug!(status = status.as_u16(), "Upstream reported invalid identifier");
            return Ok(UpstreamResponse::InvalidIdentifier);
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), "Upstream returned an error status");
            return Err(SnapshotError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        debug!(bytes = body.len(), "Upstream snapshot received");
        Ok(UpstreamResponse::Payload(body))
    }
}
