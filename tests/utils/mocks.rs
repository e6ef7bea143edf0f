use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use hsr_card::assets::{MirrorBackend, MirrorError, SyncResult};
use hsr_card::scoring::{WeightError, WeightSource};
use hsr_card::snapshot::{PlayerId, SnapshotError, UpstreamApi, UpstreamResponse};

// ============================================================================
// Mock Infrastructure
// ============================================================================

/// Serves canned documents and records every request it receives
#[derive(Clone)]
pub struct MockUpstream {
    documents: Arc<RwLock<HashMap<String, String>>>,
    requests: Arc<RwLock<Vec<String>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn add_player(&self, player_id: &str, document: String) {
        self.documents
            .write()
            .await
            .insert(player_id.to_string(), document);
    }

    pub async fn request_count(&self, player_id: &str) -> usize {
        self.requests
            .read()
            .await
            .iter()
            .filter(|id| id.as_str() == player_id)
            .count()
    }
}

#[async_trait]
impl UpstreamApi for MockUpstream {
    async fn fetch_snapshot(&self, player_id: &PlayerId) -> Result<UpstreamResponse, SnapshotError> {
        self.requests.write().await.push(player_id.to_string());
        match self.documents.read().await.get(player_id.as_str()) {
            Some(document) => Ok(UpstreamResponse::Payload(document.clone())),
            None => Ok(UpstreamResponse::InvalidIdentifier),
        }
    }
}

/// Weight source whose document can be swapped between refreshes
#[derive(Clone)]
pub struct MockWeightSource {
    document: Arc<RwLock<Option<String>>>,
}

impl MockWeightSource {
    pub fn new() -> Self {
        Self {
            document: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_document(&self, document: &str) {
        *self.document.write().await = Some(document.to_string());
    }
}

#[async_trait]
impl WeightSource for MockWeightSource {
    async fn fetch_document(&self) -> Result<String, WeightError> {
        self.document
            .read()
            .await
            .clone()
            .ok_or_else(|| WeightError::Fetch("score table host unreachable".to_string()))
    }
}

/// Mirror backend that creates an empty checkout
pub struct LocalMirrorBackend;

impl MirrorBackend for LocalMirrorBackend {
    fn clone_into(&self, _url: &str, dest: &Path) -> Result<SyncResult, MirrorError> {
        std::fs::create_dir_all(dest)?;
        Ok(SyncResult::Cloned)
    }

    fn pull(&self, _dest: &Path) -> Result<SyncResult, MirrorError> {
        Ok(SyncResult::UpToDate)
    }
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for MockWeightSource {
    fn default() -> Self {
        Self::new()
    }
}
