use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::{
    errors::SnapshotError,
    models::{PlayerId, SnapshotDocument},
    repository::SnapshotCache,
    upstream::{UpstreamApi, UpstreamResponse},
};

/// Snapshots stay cached for half an hour
pub const DEFAULT_SNAPSHOT_TTL: Duration = Duration::from_secs(30 * 60);

/// Result of a snapshot lookup.
///
/// `NotFound` covers both an identifier the upstream rejected and an
/// upstream that could not be reached; callers should offer a retry.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Found(Arc<SnapshotDocument>),
    NotFound,
}

impl FetchOutcome {
    pub fn into_option(self) -> Option<Arc<SnapshotDocument>> {
        match self {
            FetchOutcome::Found(document) => Some(document),
            FetchOutcome::NotFound => None,
        }
    }
}

/// Cache-aside access to player snapshots
pub struct SnapshotService {
    cache: Arc<dyn SnapshotCache>,
    upstream: Arc<dyn UpstreamApi>,
    ttl: Duration,
}

impl SnapshotService {
    pub fn new(cache: Arc<dyn SnapshotCache>, upstream: Arc<dyn UpstreamApi>) -> Self {
        Self::with_ttl(cache, upstream, DEFAULT_SNAPSHOT_TTL)
    }

    pub fn with_ttl(
        cache: Arc<dyn SnapshotCache>,
        upstream: Arc<dyn UpstreamApi>,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            upstream,
            ttl,
        }
    }

    /// Returns the snapshot for `player_id`, going upstream only on a cache miss.
    ///
    /// Invalid identifiers are never cached. Every error is logged and
    /// reported as `NotFound`.
    #[instrument(skip(self), fields(player_id = %player_id))]
    pub async fn fetch(&self, player_id: &PlayerId) -> FetchOutcome {
        match self.try_fetch(player_id).await {
            Ok(Some(document)) => FetchOutcome::Found(document),
            Ok(None) => {
                info!("Upstream rejected player id");
                FetchOutcome::NotFound
            }
            Err(error) => {
                warn!(error = %error, "Snapshot fetch failed");
                FetchOutcome::NotFound
            }
        }
    }

    async fn try_fetch(
        &self,
        player_id: &PlayerId,
    ) -> Result<Option<Arc<SnapshotDocument>>, SnapshotError> {
        let key = player_id.cache_key();

        match self.cache.get(&key).await {
            Ok(Some(payload)) => {
                debug!("Serving snapshot from cache");
                let document: SnapshotDocument = serde_json::from_str(&payload)?;
                return Ok(Some(Arc::new(document)));
            }
            Ok(None) => debug!("Snapshot not cached"),
            Err(error) => warn!(error = %error, "Snapshot cache read failed; going upstream"),
        }

        let payload = match self.upstream.fetch_snapshot(player_id).await? {
            UpstreamResponse::InvalidIdentifier => return Ok(None),
            UpstreamResponse::Payload(payload) => payload,
        };

        let document: SnapshotDocument = serde_json::from_str(&payload)?;

        if let Err(error) = self.cache.set(&key, &payload, self.ttl).await {
            warn!(error = %error, "Failed to store snapshot in cache");
        } else {
            info!(
                ttl_secs = self.ttl.as_secs(),
                characters = document.characters.len(),
                "Snapshot fetched from upstream and cached"
            );
        }

        Ok(Some(Arc::new(document)))
    }
}
