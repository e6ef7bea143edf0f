use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::FromRedisValue;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument, warn};

use super::errors::SnapshotError;

/// Key-value store holding serialized snapshots with a time-to-live.
///
/// Expiry is the store's responsibility: once the TTL has passed `get`
/// must behave as if the key was never written.
#[async_trait]
pub trait SnapshotCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SnapshotError>;
    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), SnapshotError>;
}

#[derive(Debug, Clone)]
struct CachedPayload {
    payload: String,
    expires_at: DateTime<Utc>,
}

/// Process-local snapshot cache for development and testing.
///
/// Expired entries are dropped when a read finds them and swept on every
/// write, so the map holds at most the keys written within one TTL.
pub struct InMemorySnapshotCache {
    entries: RwLock<HashMap<String, CachedPayload>>,
}

impl Default for InMemorySnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySnapshotCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored entries, including ones that expired since the last write
    pub async fn entry_count(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn contains_key(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl SnapshotCache for InMemorySnapshotCache {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => {
                    debug!(key = %key, "Snapshot cache hit in memory");
                    return Ok(Some(entry.payload.clone()));
                }
                Some(_) => {}
                None => {
                    debug!(key = %key, "Snapshot cache miss in memory");
                    return Ok(None);
                }
            }
        }

        let mut entries = self.entries.write().await;
        if entries
            .get(key)
            .is_some_and(|entry| entry.expires_at <= now)
        {
            entries.remove(key);
            debug!(key = %key, "Expired snapshot evicted from memory");
        }
        Ok(None)
    }

    #[instrument(skip(self, payload))]
    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), SnapshotError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| SnapshotError::Cache(format!("invalid ttl: {}", e)))?;
        let now = Utc::now();
        let entry = CachedPayload {
            payload: payload.to_string(),
            expires_at: now + ttl,
        };

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, cached| cached.expires_at > now);
        let swept = before - entries.len();
        if swept > 0 {
            debug!(swept, "Expired snapshots swept from memory");
        }
        entries.insert(key.to_string(), entry);
        debug!(key = %key, ttl_secs = ttl.num_seconds(), "Snapshot stored in memory");
        Ok(())
    }
}

/// Redis-backed snapshot cache, expiry handled by `SETEX`
pub struct RedisSnapshotCache {
    client: redis::Client,
    connection: Arc<Mutex<Option<redis::aio::MultiplexedConnection>>>,
}

impl RedisSnapshotCache {
    pub fn new(url: &str) -> Result<Self, SnapshotError> {
        let client = redis::Client::open(url)
            .map_err(|e| SnapshotError::Cache(format!("invalid redis url {}: {}", url, e)))?;
        Ok(Self {
            client,
            connection: Arc::new(Mutex::new(None)),
        })
    }

    async fn ensure_connection(
        &self,
        connection: &mut Option<redis::aio::MultiplexedConnection>,
    ) -> Result<(), SnapshotError> {
        if connection.is_some() {
            return Ok(());
        }
        *connection = Some(self.client.get_multiplexed_async_connection().await?);
        debug!("Redis snapshot cache connected");
        Ok(())
    }

    /// Runs a command, reconnecting and retrying once if it fails
    async fn run_command<T, F>(&self, operation: &'static str, build: F) -> Result<T, SnapshotError>
    where
        T: FromRedisValue + Send,
        F: Fn() -> redis::Cmd,
    {
        let mut last_error: Option<SnapshotError> = None;
        for attempt in 0..2 {
            let mut conn_guard = self.connection.lock().await;
            self.ensure_connection(&mut conn_guard).await?;
            let conn = conn_guard
                .as_mut()
                .ok_or_else(|| SnapshotError::Cache("redis connection unavailable".to_string()))?;
            let result: redis::RedisResult<T> = build().query_async(conn).await;
            match result {
                Ok(value) => return Ok(value),
                Err(error) => {
                    warn!(
                        operation,
                        attempt = attempt + 1,
                        error = %error,
                        "Redis snapshot cache command failed; reconnecting"
                    );
                    *conn_guard = None;
                    last_error = Some(error.into());
                }
            }
        }
        Err(last_error
            .unwrap_or_else(|| SnapshotError::Cache("redis command failed".to_string())))
    }
}

#[async_trait]
impl SnapshotCache for RedisSnapshotCache {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, SnapshotError> {
        let key = key.to_string();
        let payload: Option<String> = self
            .run_command("snapshot_cache_get", move || {
                let mut cmd = redis::cmd("GET");
                cmd.arg(&key);
                cmd
            })
            .await?;
        debug!(hit = payload.is_some(), "Snapshot cache lookup in redis");
        Ok(payload)
    }

    #[instrument(skip(self, payload))]
    async fn set(&self, key: &str, payload: &str, ttl: Duration) -> Result<(), SnapshotError> {
        let key = key.to_string();
        let payload = payload.to_string();
        let ttl_secs = ttl.as_secs().max(1);
        let _: () = self
            .run_command("snapshot_cache_set", move || {
                let mut cmd = redis::cmd("SETEX");
                cmd.arg(&key).arg(ttl_secs).arg(&payload);
                cmd
            })
            .await?;
        debug!(ttl_secs, "Snapshot stored in redis");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get_snapshot() {
        let cache = InMemorySnapshotCache::new();

        cache
            .set("hsr:1", "{\"a\":1}", Duration::from_secs(60))
            .await
            .unwrap();

        let payload = cache.get("hsr:1").await.unwrap();
        assert_eq!(payload.as_deref(), Some("{\"a\":1}"));
    }

    #[tokio::test]
    async fn test_get_missing_key() {
        let cache = InMemorySnapshotCache::new();

        assert!(cache.get("hsr:missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entry_is_not_returned() {
        let cache = InMemorySnapshotCache::new();

        cache
            .set("hsr:1", "payload", Duration::from_millis(5))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(cache.get("hsr:1").await.unwrap().is_none());
        assert!(!cache.contains_key("hsr:1").await);
    }

    #[tokio::test]
    async fn test_set_overwrites_previous_payload() {
        let cache = InMemorySnapshotCache::new();

        cache.set("hsr:1", "old", Duration::from_secs(60)).await.unwrap();
        cache.set("hsr:1", "new", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("hsr:1").await.unwrap().as_deref(), Some("new"));
        assert_eq!(cache.entry_count().await, 1);
    }

    #[tokio::test]
    async fn test_write_sweeps_expired_entries() {
        let cache = InMemorySnapshotCache::new();

        for i in 0..100 {
            cache
                .set(&format!("hsr:{}", i), "payload", Duration::from_millis(1))
                .await
                .unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache
            .set("hsr:fresh", "payload", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(cache.entry_count().await, 1);
        assert!(cache.contains_key("hsr:fresh").await);
    }

    #[test]
    fn test_redis_cache_rejects_invalid_url() {
        let result = RedisSnapshotCache::new("not a url");
        assert!(matches!(result, Err(SnapshotError::Cache(_))));
    }
}
