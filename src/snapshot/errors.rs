use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("Snapshot decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for SnapshotError {
    fn from(error: reqwest::Error) -> Self {
        SnapshotError::Transport(error.to_string())
    }
}

impl From<redis::RedisError> for SnapshotError {
    fn from(error: redis::RedisError) -> Self {
        SnapshotError::Cache(error.to_string())
    }
}
