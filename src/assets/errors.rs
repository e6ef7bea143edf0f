use thiserror::Error;

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Merge left conflicts in {0}")]
    Conflict(String),

    #[error("Sync task failed: {0}")]
    Join(String),
}
