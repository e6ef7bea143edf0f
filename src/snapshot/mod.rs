pub mod errors;
pub mod models;
pub mod repository;
pub mod service;
pub mod upstream;

pub use errors::SnapshotError;
pub use models::*;
pub use repository::{InMemorySnapshotCache, RedisSnapshotCache, SnapshotCache};
pub use service::{FetchOutcome, SnapshotService, DEFAULT_SNAPSHOT_TTL};
pub use upstream::{HttpUpstreamApi, UpstreamApi, UpstreamResponse};
