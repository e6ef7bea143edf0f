// Library crate for the relic card service
// This file exposes the public API for integration tests

pub mod assets;
pub mod config;
pub mod refresh;
pub mod render;
pub mod report;
pub mod scoring;
pub mod shared;
pub mod snapshot;

// Re-export commonly used types for easier access in tests
pub use assets::{AssetMirror, GitMirrorBackend, MirrorBackend, MirrorState};
pub use config::AppConfig;
pub use refresh::{start_refresh_task, RefreshConfig, RefreshCoordinator, RefreshOutcome};
pub use render::{CardCompositor, Typeface};
pub use report::{report_routes, ReportOutcome, ReportService, UnavailableReason};
pub use scoring::{score_character, AffixWeightTable, Rank, ScoreTableProvider, WeightEntry};
pub use shared::{AppError, AppState};
pub use snapshot::{FetchOutcome, PlayerId, SnapshotService};
