pub mod task;

pub use task::{start_refresh_task, RefreshConfig, RefreshCoordinator, RefreshOutcome};
