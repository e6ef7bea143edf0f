pub mod handlers;
pub mod service;
pub mod types;

pub use handlers::report_routes;
pub use service::{ReportOutcome, ReportService, ScoredReport, UnavailableReason};
pub use types::{CharacterEntry, CharacterReportResponse, PlayerResponse};
