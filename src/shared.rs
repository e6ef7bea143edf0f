use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::refresh::RefreshCoordinator;
use crate::report::ReportService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub report_service: Arc<ReportService>,
    pub refresh_coordinator: Arc<RefreshCoordinator>,
}

impl AppState {
    pub fn new(
        report_service: Arc<ReportService>,
        refresh_coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            report_service,
            refresh_coordinator,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Conflict: {0}")]
    Conflict(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
