use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::service::{ReportOutcome, ReportService};
use super::types::{CharacterReportResponse, PlayerResponse};
use crate::refresh::RefreshOutcome;
use crate::shared::{AppError, AppState};
use crate::snapshot::{CharacterSnapshot, FetchOutcome, PlayerId, SnapshotDocument};

pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/players/:player_id", get(get_player))
        .route("/players/:player_id/characters/:index", get(get_character_report))
        .route(
            "/players/:player_id/characters/:index/card.jpg",
            get(get_character_card),
        )
        .route("/admin/refresh", post(trigger_refresh))
}

async fn load_document(
    state: &AppState,
    raw_player_id: &str,
) -> Result<(PlayerId, Arc<SnapshotDocument>), AppError> {
    let player_id = PlayerId::parse(raw_player_id)?;
    match state.report_service.fetch_snapshot(&player_id).await {
        FetchOutcome::Found(document) => Ok((player_id, document)),
        FetchOutcome::NotFound => Err(AppError::NotFound(format!(
            "No data for player {}; check the id and try again in a moment",
            player_id
        ))),
    }
}

fn character_at(
    document: &SnapshotDocument,
    player_id: &PlayerId,
    index: usize,
) -> Result<CharacterSnapshot, AppError> {
    document.characters.get(index).cloned().ok_or_else(|| {
        AppError::NotFound(format!(
            "Player {} has no showcased character at index {}",
            player_id, index
        ))
    })
}

/// GET /players/:player_id
#[instrument(name = "get_player", skip(state))]
pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<PlayerResponse>, AppError> {
    let (_, document) = load_document(&state, &player_id).await?;
    let summary = ReportService::player_summary(&document.player);
    let avatar_url = document
        .player
        .avatar
        .as_ref()
        .and_then(|avatar| state.report_service.asset_url(&avatar.icon));

    info!(characters = document.characters.len(), "Player snapshot served");
    Ok(Json(PlayerResponse::from_document(&document, summary, avatar_url)))
}

/// GET /players/:player_id/characters/:index
#[instrument(name = "get_character_report", skip(state))]
pub async fn get_character_report(
    State(state): State<AppState>,
    Path((player_id, index)): Path<(String, usize)>,
) -> Result<Json<CharacterReportResponse>, AppError> {
    let (player_id, document) = load_document(&state, &player_id).await?;
    let character = character_at(&document, &player_id, index)?;

    let report = state
        .report_service
        .score_report(&character)
        .await
        .map_err(|reason| AppError::Unavailable(reason.to_string()))?;

    Ok(Json(CharacterReportResponse {
        summary: report.summary,
        card_url: format!("/players/{}/characters/{}/card.jpg", player_id, index),
        preview_url: state.report_service.asset_url(&character.preview),
    }))
}

/// GET /players/:player_id/characters/:index/card.jpg
#[instrument(name = "get_character_card", skip(state))]
pub async fn get_character_card(
    State(state): State<AppState>,
    Path((player_id, index)): Path<(String, usize)>,
) -> Result<Response, AppError> {
    let (player_id, document) = load_document(&state, &player_id).await?;
    let character = character_at(&document, &player_id, index)?;

    match state.report_service.compose_report(&character).await {
        ReportOutcome::Ready { image, .. } => {
            info!(bytes = image.len(), "Card rendered");
            Ok(([(header::CONTENT_TYPE, "image/jpeg")], image).into_response())
        }
        ReportOutcome::Unavailable(reason) => Err(AppError::Unavailable(reason.to_string())),
    }
}

/// POST /admin/refresh
///
/// Runs one refresh cycle and reports what it did
#[instrument(name = "trigger_refresh", skip(state))]
pub async fn trigger_refresh(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RefreshOutcome>), AppError> {
    match state.refresh_coordinator.run_once().await {
        RefreshOutcome::Skipped => Err(AppError::Conflict(
            "A refresh cycle is already running".to_string(),
        )),
        outcome => Ok((StatusCode::ACCEPTED, Json(outcome))),
    }
}
