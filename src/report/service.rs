use std::sync::Arc;
use strum_macros::Display;
use tracing::{debug, error, instrument};

use crate::assets::{asset_url, DEFAULT_ASSET_URL_BASE};
use crate::render::{character_title, light_cone_line, CardCompositor};
use crate::scoring::{score_character, CharacterScores, ScoreTableProvider};
use crate::snapshot::{CharacterSnapshot, FetchOutcome, PlayerId, PlayerSnapshot, SnapshotService};

const CACHE_NOTICE: &str =
    "Data is cached for half an hour; changes made in game show up once it expires.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UnavailableReason {
    #[strum(serialize = "character has no relics equipped")]
    NoRelics,
    #[strum(serialize = "scoring data is still loading, try again shortly")]
    ScoringDataNotLoaded,
    #[strum(serialize = "card could not be rendered")]
    RenderFailed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Ready { summary: String, image: Vec<u8> },
    Unavailable(UnavailableReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredReport {
    pub summary: String,
    pub scores: CharacterScores,
}

/// Joins snapshots, scoring and rendering into user-facing reports
pub struct ReportService {
    snapshots: Arc<SnapshotService>,
    scores: Arc<ScoreTableProvider>,
    compositor: Arc<CardCompositor>,
    asset_url_base: String,
}

impl ReportService {
    pub fn new(
        snapshots: Arc<SnapshotService>,
        scores: Arc<ScoreTableProvider>,
        compositor: Arc<CardCompositor>,
    ) -> Self {
        Self {
            snapshots,
            scores,
            compositor,
            asset_url_base: DEFAULT_ASSET_URL_BASE.to_string(),
        }
    }

    pub fn with_asset_url_base(mut self, base: &str) -> Self {
        self.asset_url_base = base.trim_end_matches('/').to_string();
        self
    }

    /// Public link for an asset path from a snapshot
    pub fn asset_url(&self, relative: &str) -> Option<String> {
        asset_url(&self.asset_url_base, relative)
    }

    pub async fn fetch_snapshot(&self, player_id: &PlayerId) -> FetchOutcome {
        self.snapshots.fetch(player_id).await
    }

    pub fn player_summary(player: &PlayerSnapshot) -> String {
        let mut lines = vec![format!("{} (UID {})", player.nickname, player.uid)];
        if !player.signature.is_empty() {
            lines.push(format!("\"{}\"", player.signature));
        }
        lines.push(format!(
            "Trailblaze Level {}, Equilibrium Level {}",
            player.level, player.world_level
        ));
        lines.push(format!(
            "Characters: {}  Light Cones: {}  Achievements: {}",
            player.space_info.avatar_count,
            player.space_info.light_cone_count,
            player.space_info.achievement_count
        ));
        lines.push(CACHE_NOTICE.to_string());
        lines.join("\n")
    }

    pub fn character_summary(character: &CharacterSnapshot, scores: &CharacterScores) -> String {
        let mut lines = vec![character_title(character)];
        if let Some(light_cone) = &character.light_cone {
            lines.push(light_cone_line(light_cone));
        }
        if let Some(average) = scores.average() {
            lines.push(format!("Average relic score: {}%", average));
        }
        lines.join("\n")
    }

    /// Scores a character and builds its summary without rendering
    pub async fn score_report(
        &self,
        character: &CharacterSnapshot,
    ) -> Result<ScoredReport, UnavailableReason> {
        if character.relics.is_empty() {
            return Err(UnavailableReason::NoRelics);
        }
        let Some(table) = self.scores.current().await else {
            debug!("Report requested before the weight table loaded");
            return Err(UnavailableReason::ScoringDataNotLoaded);
        };

        let scores = score_character(character, table.get(&character.id));
        let summary = Self::character_summary(character, &scores);
        Ok(ScoredReport { summary, scores })
    }

    /// Scores a character and renders its card off the async runtime
    #[instrument(skip_all, fields(character_id = %character.id))]
    pub async fn compose_report(&self, character: &CharacterSnapshot) -> ReportOutcome {
        let ScoredReport { summary, scores } = match self.score_report(character).await {
            Ok(report) => report,
            Err(reason) => return ReportOutcome::Unavailable(reason),
        };

        let compositor = Arc::clone(&self.compositor);
        let owned = character.clone();
        let rendered =
            tokio::task::spawn_blocking(move || compositor.compose_scored(&owned, &scores)).await;

        match rendered {
            Ok(Ok(image)) => ReportOutcome::Ready { summary, image },
            Ok(Err(e)) => {
                error!(error = %e, "Card rendering failed");
                ReportOutcome::Unavailable(UnavailableReason::RenderFailed)
            }
            Err(e) => {
                error!(error = %e, "Card rendering task panicked");
                ReportOutcome::Unavailable(UnavailableReason::RenderFailed)
            }
        }
    }
}
