use axum::Router;
use std::sync::Arc;
use tempfile::TempDir;

use hsr_card::{
    assets::AssetMirror,
    refresh::RefreshCoordinator,
    render::CardCompositor,
    report::{report_routes, ReportService},
    scoring::ScoreTableProvider,
    shared::AppState,
    snapshot::{InMemorySnapshotCache, SnapshotService},
};

use super::mocks::{LocalMirrorBackend, MockUpstream, MockWeightSource};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub cache: Arc<InMemorySnapshotCache>,
    pub upstream: Arc<MockUpstream>,
    pub weights: Arc<MockWeightSource>,
    pub scores: Arc<ScoreTableProvider>,
    pub mirror: Arc<AssetMirror>,
    pub report_service: Arc<ReportService>,
    pub coordinator: Arc<RefreshCoordinator>,
    pub _dir: TempDir,
}

impl TestSetup {
    pub fn router(&self) -> Router {
        let state = AppState::new(
            Arc::clone(&self.report_service),
            Arc::clone(&self.coordinator),
        );
        report_routes().with_state(state)
    }
}

pub struct TestSetupBuilder {
    players: Vec<(String, String)>,
    weight_document: Option<String>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            weight_document: None,
        }
    }

    pub fn with_player(mut self, player_id: &str, document: String) -> Self {
        self.players.push((player_id.to_string(), document));
        self
    }

    /// Loads this weight document before the setup is returned
    pub fn with_weights(mut self, document: &str) -> Self {
        self.weight_document = Some(document.to_string());
        self
    }

    pub async fn build(self) -> TestSetup {
        let dir = tempfile::tempdir().expect("temp dir");

        let upstream = Arc::new(MockUpstream::new());
        for (player_id, document) in self.players {
            upstream.add_player(&player_id, document).await;
        }

        let weights = Arc::new(MockWeightSource::new());
        let scores = Arc::new(ScoreTableProvider::new(weights.clone()));
        if let Some(document) = &self.weight_document {
            weights.set_document(document).await;
            scores.refresh().await.expect("weight document parses");
        }

        let mirror = Arc::new(AssetMirror::new(
            dir.path().join("SRRes"),
            "file:///unused",
            Arc::new(LocalMirrorBackend),
        ));

        let cache = Arc::new(InMemorySnapshotCache::new());
        let snapshots = Arc::new(SnapshotService::new(cache.clone(), upstream.clone()));
        let compositor = Arc::new(CardCompositor::new(mirror.clone(), None));
        let report_service = Arc::new(ReportService::new(snapshots, scores.clone(), compositor));
        let coordinator = Arc::new(RefreshCoordinator::new(scores.clone(), mirror.clone()));

        TestSetup {
            cache,
            upstream,
            weights,
            scores,
            mirror,
            report_service,
            coordinator,
            _dir: dir,
        }
    }
}

impl Default for TestSetupBuilder {
    fn default() -> Self {
        Self::new()
    }
}
