use axum::{routing::get, Router};
use hsr_card::assets::{AssetMirror, GitMirrorBackend};
use hsr_card::config::AppConfig;
use hsr_card::refresh::{start_refresh_task, RefreshCoordinator};
use hsr_card::render::{CardCompositor, Typeface};
use hsr_card::report::{report_routes, ReportService};
use hsr_card::scoring::{HttpWeightSource, ScoreTableProvider};
use hsr_card::shared::AppState;
use hsr_card::snapshot::{
    HttpUpstreamApi, InMemorySnapshotCache, RedisSnapshotCache, SnapshotCache, SnapshotService,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hsr_card=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting relic card server");

    if let Err(e) = run(AppConfig::from_env()).await {
        error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .build()?;

    // Redis when configured, process-local otherwise
    let cache: Arc<dyn SnapshotCache> = match &config.redis_url {
        Some(url) => {
            info!("Using Redis snapshot cache");
            Arc::new(RedisSnapshotCache::new(url)?)
        }
        None => {
            info!("REDIS_URL not set; using in-memory snapshot cache");
            Arc::new(InMemorySnapshotCache::new())
        }
    };
    let upstream = Arc::new(HttpUpstreamApi::new(
        client.clone(),
        &config.upstream_base_url,
        &config.upstream_lang,
    ));
    let snapshots = Arc::new(SnapshotService::with_ttl(cache, upstream, config.cache_ttl));

    let scores = Arc::new(ScoreTableProvider::new(Arc::new(HttpWeightSource::new(
        client,
        &config.score_table_url,
    ))));
    let mirror = Arc::new(AssetMirror::new(
        config.asset_dir.clone(),
        &config.asset_repo_url,
        Arc::new(GitMirrorBackend::new(&config.asset_branch)),
    ));

    let compositor = Arc::new(CardCompositor::new(
        Arc::clone(&mirror),
        load_typeface(config.font_path.as_deref()),
    ));
    let report_service = Arc::new(
        ReportService::new(snapshots, Arc::clone(&scores), compositor)
            .with_asset_url_base(&config.asset_url_base),
    );

    let coordinator = Arc::new(RefreshCoordinator::new(scores, mirror));
    tokio::spawn(start_refresh_task(
        Arc::clone(&coordinator),
        config.refresh.clone(),
    ));

    let app_state = AppState::new(report_service, coordinator);

    let app = Router::new()
        .route("/", get(|| async { "relic card server" }))
        .merge(report_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Server running");
    axum::serve(listener, app).await?;
    Ok(())
}

fn load_typeface(path: Option<&Path>) -> Option<Arc<Typeface>> {
    let Some(path) = path else {
        warn!("FONT_PATH not set; cards will render without text");
        return None;
    };
    match Typeface::load(path) {
        Ok(typeface) => {
            info!(path = %path.display(), "Loaded card font");
            Some(Arc::new(typeface))
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Failed to load card font; rendering without text"
            );
            None
        }
    }
}
