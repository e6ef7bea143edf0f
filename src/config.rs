use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::assets::{DEFAULT_ASSET_REPO_URL, DEFAULT_ASSET_URL_BASE};
use crate::refresh::RefreshConfig;
use crate::scoring::DEFAULT_SCORE_TABLE_URL;
use crate::snapshot::DEFAULT_SNAPSHOT_TTL;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.mihomo.me";
pub const DEFAULT_UPSTREAM_LANG: &str = "cht";
pub const DEFAULT_ASSET_DIR: &str = "data/SRRes";
pub const DEFAULT_ASSET_BRANCH: &str = "master";
pub const DEFAULT_USER_AGENT: &str = concat!("hsr_card/", env!("CARGO_PKG_VERSION"));

/// Process configuration, read from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// `None` selects the in-process cache
    pub redis_url: Option<String>,
    pub upstream_base_url: String,
    pub upstream_lang: String,
    pub score_table_url: String,
    pub asset_repo_url: String,
    pub asset_branch: String,
    pub asset_dir: PathBuf,
    /// Prefix for asset links returned to clients
    pub asset_url_base: String,
    /// Without a font cards render without text
    pub font_path: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub refresh: RefreshConfig,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            redis_url: None,
            upstream_base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            upstream_lang: DEFAULT_UPSTREAM_LANG.to_string(),
            score_table_url: DEFAULT_SCORE_TABLE_URL.to_string(),
            asset_repo_url: DEFAULT_ASSET_REPO_URL.to_string(),
            asset_branch: DEFAULT_ASSET_BRANCH.to_string(),
            asset_dir: PathBuf::from(DEFAULT_ASSET_DIR),
            asset_url_base: DEFAULT_ASSET_URL_BASE.to_string(),
            font_path: None,
            cache_ttl: DEFAULT_SNAPSHOT_TTL,
            refresh: RefreshConfig::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            bind_addr: read("BIND_ADDR").unwrap_or(defaults.bind_addr),
            redis_url: read("REDIS_URL"),
            upstream_base_url: read("UPSTREAM_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.upstream_base_url),
            upstream_lang: read("UPSTREAM_LANG").unwrap_or(defaults.upstream_lang),
            score_table_url: read("SCORE_TABLE_URL").unwrap_or(defaults.score_table_url),
            asset_repo_url: read("ASSET_REPO_URL").unwrap_or(defaults.asset_repo_url),
            asset_branch: read("ASSET_BRANCH").unwrap_or(defaults.asset_branch),
            asset_dir: read("ASSET_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.asset_dir),
            asset_url_base: read("ASSET_URL_BASE")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.asset_url_base),
            font_path: read("FONT_PATH").map(PathBuf::from),
            cache_ttl: seconds(read("CACHE_TTL_SECS"), "CACHE_TTL_SECS")
                .unwrap_or(defaults.cache_ttl),
            refresh: RefreshConfig {
                initial_delay: seconds(
                    read("REFRESH_INITIAL_DELAY_SECS"),
                    "REFRESH_INITIAL_DELAY_SECS",
                )
                .unwrap_or(defaults.refresh.initial_delay),
                interval: seconds(read("REFRESH_INTERVAL_SECS"), "REFRESH_INTERVAL_SECS")
                    .filter(|interval| !interval.is_zero())
                    .unwrap_or(defaults.refresh.interval),
            },
            user_agent: read("USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }
}

fn seconds(raw: Option<String>, key: &str) -> Option<Duration> {
    parse_or_warn::<u64>(raw, key).map(Duration::from_secs)
}

fn parse_or_warn<T: FromStr>(raw: Option<String>, key: &str) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key = %key, value = %raw, "Ignoring unparsable setting; using default");
            None
        }
    }
}
