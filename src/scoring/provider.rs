use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use super::errors::WeightError;
use super::weights::{AffixWeightTable, WeightEntry};

pub const DEFAULT_SCORE_TABLE_URL: &str =
    "https://raw.githubusercontent.com/Mar-7th/StarRailScore/master/score.json";

/// Where the weight document comes from
#[async_trait]
pub trait WeightSource: Send + Sync {
    async fn fetch_document(&self) -> Result<String, WeightError>;
}

pub struct HttpWeightSource {
    client: reqwest::Client,
    url: String,
}

impl HttpWeightSource {
    pub fn new(client: reqwest::Client, url: &str) -> Self {
        Self {
            client,
            url: url.to_string(),
        }
    }
}

#[async_trait]
impl WeightSource for HttpWeightSource {
    async fn fetch_document(&self) -> Result<String, WeightError> {
        let response = self.client.get(&self.url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// Holds the latest weight table.
///
/// A refresh builds a complete new table and swaps the `Arc`, so readers
/// always see one whole table. The table is `None` until the first
/// successful refresh.
pub struct ScoreTableProvider {
    source: Arc<dyn WeightSource>,
    table: RwLock<Option<Arc<AffixWeightTable>>>,
}

impl ScoreTableProvider {
    pub fn new(source: Arc<dyn WeightSource>) -> Self {
        Self {
            source,
            table: RwLock::new(None),
        }
    }

    /// Creates a provider that starts with an already loaded table
    pub fn with_table(source: Arc<dyn WeightSource>, table: AffixWeightTable) -> Self {
        Self {
            source,
            table: RwLock::new(Some(Arc::new(table))),
        }
    }

    /// Fetches and parses the document, replacing the table on success.
    ///
    /// On failure the previous table is left in place.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<usize, WeightError> {
        let parsed = match self.source.fetch_document().await {
            Ok(document) => AffixWeightTable::from_json(&document),
            Err(error) => Err(error),
        };

        match parsed {
            Ok(table) => {
                let entries = table.len();
                *self.table.write().await = Some(Arc::new(table));
                info!(entries, "Affix weight table updated");
                Ok(entries)
            }
            Err(error) => {
                warn!(error = %error, "Affix weight table refresh failed; keeping previous table");
                Err(error)
            }
        }
    }

    pub async fn current(&self) -> Option<Arc<AffixWeightTable>> {
        self.table.read().await.clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.table.read().await.is_some()
    }

    /// Weight entry for a character; `None` is a normal "no scores yet" state
    pub async fn lookup(&self, character_id: &str) -> Option<WeightEntry> {
        let table = self.current().await?;
        table.get(character_id).cloned()
    }
}
