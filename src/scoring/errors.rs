use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeightError {
    #[error("Weight table fetch failed: {0}")]
    Fetch(String),

    #[error("Weight table parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed weight cell: {0}")]
    MalformedCell(String),
}

impl From<reqwest::Error> for WeightError {
    fn from(error: reqwest::Error) -> Self {
        WeightError::Fetch(error.to_string())
    }
}
