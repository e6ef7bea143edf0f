use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

use super::errors::WeightError;

/// Per-character scoring weights, keyed by character id
#[derive(Debug, Clone, Default)]
pub struct AffixWeightTable {
    entries: HashMap<String, WeightEntry>,
}

impl AffixWeightTable {
    /// Parses the whole weight document; any structural error rejects it
    pub fn from_json(document: &str) -> Result<Self, WeightError> {
        let mut entries: HashMap<String, WeightEntry> = serde_json::from_str(document)?;
        for (character_id, entry) in entries.iter_mut() {
            entry.character_id = character_id.clone();
        }
        Ok(Self { entries })
    }

    pub fn get(&self, character_id: &str) -> Option<&WeightEntry> {
        self.entries.get(character_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Weights for one character.
///
/// Cells stay as raw json so that a single malformed value only zeroes
/// that cell instead of rejecting the entire table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WeightEntry {
    #[serde(skip)]
    character_id: String,
    /// slot index ("1".."6") -> main stat type -> weight
    #[serde(default)]
    main: HashMap<String, HashMap<String, Value>>,
    /// sub stat type -> weight
    #[serde(default, alias = "sub")]
    weight: HashMap<String, Value>,
    #[serde(default)]
    max: Value,
}

impl WeightEntry {
    pub fn character_id(&self) -> &str {
        &self.character_id
    }

    /// Main-stat weight for a slot, `None` when absent or malformed
    pub fn main_weight(&self, slot: u8, stat_type: &str) -> Option<f64> {
        let cell = self.main.get(&slot.to_string())?.get(stat_type)?;
        self.read_cell(cell, Some(slot), stat_type)
    }

    /// Sub-stat weight, `None` when absent or malformed
    pub fn sub_weight(&self, stat_type: &str) -> Option<f64> {
        let cell = self.weight.get(stat_type)?;
        self.read_cell(cell, None, stat_type)
    }

    /// Normalization constant for the summed sub-stat score
    pub fn max(&self) -> Option<f64> {
        self.read_cell(&self.max, None, "max")
    }

    fn read_cell(&self, cell: &Value, slot: Option<u8>, stat_type: &str) -> Option<f64> {
        match parse_cell(cell) {
            Ok(weight) => weight,
            Err(error) => {
                warn!(
                    character_id = %self.character_id,
                    slot = ?slot,
                    stat_type = %stat_type,
                    error = %error,
                    "Malformed weight cell treated as zero"
                );
                None
            }
        }
    }
}

/// Numbers and numeric strings are accepted; null means "no weight"
fn parse_cell(cell: &Value) -> Result<Option<f64>, WeightError> {
    match cell {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| WeightError::MalformedCell(number.to_string())),
        Value::String(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| WeightError::MalformedCell(raw.clone())),
        other => Err(WeightError::MalformedCell(other.to_string())),
    }
}
