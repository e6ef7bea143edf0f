pub mod engine;
pub mod provider;
pub mod rank;
pub mod slot;
pub mod weights;

mod errors;

pub use engine::{score_character, score_relic, CharacterScores, RelicScore};
pub use errors::WeightError;
pub use provider::{HttpWeightSource, ScoreTableProvider, WeightSource, DEFAULT_SCORE_TABLE_URL};
pub use rank::Rank;
pub use slot::slot_index_of;
pub use weights::{AffixWeightTable, WeightEntry};
