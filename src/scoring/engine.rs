use tracing::debug;

use super::rank::Rank;
use super::slot::slot_index_of;
use super::weights::WeightEntry;
use crate::snapshot::{CharacterSnapshot, Relic};

/// Highest enhancement level plus one
const MAX_LEVEL_STEPS: f64 = 16.0;
const STEP_FACTOR: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct RelicScore {
    pub slot: Option<u8>,
    pub main_score: f64,
    /// One entry per sub affix, in relic order
    pub sub_scores: Vec<f64>,
    pub total_sub_score: f64,
    pub normalized_sub_score: f64,
    pub aggregate: f64,
    pub rank: Rank,
}

impl RelicScore {
    /// An aggregate of exactly zero means the relic was not scored
    pub fn is_scored(&self) -> bool {
        self.aggregate != 0.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CharacterScores {
    pub relics: Vec<RelicScore>,
}

impl CharacterScores {
    /// Mean aggregate over scored relics
    pub fn average(&self) -> Option<f64> {
        let scored: Vec<f64> = self
            .relics
            .iter()
            .filter(|score| score.is_scored())
            .map(|score| score.aggregate)
            .collect();
        if scored.is_empty() {
            return None;
        }
        Some(round_to(scored.iter().sum::<f64>() / scored.len() as f64, 1))
    }
}

/// Scores every equipped relic of a character
pub fn score_character(
    character: &CharacterSnapshot,
    weights: Option<&WeightEntry>,
) -> CharacterScores {
    if weights.is_none() {
        debug!(character_id = %character.id, "No weight entry; relics left unscored");
    }
    CharacterScores {
        relics: character
            .relics
            .iter()
            .map(|relic| score_relic(relic, weights))
            .collect(),
    }
}

pub fn score_relic(relic: &Relic, weights: Option<&WeightEntry>) -> RelicScore {
    let slot = slot_index_of(&relic.icon);

    let main_weight = match (weights, slot) {
        (Some(entry), Some(slot)) => entry
            .main_weight(slot, &relic.main_affix.affix_type)
            .unwrap_or(0.0),
        _ => 0.0,
    };
    let main_score = main_affix_score(relic.level, main_weight);

    let sub_scores: Vec<f64> = relic
        .sub_affix
        .iter()
        .map(|affix| {
            let weight = weights
                .and_then(|entry| entry.sub_weight(&affix.affix_type))
                .unwrap_or(0.0);
            sub_affix_score(affix.count, affix.step, weight)
        })
        .collect();
    let total_sub_score: f64 = sub_scores.iter().sum();

    let normalized_sub_score = match weights.and_then(WeightEntry::max) {
        Some(max) if max != 0.0 => total_sub_score / max,
        _ => 0.0,
    };

    let aggregate = aggregate_score(main_score, normalized_sub_score);

    RelicScore {
        slot,
        main_score,
        sub_scores,
        total_sub_score,
        normalized_sub_score,
        aggregate,
        rank: Rank::from_aggregate(aggregate),
    }
}

pub fn main_affix_score(level: u8, weight: f64) -> f64 {
    if weight == 0.0 {
        return 0.0;
    }
    round_to((f64::from(level) + 1.0) / MAX_LEVEL_STEPS * weight, 2)
}

pub fn sub_affix_score(count: u32, step: u32, weight: f64) -> f64 {
    if weight == 0.0 {
        return 0.0;
    }
    (f64::from(count) + f64::from(step) * STEP_FACTOR) * weight
}

/// Blends main and normalized sub scores into a whole percentage
pub fn aggregate_score(main_score: f64, normalized_sub_score: f64) -> f64 {
    ((main_score / 2.0 + normalized_sub_score / 2.0) * 100.0).round_ties_even()
}

/// Rounds half to even at the given number of decimals
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
