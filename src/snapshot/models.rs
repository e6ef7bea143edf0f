use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::AppError;

/// Character ids with this prefix belong to the player avatar.
const TRAILBLAZER_ID_PREFIX: &str = "80";
const TRAILBLAZER_NAME: &str = "Trailblazer";

/// A validated player identifier made of ASCII letters and digits.
///
/// The id is embedded verbatim in the upstream URL path and the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(String);

impl PlayerId {
    /// Parses a raw identifier after trimming surrounding whitespace
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::InvalidInput(
                "player id must not be empty".to_string(),
            ));
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::InvalidInput(
                "player id may only contain letters and digits".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key under which the snapshot is stored in the cache
    pub fn cache_key(&self) -> String {
        format!("hsr:{}", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full document returned by the upstream API for one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotDocument {
    pub player: PlayerSnapshot,
    #[serde(default)]
    pub characters: Vec<CharacterSnapshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub uid: String,
    pub nickname: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub world_level: u32,
    #[serde(default)]
    pub avatar: Option<PlayerAvatar>,
    #[serde(default)]
    pub space_info: SpaceInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerAvatar {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpaceInfo {
    #[serde(default)]
    pub avatar_count: u32,
    #[serde(default)]
    pub light_cone_count: u32,
    #[serde(default)]
    pub achievement_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub promotion: u32,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub element: Option<Element>,
    #[serde(default)]
    pub path: Option<CharacterPath>,
    #[serde(default)]
    pub attributes: Vec<StatAttribute>,
    #[serde(default)]
    pub additions: Vec<StatAttribute>,
    #[serde(default)]
    pub light_cone: Option<LightCone>,
    #[serde(default)]
    pub relics: Vec<Relic>,
    #[serde(default)]
    pub preview: String,
    #[serde(default)]
    pub portrait: String,
}

impl CharacterSnapshot {
    /// Name shown to users; the player avatar has a fixed display name
    pub fn display_name(&self) -> &str {
        if self.id.starts_with(TRAILBLAZER_ID_PREFIX) {
            TRAILBLAZER_NAME
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub icon: String,
}

impl Element {
    /// Parses the `#RRGGBB` color of the element
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let hex = self.color.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        Some([(value >> 16) as u8, (value >> 8) as u8, value as u8])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterPath {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
}

/// One named stat contribution, used for base attributes and additions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatAttribute {
    pub field: String,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub value: f64,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub percent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightCone {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub level: u32,
    #[serde(default)]
    pub promotion: u32,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relic {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub set_name: String,
    pub icon: String,
    #[serde(default)]
    pub rarity: u8,
    #[serde(default)]
    pub level: u8,
    pub main_affix: MainAffix,
    #[serde(default)]
    pub sub_affix: Vec<SubAffix>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainAffix {
    #[serde(rename = "type")]
    pub affix_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub percent: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubAffix {
    #[serde(rename = "type")]
    pub affix_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub value: f64,
    #[serde(default)]
    pub display: String,
    #[serde(default)]
    pub percent: bool,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub step: u32,
}
