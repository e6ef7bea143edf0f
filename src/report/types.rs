use serde::{Deserialize, Serialize};

use crate::snapshot::SnapshotDocument;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterEntry {
    pub index: usize,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResponse {
    pub uid: String,
    pub nickname: String,
    /// Link to the player's profile icon, when they have one
    pub avatar_url: Option<String>,
    pub summary: String,
    pub characters: Vec<CharacterEntry>,
}

impl PlayerResponse {
    pub fn from_document(
        document: &SnapshotDocument,
        summary: String,
        avatar_url: Option<String>,
    ) -> Self {
        Self {
            uid: document.player.uid.clone(),
            nickname: document.player.nickname.clone(),
            avatar_url,
            summary,
            characters: document
                .characters
                .iter()
                .enumerate()
                .map(|(index, character)| CharacterEntry {
                    index,
                    id: character.id.clone(),
                    name: character.display_name().to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterReportResponse {
    pub summary: String,
    pub card_url: String,
    pub preview_url: Option<String>,
}
