use hsr_card::snapshot::{
    CharacterSnapshot, MainAffix, PlayerAvatar, PlayerSnapshot, Relic, SnapshotDocument, SpaceInfo, StatAttribute,
    SubAffix,
};

// ============================================================================
// Snapshot Builders
// ============================================================================

pub struct RelicBuilder {
    relic: Relic,
}

impl RelicBuilder {
    /// A +15 five-star relic; `icon_stem` decides the slot ("101_0" is slot 1)
    pub fn new(icon_stem: &str) -> Self {
        Self {
            relic: Relic {
                id: format!("6{}", icon_stem.replace('_', "")),
                name: "Relic".to_string(),
                set_name: "Passerby of Wandering Cloud".to_string(),
                icon: format!("icon/relic/{}.png", icon_stem),
                rarity: 5,
                level: 15,
                main_affix: MainAffix {
                    affix_type: "HPDelta".to_string(),
                    name: "HP".to_string(),
                    icon: "icon/property/IconMaxHP.png".to_string(),
                    value: 705.6,
                    display: "705".to_string(),
                    percent: false,
                },
                sub_affix: Vec::new(),
            },
        }
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.relic.level = level;
        self
    }

    pub fn with_main_affix(mut self, affix_type: &str) -> Self {
        self.relic.main_affix.affix_type = affix_type.to_string();
        self
    }

    pub fn with_sub_affix(mut self, affix_type: &str, count: u32, step: u32) -> Self {
        self.relic.sub_affix.push(SubAffix {
            affix_type: affix_type.to_string(),
            name: affix_type.to_string(),
            icon: String::new(),
            value: 0.0,
            display: String::new(),
            percent: false,
            count,
            step,
        });
        self
    }

    pub fn build(self) -> Relic {
        self.relic
    }
}

pub struct CharacterBuilder {
    character: CharacterSnapshot,
}

impl CharacterBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            character: CharacterSnapshot {
                id: id.to_string(),
                name: name.to_string(),
                level: 80,
                promotion: 6,
                rank: 0,
                element: None,
                path: None,
                attributes: Vec::new(),
                additions: Vec::new(),
                light_cone: None,
                relics: Vec::new(),
                preview: format!("image/character_preview/{}.png", id),
                portrait: format!("image/character_portrait/{}.png", id),
            },
        }
    }

    pub fn with_relic(mut self, relic: Relic) -> Self {
        self.character.relics.push(relic);
        self
    }

    pub fn with_attribute(mut self, field: &str, value: f64) -> Self {
        self.character.attributes.push(stat(field, value));
        self
    }

    pub fn with_addition(mut self, field: &str, value: f64) -> Self {
        self.character.additions.push(stat(field, value));
        self
    }

    pub fn build(self) -> CharacterSnapshot {
        self.character
    }
}

fn stat(field: &str, value: f64) -> StatAttribute {
    StatAttribute {
        field: field.to_string(),
        name: field.to_uppercase(),
        icon: String::new(),
        value,
        display: String::new(),
        percent: false,
    }
}

pub struct SnapshotBuilder {
    document: SnapshotDocument,
}

impl SnapshotBuilder {
    pub fn new(uid: &str) -> Self {
        Self {
            document: SnapshotDocument {
                player: PlayerSnapshot {
                    uid: uid.to_string(),
                    nickname: "Stelle".to_string(),
                    signature: String::new(),
                    level: 70,
                    world_level: 6,
                    avatar: Some(PlayerAvatar {
                        id: "201102".to_string(),
                        name: "Seele".to_string(),
                        icon: "icon/avatar/201102.png".to_string(),
                    }),
                    space_info: SpaceInfo {
                        avatar_count: 30,
                        light_cone_count: 40,
                        achievement_count: 300,
                    },
                },
                characters: Vec::new(),
            },
        }
    }

    pub fn with_character(mut self, character: CharacterSnapshot) -> Self {
        self.document.characters.push(character);
        self
    }

    /// Upstream payload for this snapshot
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.document).expect("snapshot serializes")
    }
}
