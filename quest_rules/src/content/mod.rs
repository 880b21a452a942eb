//! Content packs: the companion roster and quest chain a session is seeded
//! from.
//!
//! Packs are authored as TOML (static files or remote-fetched, the engine does
//! not care) and validated on load: quest slugs must be unique and every
//! prerequisite must reference a quest in the same pack.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::entities::{CompanionTemplate, DifficultyTier, QuestDef, Reward};

/// Errors raised while loading or validating a content pack.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The TOML source failed to parse.
    #[error("content parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Two quests share the same slug.
    #[error("duplicate quest slug: {0}")]
    DuplicateSlug(String),

    /// A quest references a prerequisite slug not present in the pack.
    #[error("quest {quest} references unknown prerequisite {prerequisite}")]
    UnknownPrerequisite { quest: String, prerequisite: String },

    /// The pack defines no companions.
    #[error("content pack has no companions")]
    EmptyRoster,
}

/// A complete bundle of session content: companion roster plus quest chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContentPack {
    #[serde(default)]
    pub companions: Vec<CompanionTemplate>,

    #[serde(default)]
    pub quests: Vec<QuestDef>,
}

impl ContentPack {
    /// Parse and validate a pack from TOML source.
    pub fn from_toml_str(source: &str) -> Result<Self, ContentError> {
        let pack: ContentPack = toml::from_str(source)?;
        pack.validate()?;
        Ok(pack)
    }

    /// Validate pack-internal references.
    pub fn validate(&self) -> Result<(), ContentError> {
        if self.companions.is_empty() {
            return Err(ContentError::EmptyRoster);
        }

        let mut slugs = HashSet::new();
        for quest in &self.quests {
            if !slugs.insert(quest.slug.as_str()) {
                return Err(ContentError::DuplicateSlug(quest.slug.clone()));
            }
        }

        for quest in &self.quests {
            for prerequisite in &quest.prerequisites {
                if !slugs.contains(prerequisite.as_str()) {
                    return Err(ContentError::UnknownPrerequisite {
                        quest: quest.slug.clone(),
                        prerequisite: prerequisite.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// The built-in starter pack, used when no remote content source is
    /// configured: a three-companion roster and a short quest chain with the
    /// first quest open.
    pub fn starter() -> Self {
        Self {
            companions: vec![
                CompanionTemplate::new("Embercub", "Flareling", "Pyroclaw"),
                CompanionTemplate::new("Aquafin", "Tidecaller", "Maelstrom"),
                CompanionTemplate::new("Pebblit", "Boulderback", "Terratitan"),
            ],
            quests: vec![
                QuestDef::new("meadow-trail", "The Meadow Trail", DifficultyTier::Starter)
                    .with_reward(Reward::Berries { amount: 1_500 })
                    .with_reward(Reward::Xp { amount: 100 })
                    .with_position(0.10, 0.80)
                    .unlocked_from_start(),
                QuestDef::new("fern-hollow", "Fern Hollow", DifficultyTier::Easy)
                    .with_reward(Reward::Berries { amount: 2_500 })
                    .with_reward(Reward::Xp { amount: 150 })
                    .with_position(0.30, 0.65)
                    .with_prerequisite("meadow-trail"),
                QuestDef::new("river-crossing", "River Crossing", DifficultyTier::Medium)
                    .with_reward(Reward::Berries { amount: 4_000 })
                    .with_reward(Reward::Xp { amount: 250 })
                    .with_position(0.55, 0.45)
                    .with_prerequisite("fern-hollow"),
                QuestDef::new("summit-gate", "The Summit Gate", DifficultyTier::Hard)
                    .with_reward(Reward::Berries { amount: 7_500 })
                    .with_reward(Reward::Xp { amount: 400 })
                    .with_reward(Reward::Item {
                        item_id: "summit-banner".to_string(),
                    })
                    .with_position(0.80, 0.20)
                    .with_prerequisite("river-crossing"),
            ],
        }
    }
}
