//! Quest definitions.

use serde::{Deserialize, Serialize};

/// Difficulty tiers for quests on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    Starter,
    Easy,
    Medium,
    Hard,
    Expert,
}

/// A reward granted on quest completion.
///
/// Rewards are a closed set of variants so the engine can apply them
/// generically: currency rewards flow through the wallet, item rewards are
/// handed to the caller as opaque grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reward {
    /// Spendable currency.
    Berries { amount: u64 },
    /// Accumulation score.
    Xp { amount: u64 },
    /// An opaque item grant, resolved by the caller.
    Item { item_id: String },
}

/// Position of a quest on the map. Layout only; carries no gameplay meaning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MapPosition {
    pub x: f32,
    pub y: f32,
}

/// Static definition of a quest, as provided by a content source.
///
/// The `slug` is the stable handle content packs use to reference quests
/// (prerequisites are slug lists); the engine assigns runtime ids when the
/// map is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDef {
    pub slug: String,
    pub title: String,
    pub difficulty: DifficultyTier,

    #[serde(default)]
    pub rewards: Vec<Reward>,

    #[serde(default)]
    pub position: MapPosition,

    /// Slugs of quests that must be completed before this one unlocks.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Whether the quest is already unlocked when the map is seeded.
    #[serde(default)]
    pub starts_unlocked: bool,
}

impl QuestDef {
    /// Create a new quest definition with the given slug and title.
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        difficulty: DifficultyTier,
    ) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            difficulty,
            rewards: Vec::new(),
            position: MapPosition::default(),
            prerequisites: Vec::new(),
            starts_unlocked: false,
        }
    }

    /// Add a completion reward.
    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.rewards.push(reward);
        self
    }

    /// Set the map position.
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = MapPosition { x, y };
        self
    }

    /// Add a prerequisite quest by slug.
    pub fn with_prerequisite(mut self, slug: impl Into<String>) -> Self {
        self.prerequisites.push(slug.into());
        self
    }

    /// Mark the quest as unlocked from the start of a session.
    pub fn unlocked_from_start(mut self) -> Self {
        self.starts_unlocked = true;
        self
    }
}
