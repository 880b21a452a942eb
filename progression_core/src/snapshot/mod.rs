//! Snapshots handed to the persistence collaborator.
//!
//! The engine does not know the storage medium: it serializes its state into
//! a [`ProgressionSnapshot`] and hands it to a [`SnapshotSink`] after each
//! successful mutation, fire-and-forget. A sink failure never rolls back the
//! in-memory state it describes.

use serde::{Deserialize, Serialize};

use quest_rules::{
    CompanionId, CompanionTemplate, DifficultyTier, MapPosition, QuestId, Reward, Stage,
};

use crate::wallet::Wallet;

/// Persisted form of a companion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionSnapshot {
    pub id: CompanionId,
    pub template: CompanionTemplate,
    pub stage: Stage,
    pub custom_name: Option<String>,
    pub unlocked: bool,
}

/// Persisted form of a quest, including its prerequisite edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestSnapshot {
    pub id: QuestId,
    pub slug: String,
    pub title: String,
    pub difficulty: DifficultyTier,
    pub rewards: Vec<Reward>,
    pub position: MapPosition,
    pub unlocked: bool,
    pub completed: bool,
    pub prerequisites: Vec<QuestId>,
}

/// A complete serialized session: wallet, roster, and map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionSnapshot {
    pub wallet: Wallet,
    pub companions: Vec<CompanionSnapshot>,
    pub quests: Vec<QuestSnapshot>,
}

impl ProgressionSnapshot {
    /// Serialize to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

/// Where snapshots go after a successful mutation.
///
/// Implementations own their I/O: a slow or failing sink must not block or
/// unwind the session, so errors are reported back only for logging.
pub trait SnapshotSink {
    fn persist(&mut self, snapshot: &ProgressionSnapshot) -> std::io::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let snapshot = ProgressionSnapshot {
            wallet: Wallet::new(30_000, 500),
            companions: vec![CompanionSnapshot {
                id: CompanionId::new(),
                template: CompanionTemplate::new("Embercub", "Flareling", "Pyroclaw"),
                stage: Stage::Advanced,
                custom_name: Some("Sparky".to_string()),
                unlocked: true,
            }],
            quests: vec![QuestSnapshot {
                id: QuestId::new(),
                slug: "meadow-trail".to_string(),
                title: "The Meadow Trail".to_string(),
                difficulty: DifficultyTier::Starter,
                rewards: vec![Reward::Berries { amount: 1_500 }],
                position: MapPosition { x: 0.1, y: 0.8 },
                unlocked: true,
                completed: false,
                prerequisites: Vec::new(),
            }],
        };

        let json = snapshot.to_json().unwrap();
        let restored = ProgressionSnapshot::from_json(&json).unwrap();
        assert_eq!(restored, snapshot);
    }
}
