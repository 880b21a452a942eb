//! The quest map: a level graph with monotonic, prerequisite-driven unlocks.
//!
//! Quests form an explicit directed graph: each quest lists its prerequisites,
//! and completing a quest unlocks every dependent whose prerequisites are all
//! complete. Unlocking is monotonic: once open, a quest never re-locks within
//! a session.

use std::collections::HashMap;
use tracing::{debug, info};

use quest_rules::{DifficultyTier, MapPosition, QuestDef, QuestId, Reward};

use crate::error::{ProgressionError, Result};
use crate::snapshot::QuestSnapshot;

/// A quest on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Quest {
    pub id: QuestId,
    pub slug: String,
    pub title: String,
    pub difficulty: DifficultyTier,
    pub rewards: Vec<Reward>,
    pub position: MapPosition,
    unlocked: bool,
    completed: bool,
}

impl Quest {
    /// Build a runtime quest from a content definition, assigning a fresh id.
    pub fn from_def(def: &QuestDef) -> Self {
        Self {
            id: QuestId::new(),
            slug: def.slug.clone(),
            title: def.title.clone(),
            difficulty: def.difficulty,
            rewards: def.rewards.clone(),
            position: def.position,
            unlocked: def.starts_unlocked,
            completed: false,
        }
    }

    /// Create a quest directly, for externally-sourced content.
    pub fn new(
        slug: impl Into<String>,
        title: impl Into<String>,
        difficulty: DifficultyTier,
        unlocked: bool,
    ) -> Self {
        Self {
            id: QuestId::new(),
            slug: slug.into(),
            title: title.into(),
            difficulty,
            rewards: Vec::new(),
            position: MapPosition::default(),
            unlocked,
            completed: false,
        }
    }

    /// Add a completion reward.
    pub fn with_reward(mut self, reward: Reward) -> Self {
        self.rewards.push(reward);
        self
    }

    /// Whether the quest is open to the learner.
    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    /// Whether the quest has been completed this session.
    pub fn completed(&self) -> bool {
        self.completed
    }
}

/// The level graph.
#[derive(Debug, Clone, Default)]
pub struct QuestMap {
    quests: HashMap<QuestId, Quest>,
    /// Insertion order, for stable iteration and snapshots.
    order: Vec<QuestId>,
    /// Quest -> quests that list it as a prerequisite.
    dependents: HashMap<QuestId, Vec<QuestId>>,
    /// Quest -> its prerequisites.
    prerequisites: HashMap<QuestId, Vec<QuestId>>,
}

impl QuestMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from content definitions.
    ///
    /// Returns the map plus the slug -> id assignment, so callers can refer
    /// back to content-pack handles.
    pub fn from_content(defs: &[QuestDef]) -> Result<(Self, HashMap<String, QuestId>)> {
        let mut map = Self::new();
        let mut ids_by_slug = HashMap::new();

        for def in defs {
            let quest = Quest::from_def(def);
            if ids_by_slug.insert(def.slug.clone(), quest.id).is_some() {
                return Err(ProgressionError::DuplicateId(format!("quest {}", def.slug)));
            }
            map.insert_quest(quest)?;
        }

        for def in defs {
            let id = ids_by_slug[&def.slug];
            for prereq_slug in &def.prerequisites {
                let prereq_id = *ids_by_slug.get(prereq_slug).ok_or_else(|| {
                    ProgressionError::NotFound(format!("quest {prereq_slug}"))
                })?;
                map.add_edge(prereq_id, id);
            }
        }

        Ok((map, ids_by_slug))
    }

    /// Append a quest with the given prerequisite edges.
    ///
    /// The quest keeps whatever locked/unlocked state the caller built it
    /// with. Fails with `DuplicateId` if the id is already on the map and
    /// `NotFound` if a prerequisite is unknown.
    pub fn add_quest(&mut self, quest: Quest, prerequisites: &[QuestId]) -> Result<QuestId> {
        for prereq in prerequisites {
            if !self.quests.contains_key(prereq) {
                return Err(ProgressionError::NotFound(format!("quest {prereq}")));
            }
        }
        let id = quest.id;
        self.insert_quest(quest)?;
        for prereq in prerequisites {
            self.add_edge(*prereq, id);
        }
        debug!(quest = %id, "quest added to map");
        Ok(id)
    }

    fn insert_quest(&mut self, quest: Quest) -> Result<()> {
        if self.quests.contains_key(&quest.id) {
            return Err(ProgressionError::DuplicateId(format!("quest {}", quest.id)));
        }
        self.order.push(quest.id);
        self.quests.insert(quest.id, quest);
        Ok(())
    }

    fn add_edge(&mut self, prerequisite: QuestId, dependent: QuestId) {
        self.dependents.entry(prerequisite).or_default().push(dependent);
        self.prerequisites.entry(dependent).or_default().push(prerequisite);
    }

    /// Get a quest by id.
    pub fn get(&self, id: QuestId) -> Option<&Quest> {
        self.quests.get(&id)
    }

    /// Iterate quests in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Quest> {
        self.order.iter().filter_map(|id| self.quests.get(id))
    }

    /// Number of quests on the map.
    pub fn len(&self) -> usize {
        self.quests.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Whether a quest is unlocked. Unknown ids read as locked.
    pub fn is_unlocked(&self, id: QuestId) -> bool {
        self.quests.get(&id).map(|q| q.unlocked).unwrap_or(false)
    }

    /// Whether a quest has been completed.
    pub fn is_completed(&self, id: QuestId) -> bool {
        self.quests.get(&id).map(|q| q.completed).unwrap_or(false)
    }

    /// Unlock a quest directly (externally-granted unlock).
    ///
    /// Idempotent: unlocking an already-open quest is a no-op success.
    /// Returns whether anything changed.
    pub fn unlock(&mut self, id: QuestId) -> Result<bool> {
        let quest = self
            .quests
            .get_mut(&id)
            .ok_or_else(|| ProgressionError::NotFound(format!("quest {id}")))?;
        if quest.unlocked {
            return Ok(false);
        }
        quest.unlocked = true;
        info!(quest = %id, slug = %quest.slug, "quest unlocked");
        Ok(true)
    }

    /// Mark a quest completed and cascade unlocks.
    ///
    /// Every dependent whose prerequisites are now all complete is unlocked;
    /// the newly opened ids are returned. Completing an already-completed
    /// quest is a no-op success. A locked quest cannot be completed.
    pub fn complete(&mut self, id: QuestId) -> Result<Vec<QuestId>> {
        let quest = self
            .quests
            .get_mut(&id)
            .ok_or_else(|| ProgressionError::NotFound(format!("quest {id}")))?;
        if !quest.unlocked {
            return Err(ProgressionError::Locked(format!("quest {id}")));
        }
        if quest.completed {
            return Ok(Vec::new());
        }
        quest.completed = true;
        info!(quest = %id, slug = %quest.slug, "quest completed");

        let mut newly_unlocked = Vec::new();
        for dependent in self.dependents.get(&id).cloned().unwrap_or_default() {
            if self.is_unlocked(dependent) {
                continue;
            }
            let satisfied = self
                .prerequisites
                .get(&dependent)
                .map(|prereqs| prereqs.iter().all(|p| self.is_completed(*p)))
                .unwrap_or(true);
            if satisfied {
                if let Some(quest) = self.quests.get_mut(&dependent) {
                    quest.unlocked = true;
                    newly_unlocked.push(dependent);
                    info!(quest = %dependent, "quest unlocked by prerequisite completion");
                }
            }
        }

        Ok(newly_unlocked)
    }

    /// Export the map for persistence.
    pub fn to_snapshots(&self) -> Vec<QuestSnapshot> {
        self.iter()
            .map(|q| QuestSnapshot {
                id: q.id,
                slug: q.slug.clone(),
                title: q.title.clone(),
                difficulty: q.difficulty,
                rewards: q.rewards.clone(),
                position: q.position,
                unlocked: q.unlocked,
                completed: q.completed,
                prerequisites: self.prerequisites.get(&q.id).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Rebuild a map from persisted snapshots.
    pub fn restore(snapshots: Vec<QuestSnapshot>) -> Result<Self> {
        let mut map = Self::new();
        for snap in &snapshots {
            map.insert_quest(Quest {
                id: snap.id,
                slug: snap.slug.clone(),
                title: snap.title.clone(),
                difficulty: snap.difficulty,
                rewards: snap.rewards.clone(),
                position: snap.position,
                unlocked: snap.unlocked,
                completed: snap.completed,
            })?;
        }
        for snap in &snapshots {
            for prereq in &snap.prerequisites {
                if !map.quests.contains_key(prereq) {
                    return Err(ProgressionError::NotFound(format!("quest {prereq}")));
                }
                map.add_edge(*prereq, snap.id);
            }
        }
        Ok(map)
    }
}
