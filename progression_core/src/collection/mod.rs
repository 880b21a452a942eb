//! The companion roster: an ordered collection with gated, sequential
//! evolution.
//!
//! Insertion order is load-bearing: it is the unlock order and the
//! evolution-gating order. Only unlocked companions can evolve or be renamed,
//! and the companion after index `i` unlocks at the moment companion `i`
//! reaches its final stage.

use std::collections::HashMap;
use tracing::info;

use quest_rules::{
    evolution_step, CompanionId, CompanionTemplate, CreditReason, Stage, MAX_NAME_LEN,
};

use crate::error::{ProgressionError, Result};
use crate::snapshot::CompanionSnapshot;
use crate::wallet::{CurrencyKind, Wallet};

/// A companion creature in a learner's roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Companion {
    pub id: CompanionId,
    template: CompanionTemplate,
    stage: Stage,
    custom_name: Option<String>,
    unlocked: bool,
}

impl Companion {
    fn new(template: CompanionTemplate, unlocked: bool) -> Self {
        Self {
            id: CompanionId::new(),
            template,
            stage: Stage::Basic,
            custom_name: None,
            unlocked,
        }
    }

    /// Current evolution stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Whether the learner has access to this companion yet.
    pub fn unlocked(&self) -> bool {
        self.unlocked
    }

    /// The learner's override name, if one is set.
    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    /// Display name: the override if set, else the stage-indexed default.
    pub fn display_name(&self) -> &str {
        self.custom_name
            .as_deref()
            .unwrap_or_else(|| self.template.default_name(self.stage))
    }

    /// The roster template this companion was built from.
    pub fn template(&self) -> &CompanionTemplate {
        &self.template
    }
}

/// What a successful evolution changed, so callers can drive celebratory
/// feedback without re-querying state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvolutionOutcome {
    pub companion_id: CompanionId,
    pub new_stage: Stage,
    /// The successor companion that this evolution unlocked, if any.
    pub unlocked_successor: Option<CompanionId>,
    pub berries_spent: u64,
    pub xp_awarded: u64,
}

/// An ordered roster of companions.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    companions: Vec<Companion>,
    index_by_id: HashMap<CompanionId, usize>,
}

impl Collection {
    /// Seed a roster from templates: the first companion starts unlocked, the
    /// rest locked.
    pub fn seed(templates: Vec<CompanionTemplate>) -> Self {
        let companions: Vec<Companion> = templates
            .into_iter()
            .enumerate()
            .map(|(i, template)| Companion::new(template, i == 0))
            .collect();
        let index_by_id = companions
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id, i))
            .collect();
        Self {
            companions,
            index_by_id,
        }
    }

    /// Get a companion by id.
    pub fn get(&self, id: CompanionId) -> Option<&Companion> {
        self.index_by_id.get(&id).map(|&i| &self.companions[i])
    }

    /// Iterate companions in roster order.
    pub fn iter(&self) -> impl Iterator<Item = &Companion> {
        self.companions.iter()
    }

    /// Number of companions in the roster.
    pub fn len(&self) -> usize {
        self.companions.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.companions.is_empty()
    }

    /// Advance a companion one evolution stage, paying from `wallet`.
    ///
    /// Validation order: unknown id, locked companion, final stage, funds.
    /// The debit and the stage/unlock mutation are applied as one atomic
    /// step: any failure leaves the wallet, the stage, and the successor's
    /// lock flag exactly as they were.
    pub fn evolve(&mut self, id: CompanionId, wallet: &mut Wallet) -> Result<EvolutionOutcome> {
        let idx = *self
            .index_by_id
            .get(&id)
            .ok_or_else(|| ProgressionError::NotFound(format!("companion {id}")))?;

        let companion = &self.companions[idx];
        if !companion.unlocked {
            return Err(ProgressionError::Locked(format!("companion {id}")));
        }

        let stage = companion.stage;
        let next_stage = stage.next().ok_or(ProgressionError::MaxStageReached)?;
        let step = evolution_step(stage).ok_or(ProgressionError::MaxStageReached)?;

        // Last fallible step; everything after must succeed.
        wallet.debit(step.cost)?;
        wallet.credit(CurrencyKind::Xp, step.xp_reward, CreditReason::Evolution);

        self.companions[idx].stage = next_stage;

        let mut unlocked_successor = None;
        if next_stage.is_final() {
            if let Some(successor) = self.companions.get_mut(idx + 1) {
                if !successor.unlocked {
                    successor.unlocked = true;
                    unlocked_successor = Some(successor.id);
                }
            }
        }

        info!(
            companion = %id,
            stage = %next_stage,
            cost = step.cost,
            successor_unlocked = unlocked_successor.is_some(),
            "companion evolved"
        );

        Ok(EvolutionOutcome {
            companion_id: id,
            new_stage: next_stage,
            unlocked_successor,
            berries_spent: step.cost,
            xp_awarded: step.xp_reward,
        })
    }

    /// Set or clear a companion's override name.
    ///
    /// The input is trimmed and truncated to [`MAX_NAME_LEN`] characters;
    /// an empty name after trimming clears the override back to the
    /// stage-indexed default.
    pub fn rename(&mut self, id: CompanionId, name: &str) -> Result<()> {
        let idx = *self
            .index_by_id
            .get(&id)
            .ok_or_else(|| ProgressionError::NotFound(format!("companion {id}")))?;

        let companion = &mut self.companions[idx];
        if !companion.unlocked {
            return Err(ProgressionError::Locked(format!("companion {id}")));
        }

        let trimmed = name.trim();
        companion.custom_name = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.chars().take(MAX_NAME_LEN).collect())
        };
        Ok(())
    }

    /// Export the roster for persistence.
    pub fn to_snapshots(&self) -> Vec<CompanionSnapshot> {
        self.companions
            .iter()
            .map(|c| CompanionSnapshot {
                id: c.id,
                template: c.template.clone(),
                stage: c.stage,
                custom_name: c.custom_name.clone(),
                unlocked: c.unlocked,
            })
            .collect()
    }

    /// Rebuild a roster from persisted snapshots.
    pub fn restore(snapshots: Vec<CompanionSnapshot>) -> Result<Self> {
        let mut index_by_id = HashMap::new();
        let mut companions = Vec::with_capacity(snapshots.len());

        for (i, snap) in snapshots.into_iter().enumerate() {
            if index_by_id.insert(snap.id, i).is_some() {
                return Err(ProgressionError::DuplicateId(format!(
                    "companion {}",
                    snap.id
                )));
            }
            companions.push(Companion {
                id: snap.id,
                template: snap.template,
                stage: snap.stage,
                custom_name: snap.custom_name,
                unlocked: snap.unlocked,
            });
        }

        Ok(Self {
            companions,
            index_by_id,
        })
    }
}
