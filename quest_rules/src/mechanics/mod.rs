//! Progression mechanics: the evolution schedule, pass thresholds, and
//! currency accounting tags.

use serde::{Deserialize, Serialize};

use crate::entities::Stage;

/// Maximum length of a learner-chosen companion name, after trimming.
pub const MAX_NAME_LEN: usize = 20;

/// The cost and reward of advancing a companion one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionStep {
    /// Berries debited from the wallet.
    pub cost: u64,
    /// XP credited on success.
    pub xp_reward: u64,
}

/// Look up the evolution step out of the given stage.
///
/// Returns `None` for the final stage: there is nothing to evolve into.
pub fn evolution_step(from: Stage) -> Option<EvolutionStep> {
    match from {
        Stage::Basic => Some(EvolutionStep {
            cost: 25_000,
            xp_reward: 500,
        }),
        Stage::Advanced => Some(EvolutionStep {
            cost: 50_000,
            xp_reward: 1_000,
        }),
        Stage::Master => None,
    }
}

/// Fraction of correct answers required to pass an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassThreshold(pub f64);

impl Default for PassThreshold {
    fn default() -> Self {
        Self(0.70)
    }
}

impl PassThreshold {
    /// Whether `correct` out of `total` answers clears the threshold.
    ///
    /// Uses real-number division: with 4 questions and a 0.70 threshold,
    /// 3 correct passes (0.75) and 2 correct fails (0.50). The threshold is
    /// never rounded to a question count. An empty assessment never passes.
    pub fn is_passing(&self, correct: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }
        correct as f64 / total as f64 >= self.0
    }
}

/// Why a wallet balance was credited. Carried on every credit for tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditReason {
    /// Reward from a passed assessment.
    QuestReward,
    /// XP granted by a companion evolution.
    Evolution,
    /// Externally-granted balance (e.g. an admin grant).
    AdminGrant,
    /// Initial balance seeded from content.
    ContentSeed,
}
