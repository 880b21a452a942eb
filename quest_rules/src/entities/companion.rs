//! Companion definitions.

use serde::{Deserialize, Serialize};

/// Evolution stages a companion moves through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Stage {
    /// Freshly hatched form.
    #[default]
    Basic,
    /// Mid-track form.
    Advanced,
    /// Final form. Reaching this stage unlocks the next companion in the roster.
    Master,
}

impl Stage {
    /// Zero-based index of this stage on the evolution track.
    pub fn index(&self) -> u8 {
        match self {
            Stage::Basic => 0,
            Stage::Advanced => 1,
            Stage::Master => 2,
        }
    }

    /// Look up a stage by its track index.
    pub fn from_index(index: u8) -> Option<Stage> {
        match index {
            0 => Some(Stage::Basic),
            1 => Some(Stage::Advanced),
            2 => Some(Stage::Master),
            _ => None,
        }
    }

    /// The stage that follows this one, if any.
    pub fn next(&self) -> Option<Stage> {
        match self {
            Stage::Basic => Some(Stage::Advanced),
            Stage::Advanced => Some(Stage::Master),
            Stage::Master => None,
        }
    }

    /// Whether this is the last stage on the track.
    pub fn is_final(&self) -> bool {
        matches!(self, Stage::Master)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Basic => "Basic",
            Stage::Advanced => "Advanced",
            Stage::Master => "Master",
        };
        write!(f, "{name}")
    }
}

/// Roster template for a companion: the default display name at each stage.
///
/// A learner can override the name at runtime; these are what the companion is
/// called when no override is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanionTemplate {
    /// Default display names indexed by evolution stage.
    pub stage_names: [String; 3],
}

impl CompanionTemplate {
    /// Create a template from the three per-stage default names.
    pub fn new(
        basic: impl Into<String>,
        advanced: impl Into<String>,
        master: impl Into<String>,
    ) -> Self {
        Self {
            stage_names: [basic.into(), advanced.into(), master.into()],
        }
    }

    /// Default display name for the given stage.
    pub fn default_name(&self, stage: Stage) -> &str {
        &self.stage_names[stage.index() as usize]
    }
}
