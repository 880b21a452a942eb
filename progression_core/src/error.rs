//! Error types for the progression engine.

use thiserror::Error;

/// Result type for progression operations.
pub type Result<T> = std::result::Result<T, ProgressionError>;

/// Errors that can occur during progression operations.
///
/// All of these are local validation failures, not fatal conditions: a
/// failing operation is a no-op on every stateful component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    /// The referenced companion, quest, question, or option does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The target is locked, or a submitted assessment no longer accepts
    /// changes.
    #[error("locked: {0}")]
    Locked(String),

    /// The companion is already at its final evolution stage.
    #[error("companion is already at its final stage")]
    MaxStageReached,

    /// The wallet cannot cover the requested debit.
    #[error("insufficient funds: need {needed} berries, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    /// The assessment still has unanswered questions.
    #[error("assessment incomplete: {answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },

    /// A quest with this id already exists on the map.
    #[error("duplicate id: {0}")]
    DuplicateId(String),
}
