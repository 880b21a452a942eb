//! # Progression Core
//!
//! The progression and economy engine for the Grove learning platform. This
//! crate owns all mutable session state and interfaces with `quest_rules` for
//! definitions and schedules.
//!
//! ## Core Components
//!
//! - **wallet**: The currency ledger - spendable Berries and accumulated XP
//! - **collection**: The companion roster with gated, sequential evolution
//! - **quest_map**: The level graph with monotonic, prerequisite-driven unlocks
//! - **assessment**: Quiz attempts and pass/fail scoring
//! - **coordinator**: The orchestration layer tying the four together
//!
//! ## Design Philosophy
//!
//! - **Single actor**: one learner session, cooperative and non-preemptive;
//!   every operation runs to completion before the next is accepted
//! - **No partial application**: a failing operation leaves every component
//!   exactly as it was before the call
//! - **Explicit handles**: the wallet is passed by reference to whatever
//!   needs it; there is no ambient or static state

pub mod assessment;
pub mod collection;
pub mod coordinator;
pub mod error;
pub mod quest_map;
pub mod snapshot;
pub mod wallet;

pub use assessment::*;
pub use collection::*;
pub use coordinator::*;
pub use error::*;
pub use quest_map::*;
pub use snapshot::*;
pub use wallet::*;
