//! # Quest Rules
//!
//! The "rule book" crate - contains all progression rules, economy schedules,
//! and entity definitions for the Grove learning platform. This crate is the
//! single source of truth for what companions, quests, and assessments *are*;
//! it contains no engine or orchestration logic.

pub mod content;
pub mod entities;
pub mod mechanics;

pub use content::*;
pub use entities::*;
pub use mechanics::*;
