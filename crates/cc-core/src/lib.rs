//! Core data model for the class change system.
//!
//! This crate holds the static game data the progression engine reads:
//! class definitions with their experience curves and parameter tables,
//! skills, actors, and the typed unlock rules that annotations decode into.
//! It has no notion of runtime progression state.

/// Actor definitions as authored in the game database.
pub mod actor;
/// Class definitions, experience curve coefficients, and parameter tables.
pub mod class;
/// Unlock rules and the conditions that gate them.
pub mod condition;
/// The static database that owns every definition.
pub mod database;
/// Error types used throughout the crate.
pub mod error;
/// Strongly-typed database identifiers.
pub mod id;
/// Skill definitions.
pub mod skill;

/// Re-export actor definitions.
pub use actor::ActorDefinition;
/// Re-export class definition types.
pub use class::{ClassDefinition, CurveParams, Learning, ParamTable};
/// Re-export unlock rule types.
pub use condition::{ClassThreshold, Combinator, LevelScope, UnlockCondition, UnlockRule, UnlockTarget};
/// Re-export the database and its validation report.
pub use database::{Database, ValidationIssue};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export identifiers.
pub use id::{ActorId, ClassId, SkillId, SkillTypeId};
/// Re-export skill definitions.
pub use skill::SkillDefinition;
