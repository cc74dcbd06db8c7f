//! Multi-class progression engine.
//!
//! Actors hold several classes at once, each tracked in a [`ClassLedger`],
//! and switch the active class at runtime. Experience is converted to
//! levels by the [`curve`] evaluator, the configured [`ProgressionMode`]
//! decides how experience and parameters are shared between classes, and
//! the unlock orchestrator grants skills and classes once their
//! [`cc_core::UnlockCondition`]s hold.
//!
//! The host drives everything through [`Progression`]: it sets up actors,
//! forwards experience gains and class change requests, and drains the
//! resulting [`ProgressEvent`]s for presentation.

/// Per-actor runtime state.
pub mod actor;
/// Engine configuration and progression modes.
pub mod config;
/// Experience curve evaluation.
pub mod curve;
/// The host-facing engine: actor roster, commands, queries, persistence.
pub mod engine;
/// Error types for the progression crate.
pub mod error;
/// Progression event types and the event log.
pub mod event;
/// The per-actor class ledger.
pub mod ledger;
/// Mode-dependent experience, level, parameter and swap rules.
pub mod policy;
/// Unlock condition evaluation.
pub mod prerequisite;
/// The unlock orchestrator.
pub mod unlock;

#[cfg(test)]
pub(crate) mod fixtures;

/// Re-export of [`actor::ActorProgress`].
pub use actor::ActorProgress;
/// Re-exports of configuration types.
pub use config::{DualLevelUp, MenuConfig, ProgressionConfig, ProgressionMode, StatGainSource};
/// Re-exports of the engine and its command types.
pub use engine::{ClassAction, MenuAccess, MenuEntry, Progression, SaveState};
/// Re-exports of [`error::ProgressError`] and [`error::ProgressResult`].
pub use error::{ProgressError, ProgressResult};
/// Re-exports of [`event::EventLog`], [`event::ProgressEvent`], and [`event::ProgressEventKind`].
pub use event::{EventLog, ProgressEvent, ProgressEventKind};
/// Re-exports of ledger types.
pub use ledger::{ClassLedger, ClassRecord, GrantOutcome};
/// Re-export of [`policy::Policy`].
pub use policy::Policy;
/// Re-exports of the prerequisite evaluator.
pub use prerequisite::{CharacterSnapshot, evaluate};
/// Re-export of [`unlock::UnlockBook`].
pub use unlock::UnlockBook;
