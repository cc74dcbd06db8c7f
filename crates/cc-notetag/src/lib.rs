//! Annotation reader for the class change system.
//!
//! Actors and classes carry free-form note text containing bracketed tags
//! such as `<LaziGiveClass: 3>` or `<LaziInnateSkill:1ReqORClass:|2,15||3,10|>`.
//! This crate scans that text and produces the typed data the progression
//! engine consumes: class grant lists and [`cc_core::UnlockRule`]s.
//!
//! Tag names are case-insensitive, whitespace inside them is ignored, and
//! the `Lazi` prefix is optional. Tags this crate does not recognise are
//! skipped silently; recognised tags with malformed values are skipped and
//! reported as [`NoteWarning`]s.

pub mod actor;
pub mod class;
pub mod scan;

pub use actor::{ActorNotes, parse_actor_note};
pub use class::{ClassNotes, parse_class_note};
pub use scan::{NoteWarning, RawTag, scan_tags};
