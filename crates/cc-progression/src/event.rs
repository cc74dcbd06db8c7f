use cc_core::{ActorId, ClassId, SkillId};
use serde::{Deserialize, Serialize};

/// What kind of progression event occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ProgressEventKind {
    // Classes
    /// The active class changed.
    ClassSwapped {
        /// The actor that swapped.
        actor: ActorId,
        /// The previously active class.
        from: ClassId,
        /// The newly active class.
        to: ClassId,
        /// Level in the new class after the swap.
        level: u32,
    },
    /// A class was granted or re-enabled by a command.
    ClassGranted {
        /// The actor receiving the class.
        actor: ActorId,
        /// The granted class.
        class: ClassId,
    },
    /// A class was disabled by a command.
    ClassDisabled {
        /// The actor whose class was disabled.
        actor: ActorId,
        /// The disabled class.
        class: ClassId,
    },
    /// A class was removed from the ledger.
    ClassRevoked {
        /// The actor losing the class.
        actor: ActorId,
        /// The revoked class.
        class: ClassId,
    },

    // Levels
    /// The active class gained one or more levels.
    LevelUp {
        /// The actor that levelled.
        actor: ActorId,
        /// The class whose level changed.
        class: ClassId,
        /// Level before the gain.
        from: u32,
        /// Level after the gain.
        to: u32,
    },
    /// The dual-mode base level went up.
    BaseLevelUp {
        /// The actor that levelled.
        actor: ActorId,
        /// The base class.
        class: ClassId,
        /// Level before the gain.
        from: u32,
        /// Level after the gain.
        to: u32,
    },

    // Unlocks
    /// A skill was learned.
    SkillLearned {
        /// The actor learning the skill.
        actor: ActorId,
        /// The learned skill.
        skill: SkillId,
    },
    /// An unlock rule granted a class.
    ClassUnlocked {
        /// The actor unlocking the class.
        actor: ActorId,
        /// The unlocked class.
        class: ClassId,
    },
}

impl ProgressEventKind {
    /// The actor this event concerns.
    pub fn actor(&self) -> ActorId {
        match self {
            Self::ClassSwapped { actor, .. }
            | Self::ClassGranted { actor, .. }
            | Self::ClassDisabled { actor, .. }
            | Self::ClassRevoked { actor, .. }
            | Self::LevelUp { actor, .. }
            | Self::BaseLevelUp { actor, .. }
            | Self::SkillLearned { actor, .. }
            | Self::ClassUnlocked { actor, .. } => *actor,
        }
    }

    /// Check whether a given actor is involved in this event.
    pub fn involves(&self, id: ActorId) -> bool {
        self.actor() == id
    }
}

/// A record of something that happened to an actor's progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Monotonic sequence number, unique within one engine.
    pub sequence: u64,
    /// The specific kind of event that occurred.
    pub kind: ProgressEventKind,
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ProgressEventKind::ClassSwapped {
                actor,
                from,
                to,
                level,
            } => write!(f, "{actor} changed class {from} -> {to} (level {level})"),
            ProgressEventKind::ClassGranted { actor, class } => {
                write!(f, "{actor} was granted {class}")
            }
            ProgressEventKind::ClassDisabled { actor, class } => {
                write!(f, "{actor} had {class} disabled")
            }
            ProgressEventKind::ClassRevoked { actor, class } => {
                write!(f, "{actor} lost {class}")
            }
            ProgressEventKind::LevelUp {
                actor,
                class,
                from,
                to,
            } => write!(f, "{actor} reached level {to} in {class} (was {from})"),
            ProgressEventKind::BaseLevelUp {
                actor,
                class,
                from,
                to,
            } => write!(f, "{actor} reached base level {to} in {class} (was {from})"),
            ProgressEventKind::SkillLearned { actor, skill } => {
                write!(f, "{actor} learned {skill}")
            }
            ProgressEventKind::ClassUnlocked { actor, class } => {
                write!(f, "{actor} unlocked {class}")
            }
        }
    }
}

/// Accumulates events until the host drains them.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<ProgressEvent>,
    max_events: usize,
    next_sequence: u64,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
            next_sequence: 0,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, kind: ProgressEventKind) {
        self.events.push(ProgressEvent {
            sequence: self.next_sequence,
            kind,
        });
        self.next_sequence += 1;
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    /// Return all events involving the given actor.
    pub fn events_for_actor(&self, id: ActorId) -> Vec<&ProgressEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Remove and return all recorded events, oldest first.
    pub fn drain(&mut self) -> Vec<ProgressEvent> {
        std::mem::take(&mut self.events)
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
