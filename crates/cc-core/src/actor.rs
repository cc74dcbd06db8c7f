use serde::{Deserialize, Serialize};

use crate::id::{ActorId, ClassId};

/// An actor as authored in the game database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorDefinition {
    /// Actor id.
    pub id: ActorId,
    /// Display name.
    pub name: String,
    /// The class the actor starts in.
    pub class_id: ClassId,
    /// Starting level.
    #[serde(default = "default_initial_level")]
    pub initial_level: u32,
    /// Free-form annotation text.
    #[serde(default)]
    pub note: String,
}

fn default_initial_level() -> u32 {
    1
}

impl ActorDefinition {
    /// Create an actor starting at level 1 with no annotations.
    pub fn new(id: ActorId, name: impl Into<String>, class_id: ClassId) -> Self {
        Self {
            id,
            name: name.into(),
            class_id,
            initial_level: 1,
            note: String::new(),
        }
    }

    /// Set the starting level.
    pub fn with_initial_level(mut self, level: u32) -> Self {
        self.initial_level = level;
        self
    }

    /// Set the annotation text.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}
