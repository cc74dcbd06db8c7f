use serde::{Deserialize, Serialize};

use crate::id::{SkillId, SkillTypeId};

/// A skill as authored in the game database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillDefinition {
    /// Skill id.
    pub id: SkillId,
    /// Display name.
    pub name: String,
    /// The category the skill belongs to.
    pub skill_type: SkillTypeId,
}

impl SkillDefinition {
    /// Create a skill definition.
    pub fn new(id: SkillId, name: impl Into<String>, skill_type: SkillTypeId) -> Self {
        Self {
            id,
            name: name.into(),
            skill_type,
        }
    }
}
