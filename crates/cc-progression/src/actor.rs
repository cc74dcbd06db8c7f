//! Runtime progression state of one actor.

use std::collections::BTreeSet;

use cc_core::{ActorId, ClassId, SkillId, SkillTypeId};
use serde::{Deserialize, Serialize};

use crate::ledger::{ClassLedger, ClassRecord};
use crate::unlock::UnlockBook;

/// Everything the engine tracks for one actor.
///
/// Levels, parameters and the skill-type list are derived on demand from
/// this state and the database, so the struct can be saved and restored
/// as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorProgress {
    /// The actor this state belongs to.
    pub actor: ActorId,
    /// Classes held, in grant order.
    pub ledger: ClassLedger,
    /// The active class. Always present in the ledger.
    pub active: ClassId,
    /// Experience pool used in shared mode.
    #[serde(default)]
    pub shared_experience: i64,
    /// Dual-mode base progression. Not part of the ledger and never selectable.
    #[serde(default)]
    pub base: Option<ClassRecord>,
    /// Parameters accumulated by stat-gain level-ups, indexed by parameter.
    #[serde(default)]
    pub stat_params: Vec<i64>,
    /// Current HP.
    pub hp: i64,
    /// Current MP.
    pub mp: i64,
    /// Skills taught by the active class at its current level.
    #[serde(default)]
    pub class_skills: BTreeSet<SkillId>,
    /// Skills learned through unlock rules. Survive class swaps.
    #[serde(default)]
    pub innate_skills: BTreeSet<SkillId>,
    /// Skill types granted together with innate skills.
    #[serde(default)]
    pub innate_skill_types: BTreeSet<SkillTypeId>,
    /// Pending and granted unlock rules.
    #[serde(default)]
    pub unlocks: UnlockBook,
}

impl ActorProgress {
    /// Every skill the actor currently knows.
    pub fn known_skills(&self) -> BTreeSet<SkillId> {
        self.class_skills
            .union(&self.innate_skills)
            .copied()
            .collect()
    }

    /// Returns true if the actor knows `skill` through its class or innately.
    pub fn knows(&self, skill: SkillId) -> bool {
        self.class_skills.contains(&skill) || self.innate_skills.contains(&skill)
    }

    /// The dual-mode base class, if any.
    pub fn base_class(&self) -> Option<ClassId> {
        self.base.as_ref().map(|b| b.class)
    }
}
