//! Declarative unlock rules.
//!
//! A rule pairs something an actor can gain (a skill or a class) with the
//! condition that must hold before it is granted. Rules are pure data: the
//! progression engine evaluates them, this module only describes them.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{ClassId, SkillId};

/// Which progression a level condition is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelScope {
    /// The currently active class.
    Active,
    /// The dual-mode base class.
    Base,
}

/// How the entries of a threshold group combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combinator {
    /// Every threshold must be met.
    All,
    /// At least one threshold must be met.
    Any,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "AND"),
            Self::Any => write!(f, "OR"),
        }
    }
}

/// A minimum level in a specific class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassThreshold {
    /// The class whose level is checked.
    pub class: ClassId,
    /// Minimum level required.
    pub level: u32,
}

impl ClassThreshold {
    /// Create a threshold.
    pub fn new(class: ClassId, level: u32) -> Self {
        Self { class, level }
    }
}

/// A condition gating an unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum UnlockCondition {
    /// Level in the active (or base) progression reaches a threshold.
    Level {
        /// Which progression is measured.
        scope: LevelScope,
        /// Minimum level required.
        threshold: u32,
    },
    /// The actor knows every listed skill at the same time.
    SkillSet {
        /// Skills that must all be known.
        required: BTreeSet<SkillId>,
    },
    /// Levels in several classes, combined with AND or OR.
    ClassThresholds {
        /// How the thresholds combine.
        combinator: Combinator,
        /// The per-class thresholds, in authoring order.
        thresholds: Vec<ClassThreshold>,
    },
}

impl UnlockCondition {
    /// Level threshold in the active class.
    pub fn active_level(threshold: u32) -> Self {
        Self::Level {
            scope: LevelScope::Active,
            threshold,
        }
    }

    /// Level threshold in the dual-mode base class.
    pub fn base_level(threshold: u32) -> Self {
        Self::Level {
            scope: LevelScope::Base,
            threshold,
        }
    }

    /// Requires every skill in `skills` to be known.
    pub fn skills(skills: impl IntoIterator<Item = SkillId>) -> Self {
        Self::SkillSet {
            required: skills.into_iter().collect(),
        }
    }

    /// Requires every threshold to be met.
    pub fn all_of(thresholds: Vec<ClassThreshold>) -> Self {
        Self::ClassThresholds {
            combinator: Combinator::All,
            thresholds,
        }
    }

    /// Requires at least one threshold to be met.
    pub fn any_of(thresholds: Vec<ClassThreshold>) -> Self {
        Self::ClassThresholds {
            combinator: Combinator::Any,
            thresholds,
        }
    }

    /// Returns true if the condition depends on the known-skill set.
    ///
    /// Such conditions are evaluated after every level-based condition in
    /// the same pass.
    pub fn depends_on_skills(&self) -> bool {
        matches!(self, Self::SkillSet { .. })
    }

    /// Returns false for a threshold group with no entries, which can never
    /// be satisfied.
    pub fn is_satisfiable(&self) -> bool {
        match self {
            Self::ClassThresholds { thresholds, .. } => !thresholds.is_empty(),
            Self::SkillSet { required } => !required.is_empty(),
            Self::Level { .. } => true,
        }
    }
}

impl fmt::Display for UnlockCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Level {
                scope: LevelScope::Active,
                threshold,
            } => write!(f, "level >= {threshold}"),
            Self::Level {
                scope: LevelScope::Base,
                threshold,
            } => write!(f, "base level >= {threshold}"),
            Self::SkillSet { required } => {
                let ids: Vec<String> = required.iter().map(|s| s.0.to_string()).collect();
                write!(f, "knows skills [{}]", ids.join(", "))
            }
            Self::ClassThresholds {
                combinator,
                thresholds,
            } => {
                let parts: Vec<String> = thresholds
                    .iter()
                    .map(|t| format!("{} >= {}", t.class, t.level))
                    .collect();
                write!(f, "{combinator}({})", parts.join(", "))
            }
        }
    }
}

/// What an unlock grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockTarget {
    /// Learn a skill (together with its skill type).
    Skill(SkillId),
    /// Add or re-enable a class in the ledger.
    Class(ClassId),
}

impl fmt::Display for UnlockTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill(id) => write!(f, "{id}"),
            Self::Class(id) => write!(f, "{id}"),
        }
    }
}

/// A target paired with the condition that unlocks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockRule {
    /// What is granted.
    pub target: UnlockTarget,
    /// When it is granted.
    pub condition: UnlockCondition,
}

impl UnlockRule {
    /// A rule that teaches a skill.
    pub fn skill(skill: SkillId, condition: UnlockCondition) -> Self {
        Self {
            target: UnlockTarget::Skill(skill),
            condition,
        }
    }

    /// A rule that unlocks a class.
    pub fn class(class: ClassId, condition: UnlockCondition) -> Self {
        Self {
            target: UnlockTarget::Class(class),
            condition,
        }
    }
}

impl fmt::Display for UnlockRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} when {}", self.target, self.condition)
    }
}
