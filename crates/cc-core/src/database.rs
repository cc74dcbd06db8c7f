//! The static game database.
//!
//! A [`Database`] owns every class, skill, and actor definition. It is
//! built once at startup (usually from JSON via [`Database::from_json`])
//! and only read afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::actor::ActorDefinition;
use crate::class::ClassDefinition;
use crate::error::{CoreError, CoreResult};
use crate::id::{ActorId, ClassId, SkillId};
use crate::skill::SkillDefinition;

/// On-disk shape of the database: plain lists of definitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DatabaseFile {
    #[serde(default = "default_max_level")]
    max_level: u32,
    #[serde(default)]
    classes: Vec<ClassDefinition>,
    #[serde(default)]
    skills: Vec<SkillDefinition>,
    #[serde(default)]
    actors: Vec<ActorDefinition>,
}

fn default_max_level() -> u32 {
    99
}

/// Every static definition, indexed by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "DatabaseFile", into = "DatabaseFile")]
pub struct Database {
    max_level: u32,
    classes: BTreeMap<ClassId, ClassDefinition>,
    skills: BTreeMap<SkillId, SkillDefinition>,
    actors: BTreeMap<ActorId, ActorDefinition>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new(default_max_level())
    }
}

impl TryFrom<DatabaseFile> for Database {
    type Error = CoreError;

    fn try_from(file: DatabaseFile) -> CoreResult<Self> {
        let mut db = Database::new(file.max_level);
        for class in file.classes {
            let id = class.id;
            if db.classes.insert(id, class).is_some() {
                return Err(CoreError::DuplicateId {
                    table: "class",
                    id: id.0,
                });
            }
        }
        for skill in file.skills {
            let id = skill.id;
            if db.skills.insert(id, skill).is_some() {
                return Err(CoreError::DuplicateId {
                    table: "skill",
                    id: id.0,
                });
            }
        }
        for actor in file.actors {
            let id = actor.id;
            if db.actors.insert(id, actor).is_some() {
                return Err(CoreError::DuplicateId {
                    table: "actor",
                    id: id.0,
                });
            }
        }
        Ok(db)
    }
}

impl From<Database> for DatabaseFile {
    fn from(db: Database) -> Self {
        Self {
            max_level: db.max_level,
            classes: db.classes.into_values().collect(),
            skills: db.skills.into_values().collect(),
            actors: db.actors.into_values().collect(),
        }
    }
}

impl Database {
    /// Create an empty database with the given level cap.
    pub fn new(max_level: u32) -> Self {
        Self {
            max_level,
            classes: BTreeMap::new(),
            skills: BTreeMap::new(),
            actors: BTreeMap::new(),
        }
    }

    /// Decode a database from its JSON representation.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the database as pretty-printed JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The engine-wide level cap.
    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    /// Add or replace a class definition.
    pub fn insert_class(&mut self, class: ClassDefinition) {
        self.classes.insert(class.id, class);
    }

    /// Add or replace a skill definition.
    pub fn insert_skill(&mut self, skill: SkillDefinition) {
        self.skills.insert(skill.id, skill);
    }

    /// Add or replace an actor definition.
    pub fn insert_actor(&mut self, actor: ActorDefinition) {
        self.actors.insert(actor.id, actor);
    }

    /// Look up a class.
    pub fn class(&self, id: ClassId) -> CoreResult<&ClassDefinition> {
        self.classes.get(&id).ok_or(CoreError::ClassNotFound(id))
    }

    /// Look up a skill.
    pub fn skill(&self, id: SkillId) -> CoreResult<&SkillDefinition> {
        self.skills.get(&id).ok_or(CoreError::SkillNotFound(id))
    }

    /// Look up an actor.
    pub fn actor(&self, id: ActorId) -> CoreResult<&ActorDefinition> {
        self.actors.get(&id).ok_or(CoreError::ActorNotFound(id))
    }

    /// All classes in id order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.values()
    }

    /// All skills in id order.
    pub fn skills(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.skills.values()
    }

    /// All actors in id order.
    pub fn actors(&self) -> impl Iterator<Item = &ActorDefinition> {
        self.actors.values()
    }

    /// Check cross-references and value ranges.
    ///
    /// Malformed curves and out-of-range learnings are warnings; dangling
    /// references and impossible levels are errors.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        if self.max_level == 0 {
            issues.push(ValidationIssue::error("database", "max_level must be at least 1"));
        }

        for class in self.classes.values() {
            let label = format!("{} '{}'", class.id, class.name);
            if !class.curve.is_well_formed() {
                issues.push(ValidationIssue::warning(
                    &label,
                    "experience curve coefficients should be finite and positive",
                ));
            }
            for learning in &class.learnings {
                if !self.skills.contains_key(&learning.skill) {
                    issues.push(ValidationIssue::error(
                        &label,
                        format!("learning references unknown {}", learning.skill),
                    ));
                }
                if learning.level == 0 || learning.level > self.max_level {
                    issues.push(ValidationIssue::warning(
                        &label,
                        format!(
                            "{} is taught at level {}, outside 1..={}",
                            learning.skill, learning.level, self.max_level
                        ),
                    ));
                }
            }
        }

        for actor in self.actors.values() {
            let label = format!("{} '{}'", actor.id, actor.name);
            if !self.classes.contains_key(&actor.class_id) {
                issues.push(ValidationIssue::error(
                    &label,
                    format!("starting class {} does not exist", actor.class_id),
                ));
            }
            if actor.initial_level == 0 || actor.initial_level > self.max_level {
                issues.push(ValidationIssue::error(
                    &label,
                    format!(
                        "initial level {} outside 1..={}",
                        actor.initial_level, self.max_level
                    ),
                ));
            }
        }

        issues
    }
}

/// A warning or error found while validating a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// The definition the issue was found on.
    pub entity: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    /// Create an error-level issue.
    pub fn error(entity: &str, message: impl Into<String>) -> Self {
        Self {
            entity: entity.to_string(),
            message: message.into(),
            is_error: true,
        }
    }

    /// Create a warning-level issue.
    pub fn warning(entity: &str, message: impl Into<String>) -> Self {
        Self {
            entity: entity.to_string(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.entity, self.message)
    }
}
