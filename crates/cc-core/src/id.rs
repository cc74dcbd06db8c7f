use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! database_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

database_id!(
    /// Index into the class table.
    ClassId,
    "class"
);
database_id!(
    /// Index into the skill table.
    SkillId,
    "skill"
);
database_id!(
    /// Index into the actor table.
    ActorId,
    "actor"
);
database_id!(
    /// Skill category (magic, special, ...). An actor can only use skills
    /// whose type it has access to.
    SkillTypeId,
    "stype"
);
