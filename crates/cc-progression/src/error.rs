//! Error types for the progression engine.

use cc_core::{ActorId, ClassId, CoreError, SkillId};

/// Errors raised by progression operations.
///
/// Variants fall in two groups. Configuration errors mean the database or
/// configuration cannot support the request and should be fixed by the
/// designer. Invalid operations are requests that make no sense for the
/// current state; they leave the state untouched and are safe to ignore.
#[derive(Debug, thiserror::Error)]
pub enum ProgressError {
    /// A class is referenced that has no definition (and so no curve).
    #[error("class {0} has no definition")]
    UnknownClass(ClassId),

    /// A skill is referenced that has no definition.
    #[error("skill {0} has no definition")]
    UnknownSkill(SkillId),

    /// An actor is referenced that has no definition.
    #[error("actor {0} has no definition")]
    UnknownActor(ActorId),

    /// An actor was used before being set up.
    #[error("actor {0} has not been set up")]
    ActorNotSetUp(ActorId),

    /// Dual mode needs a base class and none could be chosen.
    #[error("actor {0} has no base class for dual mode")]
    MissingBaseClass(ActorId),

    /// The class is already held and enabled.
    #[error("class {0} is already enabled")]
    AlreadyEnabled(ClassId),

    /// The class is already disabled, or not held at all.
    #[error("class {0} is already disabled")]
    AlreadyDisabled(ClassId),

    /// The class is the actor's only class and cannot be revoked.
    #[error("class {0} is the only class held")]
    SoleClass(ClassId),

    /// The class is not in the actor's ledger.
    #[error("class {0} is not held")]
    ClassNotHeld(ClassId),

    /// The class is held but disabled, so it cannot be selected.
    #[error("class {0} is disabled")]
    ClassDisabled(ClassId),

    /// The class is already the active class.
    #[error("class {0} is already active")]
    AlreadyActive(ClassId),

    /// A database error that does not map to a more specific variant.
    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for ProgressError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ClassNotFound(id) => Self::UnknownClass(id),
            CoreError::SkillNotFound(id) => Self::UnknownSkill(id),
            CoreError::ActorNotFound(id) => Self::UnknownActor(id),
            other => Self::Core(other),
        }
    }
}

impl ProgressError {
    /// Returns true for requests that were refused without changing state.
    pub fn is_invalid_operation(&self) -> bool {
        matches!(
            self,
            Self::AlreadyEnabled(_)
                | Self::AlreadyDisabled(_)
                | Self::SoleClass(_)
                | Self::ClassNotHeld(_)
                | Self::ClassDisabled(_)
                | Self::AlreadyActive(_)
        )
    }
}

/// Convenience result type for progression operations.
pub type ProgressResult<T> = Result<T, ProgressError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_configuration_errors() {
        let err: ProgressError = CoreError::ClassNotFound(ClassId(4)).into();
        assert!(matches!(err, ProgressError::UnknownClass(ClassId(4))));
        assert!(!err.is_invalid_operation());
    }

    #[test]
    fn invalid_operations_classified() {
        assert!(ProgressError::SoleClass(ClassId(1)).is_invalid_operation());
        assert!(ProgressError::AlreadyEnabled(ClassId(1)).is_invalid_operation());
        assert!(!ProgressError::MissingBaseClass(ActorId(1)).is_invalid_operation());
    }
}
