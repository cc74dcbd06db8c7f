use crate::id::{ActorId, ClassId, SkillId};

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when reading or querying the game database.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The requested class does not exist in the database.
    #[error("class not found: {0}")]
    ClassNotFound(ClassId),

    /// The requested skill does not exist in the database.
    #[error("skill not found: {0}")]
    SkillNotFound(SkillId),

    /// The requested actor does not exist in the database.
    #[error("actor not found: {0}")]
    ActorNotFound(ActorId),

    /// Two definitions in the same table share an id.
    #[error("duplicate {table} id: {id}")]
    DuplicateId {
        /// Which table the duplicate was found in.
        table: &'static str,
        /// The repeated id.
        id: u32,
    },

    /// The database file could not be decoded.
    #[error("invalid database json: {0}")]
    Json(#[from] serde_json::Error),
}
