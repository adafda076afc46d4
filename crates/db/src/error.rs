use hive_core::error::CoreError;
use hive_core::types::DbId;

/// Error returned by every repository operation.
///
/// Domain failures travel as [`CoreError`]; anything the database itself
/// reports (connectivity, I/O, constraint failures other than the ones the
/// repositories translate) stays a raw [`sqlx::Error`].
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

impl RepoError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::Core(CoreError::NotFound { entity, id })
    }
}

/// Whether `err` is a unique-constraint violation reported by the database.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
