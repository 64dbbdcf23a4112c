use cinegrade_core::error::CoreError;

/// Failure of a multi-step write: either a business rule tripped inside the
/// transaction, or the database itself failed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}
