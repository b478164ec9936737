//! Error types for the persistence layer.

/// Errors that can occur during interaction log operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A database operation failed.
    #[error("store database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A pooled connection could not be checked out.
    #[error("store pool error: {0}")]
    Pool(#[from] r2d2::Error),
}
