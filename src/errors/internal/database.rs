//! Persistence failures raised by the credential store and the activity log

use thiserror::Error;

/// A failed SeaORM call, labelled with the store operation that issued it
///
/// `operation` is a short snake_case label such as `find_by_username`,
/// `increment_failed_attempts`, `lock_account`, `record_successful_login`,
/// `set_password_hash`, `assign_role_insert` or `append_activity`. Callers
/// only ever see it inside `AuthError::StoreUnavailable`.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Opening the transaction around increment-and-lock, role grants or creation
    #[error("Starting transaction failed: {source}")]
    TransactionBegin {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Committing transaction failed: {source}")]
    TransactionCommit {
        #[source]
        source: sea_orm::DbErr,
    },
}
