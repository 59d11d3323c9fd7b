use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to write activity record: {0}")]
    LogWriteFailed(String),

    #[error("Unknown activity type in log: {0}")]
    UnknownActivityType(String),
}
