//! Application error types.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] auth_store::AuthStoreError),

    #[error("Registration error: {0}")]
    Registration(#[from] registration_client::RegistrationError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Submission task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Registration did not complete")]
    NotRegistered,
}

/// Result type alias for application errors.
pub type AppResult<T> = Result<T, AppError>;
