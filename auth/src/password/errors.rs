use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Invalid password: {0}")]
    InvalidInput(String),

    #[error("Invalid work factor: {0}")]
    InvalidWorkFactor(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}
