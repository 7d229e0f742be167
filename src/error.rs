//! Error types for vault operations.

use thiserror::Error;

/// Errors that can occur while authenticating or working with the vault.
#[derive(Error, Debug)]
pub enum VaultError {
    /// User input was rejected before any state changed.
    #[error("{0}")]
    Validation(String),

    #[error("No record found for '{title}' / '{account}'")]
    NotFound { title: String, account: String },

    /// The supplied key did not reproduce the stored verification token.
    #[error("Decryption failed: wrong key or data corrupted")]
    IntegrityMismatch,

    #[error("Recovery failed: {0}")]
    RecoveryFailure(String),

    #[error("Security data corrupted: {0}")]
    CorruptState(String),

    #[error("Malformed database line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    pub(crate) fn not_found(title: &str, account: &str) -> Self {
        VaultError::NotFound {
            title: title.to_string(),
            account: account.to_string(),
        }
    }
}

pub type VaultResult<T> = Result<T, VaultError>;
