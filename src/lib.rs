//! Pwvault - a master-passphrase password vault.
//!
//! This library provides the core of the pwvault password manager: master
//! passphrase enrollment, login and recovery, the strength-ordered credential
//! store with its line-based persistence, and a shell-like interactive
//! interface over an unlocked vault.
//!
//! The ciphers in [`crypto`] are obfuscation only and offer no real protection.

pub mod auth;
pub mod cli;
pub mod config;
pub mod console;
pub mod credentials;
pub mod crypto;
pub mod error;
pub mod logging;
pub mod manager;
pub mod shell;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use auth::{AuthOutcome, Authenticator};
pub use config::VaultPaths;
pub use console::{Console, MemoryConsole, TerminalConsole};
pub use credentials::{CredentialRecord, ExpiryStatus};
pub use crypto::StrengthLevel;
pub use error::{VaultError, VaultResult};
pub use logging::{LogConfig, init_logging};
pub use manager::Vault;
pub use shell::Shell;
pub use store::Store;
