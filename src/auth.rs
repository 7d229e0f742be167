//! Master passphrase enrollment, login and security-question recovery.
//!
//! The flow is a small state machine driven by [`Authenticator::authenticate`]:
//!
//! ```text
//! NoMasterSet -> Enrolling -> Authenticated
//! LoginAttempt(1..=3) -> Authenticated | Locked
//! Locked -> Recovering -> Resetting -> ResetComplete   (or Denied)
//! ```
//!
//! A successful reset ends the session; the user logs in again on the next run.

use crate::config::VaultPaths;
use crate::console::Console;
use crate::crypto::integrity_transform;
use crate::error::{VaultError, VaultResult};
use crate::storage;

pub const MIN_PASSPHRASE_LEN: usize = 8;
pub const MAX_LOGIN_ATTEMPTS: u32 = 3;
pub const REQUIRED_CORRECT_ANSWERS: usize = 2;

pub const SECURITY_QUESTIONS: [&str; 3] = [
    "What is your mother's maiden name?",
    "What was the name of your first pet?",
    "What city were you born in?",
];

/// Where the authentication flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    NoMasterSet,
    Enrolling,
    LoginAttempt(u32),
    Locked,
    Recovering,
    Resetting,
}

/// How an authentication attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    /// The store may be opened.
    Authenticated,
    /// The master passphrase was replaced; the session must end.
    ResetComplete,
    /// Login attempts ran out and recovery was declined.
    Denied,
}

/// Token stored for a security answer: the lower-cased answer, transformed.
pub fn answer_token(answer: &str) -> String {
    integrity_transform(&answer.to_lowercase())
}

/// Checks a proposed passphrase and its confirmation.
pub fn validate_new_passphrase(passphrase: &str, confirmation: &str) -> VaultResult<()> {
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(VaultError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSPHRASE_LEN
        )));
    }
    if passphrase != confirmation {
        return Err(VaultError::Validation("Passwords don't match".to_string()));
    }
    Ok(())
}

/// Drives enrollment, login and recovery against the vault's token files.
pub struct Authenticator<'a> {
    paths: &'a VaultPaths,
}

impl<'a> Authenticator<'a> {
    pub fn new(paths: &'a VaultPaths) -> Self {
        Self { paths }
    }

    pub fn has_master(&self) -> VaultResult<bool> {
        Ok(storage::read_token(&self.paths.master)?.is_some())
    }

    /// Runs the full flow until it reaches a terminal outcome.
    pub fn authenticate(&self, console: &mut dyn Console) -> VaultResult<AuthOutcome> {
        let stored = storage::read_token(&self.paths.master)?;
        let mut state = match stored {
            Some(_) => AuthState::LoginAttempt(1),
            None => AuthState::NoMasterSet,
        };

        loop {
            log::debug!("Authentication state: {:?}", state);
            state = match state {
                AuthState::NoMasterSet => {
                    console.say("No master password found.");
                    AuthState::Enrolling
                }
                AuthState::Enrolling => {
                    self.enroll(console)?;
                    return Ok(AuthOutcome::Authenticated);
                }
                AuthState::LoginAttempt(n) => {
                    let input = console.read_masked_line(&format!(
                        "Enter master password (Attempt {} of {}): ",
                        n, MAX_LOGIN_ATTEMPTS
                    ))?;
                    if self.verify_master(&input)? {
                        console.say("Login successful!");
                        log::info!("Login succeeded on attempt {}", n);
                        self.upgrade_token_files()?;
                        return Ok(AuthOutcome::Authenticated);
                    }
                    log::info!("Failed login attempt {}", n);
                    if n < MAX_LOGIN_ATTEMPTS {
                        console.say("Incorrect password. Try again.");
                        AuthState::LoginAttempt(n + 1)
                    } else {
                        AuthState::Locked
                    }
                }
                AuthState::Locked => {
                    console.say("Maximum login attempts reached.");
                    if console.confirm("Do you want to recover your password? (y/n): ")? {
                        AuthState::Recovering
                    } else {
                        log::info!("Recovery declined");
                        return Ok(AuthOutcome::Denied);
                    }
                }
                AuthState::Recovering => {
                    self.recover(console)?;
                    AuthState::Resetting
                }
                AuthState::Resetting => {
                    self.reset_master(console)?;
                    console.say("Please restart the program to login with new password.");
                    return Ok(AuthOutcome::ResetComplete);
                }
            };
        }
    }

    /// Rewrites token files that still hold unmarked lines in the current form.
    fn upgrade_token_files(&self) -> VaultResult<()> {
        if storage::has_unmarked_tokens(&self.paths.master)? {
            if let Some(token) = storage::read_token(&self.paths.master)? {
                storage::write_token(&self.paths.master, &token)?;
                log::info!("Rewrote {} in the current format", self.paths.master.display());
            }
        }
        if storage::has_unmarked_tokens(&self.paths.security)? {
            if let Some(tokens) = storage::read_tokens(&self.paths.security)? {
                storage::write_tokens(&self.paths.security, &tokens)?;
                log::info!("Rewrote {} in the current format", self.paths.security.display());
            }
        }
        Ok(())
    }

    /// Compares `input` against the stored master token.
    pub fn verify_master(&self, input: &str) -> VaultResult<bool> {
        Ok(storage::read_token(&self.paths.master)?
            .is_some_and(|stored| integrity_transform(input) == stored))
    }

    /// First-run setup: master passphrase, then the three security answers.
    pub fn enroll(&self, console: &mut dyn Console) -> VaultResult<()> {
        let passphrase = prompt_new_passphrase(
            console,
            "Create new master password (min 8 characters): ",
            "Confirm master password: ",
        )?;
        self.store_master(&passphrase)?;
        console.say("Master password created successfully!");

        console.say("=== Setup Security Questions (for password recovery) ===");
        let mut answers = Vec::with_capacity(SECURITY_QUESTIONS.len());
        for (i, question) in SECURITY_QUESTIONS.iter().enumerate() {
            console.say(&format!("Question {}: {}", i + 1, question));
            answers.push(console.read_line("Your answer: ")?);
        }
        self.store_answers(&answers)?;
        console.say("Security questions set up successfully!");
        log::info!("Enrollment completed");
        Ok(())
    }

    /// Persists the master token for `passphrase`.
    pub fn store_master(&self, passphrase: &str) -> VaultResult<()> {
        self.paths.ensure_dir()?;
        storage::write_token(&self.paths.master, &integrity_transform(passphrase))
    }

    /// Persists the answer tokens, one per question.
    pub fn store_answers(&self, answers: &[String]) -> VaultResult<()> {
        if answers.len() != SECURITY_QUESTIONS.len() {
            return Err(VaultError::Validation(format!(
                "Expected {} answers, got {}",
                SECURITY_QUESTIONS.len(),
                answers.len()
            )));
        }
        self.paths.ensure_dir()?;
        let tokens: Vec<String> = answers.iter().map(|a| answer_token(a)).collect();
        storage::write_tokens(&self.paths.security, &tokens)
    }

    /// Counts how many of `answers` match the stored tokens.
    pub fn count_correct_answers(&self, answers: &[String]) -> VaultResult<usize> {
        let stored = self.stored_answer_tokens()?;
        Ok(stored
            .iter()
            .zip(answers)
            .filter(|(token, answer)| answer_token(answer) == **token)
            .count())
    }

    /// Asks every question and passes when enough answers match.
    pub fn recover(&self, console: &mut dyn Console) -> VaultResult<()> {
        // Fail before asking anything if the answers cannot be checked.
        self.stored_answer_tokens()?;

        console.say("=== Password Recovery - Answer Security Questions ===");
        let mut answers = Vec::with_capacity(SECURITY_QUESTIONS.len());
        for (i, question) in SECURITY_QUESTIONS.iter().enumerate() {
            console.say(&format!("Question {}: {}", i + 1, question));
            answers.push(console.read_line("Your answer: ")?);
        }

        let correct = self.count_correct_answers(&answers)?;
        log::info!(
            "Recovery answered {} of {} correctly",
            correct,
            SECURITY_QUESTIONS.len()
        );
        if correct >= REQUIRED_CORRECT_ANSWERS {
            console.say("Identity verified! You can now reset your master password.");
            Ok(())
        } else {
            Err(VaultError::RecoveryFailure(
                "Not enough correct answers".to_string(),
            ))
        }
    }

    /// Replaces the master passphrase after a successful recovery.
    pub fn reset_master(&self, console: &mut dyn Console) -> VaultResult<()> {
        let passphrase = prompt_new_passphrase(
            console,
            "Enter new master password: ",
            "Confirm new master password: ",
        )?;
        self.store_master(&passphrase)?;
        console.say("Master password reset successfully!");
        log::info!("Master password reset");
        Ok(())
    }

    fn stored_answer_tokens(&self) -> VaultResult<Vec<String>> {
        let tokens = storage::read_tokens(&self.paths.security)?.ok_or_else(|| {
            VaultError::RecoveryFailure(
                "No security questions found. Cannot recover password.".to_string(),
            )
        })?;
        if tokens.len() != SECURITY_QUESTIONS.len() {
            return Err(VaultError::CorruptState(format!(
                "expected {} security answers, found {}",
                SECURITY_QUESTIONS.len(),
                tokens.len()
            )));
        }
        Ok(tokens)
    }
}

fn prompt_new_passphrase(
    console: &mut dyn Console,
    prompt: &str,
    confirm_prompt: &str,
) -> VaultResult<String> {
    let passphrase = console.read_masked_line(prompt)?;
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(VaultError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSPHRASE_LEN
        )));
    }
    let confirmation = console.read_masked_line(confirm_prompt)?;
    validate_new_passphrase(&passphrase, &confirmation)?;
    Ok(passphrase)
}
