//! The credential record and its time-based helpers.

use chrono::{Duration, Local, NaiveDateTime, Timelike};
use std::fmt;

use crate::crypto::{
    StrengthLevel, classify_strength, confidentiality_transform, integrity_transform,
    score_strength,
};
use crate::error::{VaultError, VaultResult};

/// Days a password stays valid after it is created or rotated.
pub const EXPIRY_DAYS: i64 = 90;

/// Window before expiry in which a record is reported as expiring soon.
pub const EXPIRY_WARNING_DAYS: i64 = 7;

/// Layout used for every timestamp the vault writes.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `ctime`-style layout found in vaults written by older releases.
const LEGACY_TIMESTAMP_FORMATS: &[&str] = &["%a %b %e %H:%M:%S %Y", "%a %b %d %H:%M:%S %Y"];

/// Current local time truncated to whole seconds, so it survives a save/load cycle.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a stored timestamp, accepting the legacy `ctime` layout as well.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    std::iter::once(TIMESTAMP_FORMAT)
        .chain(LEGACY_TIMESTAMP_FORMATS.iter().copied())
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn expiry_for(created_at: NaiveDateTime) -> NaiveDateTime {
    created_at + Duration::days(EXPIRY_DAYS)
}

/// Freshness of a record relative to a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryStatus {
    Valid,
    ExpiringSoon,
    Expired,
}

impl fmt::Display for ExpiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExpiryStatus::Valid => "Valid",
            ExpiryStatus::ExpiringSoon => "Expiring Soon",
            ExpiryStatus::Expired => "Expired",
        };
        f.write_str(s)
    }
}

pub fn check_expiry(expires_at: NaiveDateTime, now: NaiveDateTime) -> ExpiryStatus {
    if expires_at <= now {
        ExpiryStatus::Expired
    } else if expires_at - now <= Duration::days(EXPIRY_WARNING_DAYS) {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Valid
    }
}

/// A single stored site/account credential.
///
/// The plaintext is never kept; only the keyed payload and the verification
/// token derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    title: String,
    account: String,
    verification_token: String,
    protected_payload: Vec<u8>,
    key: u8,
    strength: u8,
    created_at: NaiveDateTime,
    expires_at: NaiveDateTime,
}

impl CredentialRecord {
    /// Builds a record for `plaintext`, protected with `key`.
    pub fn new(
        title: impl Into<String>,
        account: impl Into<String>,
        plaintext: &str,
        key: u8,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            title: title.into(),
            account: account.into(),
            verification_token: integrity_transform(plaintext),
            protected_payload: confidentiality_transform(plaintext.as_bytes(), key),
            key,
            strength: score_strength(plaintext),
            created_at,
            expires_at: expiry_for(created_at),
        }
    }

    /// Reassembles a record from persisted fields without recomputing anything.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        title: String,
        account: String,
        protected_payload: Vec<u8>,
        key: u8,
        strength: u8,
        verification_token: String,
        created_at: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> Self {
        Self {
            title,
            account,
            verification_token,
            protected_payload,
            key,
            strength,
            created_at,
            expires_at,
        }
    }

    /// Replaces the password, keeping the key and restarting the expiry clock.
    pub fn rotate(&mut self, plaintext: &str, updated_at: NaiveDateTime) {
        self.protected_payload = confidentiality_transform(plaintext.as_bytes(), self.key);
        self.verification_token = integrity_transform(plaintext);
        self.strength = score_strength(plaintext);
        self.created_at = updated_at;
        self.expires_at = expiry_for(updated_at);
    }

    /// Recovers the plaintext with `key`, refusing anything that fails verification.
    pub fn reveal(&self, key: u8) -> VaultResult<String> {
        let bytes = confidentiality_transform(&self.protected_payload, key);
        let plaintext = String::from_utf8(bytes).map_err(|_| VaultError::IntegrityMismatch)?;
        if integrity_transform(&plaintext) == self.verification_token {
            Ok(plaintext)
        } else {
            Err(VaultError::IntegrityMismatch)
        }
    }

    pub fn matches(&self, title: &str, account: &str) -> bool {
        self.title == title && self.account == account
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn account(&self) -> &str {
        &self.account
    }

    pub fn verification_token(&self) -> &str {
        &self.verification_token
    }

    pub fn protected_payload(&self) -> &[u8] {
        &self.protected_payload
    }

    pub fn key(&self) -> u8 {
        self.key
    }

    /// The key as the character the user types back in.
    pub fn key_char(&self) -> char {
        char::from(self.key)
    }

    pub fn strength(&self) -> u8 {
        self.strength
    }

    pub fn strength_level(&self) -> StrengthLevel {
        classify_strength(self.strength)
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn expires_at(&self) -> NaiveDateTime {
        self.expires_at
    }

    pub fn expiry_status(&self, now: NaiveDateTime) -> ExpiryStatus {
        check_expiry(self.expires_at, now)
    }
}
