//! Query operations over an opened vault.
//!
//! Every mutating operation writes the whole store back to disk before it
//! returns, so memory and disk agree between operations. A failed write undoes
//! the change in memory.

use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

use crate::config::VaultPaths;
use crate::credentials::{CredentialRecord, ExpiryStatus, format_timestamp, now};
use crate::crypto::{StrengthLevel, classify_strength, generate_key, generate_password, score_strength};
use crate::error::{VaultError, VaultResult};
use crate::storage;
use crate::store::Store;

/// A record paired with its expiry status at the time it was listed.
#[derive(Debug, Clone, Copy)]
pub struct ListedRecord<'a> {
    pub record: &'a CredentialRecord,
    pub status: ExpiryStatus,
}

/// Result of `generate_and_report`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPassword {
    pub site: String,
    pub password: String,
    pub strength: u8,
    pub level: StrengthLevel,
}

/// Result of `export_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    pub count: usize,
}

/// Banner printed alongside every export.
pub const EXPORT_WARNING: &str =
    "WARNING: This file contains unencrypted passwords. Keep it secure!";

/// Rejects titles and accounts that would break the line format.
pub fn validate_field(name: &str, value: &str) -> VaultResult<()> {
    if value.trim().is_empty() {
        return Err(VaultError::Validation(format!("{} cannot be empty", name)));
    }
    if value.contains(['|', '\n', '\r']) {
        return Err(VaultError::Validation(format!(
            "{} cannot contain '|' or line breaks",
            name
        )));
    }
    Ok(())
}

/// Generates a password for `site` without touching any vault.
pub fn generate_and_report(site: &str, length: usize) -> GeneratedPassword {
    let password = generate_password(length);
    let strength = score_strength(&password);
    log::debug!("Generated a {}-character password", password.len());
    GeneratedPassword {
        site: site.to_string(),
        password,
        strength,
        level: classify_strength(strength),
    }
}

/// An authenticated, loaded vault.
pub struct Vault {
    store: Store,
    paths: VaultPaths,
}

impl Vault {
    /// Loads the store from the vault's database file.
    pub fn open(paths: VaultPaths) -> VaultResult<Self> {
        paths.ensure_dir()?;
        let store = storage::load_store(&paths.database)?;
        Ok(Self { store, paths })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn paths(&self) -> &VaultPaths {
        &self.paths
    }

    /// Writes the store to disk.
    pub fn save(&self) -> VaultResult<()> {
        storage::save_store(&self.paths.database, &self.store)
    }

    /// Saves the store, putting `before` back if the write fails.
    fn commit(&mut self, before: Store) -> VaultResult<()> {
        if let Err(e) = self.save() {
            log::warn!("Save failed, change rolled back: {}", e);
            self.store = before;
            return Err(e);
        }
        Ok(())
    }

    /// Adds a record under a freshly generated key.
    pub fn add(&mut self, title: &str, account: &str, plaintext: &str) -> VaultResult<CredentialRecord> {
        self.add_with_key(title, account, plaintext, generate_key())
    }

    pub fn add_with_key(
        &mut self,
        title: &str,
        account: &str,
        plaintext: &str,
        key: u8,
    ) -> VaultResult<CredentialRecord> {
        validate_field("Title", title)?;
        validate_field("Account", account)?;
        if plaintext.is_empty() {
            return Err(VaultError::Validation("Password cannot be empty".to_string()));
        }

        let record = CredentialRecord::new(title, account, plaintext, key, now());
        let before = self.store.clone();
        self.store.insert(record.clone());
        self.commit(before)?;
        log::info!("Added record '{}'", title);
        Ok(record)
    }

    /// Every record, strongest first, with its current expiry status.
    pub fn view(&self) -> Vec<ListedRecord<'_>> {
        self.view_at(now())
    }

    pub fn view_at(&self, at: NaiveDateTime) -> Vec<ListedRecord<'_>> {
        self.store
            .iter()
            .map(|record| ListedRecord {
                record,
                status: record.expiry_status(at),
            })
            .collect()
    }

    /// Reveals a password given the record's title, account and key.
    pub fn decrypt_one(&self, title: &str, account: &str, key: u8) -> VaultResult<String> {
        let record = self
            .store
            .find_first(title, account)
            .ok_or_else(|| VaultError::not_found(title, account))?;
        let result = record.reveal(key);
        if result.is_err() {
            log::info!("Decryption check failed for '{}'", title);
        }
        result
    }

    /// Rotates the password of the first matching record.
    pub fn update(&mut self, title: &str, account: &str, new_plaintext: &str) -> VaultResult<()> {
        if new_plaintext.is_empty() {
            return Err(VaultError::Validation("Password cannot be empty".to_string()));
        }
        let before = self.store.clone();
        if !self.store.update_in_place(title, account, new_plaintext, now()) {
            return Err(VaultError::not_found(title, account));
        }
        self.commit(before)?;
        log::info!("Updated record '{}'", title);
        Ok(())
    }

    /// Deletes the first matching record.
    pub fn delete(&mut self, title: &str, account: &str) -> VaultResult<()> {
        let before = self.store.clone();
        if !self.store.remove_matching(title, account) {
            return Err(VaultError::not_found(title, account));
        }
        self.commit(before)?;
        log::info!("Deleted record '{}'", title);
        Ok(())
    }

    pub fn search(&self, query: &str) -> Vec<&CredentialRecord> {
        let hits = self.store.search(query);
        log::debug!("Search matched {} records", hits.len());
        hits
    }

    /// Writes every record in plaintext to the vault's export file.
    pub fn export_all(&self) -> VaultResult<ExportReport> {
        self.export_to(&self.paths.export)
    }

    /// Writes every record in plaintext to `path`. An empty vault writes nothing.
    pub fn export_to(&self, path: &Path) -> VaultResult<ExportReport> {
        if self.store.is_empty() {
            return Ok(ExportReport {
                path: path.to_path_buf(),
                count: 0,
            });
        }

        let report = render_export(&self.store, now());
        storage::write_atomic(path, &report)?;
        log::warn!(
            "Exported {} records unencrypted to {}",
            self.store.len(),
            path.display()
        );
        Ok(ExportReport {
            path: path.to_path_buf(),
            count: self.store.len(),
        })
    }

    /// Deletes the master, security and database files and empties the store.
    pub fn purge(&mut self) -> VaultResult<()> {
        for path in [&self.paths.database, &self.paths.security, &self.paths.master] {
            if storage::remove_if_exists(path)? {
                log::info!("Removed {}", path.display());
            }
        }
        self.store.clear();
        Ok(())
    }
}

fn render_export(store: &Store, at: NaiveDateTime) -> String {
    let mut out = String::new();
    out.push_str("========================================\n");
    out.push_str("       EXPORTED PASSWORDS (DECRYPTED)   \n");
    out.push_str("========================================\n\n");

    let mut count = 0;
    for record in store.iter() {
        count += 1;
        let plaintext = record
            .reveal(record.key())
            .unwrap_or_else(|_| String::from("<unreadable>"));
        out.push_str(&format!("Entry #{}\n", count));
        out.push_str(&format!("Title: {}\n", record.title()));
        out.push_str(&format!("Username/Email: {}\n", record.account()));
        out.push_str(&format!("Password: {}\n", plaintext));
        out.push_str(&format!(
            "Strength: {}/7 ({})\n",
            record.strength(),
            record.strength_level()
        ));
        out.push_str(&format!("Status: {}\n", record.expiry_status(at)));
        out.push_str(&format!("Created: {}\n", format_timestamp(&record.created_at())));
        out.push_str(&format!("Expires: {}\n", format_timestamp(&record.expires_at())));
        out.push_str("----------------------------------------\n\n");
    }

    out.push_str(&format!("Total passwords exported: {}\n", count));
    out
}
