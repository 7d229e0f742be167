//! Line-oriented persistence for the store and the authentication tokens.
//!
//! Database lines hold eight `|`-separated fields:
//! `title|account|payload|key|strength|token|created_at|expires_at`.
//! The payload and token are written as `b64:` followed by base64, because the
//! transforms can emit the delimiter or line breaks. Fields without the marker
//! come from files that stored them verbatim and are read as is. Lines written
//! before expiry tracking existed stop after `created_at`; their expiry is
//! derived from the creation time. Every save writes the current form.

use base64::{Engine as _, engine::general_purpose};
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::credentials::{CredentialRecord, expiry_for, format_timestamp, parse_timestamp};
use crate::crypto::MAX_STRENGTH;
use crate::error::{VaultError, VaultResult};
use crate::store::Store;

const FIELD_DELIMITER: char = '|';

/// Marks a field or token line as base64.
pub const ENCODED_PREFIX: &str = "b64:";

pub fn encode_field(data: &[u8]) -> String {
    format!("{}{}", ENCODED_PREFIX, general_purpose::STANDARD.encode(data))
}

/// Decodes a marked field; an unmarked field is taken verbatim.
pub fn decode_field(field: &str) -> Option<Vec<u8>> {
    match field.strip_prefix(ENCODED_PREFIX) {
        Some(encoded) => general_purpose::STANDARD.decode(encoded.trim()).ok(),
        None => Some(field.as_bytes().to_vec()),
    }
}

fn decode_token(field: &str) -> Option<String> {
    match field.strip_prefix(ENCODED_PREFIX) {
        Some(_) => decode_field(field).and_then(|bytes| String::from_utf8(bytes).ok()),
        None => Some(field.to_string()),
    }
}

/// Serializes one record as a database line (without the newline).
pub fn encode_record(record: &CredentialRecord) -> String {
    [
        record.title().to_string(),
        record.account().to_string(),
        encode_field(record.protected_payload()),
        record.key_char().to_string(),
        record.strength().to_string(),
        encode_field(record.verification_token().as_bytes()),
        format_timestamp(&record.created_at()),
        format_timestamp(&record.expires_at()),
    ]
    .join("|")
}

/// Parses a database line; `line_no` is 1-based and only used in errors.
pub fn decode_record(line: &str, line_no: usize) -> VaultResult<CredentialRecord> {
    let malformed = |reason: &str| VaultError::Malformed {
        line: line_no,
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if fields.len() < 7 || fields.len() > 8 {
        return Err(malformed(&format!(
            "expected 7 or 8 fields, found {}",
            fields.len()
        )));
    }

    let payload = decode_field(fields[2]).ok_or_else(|| malformed("payload is not valid base64"))?;
    let key = match fields[3].as_bytes() {
        [key] => *key,
        _ => return Err(malformed("key must be a single character")),
    };
    let strength: u8 = fields[4]
        .trim()
        .parse()
        .map_err(|_| malformed("strength is not a number"))?;
    if strength > MAX_STRENGTH {
        return Err(malformed("strength out of range"));
    }
    let token = decode_token(fields[5]).ok_or_else(|| malformed("token is not valid base64"))?;
    let created_at =
        parse_timestamp(fields[6]).ok_or_else(|| malformed("unreadable creation time"))?;

    let expires_at = match fields.get(7).map(|s| s.trim()) {
        Some(raw) if !raw.is_empty() => {
            parse_timestamp(raw).ok_or_else(|| malformed("unreadable expiry time"))?
        }
        _ => {
            log::info!(
                "Migrating legacy record on line {}: expiry derived from creation time",
                line_no
            );
            expiry_for(created_at)
        }
    };

    Ok(CredentialRecord::from_parts(
        fields[0].to_string(),
        fields[1].to_string(),
        payload,
        key,
        strength,
        token,
        created_at,
        expires_at,
    ))
}

/// Loads every record from `path`. A missing file is an empty store.
pub fn load_store(path: &Path) -> VaultResult<Store> {
    if !path.exists() {
        log::debug!("No database at {}, starting empty", path.display());
        return Ok(Store::new());
    }

    let content = fs::read_to_string(path)?;
    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        records.push(decode_record(line, idx + 1)?);
    }

    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(Store::from_records(records))
}

/// Rewrites the whole database in the store's current order.
pub fn save_store(path: &Path, store: &Store) -> VaultResult<()> {
    let mut content = String::new();
    for record in store.iter() {
        content.push_str(&encode_record(record));
        content.push('\n');
    }
    write_atomic(path, &content)?;
    log::debug!("Saved {} records to {}", store.len(), path.display());
    Ok(())
}

/// Reads the single token in `path`, or `None` if the file is absent or blank.
pub fn read_token(path: &Path) -> VaultResult<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let line = content.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }
    decode_token(line)
        .map(Some)
        .ok_or_else(|| VaultError::CorruptState(format!("{} is unreadable", path.display())))
}

/// True if `path` has a non-blank line stored without the `b64:` marker.
pub fn has_unmarked_tokens(path: &Path) -> VaultResult<bool> {
    if !path.exists() {
        return Ok(false);
    }
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .any(|line| !line.trim().is_empty() && !line.starts_with(ENCODED_PREFIX)))
}

pub fn write_token(path: &Path, token: &str) -> VaultResult<()> {
    write_atomic(path, &format!("{}\n", encode_field(token.as_bytes())))?;
    Ok(())
}

/// Reads one token per line, or `None` if the file is absent.
pub fn read_tokens(path: &Path) -> VaultResult<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .map(|line| {
            decode_token(line).ok_or_else(|| {
                VaultError::CorruptState(format!("{} is unreadable", path.display()))
            })
        })
        .collect::<VaultResult<Vec<_>>>()
        .map(Some)
}

pub fn write_tokens(path: &Path, tokens: &[String]) -> VaultResult<()> {
    let content: String = tokens
        .iter()
        .map(|t| format!("{}\n", encode_field(t.as_bytes())))
        .collect();
    write_atomic(path, &content)?;
    Ok(())
}

/// Writes to a sibling temp file, then renames it over `path`.
pub fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = path.with_extension("tmp");
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)
}

/// Removes `path` if it exists; returns whether anything was deleted.
pub fn remove_if_exists(path: &Path) -> std::io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
