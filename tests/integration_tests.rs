//! Integration tests for pwvault.
//!
//! These tests drive authentication, the vault and the shell end to end
//! against a temporary vault directory.

use chrono::{Duration, NaiveDate};
use pwvault::auth::{AuthOutcome, Authenticator};
use pwvault::config::VaultPaths;
use pwvault::console::MemoryConsole;
use pwvault::credentials::{CredentialRecord, ExpiryStatus, format_timestamp};
use pwvault::crypto::StrengthLevel;
use pwvault::error::VaultError;
use pwvault::manager::Vault;
use pwvault::shell::Shell;
use pwvault::shell::command::CommandResult;
use pwvault::storage::{self, encode_record};
use tempfile::TempDir;

const MASTER: &str = "Str0ngP@ss!";

fn setup_test_env() -> (TempDir, VaultPaths) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let paths = VaultPaths::in_dir(temp_dir.path().join("vault"));
    (temp_dir, paths)
}

/// Enrolls `MASTER` with answers Smith / Rex / Paris.
fn enroll(paths: &VaultPaths) {
    let mut console = MemoryConsole::new([MASTER, MASTER, "Smith", "Rex", "Paris"]);
    let outcome = Authenticator::new(paths).authenticate(&mut console).unwrap();
    assert_eq!(outcome, AuthOutcome::Authenticated);
    assert!(console.saw("Master password created successfully!"));
    assert_eq!(console.remaining_inputs(), 0);
}

// ============================================================================
// Authentication
// ============================================================================

#[test]
fn test_enroll_then_login_first_attempt() {
    let (_temp, paths) = setup_test_env();
    enroll(&paths);

    let mut console = MemoryConsole::new([MASTER]);
    let outcome = Authenticator::new(&paths).authenticate(&mut console).unwrap();

    assert_eq!(outcome, AuthOutcome::Authenticated);
    assert!(console.saw("Attempt 1 of 3"));
    assert!(console.saw("Login successful!"));
}

#[test]
fn test_enroll_rejects_short_passphrase() {
    let (_temp, paths) = setup_test_env();
    let mut console = MemoryConsole::new(["short"]);

    let result = Authenticator::new(&paths).authenticate(&mut console);

    assert!(matches!(result, Err(VaultError::Validation(_))));
    assert!(!Authenticator::new(&paths).has_master().unwrap());
}

#[test]
fn test_login_on_third_attempt() {
    let (_temp, paths) = setup_test_env();
    enroll(&paths);

    let mut console = MemoryConsole::new(["wrong1", "wrong2", MASTER]);
    let outcome = Authenticator::new(&paths).authenticate(&mut console).unwrap();

    assert_eq!(outcome, AuthOutcome::Authenticated);
    assert!(console.saw("Attempt 3 of 3"));
}

#[test]
fn test_lockout_recovery_and_reset() {
    let (_temp, paths) = setup_test_env();
    enroll(&paths);

    // Two of three answers right (case-insensitive), then a new passphrase.
    let mut console = MemoryConsole::new([
        "bad1",
        "bad2",
        "bad3",
        "y",
        "SMITH",
        "Fluffy",
        "paris",
        "N3wMaster!",
        "N3wMaster!",
    ]);
    let outcome = Authenticator::new(&paths).authenticate(&mut console).unwrap();

    assert_eq!(outcome, AuthOutcome::ResetComplete);
    assert!(console.saw("Maximum login attempts reached."));
    assert!(console.saw("Master password reset successfully!"));

    let auth = Authenticator::new(&paths);
    assert!(!auth.verify_master(MASTER).unwrap());
    assert!(auth.verify_master("N3wMaster!").unwrap());
}

#[test]
fn test_lockout_declined_is_denied() {
    let (_temp, paths) = setup_test_env();
    enroll(&paths);

    let mut console = MemoryConsole::new(["bad1", "bad2", "bad3", "n"]);
    let outcome = Authenticator::new(&paths).authenticate(&mut console).unwrap();

    assert_eq!(outcome, AuthOutcome::Denied);
    assert!(Authenticator::new(&paths).verify_master(MASTER).unwrap());
}

#[test]
fn test_recovery_with_one_correct_answer_fails() {
    let (_temp, paths) = setup_test_env();
    enroll(&paths);

    let mut console = MemoryConsole::new(["bad1", "bad2", "bad3", "y", "Smith", "x", "y"]);
    let result = Authenticator::new(&paths).authenticate(&mut console);

    assert!(matches!(result, Err(VaultError::RecoveryFailure(_))));
    assert!(Authenticator::new(&paths).verify_master(MASTER).unwrap());
}

#[test]
fn test_recovery_without_security_file() {
    let (_temp, paths) = setup_test_env();
    enroll(&paths);
    std::fs::remove_file(&paths.security).unwrap();

    let mut console = MemoryConsole::new(["bad1", "bad2", "bad3", "y"]);
    let result = Authenticator::new(&paths).authenticate(&mut console);

    assert!(matches!(result, Err(VaultError::RecoveryFailure(_))));
}

#[test]
fn test_recovery_with_corrupt_security_file() {
    let (_temp, paths) = setup_test_env();
    enroll(&paths);
    storage::write_tokens(&paths.security, &["ujnt".to_string(), "yfs".to_string()]).unwrap();

    let mut console = MemoryConsole::new(["bad1", "bad2", "bad3", "y"]);
    let result = Authenticator::new(&paths).authenticate(&mut console);

    assert!(matches!(result, Err(VaultError::CorruptState(_))));
}

// ============================================================================
// Vault operations
// ============================================================================

#[test]
fn test_add_and_decrypt_scenario() {
    let (_temp, paths) = setup_test_env();
    let mut vault = Vault::open(paths).unwrap();

    let record = vault.add("Mail", "me@x.com", "Ab1!abcd").unwrap();
    assert_eq!(record.strength(), 5);
    assert_eq!(record.strength_level(), StrengthLevel::Good);
    assert_eq!(record.expires_at(), record.created_at() + Duration::days(90));

    let key = record.key();
    assert_eq!(vault.decrypt_one("Mail", "me@x.com", key).unwrap(), "Ab1!abcd");

    let wrong = if key == b'A' { b'B' } else { b'A' };
    assert!(matches!(
        vault.decrypt_one("Mail", "me@x.com", wrong),
        Err(VaultError::IntegrityMismatch)
    ));
}

#[test]
fn test_store_order_survives_reopen() {
    let (_temp, paths) = setup_test_env();
    let mut vault = Vault::open(paths.clone()).unwrap();
    vault.add("Weak", "u", "abc").unwrap();
    vault.add("Best", "u", "Ab1!abcdefgh").unwrap();
    vault.add("Mid", "u", "Ab1!abcd").unwrap();

    let reopened = Vault::open(paths).unwrap();
    let titles: Vec<&str> = reopened.store().iter().map(|r| r.title()).collect();
    assert_eq!(titles, vec!["Best", "Mid", "Weak"]);
}

#[test]
fn test_update_moves_record_and_resets_expiry() {
    let (_temp, paths) = setup_test_env();
    let mut vault = Vault::open(paths.clone()).unwrap();
    vault.add_with_key("Bank", "owner", "abc", b'K').unwrap();
    vault.add("Mail", "me", "Ab1!abcd").unwrap();

    vault.update("Bank", "owner", "Ab1!abcdefgh").unwrap();

    let reopened = Vault::open(paths).unwrap();
    let first = reopened.store().iter().next().unwrap();
    assert_eq!(first.title(), "Bank");
    assert_eq!(first.strength(), 6);
    assert_eq!(first.expiry_status(pwvault::credentials::now()), ExpiryStatus::Valid);
    assert_eq!(reopened.decrypt_one("Bank", "owner", b'K').unwrap(), "Ab1!abcdefgh");
}

#[test]
fn test_legacy_ctime_line_is_migrated_on_save() {
    let (_temp, paths) = setup_test_env();
    paths.ensure_dir().unwrap();

    let created = NaiveDate::from_ymd_opt(2026, 10, 17)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let record = CredentialRecord::new("Old", "legacy", "pw", b'K', created);
    let modern = encode_record(&record);
    let mut fields: Vec<&str> = modern.split('|').collect();
    fields.truncate(6);
    let legacy = format!("{}|Sat Oct 17 12:00:00 2026\n", fields.join("|"));
    std::fs::write(&paths.database, legacy).unwrap();

    let mut vault = Vault::open(paths.clone()).unwrap();
    let loaded = vault.store().find_first("Old", "legacy").unwrap();
    assert_eq!(loaded.created_at(), created);
    assert_eq!(loaded.expires_at(), created + Duration::days(90));
    assert_eq!(loaded.reveal(b'K').unwrap(), "pw");

    vault.add("New", "me", "pw").unwrap();
    let text = std::fs::read_to_string(&paths.database).unwrap();
    assert!(text.contains(&format_timestamp(&(created + Duration::days(90)))));
    assert!(!text.contains("Sat Oct"));
}

#[test]
fn test_unmarked_database_opens_and_is_rewritten() {
    let (_temp, paths) = setup_test_env();
    paths.ensure_dir().unwrap();
    let line = "Mail|me@x.com|#>%?.9yy|K|3|33sfuovi|Sat Oct 17 12:00:00 2026\n";
    std::fs::write(&paths.database, line).unwrap();

    let mut vault = Vault::open(paths.clone()).unwrap();
    let mut console = MemoryConsole::default();
    let shell = Shell::new();
    match shell.execute_line("decrypt Mail me@x.com K", &mut vault, &mut console) {
        CommandResult::Success(Some(msg)) => assert!(msg.contains("hunter22")),
        other => panic!("Expected decrypted password, got {:?}", other),
    }

    vault.add("Bank", "me", "pw").unwrap();
    let text = std::fs::read_to_string(&paths.database).unwrap();
    assert!(!text.contains("#>%?.9yy"));
    assert_eq!(text.matches("b64:").count(), 4);

    let reopened = Vault::open(paths).unwrap();
    let record = reopened.store().find_first("Mail", "me@x.com").unwrap();
    assert_eq!(record.reveal(b'K').unwrap(), "hunter22");
}

#[test]
fn test_malformed_database_refuses_to_open() {
    let (_temp, paths) = setup_test_env();
    paths.ensure_dir().unwrap();
    std::fs::write(&paths.database, "not|a|record\n").unwrap();

    let result = Vault::open(paths.clone());

    assert!(matches!(result, Err(VaultError::Malformed { line: 1, .. })));
    assert_eq!(
        std::fs::read_to_string(&paths.database).unwrap(),
        "not|a|record\n"
    );
}

// ============================================================================
// Shell workflow
// ============================================================================

#[test]
fn test_shell_session_workflow() {
    let (_temp, paths) = setup_test_env();
    let mut vault = Vault::open(paths.clone()).unwrap();
    let mut console = MemoryConsole::new(["Ab1!abcd", "N3w!password!"]);
    let shell = Shell::new();

    let result = shell.execute_line("add \"Home Router\" admin", &mut vault, &mut console);
    assert!(matches!(result, CommandResult::Success(Some(_))));

    match shell.execute_line("view", &mut vault, &mut console) {
        CommandResult::Success(Some(table)) => assert!(table.contains("Home Router")),
        other => panic!("Expected table, got {:?}", other),
    }

    match shell.execute_line("search router", &mut vault, &mut console) {
        CommandResult::Success(Some(msg)) => assert!(msg.starts_with("Found 1 match(es)")),
        other => panic!("Expected search hit, got {:?}", other),
    }

    let result = shell.execute_line("update 'Home Router' admin", &mut vault, &mut console);
    assert!(matches!(result, CommandResult::Success(Some(_))));

    let key = vault
        .store()
        .find_first("Home Router", "admin")
        .unwrap()
        .key_char();
    let line = format!("decrypt 'Home Router' admin {}", key);
    match shell.execute_line(&line, &mut vault, &mut console) {
        CommandResult::Success(Some(msg)) => assert!(msg.contains("N3w!password!")),
        other => panic!("Expected decrypted password, got {:?}", other),
    }

    match shell.execute_line("export", &mut vault, &mut console) {
        CommandResult::Success(Some(msg)) => assert!(msg.contains("Exported 1 password(s)")),
        other => panic!("Expected export, got {:?}", other),
    }
    let exported = std::fs::read_to_string(&paths.export).unwrap();
    assert!(exported.contains("Password: N3w!password!"));

    let result = shell.execute_line("delete 'Home Router' admin", &mut vault, &mut console);
    assert!(matches!(result, CommandResult::Success(Some(_))));
    assert!(Vault::open(paths).unwrap().store().is_empty());
}

#[test]
fn test_generate_does_not_store() {
    let (_temp, paths) = setup_test_env();
    let mut vault = Vault::open(paths).unwrap();
    let mut console = MemoryConsole::default();

    match Shell::new().execute_line("generate Gmail 20", &mut vault, &mut console) {
        CommandResult::Success(Some(msg)) => assert!(msg.contains("Generated password for Gmail")),
        other => panic!("Expected generated password, got {:?}", other),
    }
    assert!(vault.store().is_empty());
}

#[test]
fn test_purge_returns_to_enrollment() {
    let (_temp, paths) = setup_test_env();
    enroll(&paths);
    let mut vault = Vault::open(paths.clone()).unwrap();
    vault.add("Mail", "me", "pw").unwrap();
    let mut console = MemoryConsole::new(["yes"]);

    let result = Shell::new().execute_line("purge", &mut vault, &mut console);

    assert!(matches!(result, CommandResult::Exit));
    let auth = Authenticator::new(&paths);
    assert!(!auth.has_master().unwrap());
    assert!(!paths.security.exists());
    assert!(Vault::open(paths).unwrap().store().is_empty());
}
