//! View command implementation.

use crate::credentials::format_timestamp;
use crate::manager::ListedRecord;
use crate::shell::command::{Command, CommandResult, ShellContext};
use crate::shell::highlighter::OutputHighlighter;
use crate::storage::encode_field;

/// Command to list every stored credential.
pub struct ViewCommand;

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Renders records as a fixed-width table, strongest first.
pub fn render_table(rows: &[ListedRecord<'_>]) -> String {
    let mut out = format!(
        "{:<15}{:<25}{:<12}{:<25}{:<6}{:<15}{}\n{}",
        "Title",
        "User Info",
        "Strength",
        "Encrypted",
        "Key",
        "Status",
        "Timestamp",
        "-".repeat(128)
    );

    for row in rows {
        let record = row.record;
        let strength = format!("{}/7 {}", record.strength(), record.strength_level());
        let status = row.status.to_string();
        // Pad before colouring so the escape codes do not skew the columns.
        let status_cell = format!("{:<15}", status).replacen(
            &status,
            &OutputHighlighter::status(row.status),
            1,
        );
        out.push_str(&format!(
            "\n{:<15}{:<25}{:<12}{:<25}{:<6}{}{}",
            truncate(record.title(), 14),
            truncate(record.account(), 24),
            strength,
            truncate(&encode_field(record.protected_payload()), 24),
            record.key_char(),
            status_cell,
            format_timestamp(&record.created_at()),
        ));
    }
    out
}

impl Command for ViewCommand {
    fn name(&self) -> &str {
        "view"
    }

    fn aliases(&self) -> &[&str] {
        &["list", "ls"]
    }

    fn description(&self) -> &str {
        "View stored passwords"
    }

    fn usage(&self) -> &str {
        "view"
    }

    fn help(&self) -> &str {
        "Show every stored record, strongest password first.\n\n\
         Passwords stay encrypted; the status column reports whether each\n\
         password is valid, expiring within 7 days, or expired.\n\n\
         Examples:\n  \
           view\n  \
           ls"
    }

    fn execute(&self, _args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let rows = ctx.vault.view();
        if rows.is_empty() {
            return CommandResult::success("No passwords available");
        }

        log::debug!("Viewing {} records", rows.len());
        CommandResult::success(render_table(&rows))
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VaultPaths;
    use crate::console::MemoryConsole;
    use crate::manager::Vault;
    use tempfile::TempDir;

    #[test]
    fn test_view_command_empty() {
        let temp = TempDir::new().unwrap();
        let mut vault = Vault::open(VaultPaths::in_dir(temp.path())).unwrap();
        let mut console = MemoryConsole::default();
        let mut ctx = ShellContext::new(&mut vault, &mut console);

        match ViewCommand.execute(&[], &mut ctx) {
            CommandResult::Success(Some(msg)) => assert!(msg.contains("No passwords")),
            _ => panic!("Expected success message"),
        }
    }

    #[test]
    fn test_view_command_orders_by_strength() {
        let temp = TempDir::new().unwrap();
        let mut vault = Vault::open(VaultPaths::in_dir(temp.path())).unwrap();
        vault.add("Weak", "u", "abc").unwrap();
        vault.add("Strong", "u", "Ab1!abcdefgh").unwrap();
        let mut console = MemoryConsole::default();
        let mut ctx = ShellContext::new(&mut vault, &mut console);

        match ViewCommand.execute(&[], &mut ctx) {
            CommandResult::Success(Some(table)) => {
                let lines: Vec<&str> = table.lines().collect();
                assert_eq!(lines.len(), 4);
                assert!(lines[2].starts_with("Strong"));
                assert!(lines[2].contains("6/7 Good"));
                assert!(lines[3].starts_with("Weak"));
                assert!(lines[3].contains("Valid"));
            }
            _ => panic!("Expected table"),
        }
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("ünïcödé", 3), "ünï");
        assert_eq!(truncate("ab", 5), "ab");
    }
}
