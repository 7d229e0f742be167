//! Add command implementation.

use crate::credentials::format_timestamp;
use crate::shell::command::{Command, CommandResult, ShellContext};
use crate::shell::highlighter::OutputHighlighter;

/// Command to store a new credential.
pub struct AddCommand;

impl Command for AddCommand {
    fn name(&self) -> &str {
        "add"
    }

    fn aliases(&self) -> &[&str] {
        &["a", "new"]
    }

    fn description(&self) -> &str {
        "Add a new password"
    }

    fn usage(&self) -> &str {
        "add <title> <account>"
    }

    fn help(&self) -> &str {
        "Store a new password for a site and account.\n\n\
         The password is typed at a masked prompt. A random key is chosen\n\
         for the record and shown once; keep it to decrypt the password later.\n\n\
         Arguments:\n  \
           <title>   - Site or app name (e.g. Gmail)\n  \
           <account> - Username, email or phone\n\n\
         Examples:\n  \
           add Gmail me@example.com\n  \
           add \"Home Router\" admin"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let [title, account] = args else {
            return CommandResult::usage(self);
        };

        let plaintext = match ctx.console.read_masked_line("Enter password: ") {
            Ok(p) => p,
            Err(e) => return CommandResult::error(format!("Could not read password: {}", e)),
        };

        match ctx.vault.add(title, account, &plaintext) {
            Ok(record) => CommandResult::success(format!(
                "{}\nEncryption key = {}\nStrength = {}/7 {}\nExpiry date = {} (90 days from now)",
                OutputHighlighter::success("Password saved successfully"),
                record.key_char(),
                record.strength(),
                OutputHighlighter::strength(record.strength_level()),
                format_timestamp(&record.expires_at()),
            )),
            Err(e) => {
                log::debug!("Add rejected: {}", e);
                e.into()
            }
        }
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
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
    fn test_add_command_success() {
        let temp = TempDir::new().unwrap();
        let mut vault = Vault::open(VaultPaths::in_dir(temp.path())).unwrap();
        let mut console = MemoryConsole::new(["Ab1!abcd"]);
        let mut ctx = ShellContext::new(&mut vault, &mut console);

        let result = AddCommand.execute(&["Mail", "me@x.com"], &mut ctx);

        match result {
            CommandResult::Success(Some(msg)) => {
                assert!(msg.contains("Password saved successfully"));
                assert!(msg.contains("Encryption key = "));
            }
            other => panic!("Expected success, got {:?}", other),
        }
        assert_eq!(vault.store().len(), 1);
    }

    #[test]
    fn test_add_command_missing_args() {
        let temp = TempDir::new().unwrap();
        let mut vault = Vault::open(VaultPaths::in_dir(temp.path())).unwrap();
        let mut console = MemoryConsole::default();
        let mut ctx = ShellContext::new(&mut vault, &mut console);

        let result = AddCommand.execute(&["only_title"], &mut ctx);

        assert!(matches!(result, CommandResult::Error(_)));
        assert!(vault.store().is_empty());
    }

    #[test]
    fn test_add_command_rejects_empty_password() {
        let temp = TempDir::new().unwrap();
        let mut vault = Vault::open(VaultPaths::in_dir(temp.path())).unwrap();
        let mut console = MemoryConsole::new([""]);
        let mut ctx = ShellContext::new(&mut vault, &mut console);

        let result = AddCommand.execute(&["Mail", "me"], &mut ctx);

        assert!(matches!(result, CommandResult::Error(_)));
    }
}
