//! Update command implementation.

use crate::shell::command::{Command, CommandResult, ShellContext};
use crate::shell::highlighter::OutputHighlighter;

/// Command to replace the password of an existing record.
pub struct UpdateCommand;

impl Command for UpdateCommand {
    fn name(&self) -> &str {
        "update"
    }

    fn aliases(&self) -> &[&str] {
        &["u", "rotate"]
    }

    fn description(&self) -> &str {
        "Update an existing password"
    }

    fn usage(&self) -> &str {
        "update <title> <account>"
    }

    fn help(&self) -> &str {
        "Replace the password of the first record matching title and account.\n\n\
         The record keeps its key; its strength is re-scored and its\n\
         expiry moves to 90 days from now.\n\n\
         Examples:\n  \
           update Gmail me@example.com"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let [title, account] = args else {
            return CommandResult::usage(self);
        };

        if ctx.vault.store().find_first(title, account).is_none() {
            return CommandResult::error(format!(
                "No record found for '{}' / '{}'",
                title, account
            ));
        }

        let plaintext = match ctx.console.read_masked_line("Enter new password: ") {
            Ok(p) => p,
            Err(e) => return CommandResult::error(format!("Could not read password: {}", e)),
        };

        match ctx.vault.update(title, account, &plaintext) {
            Ok(()) => CommandResult::success(OutputHighlighter::success(
                "Password updated successfully",
            )),
            Err(e) => e.into(),
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
    fn test_update_command_rotates_password() {
        let temp = TempDir::new().unwrap();
        let mut vault = Vault::open(VaultPaths::in_dir(temp.path())).unwrap();
        vault.add_with_key("Mail", "me", "oldpassword", b'K').unwrap();
        let mut console = MemoryConsole::new(["N3w!password"]);
        let mut ctx = ShellContext::new(&mut vault, &mut console);

        let result = UpdateCommand.execute(&["Mail", "me"], &mut ctx);

        assert!(matches!(result, CommandResult::Success(Some(_))));
        assert_eq!(vault.decrypt_one("Mail", "me", b'K').unwrap(), "N3w!password");
    }

    #[test]
    fn test_update_command_unknown_record_does_not_prompt() {
        let temp = TempDir::new().unwrap();
        let mut vault = Vault::open(VaultPaths::in_dir(temp.path())).unwrap();
        let mut console = MemoryConsole::new(["unused"]);
        let mut ctx = ShellContext::new(&mut vault, &mut console);

        let result = UpdateCommand.execute(&["Mail", "me"], &mut ctx);

        assert!(matches!(result, CommandResult::Error(_)));
        assert_eq!(console.remaining_inputs(), 1);
    }
}
