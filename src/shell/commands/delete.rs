//! Delete command implementation.

use crate::shell::command::{Command, CommandResult, ShellContext};
use crate::shell::highlighter::OutputHighlighter;

/// Command to delete a credential.
pub struct DeleteCommand;

impl Command for DeleteCommand {
    fn name(&self) -> &str {
        "delete"
    }

    fn aliases(&self) -> &[&str] {
        &["del", "rm", "remove"]
    }

    fn description(&self) -> &str {
        "Delete a stored password"
    }

    fn usage(&self) -> &str {
        "delete <title> <account>"
    }

    fn help(&self) -> &str {
        "Delete the first record matching title and account.\n\n\
         Examples:\n  \
           delete Gmail me@example.com\n  \
           rm Gmail me@example.com"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let [title, account] = args else {
            return CommandResult::usage(self);
        };

        match ctx.vault.delete(title, account) {
            Ok(()) => CommandResult::success(OutputHighlighter::success(
                "Password deleted successfully",
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
