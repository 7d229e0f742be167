//! Purge command implementation.

use crate::shell::command::{Command, CommandResult, ShellContext};
use crate::shell::highlighter::OutputHighlighter;

/// Command to wipe the vault and its master credentials.
pub struct PurgeCommand;

impl Command for PurgeCommand {
    fn name(&self) -> &str {
        "purge"
    }

    fn description(&self) -> &str {
        "Delete the vault and master passphrase"
    }

    fn usage(&self) -> &str {
        "purge"
    }

    fn help(&self) -> &str {
        "Delete every stored password together with the master passphrase\n\
         and security answers, then exit. The next start enrolls a new\n\
         master passphrase. This cannot be undone.\n\n\
         Examples:\n  \
           purge"
    }

    fn execute(&self, _args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let confirmed = match ctx
            .console
            .confirm("This deletes ALL passwords and the master passphrase. Continue? [y/N] ")
        {
            Ok(answer) => answer,
            Err(e) => return CommandResult::error(format!("Could not read answer: {}", e)),
        };
        if !confirmed {
            return CommandResult::success("Purge cancelled");
        }

        match ctx.vault.purge() {
            Ok(()) => {
                ctx.console
                    .say(&OutputHighlighter::warning("Vault purged. Exiting..."));
                CommandResult::Exit
            }
            Err(e) => e.into(),
        }
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
    }
}
