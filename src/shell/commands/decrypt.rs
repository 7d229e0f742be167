//! Decrypt command implementation.

use crate::shell::command::{Command, CommandResult, ShellContext};
use crate::shell::highlighter::OutputHighlighter;

/// Command to reveal a single password given its key.
pub struct DecryptCommand;

/// A record key is exactly one printable ASCII character.
///
/// New keys are letters or digits; older vaults may hold punctuation keys,
/// which are entered at the prompt instead of on the command line.
fn parse_key(arg: &str) -> Option<u8> {
    match arg.as_bytes() {
        [b] if b.is_ascii_graphic() => Some(*b),
        _ => None,
    }
}

impl Command for DecryptCommand {
    fn name(&self) -> &str {
        "decrypt"
    }

    fn aliases(&self) -> &[&str] {
        &["get", "reveal"]
    }

    fn description(&self) -> &str {
        "Decrypt a stored password"
    }

    fn usage(&self) -> &str {
        "decrypt <title> <account> [key]"
    }

    fn help(&self) -> &str {
        "Reveal the password stored for a title and account.\n\n\
         The key is the single character shown when the password was added.\n\
         Leave it out to be asked for it without echo, which also keeps it\n\
         out of the command line.\n\
         A wrong key is reported as a failed decryption.\n\n\
         Arguments:\n  \
           <title>   - Site or app name\n  \
           <account> - Username, email or phone\n  \
           [key]     - The record's encryption key\n\n\
         Examples:\n  \
           decrypt Gmail me@example.com K\n  \
           decrypt Gmail me@example.com"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let (title, account, key) = match args {
            [title, account, key] => (*title, *account, key.to_string()),
            [title, account] => match ctx.console.read_masked_line("Enter encryption key: ") {
                Ok(key) => (*title, *account, key.trim().to_string()),
                Err(e) => return CommandResult::error(format!("Failed to read key: {}", e)),
            },
            _ => return CommandResult::usage(self),
        };
        let Some(key) = parse_key(&key) else {
            return CommandResult::error("Key must be a single character");
        };

        match ctx.vault.decrypt_one(title, account, key) {
            Ok(plaintext) => CommandResult::success(format!(
                "Decrypted password: {}",
                OutputHighlighter::secret(&plaintext)
            )),
            Err(e) => e.into(),
        }
    }

    fn min_args(&self) -> usize {
        2
    }

    fn max_args(&self) -> Option<usize> {
        Some(3)
    }
}
