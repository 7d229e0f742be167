//! Search command implementation.

use crate::credentials::{format_timestamp, now};
use crate::shell::command::{Command, CommandResult, ShellContext};

/// Command to find records by title or account.
pub struct SearchCommand;

impl Command for SearchCommand {
    fn name(&self) -> &str {
        "search"
    }

    fn aliases(&self) -> &[&str] {
        &["find", "s"]
    }

    fn description(&self) -> &str {
        "Search by title or account"
    }

    fn usage(&self) -> &str {
        "search <query>"
    }

    fn help(&self) -> &str {
        "List records whose title or account contains the query.\n\n\
         Matching ignores case. Multiple words are searched as one\n\
         phrase separated by single spaces.\n\n\
         Examples:\n  \
           search mail\n  \
           find \"Home Router\""
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        if args.is_empty() {
            return CommandResult::usage(self);
        }
        let query = args.join(" ");

        let hits = ctx.vault.search(&query);
        if hits.is_empty() {
            return CommandResult::success(format!("No matches for '{}'", query));
        }

        let at = now();
        let mut out = format!("Found {} match(es) for '{}':", hits.len(), query);
        for record in hits {
            out.push_str(&format!(
                "\n  {} | {} | {}/7 {} | {} | key {} | created {}",
                record.title(),
                record.account(),
                record.strength(),
                record.strength_level(),
                record.expiry_status(at),
                record.key_char(),
                format_timestamp(&record.created_at()),
            ));
        }
        CommandResult::success(out)
    }

    fn min_args(&self) -> usize {
        1
    }
}
