//! Tab completion for command names and stored titles.

use rustyline::Context;
use rustyline::completion::{Completer, Pair};
use std::sync::{Arc, RwLock};

use crate::shell::command::CommandRegistry;

/// Sorted, de-duplicated record titles offered as completions.
pub type TitleIndex = Arc<RwLock<Vec<String>>>;

/// Completer that handles both command and argument completion.
pub struct VaultCompleter {
    registry: Arc<CommandRegistry>,
    /// Refreshed by the shell after every command.
    titles: TitleIndex,
}

fn pairs(candidates: Vec<String>) -> Vec<Pair> {
    candidates
        .into_iter()
        .map(|s| Pair {
            display: s.clone(),
            replacement: s,
        })
        .collect()
}

impl VaultCompleter {
    pub fn new(registry: Arc<CommandRegistry>, titles: TitleIndex) -> Self {
        Self { registry, titles }
    }

    fn complete_command(&self, partial: &str) -> Vec<Pair> {
        pairs(self.registry.completions(partial))
    }

    fn complete_title(&self, partial: &str) -> Vec<Pair> {
        match self.titles.read() {
            Ok(titles) => pairs(
                titles
                    .iter()
                    .filter(|t| t.starts_with(partial) && !t.contains(char::is_whitespace))
                    .cloned()
                    .collect(),
            ),
            Err(_) => vec![],
        }
    }

    /// Parses the input line to determine completion context.
    fn parse_context<'a>(&self, line: &'a str, pos: usize) -> CompletionContext<'a> {
        let line_to_pos = &line[..pos];
        let parts: Vec<&str> = line_to_pos.split_whitespace().collect();

        if parts.is_empty() {
            return CompletionContext::Command { partial: "" };
        }

        let ends_with_space = line_to_pos.ends_with(char::is_whitespace);

        if parts.len() == 1 && !ends_with_space {
            return CompletionContext::Command { partial: parts[0] };
        }

        let (arg_index, partial) = if ends_with_space {
            (parts.len() - 1, "")
        } else {
            (parts.len() - 2, parts[parts.len() - 1])
        };

        CompletionContext::Argument {
            command: parts[0],
            arg_index,
            partial,
        }
    }
}

enum CompletionContext<'a> {
    Command {
        partial: &'a str,
    },
    Argument {
        command: &'a str,
        arg_index: usize,
        partial: &'a str,
    },
}

impl Completer for VaultCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        match self.parse_context(line, pos) {
            CompletionContext::Command { partial } => {
                Ok((pos - partial.len(), self.complete_command(partial)))
            }
            CompletionContext::Argument {
                command,
                arg_index,
                partial,
            } => {
                let primary = self.registry.get(command).map(|c| c.name().to_string());
                let completions = match (primary.as_deref(), arg_index) {
                    (Some("decrypt" | "update" | "delete"), 0) => self.complete_title(partial),
                    (Some("help"), 0) => self.complete_command(partial),
                    _ => vec![],
                };
                Ok((pos - partial.len(), completions))
            }
        }
    }
}
