//! Inline usage hints for the shell.

use rustyline::Context;
use rustyline::hint::Hinter;
use std::sync::Arc;

use crate::shell::command::CommandRegistry;

/// Hinter that completes command names and shows missing arguments.
pub struct VaultHinter {
    registry: Arc<CommandRegistry>,
}

impl VaultHinter {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    fn get_hint(&self, line: &str) -> Option<String> {
        let has_trailing_space = line.ends_with(char::is_whitespace);
        let parts: Vec<&str> = line.split_whitespace().collect();
        let command = *parts.first()?;

        if parts.len() == 1 && !has_trailing_space {
            let completions = self.registry.completions(command);
            return match completions.as_slice() {
                [only] if only != command => Some(only[command.len()..].to_string()),
                _ => None,
            };
        }

        let cmd = self.registry.get(command)?;
        let arg_count = parts.len() - 1;
        let placeholders: Vec<&str> = cmd
            .usage()
            .strip_prefix(cmd.name())?
            .split_whitespace()
            .collect();

        if arg_count >= placeholders.len() {
            return None;
        }
        let remaining = placeholders[arg_count..].join(" ");
        if has_trailing_space {
            Some(remaining)
        } else {
            Some(format!(" {}", remaining))
        }
    }
}

impl Hinter for VaultHinter {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        if pos < line.len() {
            return None;
        }
        self.get_hint(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::commands::register_all;

    fn setup_hinter() -> VaultHinter {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        VaultHinter::new(Arc::new(registry))
    }

    #[test]
    fn test_command_completion_hint() {
        let hinter = setup_hinter();
        assert_eq!(hinter.get_hint("hel"), Some("p".to_string()));
        assert_eq!(hinter.get_hint("expo"), Some("rt".to_string()));
    }

    #[test]
    fn test_ambiguous_prefix_has_no_hint() {
        let hinter = setup_hinter();
        assert!(hinter.get_hint("de").is_none());
    }

    #[test]
    fn test_usage_hint_for_missing_args() {
        let hinter = setup_hinter();
        assert_eq!(
            hinter.get_hint("decrypt "),
            Some("<title> <account> [key]".to_string())
        );
        assert_eq!(
            hinter.get_hint("decrypt Mail"),
            Some(" <account> [key]".to_string())
        );
    }

    #[test]
    fn test_no_hint_when_args_complete() {
        let hinter = setup_hinter();
        assert!(hinter.get_hint("add Mail me").is_none());
        assert!(hinter.get_hint("view ").is_none());
    }

    #[test]
    fn test_empty_line_no_hint() {
        let hinter = setup_hinter();
        assert!(hinter.get_hint("").is_none());
        assert!(hinter.get_hint("   ").is_none());
    }
}
