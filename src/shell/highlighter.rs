//! Syntax highlighting for shell input and colouring for command output.

use rustyline::highlight::{CmdKind, Highlighter};
use std::borrow::Cow;
use std::sync::Arc;

use crate::credentials::ExpiryStatus;
use crate::crypto::StrengthLevel;
use crate::shell::command::CommandRegistry;

/// ANSI color codes for highlighting.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const WHITE: &str = "\x1b[37m";

    pub const BRIGHT_RED: &str = "\x1b[91m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

fn paint(color: &str, text: &str) -> String {
    format!("{}{}{}", color, text, colors::RESET)
}

/// Highlighter for shell input.
pub struct VaultHighlighter {
    /// Registry to check for valid commands.
    registry: Arc<CommandRegistry>,
}

impl VaultHighlighter {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    /// Colours the command word by validity and the arguments by role.
    pub fn highlight_line(&self, line: &str) -> String {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return line.to_string();
        }

        let leading_ws = &line[..line.len() - trimmed.len()];
        let cmd_len = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
        let (command, rest) = trimmed.split_at(cmd_len);

        let mut result = String::from(leading_ws);
        match self.registry.get(command) {
            Some(cmd) => {
                result.push_str(&format!("{}{}", colors::BOLD, paint(colors::CYAN, command)));
                result.push_str(&self.highlight_arguments(cmd.name(), rest));
            }
            None => {
                result.push_str(&paint(colors::RED, command));
                result.push_str(rest);
            }
        }
        result
    }

    fn highlight_arguments(&self, command: &str, rest: &str) -> String {
        let mut result = String::new();
        let mut word = String::new();
        let mut index = 0;

        for c in rest.chars() {
            if c.is_whitespace() {
                if !word.is_empty() {
                    result.push_str(&paint(arg_color(command, index), &word));
                    word.clear();
                    index += 1;
                }
                result.push(c);
            } else {
                word.push(c);
            }
        }
        if !word.is_empty() {
            result.push_str(&paint(arg_color(command, index), &word));
        }
        result
    }
}

/// Colour for the `index`-th argument of `command`; the decrypt key is dimmed.
fn arg_color(command: &str, index: usize) -> &'static str {
    match (command, index) {
        ("add" | "update" | "delete" | "decrypt", 0) => colors::MAGENTA,
        ("decrypt", 2) => colors::DIM,
        ("generate", 0) => colors::MAGENTA,
        ("generate" | "help", _) => colors::YELLOW,
        _ => colors::WHITE,
    }
}

impl Highlighter for VaultHighlighter {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Owned(self.highlight_line(line))
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        _default: bool,
    ) -> Cow<'b, str> {
        Cow::Owned(format!(
            "{}{}",
            colors::BOLD,
            paint(colors::BRIGHT_GREEN, prompt)
        ))
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(paint(colors::DIM, hint))
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        _completion: rustyline::CompletionType,
    ) -> Cow<'c, str> {
        Cow::Owned(paint(colors::BRIGHT_CYAN, candidate))
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _kind: CmdKind) -> bool {
        true
    }
}

/// Utilities for semantic highlighting in output.
pub struct OutputHighlighter;

impl OutputHighlighter {
    pub fn success(msg: &str) -> String {
        paint(colors::GREEN, msg)
    }

    pub fn error(msg: &str) -> String {
        paint(colors::BRIGHT_RED, msg)
    }

    pub fn warning(msg: &str) -> String {
        paint(colors::YELLOW, msg)
    }

    /// A revealed or generated password.
    pub fn secret(secret: &str) -> String {
        paint(colors::BOLD, secret)
    }

    pub fn strength(level: StrengthLevel) -> String {
        let color = match level {
            StrengthLevel::Strong => colors::GREEN,
            StrengthLevel::Good => colors::CYAN,
            StrengthLevel::Weak => colors::RED,
        };
        paint(color, &level.to_string())
    }

    pub fn status(status: ExpiryStatus) -> String {
        let color = match status {
            ExpiryStatus::Valid => colors::GREEN,
            ExpiryStatus::ExpiringSoon => colors::YELLOW,
            ExpiryStatus::Expired => colors::RED,
        };
        paint(color, &status.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::commands::register_all;

    fn setup_highlighter() -> VaultHighlighter {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        VaultHighlighter::new(Arc::new(registry))
    }

    #[test]
    fn test_highlight_valid_command() {
        let highlighter = setup_highlighter();
        let result = highlighter.highlight_line("view");

        assert!(result.contains(colors::CYAN));
        assert!(result.contains(colors::BOLD));
        assert!(result.contains("view"));
    }

    #[test]
    fn test_highlight_invalid_command() {
        let highlighter = setup_highlighter();
        let result = highlighter.highlight_line("invalid");

        assert!(result.contains(colors::RED));
        assert!(result.contains("invalid"));
    }

    #[test]
    fn test_highlight_decrypt_key_is_dimmed() {
        let highlighter = setup_highlighter();
        let result = highlighter.highlight_line("decrypt Mail me@x.com K");

        assert!(result.contains(colors::MAGENTA));
        assert!(result.contains(&paint(colors::DIM, "K")));
    }

    #[test]
    fn test_highlight_keeps_spacing() {
        let highlighter = setup_highlighter();
        let result = highlighter.highlight_line("  search   git");
        assert!(result.starts_with("  "));
        assert!(result.contains("   "));
    }

    #[test]
    fn test_empty_line() {
        let highlighter = setup_highlighter();
        assert_eq!(highlighter.highlight_line(""), "");
        assert_eq!(highlighter.highlight_line("   "), "   ");
    }

    #[test]
    fn test_output_colours() {
        assert!(OutputHighlighter::error("Failed!").contains(colors::BRIGHT_RED));
        assert!(OutputHighlighter::status(ExpiryStatus::Expired).contains("Expired"));
        assert!(OutputHighlighter::strength(StrengthLevel::Weak).contains(colors::RED));
    }
}
