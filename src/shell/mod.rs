//! Shell module - rustyline-based interactive shell over an unlocked vault.
//!
//! This module provides a shell-like interface with:
//! - Command and title completion
//! - Syntax highlighting
//! - Command history (command lines only, never passwords)
//! - Usage hints

pub mod command;
pub mod commands;
pub mod completer;
pub mod highlighter;
pub mod hints;
pub mod history;

use anyhow::Result;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::FileHistory;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use std::borrow::Cow;
use std::sync::{Arc, RwLock};

use crate::console::Console;
use crate::logging::timed;
use crate::manager::Vault;

use command::{CommandRegistry, CommandResult, ShellContext};
use commands::register_all;
use completer::{TitleIndex, VaultCompleter};
use highlighter::{OutputHighlighter, VaultHighlighter};
use hints::VaultHinter;
use history::{HistoryConfig, HistoryFilter};

/// The prompt displayed to the user.
const PROMPT: &str = "pwvault> ";

/// Combined helper for rustyline that provides all shell features.
pub struct VaultHelper {
    completer: VaultCompleter,
    highlighter: VaultHighlighter,
    hinter: VaultHinter,
}

impl VaultHelper {
    pub fn new(registry: Arc<CommandRegistry>, titles: TitleIndex) -> Self {
        Self {
            completer: VaultCompleter::new(Arc::clone(&registry), titles),
            highlighter: VaultHighlighter::new(Arc::clone(&registry)),
            hinter: VaultHinter::new(registry),
        }
    }
}

impl Completer for VaultHelper {
    type Candidate = rustyline::completion::Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Highlighter for VaultHelper {
    fn highlight<'l>(&self, line: &'l str, pos: usize) -> Cow<'l, str> {
        self.highlighter.highlight(line, pos)
    }

    fn highlight_prompt<'b, 's: 'b, 'p: 'b>(
        &'s self,
        prompt: &'p str,
        default: bool,
    ) -> Cow<'b, str> {
        self.highlighter.highlight_prompt(prompt, default)
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        self.highlighter.highlight_hint(hint)
    }

    fn highlight_candidate<'c>(
        &self,
        candidate: &'c str,
        completion: rustyline::CompletionType,
    ) -> Cow<'c, str> {
        self.highlighter.highlight_candidate(candidate, completion)
    }

    fn highlight_char(&self, line: &str, pos: usize, kind: rustyline::highlight::CmdKind) -> bool {
        self.highlighter.highlight_char(line, pos, kind)
    }
}

impl Hinter for VaultHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, ctx: &Context<'_>) -> Option<Self::Hint> {
        self.hinter.hint(line, pos, ctx)
    }
}

// Every line is complete as typed; quoting errors are reported by `execute_line`.
impl Validator for VaultHelper {}

impl Helper for VaultHelper {}

/// Configuration for the shell.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub history: HistoryConfig,
    /// Whether to show the welcome message.
    pub show_welcome: bool,
    /// Whether command lines are loaded from and saved to the history file.
    pub record_history: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            history: HistoryConfig::default(),
            show_welcome: true,
            record_history: true,
        }
    }
}

/// The interactive shell.
pub struct Shell {
    registry: Arc<CommandRegistry>,
    /// Titles for completion (shared with the helper).
    titles: TitleIndex,
    config: ShellConfig,
}

impl Shell {
    pub fn new() -> Self {
        Self::with_config(ShellConfig::default())
    }

    pub fn with_config(config: ShellConfig) -> Self {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);

        Self {
            registry: Arc::new(registry),
            titles: Arc::new(RwLock::new(Vec::new())),
            config,
        }
    }

    /// Rebuilds the completion index from the vault's current titles.
    fn refresh_titles(&self, vault: &Vault) {
        if let Ok(mut titles) = self.titles.write() {
            titles.clear();
            titles.extend(vault.store().iter().map(|r| r.title().to_string()));
            titles.sort();
            titles.dedup();
        }
    }

    /// Names and aliases of commands whose arguments include a record key.
    fn key_bearing_commands(&self) -> Vec<String> {
        self.registry
            .get("decrypt")
            .map(|cmd| {
                std::iter::once(cmd.name())
                    .chain(cmd.aliases().iter().copied())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Runs the read-eval-print loop until `quit`, end of input or a purge.
    pub fn run(&self, vault: &mut Vault, console: &mut dyn Console) -> Result<()> {
        self.refresh_titles(vault);

        let helper = VaultHelper::new(Arc::clone(&self.registry), Arc::clone(&self.titles));
        let mut editor: Editor<VaultHelper, FileHistory> = Editor::new()?;
        editor.set_helper(Some(helper));
        if self.config.record_history {
            self.config.history.load_into(&mut editor)?;
        }
        let mut filter = HistoryFilter::new(
            self.config
                .history
                .clone()
                .with_ignored_commands(self.key_bearing_commands()),
        );

        if self.config.show_welcome {
            console.say("Unlocked. Type 'help' for available commands.");
        }
        log::info!("Shell started with {} records", vault.store().len());

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    if self.config.record_history && filter.should_add(&line) {
                        let _ = editor.add_history_entry(line.trim());
                    }
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    let result = self.execute_line(line, vault, console);
                    self.refresh_titles(vault);
                    if !report(result, console) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    console.say("^C");
                    log::debug!("Interrupted (Ctrl-C)");
                }
                Err(ReadlineError::Eof) => {
                    console.say("exit");
                    log::info!("EOF received (Ctrl-D)");
                    break;
                }
                Err(err) => {
                    console.say(&OutputHighlighter::error(&format!("Error: {}", err)));
                    log::error!("Readline error: {}", err);
                    break;
                }
            }
        }

        if self.config.record_history {
            if let Err(e) = self.config.history.save_from(&mut editor) {
                log::warn!("Failed to save history: {}", e);
            }
        }

        log::info!("Shell exited");
        Ok(())
    }

    /// Splits `line` shell-style and runs the named command.
    pub fn execute_line(
        &self,
        line: &str,
        vault: &mut Vault,
        console: &mut dyn Console,
    ) -> CommandResult {
        let words = match shell_words::split(line) {
            Ok(words) => words,
            Err(e) => return CommandResult::error(format!("Parse error: {}", e)),
        };
        let Some((name, rest)) = words.split_first() else {
            return CommandResult::Continue;
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        let Some(cmd) = self.registry.get(name) else {
            return CommandResult::error(format!(
                "Unknown command: '{}'\nType 'help' to see available commands.",
                name
            ));
        };
        if !cmd.accepts(args.len()) {
            return CommandResult::usage(&*cmd);
        }

        // Arguments can carry record keys, so only the command name is logged.
        log::debug!("Executing command: {}", cmd.name());
        let mut ctx = ShellContext::new(vault, console).with_registry(&self.registry);
        timed(cmd.name(), || cmd.execute(&args, &mut ctx))
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

/// Shows a command result; returns false when the shell should stop.
fn report(result: CommandResult, console: &mut dyn Console) -> bool {
    match result {
        CommandResult::Success(Some(msg)) => console.say(&msg),
        CommandResult::Error(msg) => console.say(&OutputHighlighter::error(&msg)),
        CommandResult::Exit => {
            log::info!("User requested exit");
            return false;
        }
        CommandResult::Success(None) | CommandResult::Continue => {}
    }
    true
}
