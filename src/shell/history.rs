//! Command history settings and filtering.
//!
//! Only command lines are recorded; passwords are always read through the
//! masked console and never reach the history file. Lines for commands that
//! take a record key as an argument are skipped as well.

use rustyline::config::Configurer;
use rustyline::history::FileHistory;
use rustyline::{Editor, Helper};
use std::path::PathBuf;

/// Configuration for command history.
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    /// Path to the history file.
    pub path: PathBuf,
    /// Maximum number of entries to keep.
    pub max_entries: usize,
    /// Whether to ignore duplicate consecutive entries.
    pub ignore_dups: bool,
    /// Whether to ignore entries starting with whitespace.
    pub ignore_space: bool,
    /// Command words whose lines are never recorded.
    pub ignored_commands: Vec<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("history"),
            max_entries: 1000,
            ignore_dups: true,
            ignore_space: true,
            ignored_commands: Vec::new(),
        }
    }
}

impl HistoryConfig {
    /// Creates a new history config with the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Sets the maximum number of entries.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }

    /// Sets whether to ignore duplicate consecutive entries.
    pub fn with_ignore_dups(mut self, ignore: bool) -> Self {
        self.ignore_dups = ignore;
        self
    }

    /// Sets whether to ignore entries starting with whitespace.
    pub fn with_ignore_space(mut self, ignore: bool) -> Self {
        self.ignore_space = ignore;
        self
    }

    /// Adds command words whose lines must not be recorded.
    pub fn with_ignored_commands<I, S>(mut self, commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_commands
            .extend(commands.into_iter().map(Into::into));
        self
    }

    /// Sizes the editor's history and loads saved entries, if any.
    pub fn load_into<H: Helper>(&self, editor: &mut Editor<H, FileHistory>) -> rustyline::Result<()> {
        editor.set_max_history_size(self.max_entries)?;

        if self.path.exists() {
            if let Err(e) = editor.load_history(&self.path) {
                log::warn!("Could not load history: {}", e);
            } else {
                log::debug!("Loaded history from {}", self.path.display());
            }
        }
        Ok(())
    }

    /// Writes the editor's history file, readable by the owner only.
    pub fn save_from<H: Helper>(&self, editor: &mut Editor<H, FileHistory>) -> rustyline::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        editor.save_history(&self.path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        log::debug!("Saved history to {}", self.path.display());
        Ok(())
    }
}

/// Filters for determining what to add to history.
pub struct HistoryFilter {
    /// Configuration to use for filtering.
    config: HistoryConfig,
    /// Last entry added (for duplicate detection).
    last_entry: Option<String>,
}

impl HistoryFilter {
    /// Creates a new filter with the given config.
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            config,
            last_entry: None,
        }
    }

    /// Determines if an entry should be added to history.
    ///
    /// `entry` is the raw line as typed, so a leading space can opt out.
    pub fn should_add(&mut self, entry: &str) -> bool {
        if self.config.ignore_space && entry.starts_with(char::is_whitespace) {
            return false;
        }

        let entry = entry.trim();
        let Some(command) = entry.split_whitespace().next() else {
            return false;
        };
        if self.config.ignored_commands.iter().any(|c| c == command) {
            return false;
        }
        if self.config.ignore_dups && self.last_entry.as_deref() == Some(entry) {
            return false;
        }

        self.last_entry = Some(entry.to_string());
        true
    }

    /// Resets the filter state.
    pub fn reset(&mut self) {
        self.last_entry = None;
    }
}
