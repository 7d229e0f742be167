//! Export command implementation.

use crate::manager::EXPORT_WARNING;
use crate::shell::command::{Command, CommandResult, ShellContext};
use crate::shell::highlighter::OutputHighlighter;

/// Command to write every password in plaintext to the export file.
pub struct ExportCommand;

impl Command for ExportCommand {
    fn name(&self) -> &str {
        "export"
    }

    fn description(&self) -> &str {
        "Export all passwords in plaintext"
    }

    fn usage(&self) -> &str {
        "export"
    }

    fn help(&self) -> &str {
        "Decrypt every record and write it to the export file in the vault\n\
         directory. The file is NOT encrypted; delete it when done.\n\n\
         Examples:\n  \
           export"
    }

    fn execute(&self, _args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        match ctx.vault.export_all() {
            Ok(report) if report.count == 0 => CommandResult::success("No passwords to export."),
            Ok(report) => CommandResult::success(format!(
                "{}\nExported {} password(s) to {}\n{}",
                OutputHighlighter::success("Export complete"),
                report.count,
                report.path.display(),
                OutputHighlighter::warning(EXPORT_WARNING),
            )),
            Err(e) => e.into(),
        }
    }

    fn max_args(&self) -> Option<usize> {
        Some(0)
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
    fn test_export_command_reports_count() {
        let temp = TempDir::new().unwrap();
        let mut vault = Vault::open(VaultPaths::in_dir(temp.path())).unwrap();
        vault.add("Mail", "me", "Ab1!abcd").unwrap();
        let mut console = MemoryConsole::default();
        let mut ctx = ShellContext::new(&mut vault, &mut console);

        match ExportCommand.execute(&[], &mut ctx) {
            CommandResult::Success(Some(msg)) => {
                assert!(msg.contains("Exported 1 password(s)"));
                assert!(msg.contains("unencrypted"));
            }
            other => panic!("Expected success, got {:?}", other),
        }
        assert!(vault.paths().export.exists());
    }

    #[test]
    fn test_export_command_empty() {
        let temp = TempDir::new().unwrap();
        let mut vault = Vault::open(VaultPaths::in_dir(temp.path())).unwrap();
        let mut console = MemoryConsole::default();
        let mut ctx = ShellContext::new(&mut vault, &mut console);

        match ExportCommand.execute(&[], &mut ctx) {
            CommandResult::Success(Some(msg)) => assert_eq!(msg, "No passwords to export."),
            other => panic!("Expected success, got {:?}", other),
        }
    }
}
