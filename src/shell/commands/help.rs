//! Help command implementation.

use crate::shell::command::{Command, CommandRegistry, CommandResult, ShellContext};

/// Command to display help information.
pub struct HelpCommand;

fn alias_list(cmd: &dyn Command) -> Option<String> {
    let aliases = cmd.aliases();
    (!aliases.is_empty()).then(|| aliases.join(", "))
}

/// One line per command, alphabetical.
fn overview(registry: &CommandRegistry) -> String {
    let mut commands: Vec<_> = registry.commands().collect();
    commands.sort_by(|a, b| a.name().cmp(b.name()));

    let mut output = String::from("Available commands:\n\n");
    for cmd in commands {
        let aliases = alias_list(&**cmd)
            .map(|a| format!(" ({})", a))
            .unwrap_or_default();
        output.push_str(&format!(
            "  {:<28} - {}\n",
            format!("{}{}", cmd.name(), aliases),
            cmd.description()
        ));
    }
    output.push_str("\nPasswords are typed at a masked prompt, never on the command line.");
    output.push_str("\nType 'help <command>' for detailed help on a specific command.");
    output
}

fn detail(cmd: &dyn Command) -> String {
    let aliases = alias_list(cmd)
        .map(|a| format!("\nAliases: {}", a))
        .unwrap_or_default();
    format!(
        "{}\n\nUsage: {}{}\n\n{}",
        cmd.name().to_uppercase(),
        cmd.usage(),
        aliases,
        cmd.help()
    )
}

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn aliases(&self) -> &[&str] {
        &["h", "?"]
    }

    fn description(&self) -> &str {
        "Display help information"
    }

    fn usage(&self) -> &str {
        "help [command]"
    }

    fn help(&self) -> &str {
        "Display help information about commands.\n\n\
         Without arguments, lists all available commands.\n\
         With a command name, shows detailed help for that command.\n\n\
         Examples:\n  \
           help\n  \
           help decrypt\n  \
           ? add"
    }

    fn execute(&self, args: &[&str], ctx: &mut ShellContext) -> CommandResult {
        let Some(registry) = ctx.registry else {
            return CommandResult::error("Help not available (no registry)");
        };

        match args.first() {
            None => CommandResult::success(overview(registry)),
            Some(name) => match registry.get(name) {
                Some(cmd) => CommandResult::success(detail(&*cmd)),
                None => CommandResult::error(format!(
                    "Unknown command: '{}'\nType 'help' to see available commands.",
                    name
                )),
            },
        }
    }

    fn max_args(&self) -> Option<usize> {
        Some(1)
    }
}
