//! Generate command implementation.

use crate::crypto::{MAX_GENERATED_LEN, MIN_GENERATED_LEN};
use crate::manager::generate_and_report;
use crate::shell::command::{Command, CommandResult, ShellContext};
use crate::shell::highlighter::OutputHighlighter;

/// Length used when none is given.
pub const DEFAULT_GENERATED_LEN: usize = 16;

/// Command to suggest a random password.
pub struct GenerateCommand;

impl Command for GenerateCommand {
    fn name(&self) -> &str {
        "generate"
    }

    fn aliases(&self) -> &[&str] {
        &["gen", "g"]
    }

    fn description(&self) -> &str {
        "Generate a strong password"
    }

    fn usage(&self) -> &str {
        "generate <site> [length]"
    }

    fn help(&self) -> &str {
        "Suggest a random password for a site. Nothing is stored.\n\n\
         The password mixes upper and lower case letters, digits and symbols.\n\
         Lengths below 8 are raised to 8 and lengths above 1024 are\n\
         refused; the default is 16.\n\n\
         Examples:\n  \
           generate Gmail\n  \
           gen Bank 24"
    }

    fn execute(&self, args: &[&str], _ctx: &mut ShellContext) -> CommandResult {
        let (site, length) = match args {
            [site] => (*site, DEFAULT_GENERATED_LEN),
            [site, length] => match length.parse::<usize>() {
                Ok(n) if n > MAX_GENERATED_LEN => {
                    return CommandResult::error(format!(
                        "Length must be at most {}",
                        MAX_GENERATED_LEN
                    ));
                }
                Ok(n) => (*site, n),
                Err(_) => return CommandResult::error(format!("Invalid length: '{}'", length)),
            },
            _ => return CommandResult::usage(self),
        };

        let generated = generate_and_report(site, length);
        let mut out = format!(
            "Generated password for {}: {}\nStrength: {}/7 {}",
            generated.site,
            OutputHighlighter::secret(&generated.password),
            generated.strength,
            OutputHighlighter::strength(generated.level),
        );
        if length < MIN_GENERATED_LEN {
            out.push_str(&format!("\nLength raised to the minimum of {}", MIN_GENERATED_LEN));
        }
        CommandResult::success(out)
    }

    fn min_args(&self) -> usize {
        1
    }

    fn max_args(&self) -> Option<usize> {
        Some(2)
    }
}
