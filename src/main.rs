use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use pwvault::auth::{AuthOutcome, Authenticator};
use pwvault::cli::Cli;
use pwvault::config::VaultPaths;
use pwvault::console::{Console, TerminalConsole};
use pwvault::error::VaultError;
use pwvault::logging::{LogConfig, init_logging};
use pwvault::manager::Vault;
use pwvault::shell::history::HistoryConfig;
use pwvault::shell::{Shell, ShellConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = VaultPaths::resolve(cli.dir)?;
    paths.ensure_dir()?;
    init_logging(&LogConfig::for_vault(&paths).with_level(cli.log_level))?;
    log::info!("pwvault starting in {}", paths.dir.display());

    let mut console = TerminalConsole;
    console.say("=== Password Manager ===");

    match Authenticator::new(&paths).authenticate(&mut console) {
        Ok(AuthOutcome::Authenticated) => {}
        Ok(AuthOutcome::ResetComplete) => return Ok(()),
        Ok(AuthOutcome::Denied) => {
            console.say("Access denied. Exiting...");
            return Ok(());
        }
        Err(
            e @ (VaultError::Validation(_)
            | VaultError::RecoveryFailure(_)
            | VaultError::CorruptState(_)),
        ) => {
            log::warn!("Authentication ended: {}", e);
            console.say(&e.to_string());
            console.say("Access denied. Exiting...");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    let mut vault = Vault::open(paths.clone())?;
    let shell = Shell::with_config(ShellConfig {
        history: HistoryConfig::new(paths.history.clone()),
        show_welcome: true,
        record_history: !cli.no_history,
    });
    shell.run(&mut vault, &mut console)
}
