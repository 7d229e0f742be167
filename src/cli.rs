use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pwvault")]
#[command(version = "0.1")]
#[command(about = "Keeps your passwords behind a master passphrase", long_about = None)]
pub struct Cli {
    /// Vault directory (defaults to ~/.pwvault)
    #[arg(short, long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Minimum level written to the log file
    #[arg(long, value_name = "LEVEL", default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Do not read or write the command history file
    #[arg(long)]
    pub no_history: bool,
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level '{}' (off, error, warn, info, debug, trace)", s))
}
