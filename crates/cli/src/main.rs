// tenderfuse CLI - batch worker for master-record reconciliation

mod exit_codes;
mod master;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};
use master::MasterCommands;

#[derive(Parser)]
#[command(name = "tfuse")]
#[command(about = "Fuse procurement records from many sources into master records")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Master-record reconciliation (robust prices, framework agreement flag)
    #[command(subcommand)]
    Master(MasterCommands),
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("TFUSE_GIT_HASH"), ")",
        "\ntarget:  ", env!("TFUSE_TARGET"),
    )
}

/// Logs go to stderr so `--json` stdout stays a single JSON value.
/// Library crates log through `log`; the subscriber picks those records up.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        None => {
            eprintln!("Usage: tfuse <command> [options]");
            eprintln!("       tfuse --help for more information");
            Err(CliError { code: EXIT_USAGE, message: String::new(), hint: None })
        }
        Some(Commands::Master(cmd)) => master::cmd_master(cmd),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}
