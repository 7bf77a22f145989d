//! `tfuse master` — run the master plugin pipeline over a batch of entity groups.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use tenderfuse_master::{MasterConfig, MasterResult};

use crate::exit_codes::{
    EXIT_MASTER_INVALID_CONFIG, EXIT_MASTER_RECORDS_FAILED, EXIT_MASTER_RUNTIME,
};
use crate::CliError;

#[derive(Subcommand)]
pub enum MasterCommands {
    /// Reconcile a JSON batch of source records + master skeletons
    #[command(after_help = "\
Examples:
  tfuse master run batch.json
  tfuse master run batch.json --config master.toml --json
  tfuse master run batch.json --output mastered.json")]
    Run {
        /// Path to the batch document ({"groups": [...]})
        input: PathBuf,

        /// Path to the .toml config (defaults apply when omitted)
        #[arg(long, short = 'c', env = "TFUSE_CONFIG")]
        config: Option<PathBuf>,

        /// Output JSON to stdout instead of human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a master config without running
    #[command(after_help = "\
Examples:
  tfuse master validate master.toml")]
    Validate {
        /// Path to the .toml config file
        config: PathBuf,
    },
}

pub fn cmd_master(cmd: MasterCommands) -> Result<(), CliError> {
    match cmd {
        MasterCommands::Run { input, config, json, output } => {
            cmd_master_run(input, config, json, output)
        }
        MasterCommands::Validate { config } => cmd_master_validate(config),
    }
}

fn master_err(code: u8, msg: impl Into<String>) -> CliError {
    CliError { code, message: msg.into(), hint: None }
}

fn load_config(path: Option<&Path>) -> Result<MasterConfig, CliError> {
    let Some(path) = path else {
        return Ok(MasterConfig::default());
    };
    let config_str = std::fs::read_to_string(path)
        .map_err(|e| master_err(EXIT_MASTER_RUNTIME, format!("cannot read config: {e}")))?;
    MasterConfig::from_toml(&config_str)
        .map_err(|e| master_err(EXIT_MASTER_INVALID_CONFIG, e.to_string()))
}

fn cmd_master_run(
    input_path: PathBuf,
    config_path: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(config_path.as_deref())?;

    let input_str = std::fs::read_to_string(&input_path).map_err(|e| {
        master_err(EXIT_MASTER_RUNTIME, format!("cannot read {}: {e}", input_path.display()))
    })?;
    let input = tenderfuse_master::load_input_json(&input_str)
        .map_err(|e| master_err(EXIT_MASTER_RUNTIME, e.to_string()))?;

    let result = tenderfuse_master::run(&config, input)
        .map_err(|e| master_err(EXIT_MASTER_INVALID_CONFIG, e.to_string()))?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| master_err(EXIT_MASTER_RUNTIME, format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| master_err(EXIT_MASTER_RUNTIME, format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    print_summary(&result);

    if result.summary.failed > 0 {
        let failed: Vec<&str> = result
            .records
            .iter()
            .filter(|r| r.error.is_some())
            .map(|r| r.record_id.as_str())
            .collect();
        return Err(CliError {
            code: EXIT_MASTER_RECORDS_FAILED,
            message: format!("{} record(s) failed: {}", failed.len(), failed.join(", ")),
            hint: Some("failed records are listed with their error in the JSON output".into()),
        });
    }

    Ok(())
}

/// Human summary to stderr.
fn print_summary(result: &MasterResult) {
    let s = &result.summary;
    eprintln!(
        "master '{}': {} record(s), {} reconciled, {} failed",
        result.meta.config_name, s.total_records, s.reconciled, s.failed,
    );
    eprintln!(
        "lots: {} priced, {} unpriced; winning bids: {} priced, {} unpriced",
        s.lots_priced, s.lots_unpriced, s.winning_bids_priced, s.winning_bids_unpriced,
    );
}

fn cmd_master_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(config_path.as_path()))?;
    let plugins: Vec<String> = config.pipeline.plugins.iter().map(|p| p.to_string()).collect();
    eprintln!(
        "valid: master config '{}' with pipeline [{}], threshold {}, scale {}",
        config.name,
        plugins.join(", "),
        config.price.outlier_threshold,
        config.price.division_scale,
    );
    Ok(())
}
