//! `entlink` — config-driven fuzzy record linkage between two datasets.

mod exit_codes;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use entlink_engine::engine::load_csv_records;
use entlink_engine::{LinkConfig, LinkInput, LinkResult};

use exit_codes::{EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "entlink")]
#[command(about = "Link records across two datasets with blocking + fuzzy scoring")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run linkage from a TOML config file
    #[command(after_help = "\
Examples:
  entlink run business.link.toml
  entlink run business.link.toml --json
  entlink run business.link.toml --output matches.csv")]
    Run {
        /// Path to the .link.toml config file
        config: PathBuf,

        /// Output full JSON result to stdout instead of the match table
        #[arg(long)]
        json: bool,

        /// Write accepted matches as CSV to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a link config without running
    #[command(after_help = "\
Examples:
  entlink validate business.link.toml")]
    Validate {
        /// Path to the .link.toml config file
        config: PathBuf,
    },
}

struct CliError {
    code: u8,
    message: String,
}

fn cli_err(code: u8, message: impl Into<String>) -> CliError {
    CliError {
        code,
        message: message.into(),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run {
            config,
            json,
            output,
        } => cmd_run(config, json, output),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            ExitCode::from(e.code)
        }
    }
}

fn cmd_run(config_path: PathBuf, json_output: bool, output_file: Option<PathBuf>) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read config: {e}")))?;

    let config = LinkConfig::from_toml(&config_str)
        .map_err(|e| cli_err(EXIT_INVALID_CONFIG, e.to_string()))?;

    // Resolve dataset paths relative to the config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let left = load_dataset(base_dir, "left", &config.datasets.left)?;
    let right = load_dataset(base_dir, "right", &config.datasets.right)?;

    let input = LinkInput { left, right };
    let result = entlink_engine::run(&config, &input)
        .map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?;

    if let Some(ref path) = output_file {
        write_matches_csv(path, &result)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| cli_err(EXIT_RUNTIME, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        for m in &result.matches {
            println!("{}\t{}\t{:.4}", m.left_id, m.right_id, m.score);
        }
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "linked {} x {} records: {} common blocks, {} pairs compared, {} accepted, {} rejected",
        s.left_records, s.right_records, s.common_blocks, s.pairs_compared, s.accepted, s.rejected,
    );
    if s.scorer_failures > 0 {
        eprintln!("warning: {} scorer failure(s), pairs excluded", s.scorer_failures);
    }

    Ok(())
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(&config_path)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read config: {e}")))?;

    match LinkConfig::from_toml(&config_str) {
        Ok(config) => {
            eprintln!(
                "valid: '{}' — scorer {}, threshold {}",
                config.name, config.matching.scorer, config.matching.threshold,
            );
            Ok(())
        }
        Err(e) => Err(cli_err(EXIT_INVALID_CONFIG, e.to_string())),
    }
}

fn load_dataset(
    base_dir: &Path,
    side: &str,
    dataset: &entlink_engine::config::DatasetConfig,
) -> Result<Vec<entlink_engine::Record>, CliError> {
    let csv_path = base_dir.join(&dataset.file);
    let csv_data = std::fs::read_to_string(&csv_path)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot read {}: {e}", csv_path.display())))?;
    load_csv_records(side, &csv_data, dataset).map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))
}

fn write_matches_csv(path: &Path, result: &LinkResult) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| cli_err(EXIT_RUNTIME, format!("cannot write output: {e}")))?;

    writer
        .write_record(["left_id", "right_id", "score"])
        .map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?;
    for m in &result.matches {
        let score = format!("{:.4}", m.score);
        writer
            .write_record([m.left_id.as_str(), m.right_id.as_str(), score.as_str()])
            .map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| cli_err(EXIT_RUNTIME, e.to_string()))?;

    Ok(())
}
