//! Samplesheet checker CLI.
//!
//! ```bash
//! check-variant-table samplesheet.tsv samplesheet.valid.csv
//! check-variant-table -l INFO samplesheet.csv out/samplesheet.valid.csv
//! ```
//!
//! Exit codes: `0` valid, `1` invalid or failed, `2` input file not found.

use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::level_filters::LevelFilter;
use varsheet::logging::{init_logging, LogConfig};
use varsheet::{check_samplesheet, CheckError, CheckOptions};

#[derive(Parser)]
#[command(name = "check-variant-table")]
#[command(about = "Validate and transform a tabular samplesheet.", long_about = None)]
#[command(after_help = "Example: check-variant-table samplesheet.csv samplesheet.valid.csv")]
struct Cli {
    /// Tabular input samplesheet in CSV or TSV format.
    #[arg(value_name = "FILE_IN")]
    file_in: PathBuf,

    /// Transformed output samplesheet in CSV format.
    #[arg(value_name = "FILE_OUT")]
    file_out: PathBuf,

    /// The desired log level.
    #[arg(
        short,
        long,
        value_enum,
        default_value = "WARNING",
        env = "VARSHEET_LOG_LEVEL",
        ignore_case = true
    )]
    log_level: LogLevelArg,

    /// JSON file with check options (column names, sniff line count).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevelArg {
    #[value(name = "CRITICAL")]
    Critical,
    #[value(name = "ERROR")]
    Error,
    #[value(name = "WARNING")]
    Warning,
    #[value(name = "INFO")]
    Info,
    #[value(name = "DEBUG")]
    Debug,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            // tracing has no level above error
            LogLevelArg::Critical | LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warning => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let level = LevelFilter::from(cli.log_level);
    let debug = level == LevelFilter::DEBUG;
    let log_config = LogConfig::default()
        .with_level(level)
        .with_timestamps(debug)
        .with_target(debug)
        .with_ansi(std::io::stderr().is_terminal());
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            tracing::error!("{error}");
            error.exit_code()
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> Result<(), CheckError> {
    if !cli.file_in.is_file() {
        return Err(CheckError::InputNotFound(cli.file_in.clone()));
    }

    let options = match &cli.config {
        Some(path) => CheckOptions::load(path)?,
        None => CheckOptions::default(),
    };

    if let Some(parent) = cli.file_out.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| CheckError::io(parent, e))?;
    }

    let summary = check_samplesheet(&cli.file_in, &cli.file_out, &options)?;
    tracing::info!(
        rows = summary.row_count,
        encoding = summary.encoding,
        dialect = %summary.dialect,
        "samplesheet is valid"
    );
    Ok(())
}
