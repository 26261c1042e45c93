use anyhow::Context;
use clap::{ArgGroup, Parser};
use colored::Colorize;
use impex_forge::cli;
use impex_forge::config::{ImpexConfig, MalformedKeyPolicy};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "impex")]
#[command(about = "Convert localization spreadsheets into LocalizationEntry impex files.")]
#[command(long_about = "Impex - localization spreadsheets to LocalizationEntry impex

Reads the first worksheet: row 0 names one language per column, every row
holding a translation key (e.g. account.title) supplies one impex line with
the values to its right.

MODES:
  impex labels.xlsx        Write labels.impex next to labels.xlsx
  impex -b ./sheets        Convert every spreadsheet in ./sheets into
                           ./sheets/impexes/ (the directory must not exist)

LANGUAGE CODES:
  gr -> el, cz -> cs, any header containing 'default' -> en

CONFIGURATION (--config, YAML):
  workers: 4
  task_timeout_secs: 300
  target_dir_name: impexes
  extensions: [xlsx, xlsm, xlsb, xls, ods]
  malformed_keys: skip        # or: abort
  strict_columns: false

Set RUST_LOG (e.g. RUST_LOG=impex_forge=debug) for detailed logs.")]
#[command(version)]
#[command(group(ArgGroup::new("input").required(true).args(["file", "batch"])))]
struct Cli {
    /// Spreadsheet to convert
    file: Option<PathBuf>,

    /// Convert every spreadsheet directly inside DIR
    #[arg(short = 'b', long = "batch", value_name = "DIR")]
    batch: Option<PathBuf>,

    /// Concurrent conversions in batch mode
    #[arg(short, long, env = "IMPEX_WORKERS")]
    workers: Option<usize>,

    /// Per-file time limit in batch mode, in seconds
    #[arg(short = 't', long = "timeout", value_name = "SECS", env = "IMPEX_TASK_TIMEOUT")]
    timeout: Option<u64>,

    /// YAML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fail a file whose key rows cover different language columns
    #[arg(long)]
    strict_columns: bool,

    /// Fail a file on a key that is empty after cleanup, instead of skipping the row
    #[arg(long)]
    abort_on_malformed_key: bool,

    /// Show debug logs
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn load_config(&self) -> anyhow::Result<ImpexConfig> {
        let mut config = match &self.config {
            Some(path) => ImpexConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => ImpexConfig::default(),
        };

        if let Some(workers) = self.workers {
            config.workers = Some(workers);
        }
        if let Some(timeout) = self.timeout {
            config.task_timeout_secs = timeout;
        }
        if self.strict_columns {
            config.strict_columns = true;
        }
        if self.abort_on_malformed_key {
            config.malformed_keys = MalformedKeyPolicy::Abort;
        }
        config.validate().context("invalid command line options")?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", "❌".red(), e);
            return ExitCode::FAILURE;
        }
    };

    let result = match (cli.batch, cli.file) {
        (Some(dir), _) => cli::batch(dir, config).map(drop),
        (None, Some(file)) => cli::convert(file, &config).map(drop),
        (None, None) => return ExitCode::from(2),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌".red(), e);
            ExitCode::FAILURE
        }
    }
}
