use crate::batch::{BatchConverter, BatchReport};
use crate::config::ImpexConfig;
use crate::converter::{ConvertOutcome, FileConverter};
use crate::error::ImpexResult;
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `RUST_LOG` takes precedence.
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "impex_forge=debug,impex=debug"
    } else {
        "impex_forge=info,impex=info"
    };
    // A subscriber may already be installed (tests); keep the existing one
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Execute single-file conversion; output goes next to the input
pub fn convert(file: PathBuf, config: &ImpexConfig) -> ImpexResult<ConvertOutcome> {
    println!("{}", "🔥 Impex - Converting workbook".bold().green());
    println!("   File: {}\n", file.display());

    let converter = FileConverter::new(&file)?.with_options(config.convert_options());
    let outcome = converter.convert()?;

    match &outcome {
        ConvertOutcome::Written { output, entries } => {
            println!("{}", "✅ Impex written".bold().green());
            println!("   Output:  {}", output.display());
            println!("   Entries: {}", entries);
        }
        ConvertOutcome::NoKeys => {
            println!(
                "{}",
                "⚠️  No translation keys found - nothing written".yellow()
            );
        }
    }
    Ok(outcome)
}

/// Execute batch conversion of a directory into `<dir>/impexes/`
pub fn batch(dir: PathBuf, config: ImpexConfig) -> ImpexResult<BatchReport> {
    println!("{}", "🔥 Impex - Batch conversion".bold().green());
    println!("   Directory: {}", dir.display());

    let converter = BatchConverter::new(&dir, config)?;
    println!("   Target:    {}\n", converter.target_dir().display());

    let report = converter.run_blocking()?;
    print_batch_report(&report);
    Ok(report)
}

fn print_batch_report(report: &BatchReport) {
    for file in &report.files {
        match &file.result {
            Ok(ConvertOutcome::Written { entries, .. }) => {
                println!("   {} {} ({} entries)", "✅".green(), file.file_name(), entries)
            }
            Ok(ConvertOutcome::NoKeys) => println!(
                "   {} {} (no translation keys)",
                "➖".yellow(),
                file.file_name()
            ),
            Err(e) => println!("   {} {}: {}", "❌".red(), file.file_name().red(), e),
        }
    }
    println!();

    let summary = format!(
        "{} converted, {} without keys, {} failed",
        report.converted(),
        report.skipped(),
        report.failed()
    );
    if report.failed() == 0 {
        println!("{}", summary.bold().green());
    } else {
        println!("{}", summary.bold().yellow());
    }
}
