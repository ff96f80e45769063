mod commands;
mod logging;
mod output;
mod progress;

use std::fs;
use std::path::Path;
use std::process;

use anyhow::{bail, Context};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, CompareArgs, Commands};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info};
use zip_reconcile_core::{
    AppConfig, ArchiveInput, CompareResponse, ErrorResponse, ProgressReporter, ReconcileEngine,
    SilentReporter,
};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let guard = logging::init_logger();

    let config = match zip_reconcile_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            drop(guard);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    match args.command {
        Some(Commands::Compare(compare_args)) => {
            if let Err(err) = run_compare(&compare_args, config) {
                if compare_args.json {
                    print_error_response(&err);
                }
                error!("Error: {:#}", err);
                drop(guard);
                process::exit(1);
            }
        }
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
        }
        None => {
            let _ = Cli::command().print_long_help();
        }
    }

    Ok(())
}

fn run_compare(args: &CompareArgs, mut config: AppConfig) -> anyhow::Result<()> {
    args.apply_to(&mut config);

    let a = load_input(&args.archive_a, "File 1")?;
    let b = load_input(&args.archive_b, "File 2")?;

    let engine = ReconcileEngine::new(config);
    let cli_reporter;
    let reporter: &dyn ProgressReporter = if args.json {
        &SilentReporter
    } else {
        cli_reporter = CliReporter::new();
        &cli_reporter
    };

    let result = engine.reconcile(&a, &b, reporter)?;

    let written = output::write_outputs(&result, &args.output_dir, args.csv)?;

    if args.json {
        println!("{}", CompareResponse::from(result).to_json()?);
        return Ok(());
    }

    let stats = &result.summary.summary_stats;
    println!();
    info!(
        "Archive A: {} files, Archive B: {} files",
        format!("{}", result.summary.zip1_stats.total_files).cyan(),
        format!("{}", result.summary.zip2_stats.total_files).cyan(),
    );
    info!(
        "{} duplicates, {} removed, {} files in merged archive",
        format!("{}", stats.total_duplicates).red(),
        format!("{}", stats.total_removed).red(),
        format!("{}", stats.total_kept).green(),
    );
    let unmatched =
        result.summary.zip1_stats.unmatched_files + result.summary.zip2_stats.unmatched_files;
    if unmatched > 0 {
        info!(
            "{} files did not follow their archive's naming convention",
            format!("{}", unmatched).yellow()
        );
    }
    info!("Merged archive: {}", written.archive.display());
    info!("Report: {}", written.report.display());
    if let Some(csv) = &written.csv {
        info!("CSV: {}", csv.display());
    }

    Ok(())
}

/// `{"detail": ...}` on stdout for any failure of a `--json` run. Engine
/// errors keep their own message; everything else carries its context chain.
fn print_error_response(err: &anyhow::Error) {
    let response = match err.downcast_ref::<zip_reconcile_core::Error>() {
        Some(engine_err) => ErrorResponse::from(engine_err),
        None => ErrorResponse {
            detail: format!("{:#}", err),
        },
    };
    match serde_json::to_string(&response) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Could not serialize error response: {}", e),
    }
}

/// Request-level validation: both uploads must be `.zip` files.
fn load_input(path: &Path, label: &str) -> anyhow::Result<ArchiveInput> {
    let is_zip = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if !is_zip {
        bail!("{} must be a ZIP file", label);
    }

    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ArchiveInput::new(name, bytes))
}
