use anyhow::{Context, Result};
use clap::Parser;
use review_extractor_lib::application::ExtractionJob;
use review_extractor_lib::infrastructure::{ConfigManager, MalformedPolicy, logging};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "review-extractor")]
#[command(about = "Extract review records from saved HTML pages into a CSV table", long_about = None)]
struct Cli {
    /// JSON configuration file; defaults apply when it does not exist
    #[arg(short, long, default_value = "review-extractor.json")]
    config: PathBuf,

    /// Directory searched recursively for .html files
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// CSV file to create or replace
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extract files in parallel (output order is unchanged)
    #[arg(long)]
    parallel: bool,

    /// Drop records with malformed values instead of aborting
    #[arg(long)]
    skip_malformed: bool,

    /// Log level, e.g. "debug" (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,

    /// Write the effective configuration to the --config path and exit
    #[arg(long)]
    write_config: bool,
}

fn run(cli: Cli) -> Result<()> {
    let manager = ConfigManager::new(&cli.config);
    let (mut config, source) = manager.load_or_default()?;

    if let Some(input) = cli.input {
        config.input_dir = input;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if cli.parallel {
        config.extraction.parallel = true;
    }
    if cli.skip_malformed {
        config.extraction.malformed_policy = MalformedPolicy::SkipRecord;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    logging::init_logging_with_config(&config.logging)?;
    info!("review-extractor {}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {}", source);

    if cli.write_config {
        manager.save_config(&config)?;
        info!("Configuration written to {}", manager.config_path().display());
        return Ok(());
    }

    let job = ExtractionJob::new(&config.extraction)?;
    let summary = job
        .run(&config.input_dir, &config.output_path)
        .context("Extraction job failed")?;

    info!(
        "Done: {} records written to {}",
        summary.records_written,
        summary.output_path.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Logging may not be up yet, so report on stderr directly.
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
