use clap::Parser;
use std::process::ExitCode;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use vpzconv::cli::{self, Args, CliConfig};

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> Result<ExitCode> {
    init_logging()?;

    let args = Args::parse();
    let config = CliConfig::from_args(args)?;

    if config.has_no_input() {
        println!("{}", cli::usage());
        return Ok(ExitCode::SUCCESS);
    }

    let stats = cli::run(&config, std::io::stdout().lock());

    // Skipped files are not failures; any error makes the run fail
    if stats.has_failures() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Diagnostics go to stderr so they never interleave with the per-file report
fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialise logging: {}", e))
}
