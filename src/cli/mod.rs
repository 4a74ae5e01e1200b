//! Command-line interface module

use clap::{CommandFactory, Parser};
use console::style;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::conversion::batch::{convert_batch_files, BatchObserver};
use crate::conversion::stats::BatchStatistics;
use crate::conversion::{ConversionConfig, ConversionEngine, ConversionOutcome, ConversionResult, VpzData};
use crate::error::{ConversionError, ConversionErrorKind};
use crate::parser::directory::expand_inputs;

/// Main CLI arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "vpzconv")]
#[command(about = "Migrate VLE project files (VPZ) from the 1.1 to the 1.2 schema, in place")]
#[command(version)]
#[command(long_about = None)]
pub struct Args {
    /// VPZ files to convert; directories are searched for .vpz files
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub args: Args,
    pub conversion_config: ConversionConfig,
}

impl CliConfig {
    /// Create CLI configuration from arguments
    pub fn from_args(args: Args) -> ConversionResult<Self> {
        let conversion_config = ConversionConfig::default();

        // Validate configuration
        conversion_config
            .validate()
            .map_err(|e| ConversionError::conversion(ConversionErrorKind::configuration(e)))?;

        Ok(Self {
            args,
            conversion_config,
        })
    }

    /// True when no path was given on the command line
    pub fn has_no_input(&self) -> bool {
        self.args.paths.is_empty()
    }
}

/// Usage text printed when the tool is run without paths
pub fn usage() -> String {
    let mut command = Args::command();
    format!(
        "{}\n\nEach file is rewritten in place; run with --help for details.",
        command.render_usage()
    )
}

/// Convert every input, reporting to `out`, and return the batch counters
pub fn run<W: Write>(config: &CliConfig, out: W) -> BatchStatistics {
    let engine = ConversionEngine::new(config.conversion_config.clone());
    let mut reporter = ConsoleReporter::new(out);

    let mut paths = Vec::new();
    let mut expansion_failures = 0;
    for input in expand_inputs(&config.args.paths) {
        match input {
            Ok(path) => paths.push(path),
            Err((dir, e)) => {
                reporter.line(&format!(
                    "{} {}: cannot list directory: {}",
                    style("✗").red(),
                    dir.display(),
                    e
                ));
                expansion_failures += 1;
            }
        }
    }

    let report = convert_batch_files(&engine, &paths, &mut reporter);
    let mut stats = report.stats;
    for _ in 0..expansion_failures {
        stats.record_failure();
    }

    reporter.line(&format!(
        "\n{} ({} written in {})",
        stats.summary(),
        CliUtils::format_file_size(stats.output_size_bytes),
        CliUtils::format_duration(stats.elapsed)
    ));
    stats
}

/// Prints one progress line and one outcome line per file
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, text: &str) {
        // A closed stdout must not stop the batch
        let _ = writeln!(self.out, "{}", text);
    }
}

impl<W: Write> BatchObserver for ConsoleReporter<W> {
    fn on_start(&mut self, path: &Path) {
        self.line(&format!("Converting {}...", path.display()));
    }

    fn on_finish(&mut self, path: &Path, result: &ConversionResult<VpzData>) {
        let line = outcome_line(path, result);
        self.line(&line);
    }
}

/// Status line for one finished file
pub fn outcome_line(path: &Path, result: &ConversionResult<VpzData>) -> String {
    match result {
        Ok(data) => match &data.outcome {
            ConversionOutcome::Converted(values) => format!(
                "{} {}: converted (begin={}, duration={})",
                style("✓").green(),
                path.display(),
                values.begin,
                values.duration
            ),
            outcome => format!(
                "{} {}: skipped, {}",
                style("⚠").yellow(),
                path.display(),
                outcome.description()
            ),
        },
        Err(e) => format!(
            "{} {}: {}",
            style("✗").red(),
            path.display(),
            e.user_message()
        ),
    }
}

/// CLI utilities and helpers
pub struct CliUtils;

impl CliUtils {
    /// Format a file size in human-readable format
    pub fn format_file_size(bytes: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = bytes as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", bytes, UNITS[unit_index])
        } else {
            format!("{:.1} {}", size, UNITS[unit_index])
        }
    }

    /// Format a duration in human-readable format
    pub fn format_duration(duration: Duration) -> String {
        let total_millis = duration.as_millis();

        if total_millis < 1000 {
            format!("{}ms", total_millis)
        } else if total_millis < 60_000 {
            format!("{:.1}s", total_millis as f64 / 1000.0)
        } else {
            let minutes = total_millis / 60_000;
            let seconds = (total_millis % 60_000) / 1000;
            format!("{}m {}s", minutes, seconds)
        }
    }
}
