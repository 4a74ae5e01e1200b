//! Statistics for batch conversion runs

use crate::conversion::engine::{ConversionOutcome, VpzData};
use crate::conversion::ConversionResult;
use std::time::Duration;

/// Per-outcome counters for a batch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStatistics {
    /// Files migrated and rewritten
    pub converted: usize,
    /// Files skipped because they are not VLE projects
    pub not_matching: usize,
    /// Files skipped because they already use the 1.2 layout
    pub already_converted: usize,
    /// Files that failed with an error
    pub failed: usize,
    /// Bytes read from converted files
    pub input_size_bytes: u64,
    /// Bytes written to converted files
    pub output_size_bytes: u64,
    /// Wall-clock time of the whole batch
    pub elapsed: Duration,
}

impl BatchStatistics {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the result of one file
    pub fn record(&mut self, result: &ConversionResult<VpzData>) {
        match result {
            Ok(data) => match &data.outcome {
                ConversionOutcome::Converted(_) => {
                    self.converted += 1;
                    self.input_size_bytes += data.metadata.input_size;
                    self.output_size_bytes += data.metadata.output_size;
                }
                ConversionOutcome::NotMatchingFormat => self.not_matching += 1,
                ConversionOutcome::AlreadyConverted => self.already_converted += 1,
            },
            Err(_) => self.failed += 1,
        }
    }

    /// Count a file that never reached the converter
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn skipped(&self) -> usize {
        self.not_matching + self.already_converted
    }

    pub fn file_count(&self) -> usize {
        self.converted + self.skipped() + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Get a formatted summary
    pub fn summary(&self) -> String {
        format!(
            "Processed {} files: {} converted, {} skipped, {} failed",
            self.file_count(),
            self.converted,
            self.skipped(),
            self.failed
        )
    }
}
