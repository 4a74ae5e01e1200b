use crate::conversion::engine::{ConversionEngine, VpzData};
use crate::conversion::stats::BatchStatistics;
use crate::conversion::ConversionResult;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;

/// Receives progress while a batch runs
pub trait BatchObserver {
    /// Called before a file is converted
    fn on_start(&mut self, _path: &Path) {}

    /// Called once the file has been converted, skipped or has failed
    fn on_finish(&mut self, _path: &Path, _result: &ConversionResult<VpzData>) {}
}

/// Result for a single file of a batch
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: ConversionResult<VpzData>,
}

/// Everything a batch run produced
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
    pub stats: BatchStatistics,
}

/// Convert every path in order. A failing file is recorded and the batch
/// moves on to the next one.
pub fn convert_batch_files(
    engine: &ConversionEngine,
    paths: &[PathBuf],
    observer: &mut dyn BatchObserver,
) -> BatchReport {
    let started = Instant::now();
    let mut report = BatchReport::default();

    for path in paths {
        observer.on_start(path);
        let result = engine.convert_file(path);
        if let Err(e) = &result {
            debug!(path = %path.display(), error = ?e, "conversion failed");
        }
        observer.on_finish(path, &result);
        report.stats.record(&result);
        report.files.push(FileReport {
            path: path.clone(),
            result,
        });
    }

    report.stats.elapsed = started.elapsed();
    report
}
