use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Find VPZ files under `dir`, recursively, in a stable order.
pub fn find_vpz_files(dir: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    let mut vpz_files = Vec::new();

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if crate::parser::filter::is_vpz_file(path) {
            vpz_files.push(path.to_path_buf());
        }
    }

    Ok(vpz_files)
}

/// Expand command-line inputs: directories become the VPZ files they
/// contain, anything else is passed through untouched so that missing
/// paths are reported by the converter itself.
pub fn expand_inputs(inputs: &[PathBuf]) -> Vec<Result<PathBuf, (PathBuf, walkdir::Error)>> {
    let mut expanded = Vec::with_capacity(inputs.len());

    for input in inputs {
        if input.is_dir() {
            match find_vpz_files(input) {
                Ok(files) => expanded.extend(files.into_iter().map(Ok)),
                Err(e) => expanded.push(Err((input.clone(), e))),
            }
        } else {
            expanded.push(Ok(input.clone()));
        }
    }

    expanded
}
