use std::path::Path;

/// Extension of VLE project files
pub const VPZ_EXTENSION: &str = "vpz";

/// Return true if the file has a .vpz extension and exists
pub fn is_vpz_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(VPZ_EXTENSION))
}
