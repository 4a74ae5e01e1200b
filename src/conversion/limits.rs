use crate::conversion::config::ConversionConfig;
use crate::conversion::ConversionResult;
use crate::error::{ConversionError, ConversionErrorKind};
use crate::parser::VpzSource;

/// Check the source size before attempting to read or parse the XML.
/// This avoids loading very large files into memory if the configured
/// limit is smaller than the file.
pub fn check_source_size_before_read(
    source: &VpzSource,
    config: &ConversionConfig,
) -> ConversionResult<()> {
    if let Some(size) = source.estimated_size() {
        if size > config.max_file_size {
            return Err(ConversionError::conversion(
                ConversionErrorKind::FileTooLarge {
                    size,
                    limit: config.max_file_size,
                },
            ));
        }
    }

    Ok(())
}
