//! VPZ (VLE project file) migration tool
//!
//! Migrates VLE project files from the 1.1 schema to the 1.2 schema: the
//! experiment's `begin`/`duration` attributes move into a
//! `simulation_engine` condition and the DOCTYPE is pointed at the 1.2 DTD.

pub mod cli;
pub mod conversion;
pub mod document;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod validation;

// Re-export commonly used types
pub use conversion::{
    ConversionConfig, ConversionEngine, ConversionOutcome, ConversionResult, MigratedValues,
    VpzData,
};
pub use document::{Doctype, Document, Element, Node};
pub use error::{ConversionError, ConversionErrorKind, ParseError};
pub use formatter::XmlFormatter;
pub use parser::{parse_document, VpzSource};

/// Migrate VPZ text with default configuration.
///
/// Returns the new text, or `None` when the document was skipped.
pub fn convert_vpz(input: &str) -> Result<Option<String>, ConversionError> {
    let config = ConversionConfig::default();
    convert_vpz_with_config(input, &config)
}

/// Migrate VPZ text with custom configuration
pub fn convert_vpz_with_config(
    input: &str,
    config: &ConversionConfig,
) -> Result<Option<String>, ConversionError> {
    let data = ConversionEngine::new(config.clone()).convert_str(input)?;
    Ok(data.content)
}
