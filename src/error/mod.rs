//! Error types and handling infrastructure for VPZ migration

use anyhow::Error;
use std::fmt;
use std::path::PathBuf;

/// Core error types for the conversion process
#[derive(Debug, thiserror::Error)]
pub enum ConversionErrorKind {
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("Write error: {message}")]
    Write {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("File too large: {size} bytes (limit: {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("Structural error: {message}")]
    Structural { message: String },

    #[error("Migration check failed: {message}")]
    Validation { message: String },

    #[error("Invalid configuration: {message}")]
    Configuration { message: String },
}

impl ConversionErrorKind {
    pub fn io(message: String, path: Option<PathBuf>) -> Self {
        Self::Io { message, path }
    }

    pub fn write(message: String, path: Option<PathBuf>) -> Self {
        Self::Write { message, path }
    }

    pub fn structural(message: String) -> Self {
        Self::Structural { message }
    }

    pub fn validation(message: String) -> Self {
        Self::Validation { message }
    }

    pub fn configuration(message: String) -> Self {
        Self::Configuration { message }
    }
}

/// Main error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error(transparent)]
    ParseError(#[from] ParseError),

    #[error(transparent)]
    FormattingError(#[from] FormattingError),

    #[error("{kind}")]
    Conversion {
        kind: ConversionErrorKind,
        source: Option<anyhow::Error>,
    },

    #[error(transparent)]
    Other(#[from] Error),
}

impl ConversionError {
    pub fn parse(message: String, location: Option<(usize, usize)>) -> Self {
        Self::ParseError(ParseError::new(message, location))
    }

    pub fn conversion(kind: ConversionErrorKind) -> Self {
        Self::Conversion { kind, source: None }
    }

    pub fn conversion_with_source(kind: ConversionErrorKind, source: anyhow::Error) -> Self {
        Self::Conversion {
            kind,
            source: Some(source),
        }
    }

    /// Wrap an I/O failure that happened while reading `path`
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{}: {}", path.display(), err);
        Self::conversion_with_source(ConversionErrorKind::io(message, Some(path)), err.into())
    }

    /// Wrap an I/O failure that happened while overwriting `path`
    pub fn write(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{}: {}", path.display(), err);
        Self::conversion_with_source(ConversionErrorKind::write(message, Some(path)), err.into())
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::conversion(ConversionErrorKind::structural(message.into()))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::conversion(ConversionErrorKind::validation(message.into()))
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::ParseError(err) => {
                if let Some((line, col)) = err.location {
                    format!(
                        "XML parse error at line {}, column {}: {}",
                        line, col, err.message
                    )
                } else {
                    format!("XML parse error: {}", err.message)
                }
            }
            Self::FormattingError(err) => {
                format!("XML formatting error: {}", err)
            }
            Self::Conversion { kind, .. } => match kind {
                ConversionErrorKind::Io { message, .. } => {
                    format!("Cannot read file: {}", message)
                }
                ConversionErrorKind::Write { message, .. } => {
                    format!("Cannot write file: {}", message)
                }
                ConversionErrorKind::FileTooLarge { size, limit } => {
                    format!(
                        "VPZ file too large: {} bytes (limit: {} bytes)",
                        size, limit
                    )
                }
                ConversionErrorKind::Structural { message } => {
                    format!("Cannot migrate project: {}", message)
                }
                _ => self.to_string(),
            },
            Self::Other(err) => {
                format!("Unexpected error: {}", err)
            }
        }
    }
}

/// XML parsing errors
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub location: Option<(usize, usize)>,
}

impl ParseError {
    pub fn new(message: String, location: Option<(usize, usize)>) -> Self {
        Self { message, location }
    }

    /// Build an error positioned at byte `offset` of `input`
    pub fn at_offset(message: String, input: &str, offset: usize) -> Self {
        Self::new(message, Some(line_column(input, offset)))
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some((line, col)) = self.location {
            write!(f, " at line {}, column {}", line, col)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// 1-based line and column of a byte offset
fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(input.len());
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    let prefix = &input[..end];
    let line = prefix.matches('\n').count() + 1;
    let column = match prefix.rfind('\n') {
        Some(pos) => prefix[pos + 1..].chars().count() + 1,
        None => prefix.chars().count() + 1,
    };
    (line, column)
}

/// XML serialization errors
#[derive(Debug, thiserror::Error)]
pub enum FormattingError {
    #[error("Serialization failed: {message}")]
    Serialization { message: String },

    #[error("Output is not valid UTF-8: {message}")]
    Encoding { message: String },
}

impl FormattingError {
    pub fn serialization(message: String) -> Self {
        Self::Serialization { message }
    }

    pub fn encoding(message: String) -> Self {
        Self::Encoding { message }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Convenience result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Convenience result type for formatting operations
pub type FormattingResult<T> = Result<T, FormattingError>;
