//! Configuration options for VPZ migration

/// Conversion configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Spaces per indentation level (0-8)
    pub indent_size: u8,
    /// Pretty-print output (vs compact)
    pub pretty: bool,
    /// Largest input file accepted, in bytes
    pub max_file_size: u64,
    /// Check the migrated tree before anything is written
    pub validate_output: bool,
    /// Write through a temporary file renamed over the original
    pub atomic_write: bool,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            indent_size: 2,
            pretty: true,
            max_file_size: 100 * 1024 * 1024, // 100MB
            validate_output: true,
            atomic_write: true,
        }
    }
}

impl ConversionConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set indentation size
    pub fn with_indent_size(mut self, size: u8) -> Result<Self, String> {
        if size > 8 {
            return Err("Indent size must be 0-8 spaces".to_string());
        }
        self.indent_size = size;
        Ok(self)
    }

    /// Enable or disable pretty printing
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set the input size limit
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Enable or disable the post-migration check
    pub fn with_validation(mut self, enabled: bool) -> Self {
        self.validate_output = enabled;
        self
    }

    /// Enable or disable temp-file-and-rename writes
    pub fn with_atomic_write(mut self, enabled: bool) -> Self {
        self.atomic_write = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.indent_size > 8 {
            return Err("Indent size must be 0-8 spaces".to_string());
        }

        if self.max_file_size == 0 {
            return Err("Maximum file size must be greater than 0".to_string());
        }

        Ok(())
    }
}
