//! VPZ migration module
//!
//! This module contains the core conversion logic, configuration, and batch statistics.

pub mod batch;
pub mod config;
pub mod engine;
pub mod limits;
pub mod stats;

pub use config::ConversionConfig;

pub use engine::{ConversionEngine, ConversionOutcome, MigratedValues, VpzData};

use crate::error::ConversionError;

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;
