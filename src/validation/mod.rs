//! Migration validation module

pub mod migration;

pub use migration::{IssueSeverity, MigrationValidator, ValidationIssue, ValidationReport};
