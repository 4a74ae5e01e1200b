//! Core conversion engine for the VPZ 1.1 to 1.2 migration

use crate::conversion::config::ConversionConfig;
use crate::conversion::limits;
use crate::conversion::ConversionResult;
use crate::document::{Doctype, Document, Element};
use crate::error::ConversionError;
use crate::formatter::XmlFormatter;
use crate::parser::{parse_document, VpzSource};
use crate::validation::MigrationValidator;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

pub const VLE_PROJECT: &str = "vle_project";
pub const EXPERIMENT: &str = "experiment";
pub const CONDITIONS: &str = "conditions";
pub const CONDITION: &str = "condition";
pub const PORT: &str = "port";
pub const DOUBLE: &str = "double";
pub const SIMULATION_ENGINE: &str = "simulation_engine";
pub const BEGIN_PORT: &str = "begin";
pub const DURATION_PORT: &str = "duration";

/// The attribute strings moved off the experiment element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigratedValues {
    pub begin: String,
    pub duration: String,
}

/// What happened to one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// The document was migrated and must be written back
    Converted(MigratedValues),
    /// No `vle_project` or no `experiment` element
    NotMatchingFormat,
    /// The experiment carries neither `begin` nor `duration`
    AlreadyConverted,
}

impl ConversionOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConversionOutcome::Converted(_))
    }

    /// Short human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ConversionOutcome::Converted(_) => "converted",
            ConversionOutcome::NotMatchingFormat => "not a VLE project file",
            ConversionOutcome::AlreadyConverted => "already converted",
        }
    }
}

/// Metadata about the conversion process
#[derive(Debug, Clone, Default)]
pub struct ConversionMetadata {
    pub input_size: u64,
    pub output_size: u64,
    pub processing_time_ms: u64,
}

/// Result of converting one source
#[derive(Debug, Clone)]
pub struct VpzData {
    pub outcome: ConversionOutcome,
    /// Serialized document, present only when converted
    pub content: Option<String>,
    pub metadata: ConversionMetadata,
}

/// Main conversion engine
pub struct ConversionEngine {
    config: ConversionConfig,
}

impl ConversionEngine {
    /// Create a new conversion engine
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Migrate a parsed document in place.
    ///
    /// Whitespace is normalized first, then the two guards run; the tree is
    /// only restructured when both pass and a `conditions` container exists.
    pub fn convert_document(&self, document: &mut Document) -> ConversionResult<ConversionOutcome> {
        document.normalize_whitespace();

        let projects = document.elements_by_tag_name(VLE_PROJECT);
        let experiments = document.elements_by_tag_name(EXPERIMENT);
        let Some(experiment) = experiments.first() else {
            debug!("no <{}> element", EXPERIMENT);
            return Ok(ConversionOutcome::NotMatchingFormat);
        };
        if projects.is_empty() {
            debug!("no <{}> element", VLE_PROJECT);
            return Ok(ConversionOutcome::NotMatchingFormat);
        }
        if !experiment.has_attribute(BEGIN_PORT) && !experiment.has_attribute(DURATION_PORT) {
            return Ok(ConversionOutcome::AlreadyConverted);
        }
        if document.find_first(CONDITIONS).is_none() {
            return Err(ConversionError::structural(format!(
                "no <{}> element to receive the '{}' condition",
                CONDITIONS, SIMULATION_ENGINE
            )));
        }

        let values = {
            let experiment = document
                .find_first_mut(EXPERIMENT)
                .ok_or_else(|| ConversionError::structural("experiment element vanished"))?;
            take_time_bounds(experiment)
        };

        document
            .find_first_mut(CONDITIONS)
            .ok_or_else(|| ConversionError::structural("conditions element vanished"))?
            .append_element(simulation_engine_condition(&values));

        document.doctype = Some(Doctype::vle_1_2());

        if self.config.validate_output {
            let report = MigrationValidator::new().validate(document, &values);
            for issue in &report.issues {
                warn!("{}", issue.message);
            }
            if !report.is_valid() {
                return Err(ConversionError::validation(report.error_summary()));
            }
        }

        debug!(begin = %values.begin, duration = %values.duration, "moved experiment time bounds");
        Ok(ConversionOutcome::Converted(values))
    }

    /// Convert XML text, returning the new text when the document was migrated
    pub fn convert_str(&self, input: &str) -> ConversionResult<VpzData> {
        let start_time = Instant::now();

        let mut document = parse_document(input)?;
        let outcome = self.convert_document(&mut document)?;
        let content = if outcome.is_converted() {
            Some(XmlFormatter::new(&self.config).format(&document)?)
        } else {
            None
        };

        let metadata = ConversionMetadata {
            input_size: input.len() as u64,
            output_size: content.as_ref().map_or(0, |c| c.len() as u64),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        };

        Ok(VpzData {
            outcome,
            content,
            metadata,
        })
    }

    /// Convert from a source without writing anything
    pub fn convert_source(&self, source: &VpzSource) -> ConversionResult<VpzData> {
        // Check source size before reading to avoid loading very large files
        limits::check_source_size_before_read(source, &self.config)?;

        let content = source.read_content()?;
        debug!(source = %source.description(), bytes = content.len(), "read project");
        self.convert_str(&content)
    }

    /// Convert the file at `path`, overwriting it when it was migrated
    pub fn convert_file(&self, path: &Path) -> ConversionResult<VpzData> {
        let source = VpzSource::File(path.to_path_buf());
        let data = self.convert_source(&source)?;

        if let Some(content) = &data.content {
            self.write_output(path, content)?;
            info!(
                path = %path.display(),
                bytes = content.len(),
                elapsed_ms = data.metadata.processing_time_ms,
                "rewrote project file"
            );
        }

        Ok(data)
    }

    fn write_output(&self, path: &Path, content: &str) -> ConversionResult<()> {
        // Resolve symlinks so the project they point to is the file rewritten
        let target = fs::canonicalize(path).map_err(|e| ConversionError::write(path, e))?;
        let permissions = fs::metadata(&target)
            .map_err(|e| ConversionError::write(path, e))?
            .permissions();
        if permissions.readonly() {
            return Err(ConversionError::write(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "file is read-only"),
            ));
        }

        if !self.config.atomic_write {
            return fs::write(&target, content).map_err(|e| ConversionError::write(path, e));
        }

        let dir = target.parent().unwrap_or_else(|| Path::new("."));
        let mut staged =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| ConversionError::write(path, e))?;
        staged
            .write_all(content.as_bytes())
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| ConversionError::write(path, e))?;

        if let Err(e) = fs::set_permissions(staged.path(), permissions) {
            warn!(path = %path.display(), "could not copy permissions: {}", e);
        }

        staged
            .persist(&target)
            .map_err(|e| ConversionError::write(path, e.error))?;
        Ok(())
    }
}

/// Remove `begin`/`duration` from the experiment, keeping their strings verbatim
fn take_time_bounds(experiment: &mut Element) -> MigratedValues {
    let begin = experiment.remove_attribute(BEGIN_PORT);
    let duration = experiment.remove_attribute(DURATION_PORT);

    for (name, value) in [(BEGIN_PORT, &begin), (DURATION_PORT, &duration)] {
        if value.is_none() {
            warn!("<{}> has no '{}' attribute, migrating an empty value", EXPERIMENT, name);
        }
    }

    MigratedValues {
        begin: begin.unwrap_or_default(),
        duration: duration.unwrap_or_default(),
    }
}

/// `<condition name="simulation_engine">` with the begin port before the duration port
fn simulation_engine_condition(values: &MigratedValues) -> Element {
    let mut condition = Element::new(CONDITION).with_attribute("name", SIMULATION_ENGINE);

    for (name, value) in [(BEGIN_PORT, &values.begin), (DURATION_PORT, &values.duration)] {
        let mut double = Element::new(DOUBLE);
        if !value.is_empty() {
            double = double.with_text(value.as_str());
        }
        condition
            .append_element(Element::new(PORT).with_attribute("name", name))
            .append_element(double);
    }

    condition
}
