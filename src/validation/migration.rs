//! Post-migration invariant checks
//!
//! Run over the mutated tree before it is written back, so a migration that
//! would produce an inconsistent 1.2 project never reaches the disk.

use crate::conversion::engine::{
    MigratedValues, BEGIN_PORT, CONDITIONS, CONDITION, DOUBLE, DURATION_PORT, EXPERIMENT, PORT,
    SIMULATION_ENGINE,
};
use crate::document::{Doctype, Document, Element};

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message: String,
}

/// Outcome of a validation run
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: IssueSeverity::Error,
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: IssueSeverity::Warning,
            message: message.into(),
        });
    }

    /// True when no error was recorded; warnings do not count
    pub fn is_valid(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| issue.severity == IssueSeverity::Error)
    }

    /// Error messages joined for display
    pub fn error_summary(&self) -> String {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Checks a migrated document against the 1.2 layout
#[derive(Debug, Default)]
pub struct MigrationValidator;

impl MigrationValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate `document` after `values` were migrated into it
    pub fn validate(&self, document: &Document, values: &MigratedValues) -> ValidationReport {
        let mut report = ValidationReport::new();

        self.check_experiment(document, &mut report);
        self.check_condition(document, values, &mut report);
        self.check_doctype(document, &mut report);

        report
    }

    fn check_experiment(&self, document: &Document, report: &mut ValidationReport) {
        match document.find_first(EXPERIMENT) {
            Some(experiment) => {
                for name in [BEGIN_PORT, DURATION_PORT] {
                    if experiment.has_attribute(name) {
                        report.add_error(format!("<{}> still carries '{}'", EXPERIMENT, name));
                    }
                }
            }
            None => report.add_error(format!("<{}> element is missing", EXPERIMENT)),
        }
    }

    fn check_condition(
        &self,
        document: &Document,
        values: &MigratedValues,
        report: &mut ValidationReport,
    ) {
        let Some(conditions) = document.find_first(CONDITIONS) else {
            report.add_error(format!("<{}> element is missing", CONDITIONS));
            return;
        };

        let engines: Vec<&Element> = conditions
            .child_elements()
            .filter(|e| e.name == CONDITION && e.attribute("name") == Some(SIMULATION_ENGINE))
            .collect();
        let engine = match engines.as_slice() {
            [engine] => *engine,
            [] => {
                report.add_error(format!("no '{}' condition", SIMULATION_ENGINE));
                return;
            }
            many => {
                report.add_error(format!(
                    "{} '{}' conditions, expected one",
                    many.len(),
                    SIMULATION_ENGINE
                ));
                return;
            }
        };

        let elsewhere = document
            .elements_by_tag_name(CONDITION)
            .into_iter()
            .filter(|e| e.attribute("name") == Some(SIMULATION_ENGINE))
            .count()
            - 1;
        if elsewhere > 0 {
            report.add_warning(format!(
                "{} other '{}' condition(s) outside the first <{}>",
                elsewhere, SIMULATION_ENGINE, CONDITIONS
            ));
        }

        let ports: Vec<&Element> = engine.child_elements().collect();
        let expected = [
            (BEGIN_PORT, values.begin.as_str()),
            (DURATION_PORT, values.duration.as_str()),
        ];
        if ports.len() != expected.len() {
            report.add_error(format!(
                "'{}' has {} children, expected {} ports",
                SIMULATION_ENGINE,
                ports.len(),
                expected.len()
            ));
            return;
        }

        for (port, (name, value)) in ports.iter().zip(expected) {
            if port.name != PORT || port.attribute("name") != Some(name) {
                report.add_error(format!(
                    "expected <{} name=\"{}\">, found <{}> named {:?}",
                    PORT,
                    name,
                    port.name,
                    port.attribute("name")
                ));
                continue;
            }
            self.check_port_value(port, name, value, report);
        }
    }

    fn check_port_value(
        &self,
        port: &Element,
        name: &str,
        value: &str,
        report: &mut ValidationReport,
    ) {
        let children: Vec<&Element> = port.child_elements().collect();
        match children.as_slice() {
            [double] if double.name == DOUBLE => {
                let text = double.text();
                if text != value {
                    report.add_error(format!(
                        "port '{}' holds '{}', expected '{}'",
                        name, text, value
                    ));
                }
            }
            _ => report.add_error(format!(
                "port '{}' must hold exactly one <{}>",
                name, DOUBLE
            )),
        }
    }

    fn check_doctype(&self, document: &Document, report: &mut ValidationReport) {
        if document.doctype.as_ref() != Some(&Doctype::vle_1_2()) {
            report.add_error("DOCTYPE does not reference the 1.2 DTD");
        }
    }
}
