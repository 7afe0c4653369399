//! Conformance checking: the seam to an external SHACL engine.
//!
//! The pipeline never validates shapes itself. It hands a serialized data graph
//! and a shape schema to a [`ConformanceChecker`] and consumes the verdict plus
//! the itemized violations. [`ShaclCliChecker`] drives a pySHACL-compatible
//! command; tests substitute their own implementations.
//!
//! A checker failure is fatal to the run: there are no retries, and the error
//! carries the engine's own diagnostics.

pub mod report_graph;
pub mod shacl_cli;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConformanceError;
use crate::report::ViolationRecord;

pub use report_graph::{VIOLATION_QUERY, extract_outcome};
pub use shacl_cli::ShaclCliChecker;

/// Entailment applied to the data graph before validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InferenceMode {
    None,
    /// RDFS subclass/subproperty entailment, so shapes targeting a superclass
    /// also see instances of its subclasses.
    #[default]
    Rdfs,
}

impl InferenceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Rdfs => "rdfs",
        }
    }
}

impl std::fmt::Display for InferenceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InferenceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "off" => Ok(Self::None),
            "rdfs" => Ok(Self::Rdfs),
            other => Err(format!("unknown inference mode \"{other}\" (expected none or rdfs)")),
        }
    }
}

/// Verdict of one conformance check.
#[derive(Debug, Clone, PartialEq)]
pub struct ConformanceOutcome {
    pub conforms: bool,
    pub violations: Vec<ViolationRecord>,
    /// Human-readable rendering of the verdict and every result.
    pub report_text: String,
}

impl ConformanceOutcome {
    pub fn new(conforms: bool, violations: Vec<ViolationRecord>) -> Self {
        let report_text = render_text(conforms, &violations);
        Self {
            conforms,
            violations,
            report_text,
        }
    }
}

/// External validation engine.
pub trait ConformanceChecker {
    /// Check the Turtle data graph at `data` against the shape schema at `shapes`.
    fn check(
        &self,
        data: &Path,
        shapes: &Path,
        inference: InferenceMode,
    ) -> Result<ConformanceOutcome, ConformanceError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Plain-text validation report in the layout SHACL engines print.
pub fn render_text(conforms: bool, violations: &[ViolationRecord]) -> String {
    let mut out = String::from("Validation Report\n");
    out.push_str(&format!("Conforms: {}\n", if conforms { "True" } else { "False" }));
    if violations.is_empty() {
        return out;
    }
    out.push_str(&format!("Results ({}):\n", violations.len()));
    for v in violations {
        out.push_str("Constraint Violation:\n");
        out.push_str(&format!("\tSource Shape: {}\n", v.source_shape));
        out.push_str(&format!("\tFocus Node: {}\n", v.focus_node));
        if let Some(path) = &v.result_path {
            out.push_str(&format!("\tResult Path: {path}\n"));
        }
        out.push_str(&format!("\tMessage: {}\n", v.message));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inference_mode_parses_aliases() {
        assert_eq!("off".parse::<InferenceMode>().unwrap(), InferenceMode::None);
        assert_eq!("rdfs".parse::<InferenceMode>().unwrap(), InferenceMode::Rdfs);
        assert!("owlrl".parse::<InferenceMode>().is_err());
    }

    #[test]
    fn conforming_report_text() {
        let text = render_text(true, &[]);
        assert_eq!(text, "Validation Report\nConforms: True\n");
    }

    #[test]
    fn report_text_lists_results() {
        let violations = vec![
            ViolationRecord {
                focus_node: "sdt:E1".into(),
                result_path: Some("sdt:ifcGUID".into()),
                message: "Less than 1 values".into(),
                source_shape: "sdt:AssetShape".into(),
            },
            ViolationRecord {
                focus_node: "sdt:E2".into(),
                result_path: None,
                message: "Closed shape".into(),
                source_shape: "sdt:AssetShape".into(),
            },
        ];
        let outcome = ConformanceOutcome::new(false, violations);
        assert!(outcome.report_text.contains("Conforms: False"));
        assert!(outcome.report_text.contains("Results (2):"));
        assert_eq!(outcome.report_text.matches("Result Path:").count(), 1);
    }
}
