//! Run manifest: the JSON hand-off to the downstream graph-database loader.
//!
//! The loader only accepts graphs that went through validation, so the
//! manifest records which files a run produced, how clean the input was, and
//! the final integration summary, stamped with the run's provenance tag.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::metrics::IntegrationSummary;
use crate::provenance::ProvenanceTag;

/// Mapping statistics of the ETL stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtlExport {
    pub rows_read: usize,
    pub rejected_rows: usize,
    pub coercion_warnings: usize,
    pub entities: usize,
    pub derived_results: usize,
    pub triples: usize,
}

/// Outcome of the conformance check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationExport {
    pub conforms: bool,
    pub violations: usize,
    /// Share of graph subjects not named by a violation, in percent.
    pub instance_correctness_percent: f64,
}

/// Files written by the run, as given in the configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducedFiles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation_report: Option<String>,
    pub summary: String,
}

/// Everything the loader needs to know about one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunManifest {
    pub provenance: ProvenanceTag,
    pub outputs: ProducedFiles,
    /// `None` when the ETL stage was skipped for lack of input.
    pub etl: Option<EtlExport>,
    /// `None` when validation was skipped for lack of input.
    pub validation: Option<ValidationExport>,
    pub summary: IntegrationSummary,
}

impl RunManifest {
    /// Only validated, conforming graphs are safe to load.
    pub fn loadable(&self) -> bool {
        self.outputs.graph.is_some() && self.validation.as_ref().is_some_and(|v| v.conforms)
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        serde_json::to_string_pretty(self).map_err(|e| ReportError::Manifest {
            message: e.to_string(),
        })
    }

    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| ReportError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        tracing::info!(path = %path.display(), loadable = self.loadable(), "wrote run manifest");
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self, ReportError> {
        let json = std::fs::read_to_string(path).map_err(|e| ReportError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        serde_json::from_str(&json).map_err(|e| ReportError::Manifest {
            message: format!("{}: {e}", path.display()),
        })
    }
}
