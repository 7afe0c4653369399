//! Violation reporter: fixed-width CSV rows, one per conformance violation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;

/// Column header of every violation report, in order.
pub const REPORT_HEADER: [&str; 4] = ["focusNode", "resultPath", "resultMessage", "sourceShape"];

/// One nonconformity found by the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationRecord {
    #[serde(rename = "focusNode")]
    pub focus_node: String,
    /// Absent when the violation is not path-scoped; written as an empty cell.
    #[serde(rename = "resultPath", default, deserialize_with = "empty_as_none")]
    pub result_path: Option<String>,
    #[serde(rename = "resultMessage")]
    pub message: String,
    #[serde(rename = "sourceShape")]
    pub source_shape: String,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

/// Write the report. Zero violations still produce a header-only file.
pub fn write_report(path: &Path, violations: &[ViolationRecord]) -> Result<(), ReportError> {
    let display = path.display().to_string();
    let mut writer = csv::Writer::from_path(path).map_err(|e| csv_error(&display, e))?;
    writer
        .write_record(REPORT_HEADER)
        .map_err(|e| csv_error(&display, e))?;
    for v in violations {
        writer
            .write_record([
                v.focus_node.as_str(),
                v.result_path.as_deref().unwrap_or(""),
                v.message.as_str(),
                v.source_shape.as_str(),
            ])
            .map_err(|e| csv_error(&display, e))?;
    }
    writer.flush().map_err(|e| ReportError::Io {
        path: display.clone(),
        source: e,
    })?;
    tracing::info!(path = %path.display(), violations = violations.len(), "wrote violation report");
    Ok(())
}

/// Read a report written by [`write_report`] (or any CSV with the same header).
pub fn read_report(path: &Path) -> Result<Vec<ViolationRecord>, ReportError> {
    let display = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(&display, e))?;

    let headers = reader.headers().map_err(|e| csv_error(&display, e))?;
    if let Some(missing) = REPORT_HEADER.iter().find(|h| !headers.iter().any(|c| c == **h)) {
        return Err(ReportError::Csv {
            path: display,
            message: format!("missing column `{missing}`"),
        });
    }

    reader
        .deserialize()
        .map(|row| row.map_err(|e| csv_error(&display, e)))
        .collect()
}

fn csv_error(path: &str, err: csv::Error) -> ReportError {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => ReportError::Io {
            path: path.to_string(),
            source,
        },
        other => ReportError::Csv {
            path: path.to_string(),
            message: format!("{other:?}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(focus: &str, path: Option<&str>) -> ViolationRecord {
        ViolationRecord {
            focus_node: focus.into(),
            result_path: path.map(Into::into),
            message: "Less than 1 values on focus->ifcGUID, see \"AssetShape\"".into(),
            source_shape: "http://builtinsight.io/ontology/sdt#AssetShape".into(),
        }
    }

    #[test]
    fn empty_report_is_header_only() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("validation_report.csv");
        write_report(&path, &[]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "focusNode,resultPath,resultMessage,sourceShape\n");
        assert!(read_report(&path).unwrap().is_empty());
    }

    #[test]
    fn absent_path_is_an_empty_cell() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("validation_report.csv");
        write_report(&path, &[violation("http://x/E1", None)]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("http://x/E1,,"));
    }

    #[test]
    fn read_back_preserves_rows() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("validation_report.csv");
        let rows = vec![
            violation("http://x/E1", None),
            violation("http://x/E2", Some("http://builtinsight.io/ontology/sdt#ifcGUID")),
        ];
        write_report(&path, &rows).unwrap();
        assert_eq!(read_report(&path).unwrap(), rows);
    }

    #[test]
    fn foreign_header_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("other.csv");
        std::fs::write(&path, "GlobalId,Name\nE1,x\n").unwrap();
        let err = read_report(&path).unwrap_err();
        assert!(matches!(err, ReportError::Csv { .. }));
    }
}
