//! Rich diagnostic error types for the integration pipeline.
//!
//! Each pipeline stage defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so operators know exactly what
//! went wrong and how to fix it.
//!
//! Data-quality problems that never abort a run (unparseable values, missing optional
//! inputs) are not errors here: they are recorded as flags on the stage outcomes.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the pipeline.
///
/// Each variant wraps a stage-specific error, preserving the full diagnostic
/// chain (error codes, help text, sources) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum SdtError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Conformance(#[from] ConformanceError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Record errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum RecordError {
    #[error("malformed record at row {row}: required field `{field}` is missing")]
    #[diagnostic(
        code(sdt::record::malformed),
        help(
            "Every data row must carry all six columns. The row is rejected; \
             re-export the property table or disable strict mode to skip such rows."
        )
    )]
    Malformed { row: usize, field: &'static str },

    #[error("malformed record at row {row}: `globalId` is empty")]
    #[diagnostic(
        code(sdt::record::empty_id),
        help("An asset without a GlobalId cannot be keyed in the graph. Fix the source export.")
    )]
    EmptyIdentifier { row: usize },

    #[error("malformed record at row {row}: `{global_id}` does not form a valid IRI")]
    #[diagnostic(
        code(sdt::record::invalid_id),
        help(
            "GlobalIds are appended to the sdt namespace. Remove whitespace and \
             characters such as `<`, `>` or `\"` from the identifier."
        )
    )]
    InvalidIdentifier { row: usize, global_id: String },
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("{role} file not found: {path}")]
    #[diagnostic(
        code(sdt::input::missing),
        help(
            "Metrics fall back to degraded-mode heuristics when this input is absent. \
             Provide the file to get measured values."
        )
    )]
    Missing { role: String, path: String },

    #[error("failed to read {path}")]
    #[diagnostic(code(sdt::input::io), help("Ensure the file exists and is readable."))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("input table {path} lacks required column(s): {columns}")]
    #[diagnostic(
        code(sdt::input::columns),
        help(
            "The header row must name GlobalId, Name, IfcClass, PsetName, Property and Value \
             (or the names configured under [columns])."
        )
    )]
    MissingColumns { path: String, columns: String },

    #[error("failed to parse CSV {path}: {message}")]
    #[diagnostic(
        code(sdt::input::csv),
        help("Check the file is UTF-8, comma separated, and quotes are balanced.")
    )]
    Csv { path: String, message: String },

    #[error("strict mode: {rejected} malformed record(s) in {path}")]
    #[diagnostic(
        code(sdt::input::strict),
        help("Fix the rows reported above, or set `strict = false` to reject them individually.")
    )]
    StrictRejected {
        path: String,
        rejected: usize,
        #[source]
        first: Box<RecordError>,
    },
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("failed to parse graph document {path}: {message}")]
    #[diagnostic(
        code(sdt::graph::parse),
        help("The document must be valid Turtle. Check prefixes and statement terminators.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize graph: {message}")]
    #[diagnostic(
        code(sdt::graph::serialize),
        help("A namespace binding or a term could not be written as Turtle.")
    )]
    Serialize { message: String },

    #[error("SPARQL query failed: {message}")]
    #[diagnostic(
        code(sdt::graph::sparql),
        help("The query could not be evaluated over the in-memory store.")
    )]
    Sparql { message: String },

    #[error("failed to write graph to {path}")]
    #[diagnostic(
        code(sdt::graph::io),
        help("Check that the output directory exists and is writable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Conformance errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConformanceError {
    #[error("failed to launch conformance checker `{command}`")]
    #[diagnostic(
        code(sdt::conformance::spawn),
        help(
            "Install pySHACL (`pip install pyshacl`) or point [validation].command \
             at a compatible checker."
        )
    )]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("conformance checker failed with {status}: {stderr}")]
    #[diagnostic(
        code(sdt::conformance::engine),
        help(
            "The checker could not complete validation. This usually means the shape \
             graph is malformed; run the checker by hand to see its full output."
        )
    )]
    EngineFailed { status: String, stderr: String },

    #[error("unreadable validation report: {message}")]
    #[diagnostic(
        code(sdt::conformance::report),
        help("The checker must print its results graph as Turtle (`-f turtle`).")
    )]
    ReportParse { message: String },
}

// ---------------------------------------------------------------------------
// Report errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ReportError {
    #[error("I/O error on report file {path}")]
    #[diagnostic(
        code(sdt::report::io),
        help("Check that the file is readable and its directory exists and is writable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("violation report {path} is malformed: {message}")]
    #[diagnostic(
        code(sdt::report::csv),
        help("The report must start with the header focusNode,resultPath,resultMessage,sourceShape.")
    )]
    Csv { path: String, message: String },

    #[error("failed to encode run manifest: {message}")]
    #[diagnostic(code(sdt::report::manifest))]
    Manifest { message: String },
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    #[diagnostic(code(sdt::config::io), help("Ensure the file exists and is readable."))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file: {path}")]
    #[diagnostic(code(sdt::config::write), help("Check directory permissions."))]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(sdt::config::parse),
        help("Check the TOML syntax. `sdt-integrate init-config` writes a complete example.")
    )]
    Parse { path: String, message: String },

    #[error("invalid reference timestamp `{value}`: {message}")]
    #[diagnostic(
        code(sdt::config::timestamp),
        help("Use an RFC 3339 date-time such as 2025-10-08T13:00:00Z.")
    )]
    InvalidTimestamp { value: String, message: String },

    #[error("invalid module identifier `{value}`: {message}")]
    #[diagnostic(
        code(sdt::config::module),
        help("The module becomes an IRI local name; use letters, digits, `-` or `_`.")
    )]
    InvalidModule { value: String, message: String },
}

/// Convenience alias for functions returning pipeline results.
pub type SdtResult<T> = std::result::Result<T, SdtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_error_converts_to_sdt_error() {
        let err = RecordError::Malformed {
            row: 3,
            field: "value",
        };
        let sdt: SdtError = err.into();
        assert!(matches!(sdt, SdtError::Record(RecordError::Malformed { .. })));
    }

    #[test]
    fn conformance_error_converts_to_sdt_error() {
        let err = ConformanceError::EngineFailed {
            status: "exit status: 2".into(),
            stderr: "bad shapes".into(),
        };
        let sdt: SdtError = err.into();
        assert!(matches!(
            sdt,
            SdtError::Conformance(ConformanceError::EngineFailed { .. })
        ));
    }

    #[test]
    fn error_display_messages_are_descriptive() {
        let err = RecordError::Malformed {
            row: 7,
            field: "globalId",
        };
        let msg = format!("{err}");
        assert!(msg.contains("row 7"));
        assert!(msg.contains("globalId"));
    }
}
