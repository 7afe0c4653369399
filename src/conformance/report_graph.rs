//! Reading a SHACL validation-report graph into violation rows.

use crate::error::ConformanceError;
use crate::graph::{SparqlStore, parse_turtle};
use crate::report::ViolationRecord;

/// One row per `sh:ValidationResult`; `sh:resultPath` is optional.
pub const VIOLATION_QUERY: &str = r#"
PREFIX sh: <http://www.w3.org/ns/shacl#>
SELECT ?focusNode ?resultPath ?resultMessage ?sourceShape
WHERE {
    ?vr a sh:ValidationResult ;
        sh:focusNode ?focusNode ;
        sh:resultMessage ?resultMessage ;
        sh:sourceShape ?sourceShape .
    OPTIONAL { ?vr sh:resultPath ?resultPath . }
}
ORDER BY ?focusNode ?resultPath ?sourceShape ?resultMessage
"#;

const CONFORMS_QUERY: &str = r#"
PREFIX sh: <http://www.w3.org/ns/shacl#>
SELECT ?conforms WHERE { ?report a sh:ValidationReport ; sh:conforms ?conforms . }
"#;

/// Parse a Turtle report graph.
///
/// Returns the report's own `sh:conforms` flag (if it states one) and the violations.
pub fn extract_outcome(
    report: &[u8],
) -> Result<(Option<bool>, Vec<ViolationRecord>), ConformanceError> {
    let graph = parse_turtle(report, "validation report").map_err(report_error)?;
    let store = SparqlStore::from_graph(&graph).map_err(report_error)?;

    let conforms = store
        .query_select(CONFORMS_QUERY, &["conforms"])
        .map_err(report_error)?
        .into_iter()
        .filter_map(|row| row.into_iter().next().flatten())
        .map(|value| value == "true" || value == "1")
        .reduce(|a, b| a && b);

    let violations = store
        .query_select(
            VIOLATION_QUERY,
            &["focusNode", "resultPath", "resultMessage", "sourceShape"],
        )
        .map_err(report_error)?
        .into_iter()
        .map(|row| {
            let mut cells = row.into_iter();
            let mut next = || cells.next().flatten();
            let focus_node = next().unwrap_or_default();
            let result_path = next();
            let message = next().unwrap_or_default();
            let source_shape = next().unwrap_or_default();
            ViolationRecord {
                focus_node,
                result_path,
                message,
                source_shape,
            }
        })
        .collect();

    Ok((conforms, violations))
}

fn report_error(err: crate::error::GraphError) -> ConformanceError {
    ConformanceError::ReportParse {
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix sdt: <http://builtinsight.io/ontology/sdt#> .

        [] a sh:ValidationReport ;
            sh:conforms false ;
            sh:result [
                a sh:ValidationResult ;
                sh:focusNode sdt:E2_operationalResult ;
                sh:resultPath sdt:value ;
                sh:resultMessage "Value is not Literal with datatype xsd:decimal" ;
                sh:resultSeverity sh:Violation ;
                sh:sourceShape sdt:ResultShape
            ] , [
                a sh:ValidationResult ;
                sh:focusNode sdt:E1 ;
                sh:resultMessage "Node is not closed" ;
                sh:resultSeverity sh:Violation ;
                sh:sourceShape sdt:SensorShape
            ] .
    "#;

    #[test]
    fn extracts_every_result() {
        let (conforms, violations) = extract_outcome(REPORT.as_bytes()).unwrap();
        assert_eq!(conforms, Some(false));
        assert_eq!(violations.len(), 2);

        let sensor = &violations[0];
        assert_eq!(sensor.focus_node, "http://builtinsight.io/ontology/sdt#E1");
        assert_eq!(sensor.result_path, None);
        assert_eq!(sensor.message, "Node is not closed");
        assert_eq!(sensor.source_shape, "http://builtinsight.io/ontology/sdt#SensorShape");

        let result = &violations[1];
        assert_eq!(
            result.result_path.as_deref(),
            Some("http://builtinsight.io/ontology/sdt#value")
        );
    }

    #[test]
    fn conforming_report_has_no_rows() {
        let report = r#"
            @prefix sh: <http://www.w3.org/ns/shacl#> .
            [] a sh:ValidationReport ; sh:conforms true .
        "#;
        let (conforms, violations) = extract_outcome(report.as_bytes()).unwrap();
        assert_eq!(conforms, Some(true));
        assert!(violations.is_empty());
    }

    #[test]
    fn report_without_verdict() {
        let (conforms, violations) = extract_outcome(b"").unwrap();
        assert_eq!(conforms, None);
        assert!(violations.is_empty());
    }

    #[test]
    fn garbage_is_a_report_error() {
        let err = extract_outcome(b"Validation Report\nConforms: False").unwrap_err();
        assert!(matches!(err, ConformanceError::ReportParse { .. }));
    }
}
