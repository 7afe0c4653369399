//! Loading Turtle documents and the counts the metrics need from them.

use std::collections::HashSet;
use std::path::Path;

use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::vocab::rdf;
use oxigraph::model::{Graph, Triple};

use crate::error::GraphError;
use crate::vocab;

use super::GraphResult;

/// Parse a Turtle document held in memory. `source` names it in errors.
pub fn parse_turtle(bytes: &[u8], source: &str) -> GraphResult<Graph> {
    let mut graph = Graph::new();
    for quad in RdfParser::from_format(RdfFormat::Turtle).for_reader(bytes) {
        let quad = quad.map_err(|e| GraphError::Parse {
            path: source.to_string(),
            message: e.to_string(),
        })?;
        graph.insert(&Triple::from(quad));
    }
    Ok(graph)
}

/// Read and parse a Turtle file.
pub fn load_document(path: &Path) -> GraphResult<Graph> {
    let bytes = std::fs::read(path).map_err(|e| GraphError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let graph = parse_turtle(&bytes, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), triples = graph.len(), "loaded graph document");
    Ok(graph)
}

/// Like [`load_document`], but an absent file is `Ok(None)` rather than an error.
pub fn load_optional(path: &Path) -> GraphResult<Option<Graph>> {
    if path.exists() {
        load_document(path).map(Some)
    } else {
        Ok(None)
    }
}

/// Number of shape definitions: distinct subjects typed `sh:NodeShape`.
pub fn count_node_shapes(shapes: &Graph) -> usize {
    shapes
        .subjects_for_predicate_object(rdf::TYPE, vocab::sh::NODE_SHAPE)
        .count()
}

/// Number of distinct subjects in a graph.
pub fn distinct_subjects(graph: &Graph) -> usize {
    graph.iter().map(|t| t.subject).collect::<HashSet<_>>().len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix sdt: <http://builtinsight.io/ontology/sdt#> .
        @prefix sosa: <http://www.w3.org/ns/sosa/> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

        sdt:AssetShape a sh:NodeShape ;
            sh:targetClass sdt:Asset ;
            sh:property [ sh:path sdt:ifcGUID ; sh:minCount 1 ] .

        sdt:SensorShape a sh:NodeShape ;
            sh:targetClass sosa:Sensor .

        sdt:ResultShape a sh:NodeShape ;
            sh:targetClass sdt:OperationalCarbonResult ;
            sh:property [ sh:path sdt:value ; sh:datatype xsd:decimal ] .

        sdt:GuidProperty a sh:PropertyShape ;
            sh:path sdt:ifcGUID .
    "#;

    #[test]
    fn counts_node_shapes_only() {
        let graph = parse_turtle(SHAPES.as_bytes(), "shapes").unwrap();
        assert_eq!(count_node_shapes(&graph), 3);
    }

    #[test]
    fn counts_distinct_subjects() {
        let graph = parse_turtle(SHAPES.as_bytes(), "shapes").unwrap();
        // Three node shapes, one property shape, two blank property nodes.
        assert_eq!(distinct_subjects(&graph), 6);
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = parse_turtle(b"<http://a> <http://b> .", "broken.ttl").unwrap_err();
        assert!(matches!(err, GraphError::Parse { ref path, .. } if path == "broken.ttl"));
    }

    #[test]
    fn missing_optional_document_is_none() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_optional(&dir.path().join("absent.ttl")).unwrap().is_none());
    }

    #[test]
    fn loads_document_from_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("shapes.ttl");
        std::fs::write(&path, SHAPES).unwrap();
        let graph = load_optional(&path).unwrap().unwrap();
        assert_eq!(count_node_shapes(&graph), 3);
    }
}
