//! Graph assembler: append-only accumulation of mapped statements.

use std::path::Path;

use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{Graph, Triple};

use crate::error::GraphError;
use crate::vocab::PREFIXES;

use super::GraphResult;

/// Size of a serialized graph document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeStats {
    pub bytes: usize,
    pub triples: usize,
}

/// Owns the run's data graph. Only appends and serialization are exposed.
#[derive(Debug, Default)]
pub struct GraphAssembler {
    graph: Graph,
}

impl GraphAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one statement. Returns `false` if it was already present.
    pub fn add_statement(&mut self, statement: &Triple) -> bool {
        self.graph.insert(statement)
    }

    /// Add many statements, returning how many were new.
    pub fn extend<'a>(&mut self, statements: impl IntoIterator<Item = &'a Triple>) -> usize {
        statements
            .into_iter()
            .filter(|t| self.add_statement(t))
            .count()
    }

    pub fn triple_count(&self) -> usize {
        self.graph.len()
    }

    /// Read-only view, e.g. for instance counts.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Serialize as Turtle with the fixed prefix bindings.
    ///
    /// Triples are written in sorted order so identical graphs give identical bytes.
    pub fn to_turtle(&self) -> GraphResult<Vec<u8>> {
        let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle);
        for (prefix, iri) in PREFIXES {
            serializer = serializer
                .with_prefix(*prefix, *iri)
                .map_err(|e| GraphError::Serialize {
                    message: format!("bad prefix {prefix}: {e}"),
                })?;
        }

        let mut triples: Vec<_> = self.graph.iter().collect();
        triples.sort_by_cached_key(|t| {
            (
                t.subject.to_string(),
                t.predicate.as_str().to_owned(),
                t.object.to_string(),
            )
        });

        let mut writer = serializer.for_writer(Vec::new());
        for triple in triples {
            writer
                .serialize_triple(triple)
                .map_err(|e| GraphError::Serialize {
                    message: e.to_string(),
                })?;
        }
        writer.finish().map_err(|e| GraphError::Serialize {
            message: e.to_string(),
        })
    }

    /// Write the Turtle document to `path`.
    pub fn serialize(&self, path: &Path) -> GraphResult<SerializeStats> {
        let bytes = self.to_turtle()?;
        std::fs::write(path, &bytes).map_err(|e| GraphError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        let stats = SerializeStats {
            bytes: bytes.len(),
            triples: self.triple_count(),
        };
        tracing::info!(
            path = %path.display(),
            bytes = stats.bytes,
            triples = stats.triples,
            "serialized data graph"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::parse_turtle;
    use oxigraph::model::vocab::rdfs;
    use oxigraph::model::{Literal, NamedNode};

    fn label(id: &str, text: &str) -> Triple {
        Triple::new(
            NamedNode::new_unchecked(format!("http://builtinsight.io/ontology/sdt#{id}")),
            rdfs::LABEL,
            Literal::new_simple_literal(text),
        )
    }

    #[test]
    fn duplicates_are_counted_once() {
        let mut assembler = GraphAssembler::new();
        assert!(assembler.add_statement(&label("A", "a")));
        assert!(!assembler.add_statement(&label("A", "a")));
        assert!(assembler.add_statement(&label("A", "b")));
        assert_eq!(assembler.triple_count(), 2);
    }

    #[test]
    fn extend_reports_new_statements() {
        let mut assembler = GraphAssembler::new();
        let batch = vec![label("A", "a"), label("B", "b"), label("A", "a")];
        assert_eq!(assembler.extend(&batch), 2);
        assert_eq!(assembler.extend(&batch), 0);
    }

    #[test]
    fn turtle_binds_prefixes() {
        let mut assembler = GraphAssembler::new();
        assembler.add_statement(&label("A", "a"));
        let text = String::from_utf8(assembler.to_turtle().unwrap()).unwrap();
        assert!(text.contains("@prefix sdt: <http://builtinsight.io/ontology/sdt#>"));
        assert!(text.contains("sdt:A"));
    }

    #[test]
    fn serialize_and_reparse_keeps_triple_count() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.ttl");
        let mut assembler = GraphAssembler::new();
        for i in 0..25 {
            assembler.add_statement(&label(&format!("N{i}"), "x"));
            assembler.add_statement(&label(&format!("N{i}"), &format!("y{i}")));
        }

        let stats = assembler.serialize(&path).unwrap();
        assert_eq!(stats.triples, 50);
        assert_eq!(stats.bytes as u64, std::fs::metadata(&path).unwrap().len());

        let bytes = std::fs::read(&path).unwrap();
        let reparsed = parse_turtle(&bytes, "out.ttl").unwrap();
        assert_eq!(reparsed.len(), assembler.triple_count());
    }

    #[test]
    fn output_is_deterministic() {
        let mut a = GraphAssembler::new();
        let mut b = GraphAssembler::new();
        a.add_statement(&label("A", "a"));
        a.add_statement(&label("B", "b"));
        b.add_statement(&label("B", "b"));
        b.add_statement(&label("A", "a"));
        assert_eq!(a.to_turtle().unwrap(), b.to_turtle().unwrap());
    }
}
