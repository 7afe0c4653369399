//! In-memory SPARQL store backed by oxigraph.
//!
//! Loaded graphs (validation reports in particular) are copied into a
//! throwaway store so they can be queried with SPARQL SELECT.

use oxigraph::model::{Graph, GraphNameRef, Term};
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;

use crate::error::GraphError;

use super::GraphResult;

/// SPARQL-capable view over a single default graph.
pub struct SparqlStore {
    store: Store,
}

impl SparqlStore {
    fn in_memory() -> GraphResult<Self> {
        let store = Store::new().map_err(|e| GraphError::Sparql {
            message: format!("failed to create oxigraph store: {e}"),
        })?;
        Ok(Self { store })
    }

    /// Create a store holding a copy of `graph` in the default graph.
    pub fn from_graph(graph: &Graph) -> GraphResult<Self> {
        let this = Self::in_memory()?;
        for triple in graph.iter() {
            this.store
                .insert(triple.in_graph(GraphNameRef::DefaultGraph))
                .map_err(|e| GraphError::Sparql {
                    message: format!("insert failed: {e}"),
                })?;
        }
        Ok(this)
    }

    /// Execute a SELECT query, returning the plain value of each requested
    /// variable per solution (`None` when unbound).
    ///
    /// Plain values are IRIs without brackets, literal lexical forms, and blank node ids.
    pub fn query_select(&self, sparql: &str, vars: &[&str]) -> GraphResult<Vec<Vec<Option<String>>>> {
        let results = self.store.query(sparql).map_err(|e| GraphError::Sparql {
            message: format!("SPARQL query failed: {e}"),
        })?;

        match results {
            QueryResults::Solutions(solutions) => {
                let mut rows = Vec::new();
                for solution in solutions {
                    let solution = solution.map_err(|e| GraphError::Sparql {
                        message: format!("solution error: {e}"),
                    })?;
                    rows.push(vars.iter().map(|v| solution.get(*v).map(plain_value)).collect());
                }
                Ok(rows)
            }
            _ => Err(GraphError::Sparql {
                message: "expected solutions from SELECT query".into(),
            }),
        }
    }
}

impl std::fmt::Debug for SparqlStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparqlStore").finish()
    }
}

fn plain_value(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_owned(),
        Term::BlankNode(node) => node.as_str().to_owned(),
        Term::Literal(literal) => literal.value().to_owned(),
        #[allow(unreachable_patterns)]
        other => other.to_string(),
    }
}
