//! Knowledge graph: accumulation, Turtle I/O and SPARQL over in-memory graphs.
//!
//! - [`GraphAssembler`]: the run's single append-only accumulator of mapped statements
//! - [`document`]: loading Turtle documents (data graphs, shape schemas) back into memory
//! - [`sparql`]: a throwaway oxigraph store for querying a loaded graph
//!
//! All graphs use the `oxigraph` data model, so statement identity is the
//! (subject, predicate, object) triple and duplicates collapse on insert.

pub mod assembler;
pub mod document;
pub mod sparql;

pub use assembler::{GraphAssembler, SerializeStats};
pub use document::{count_node_shapes, distinct_subjects, load_document, load_optional, parse_turtle};
pub use sparql::SparqlStore;

/// Convenience alias for graph operations.
pub type GraphResult<T> = std::result::Result<T, crate::error::GraphError>;
