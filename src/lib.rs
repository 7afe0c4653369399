// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # sdt-integrate
//!
//! Turns tabular facility records (one property of one asset per row) into a
//! validated RDF knowledge graph and reports integration-quality metrics.
//!
//! ## Architecture
//!
//! - **Record normalizer** (`record`): CSV rows into typed attribute records
//! - **Triple builder** (`mapping`): classification rules, numeric coercion, statement emission
//! - **Graph assembler** (`graph`): append-only oxigraph graph, Turtle I/O, SPARQL
//! - **Conformance checker** (`conformance`): the seam to an external SHACL engine
//! - **Violation reporter** (`report`): fixed-header CSV of violations
//! - **Metrics aggregator** (`metrics`): coverage, correctness tier, summary text
//! - **Orchestration** (`pipeline`): the etl / validate / summarize stages and full runs
//!
//! ## Library usage
//!
//! ```no_run
//! use sdt_integrate::config::PipelineConfig;
//! use sdt_integrate::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let run = pipeline.run().unwrap();
//! println!("{}", run.summary.render());
//! ```

pub mod config;
pub mod conformance;
pub mod error;
pub mod export;
pub mod graph;
pub mod mapping;
pub mod metrics;
pub mod pipeline;
pub mod provenance;
pub mod record;
pub mod report;
pub mod vocab;
