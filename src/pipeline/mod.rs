//! Processing pipeline: ETL, validation and summary stages.
//!
//! Each stage reads its inputs from the paths in [`PipelineConfig`] and writes
//! its outputs there, so the stages can run one at a time from the command
//! line. [`Pipeline::run`] chains all three and additionally writes the run
//! manifest.
//!
//! Missing inputs degrade the run: the affected stage is skipped with a
//! warning and the summary lists what was missing. Structural problems and a
//! failing conformance checker abort it, and then no summary is written.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};

use crate::config::PipelineConfig;
use crate::conformance::{ConformanceChecker, ShaclCliChecker};
use crate::error::{InputError, SdtResult};
use crate::export::{EtlExport, ProducedFiles, RunManifest, ValidationExport};
use crate::graph::{GraphAssembler, count_node_shapes, distinct_subjects, load_document, load_optional};
use crate::mapping::{TripleBuilder, ValueCoercionWarning};
use crate::metrics::{IntegrationSummary, MetricsInput, aggregate, instance_correctness};
use crate::provenance::ProvenanceTag;
use crate::record::read_records;
use crate::report::{ViolationRecord, read_report, write_report};

/// Built-in pipeline stage types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Map the input table into a serialized data graph.
    Etl,
    /// Check the data graph against the shape schema.
    Validate,
    /// Aggregate the integration metrics.
    Summarize,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Etl => write!(f, "etl"),
            Self::Validate => write!(f, "validate"),
            Self::Summarize => write!(f, "summarize"),
        }
    }
}

/// What the ETL stage produced.
#[derive(Debug, Clone, PartialEq)]
pub struct EtlOutcome {
    pub rows_read: usize,
    pub rejected: usize,
    pub coercion_warnings: Vec<ValueCoercionWarning>,
    pub entities: usize,
    pub derived_results: usize,
    pub triples: usize,
    pub bytes: usize,
    pub graph: PathBuf,
}

impl EtlOutcome {
    pub fn export(&self) -> EtlExport {
        EtlExport {
            rows_read: self.rows_read,
            rejected_rows: self.rejected,
            coercion_warnings: self.coercion_warnings.len(),
            entities: self.entities,
            derived_results: self.derived_results,
            triples: self.triples,
        }
    }
}

/// What the validation stage produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationOutcome {
    pub conforms: bool,
    pub violations: Vec<ViolationRecord>,
    pub shape_count: usize,
    /// Distinct subjects of the validated data graph.
    pub subjects: usize,
    pub report_text: String,
    pub report: PathBuf,
}

impl ValidationOutcome {
    pub fn instance_correctness(&self) -> f64 {
        instance_correctness(self.subjects, self.violations.len())
    }

    pub fn export(&self) -> ValidationExport {
        ValidationExport {
            conforms: self.conforms,
            violations: self.violations.len(),
            instance_correctness_percent: self.instance_correctness(),
        }
    }
}

/// Everything one full run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// `None` when the input table was missing.
    pub etl: Option<EtlOutcome>,
    /// `None` when there was nothing to validate or no shape schema.
    pub validation: Option<ValidationOutcome>,
    pub summary: IntegrationSummary,
    pub manifest: RunManifest,
}

/// The integration pipeline: a configuration plus the conformance engine to use.
pub struct Pipeline {
    config: PipelineConfig,
    checker: Box<dyn ConformanceChecker>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("pipeline_name", &self.config.pipeline_name)
            .field("checker", &self.checker.name())
            .finish()
    }
}

impl Pipeline {
    /// Pipeline validating with the command configured under `[validation]`.
    pub fn new(config: PipelineConfig) -> Self {
        let checker = ShaclCliChecker::from_config(&config.validation);
        Self::with_checker(config, Box::new(checker))
    }

    pub fn with_checker(config: PipelineConfig, checker: Box<dyn ConformanceChecker>) -> Self {
        Self { config, checker }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Map the input table into the data graph and serialize it.
    ///
    /// A missing input table is an error here; [`Pipeline::run`] degrades instead.
    pub fn etl(&self) -> SdtResult<EtlOutcome> {
        let input = &self.config.inputs.records;
        if !input.exists() {
            return Err(InputError::Missing {
                role: "input table".into(),
                path: input.display().to_string(),
            }
            .into());
        }
        self.config.check()?;
        tracing::info!(stage = %StageKind::Etl, input = %input.display(), "stage started");

        let mut batch = read_records(input, &self.config.columns, self.config.strict)?;
        let rows_read = batch.rows_read();
        let mut builder = TripleBuilder::new(&self.config.mapping);
        let mut assembler = GraphAssembler::new();
        let mut coercion_warnings = Vec::new();
        let mut derived = HashSet::new();

        for (row, record) in &batch.records {
            match builder.build(record, *row) {
                Ok(emission) => {
                    assembler.extend(&emission.statements);
                    coercion_warnings.extend(emission.warning);
                    derived.extend(emission.derived_result);
                }
                Err(err) if self.config.strict => {
                    return Err(InputError::StrictRejected {
                        path: input.display().to_string(),
                        rejected: 1,
                        first: Box::new(err),
                    }
                    .into());
                }
                Err(err) => {
                    tracing::warn!(row = *row, error = %err, "rejecting record");
                    batch.rejected.push(err);
                }
            }
        }

        let graph = self.config.outputs.graph.clone();
        let stats = assembler.serialize(&graph)?;
        let outcome = EtlOutcome {
            rows_read,
            rejected: batch.rejected.len(),
            coercion_warnings,
            entities: builder.entity_count(),
            derived_results: derived.len(),
            triples: stats.triples,
            bytes: stats.bytes,
            graph,
        };
        tracing::info!(
            stage = %StageKind::Etl,
            rows = outcome.rows_read,
            rejected = outcome.rejected,
            coercion_warnings = outcome.coercion_warnings.len(),
            entities = outcome.entities,
            triples = outcome.triples,
            "stage finished"
        );
        Ok(outcome)
    }

    /// Check the serialized data graph and write the violation report.
    ///
    /// Returns `Ok(None)` when the data graph or the shape schema is missing.
    pub fn validate(&self) -> SdtResult<Option<ValidationOutcome>> {
        let data = &self.config.outputs.graph;
        let shapes_path = &self.config.inputs.shapes;
        for (role, path) in [("data graph", data), ("shape schema", shapes_path)] {
            if !path.exists() {
                tracing::warn!(
                    stage = %StageKind::Validate,
                    role,
                    path = %path.display(),
                    "input missing, skipping validation"
                );
                return Ok(None);
            }
        }
        tracing::info!(stage = %StageKind::Validate, checker = self.checker.name(), "stage started");

        let shape_count = count_node_shapes(&load_document(shapes_path)?);
        let subjects = distinct_subjects(&load_document(data)?);
        let outcome = self
            .checker
            .check(data, shapes_path, self.config.validation.inference)?;

        let report = self.config.outputs.violations.clone();
        write_report(&report, &outcome.violations)?;
        tracing::debug!(report = %outcome.report_text, "conformance report");

        let validation = ValidationOutcome {
            conforms: outcome.conforms,
            violations: outcome.violations,
            shape_count,
            subjects,
            report_text: outcome.report_text,
            report,
        };
        tracing::info!(
            stage = %StageKind::Validate,
            conforms = validation.conforms,
            violations = validation.violations.len(),
            shapes = validation.shape_count,
            subjects = validation.subjects,
            instance_correctness = validation.instance_correctness(),
            "stage finished"
        );
        Ok(Some(validation))
    }

    /// Aggregate metrics from the files on disk and write the summary.
    pub fn summarize(&self) -> SdtResult<IntegrationSummary> {
        tracing::info!(stage = %StageKind::Summarize, "stage started");
        let mut input = MetricsInput::default();

        match self.shape_count()? {
            Some(count) => input.shape_count = count,
            None => input.missing_inputs.push(missing("shape schema", &self.config.inputs.shapes)),
        }

        let report = &self.config.outputs.violations;
        if report.exists() {
            input = input.with_violations(&read_report(report)?);
        } else {
            input.missing_inputs.push(missing("violation report", report));
        }

        match load_optional(&self.config.outputs.graph)? {
            Some(graph) => input.triple_count = graph.len(),
            None => input
                .missing_inputs
                .push(missing("data graph", &self.config.outputs.graph)),
        }

        self.write_summary(&input)
    }

    /// Run every stage and write the run manifest.
    pub fn run(&self) -> SdtResult<RunOutcome> {
        let executed_at = Utc::now();
        let mut input = MetricsInput::default();

        let records = &self.config.inputs.records;
        let etl = if records.exists() {
            Some(self.etl()?)
        } else {
            tracing::warn!(path = %records.display(), "input table missing, skipping etl");
            input.missing_inputs.push(missing("input table", records));
            None
        };

        let validation = match &etl {
            Some(_) => self.validate()?,
            None => None,
        };

        match &validation {
            Some(v) => {
                input.shape_count = v.shape_count;
                input = input.with_violations(&v.violations);
            }
            None => match self.shape_count()? {
                Some(count) => input.shape_count = count,
                None => input
                    .missing_inputs
                    .push(missing("shape schema", &self.config.inputs.shapes)),
            },
        }
        if let Some(etl) = &etl {
            input.triple_count = etl.triples;
        }

        let summary = self.write_summary(&input)?;

        let mut provenance = ProvenanceTag::new(self.config.pipeline_name.as_str(), executed_at);
        if etl.is_some() {
            provenance = provenance.with_source(records.display().to_string());
        }
        if validation.is_some() {
            provenance = provenance.with_source(self.config.inputs.shapes.display().to_string());
        }

        let manifest = RunManifest {
            provenance,
            outputs: ProducedFiles {
                graph: etl.as_ref().map(|e| e.graph.display().to_string()),
                violation_report: validation.as_ref().map(|v| v.report.display().to_string()),
                summary: self.config.outputs.summary.display().to_string(),
            },
            etl: etl.as_ref().map(EtlOutcome::export),
            validation: validation.as_ref().map(ValidationOutcome::export),
            summary: summary.clone(),
        };
        manifest.write(&self.config.outputs.manifest)?;

        Ok(RunOutcome {
            etl,
            validation,
            summary,
            manifest,
        })
    }

    fn shape_count(&self) -> SdtResult<Option<usize>> {
        Ok(load_optional(&self.config.inputs.shapes)?.map(|shapes| count_node_shapes(&shapes)))
    }

    fn write_summary(&self, input: &MetricsInput) -> SdtResult<IntegrationSummary> {
        let output = file_name(&self.config.outputs.graph);
        let summary = aggregate(input, self.config.metrics.coverage_rule, &output, Local::now());
        for note in &summary.missing_inputs {
            tracing::warn!(missing = %note, "degraded metrics");
        }
        summary.write(&self.config.outputs.summary)?;
        tracing::info!(
            stage = %StageKind::Summarize,
            violations = summary.violation_count,
            coverage = summary.coverage_percent,
            tier = %summary.correctness_tier,
            "stage finished"
        );
        Ok(summary)
    }
}

fn missing(role: &str, path: &Path) -> String {
    format!("{role} ({})", path.display())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
