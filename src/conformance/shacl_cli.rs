//! Conformance checker backed by a pySHACL-compatible command line.
//!
//! The command is invoked as
//! `<command> -s <shapes> -i <none|rdfs> -f turtle [extra args...] <data>`
//! and must print the validation-report graph as Turtle on stdout.
//! Exit status 0 means conforms and 1 means violations were found. Anything
//! else is an engine failure.

use std::path::Path;
use std::process::Command;

use crate::config::ValidationConfig;
use crate::error::ConformanceError;

use super::{ConformanceChecker, ConformanceOutcome, InferenceMode, extract_outcome};

#[derive(Debug, Clone)]
pub struct ShaclCliChecker {
    command: String,
    extra_args: Vec<String>,
}

impl ShaclCliChecker {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self {
            command: config.command.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    fn command_line(&self, data: &Path, shapes: &Path, inference: InferenceMode) -> Command {
        let mut cmd = Command::new(&self.command);
        cmd.arg("-s")
            .arg(shapes)
            .arg("-i")
            .arg(inference.as_str())
            .arg("-f")
            .arg("turtle")
            .args(&self.extra_args)
            .arg(data);
        cmd
    }
}

impl ConformanceChecker for ShaclCliChecker {
    fn check(
        &self,
        data: &Path,
        shapes: &Path,
        inference: InferenceMode,
    ) -> Result<ConformanceOutcome, ConformanceError> {
        tracing::info!(
            command = %self.command,
            data = %data.display(),
            shapes = %shapes.display(),
            %inference,
            "running conformance checker"
        );

        let output = self
            .command_line(data, shapes, inference)
            .output()
            .map_err(|e| ConformanceError::Spawn {
                command: self.command.clone(),
                source: e,
            })?;

        let exit_verdict = match output.status.code() {
            Some(0) => true,
            Some(1) => false,
            _ => {
                return Err(ConformanceError::EngineFailed {
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
        };

        let (stated, violations) = extract_outcome(&output.stdout)?;
        let conforms = stated.unwrap_or(exit_verdict);
        if stated.is_some_and(|s| s != exit_verdict) {
            tracing::warn!(
                exit_verdict,
                report_verdict = conforms,
                "checker exit status disagrees with report; using report"
            );
        }

        tracing::info!(conforms, violations = violations.len(), "conformance check finished");
        Ok(ConformanceOutcome::new(conforms, violations))
    }

    fn name(&self) -> &str {
        &self.command
    }
}
