//! Pipeline configuration: TOML-backed settings for every stage.
//!
//! Every section is `#[serde(default)]`, so an empty file (or no file at all)
//! yields the same behaviour as the built-in defaults.

use std::path::{Path, PathBuf};

use oxigraph::model::NamedNode;
use serde::{Deserialize, Serialize};

use crate::conformance::InferenceMode;
use crate::error::ConfigError;
use crate::metrics::CoverageRule;
use crate::vocab::SDT_NS;

/// Default config file name looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "sdt.toml";

/// Stand-in observation time stamped on every derived result.
///
/// Policy assumption: the source records carry no time of measurement.
pub const DEFAULT_REFERENCE_TIMESTAMP: &str = "2025-10-08T13:00:00Z";

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level pipeline configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Name recorded in the provenance tag of every run.
    pub pipeline_name: String,
    /// Abort the run on the first malformed record instead of rejecting the row.
    pub strict: bool,
    pub inputs: InputPaths,
    pub outputs: OutputPaths,
    pub columns: ColumnNames,
    pub mapping: MappingConfig,
    pub validation: ValidationConfig,
    pub metrics: MetricsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pipeline_name: "demo_lifecycle_carbon".into(),
            strict: false,
            inputs: InputPaths::default(),
            outputs: OutputPaths::default(),
            columns: ColumnNames::default(),
            mapping: MappingConfig::default(),
            validation: ValidationConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    /// Tabular property export (`GlobalId, Name, IfcClass, PsetName, Property, Value`).
    pub records: PathBuf,
    /// SHACL shape schema (Turtle).
    pub shapes: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            records: PathBuf::from("NTU_Campus_Properties.csv"),
            shapes: PathBuf::from("sdt_tbox_s1.ttl"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub graph: PathBuf,
    pub violations: PathBuf,
    pub summary: PathBuf,
    pub manifest: PathBuf,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            graph: PathBuf::from("ntu_campus_sample2.ttl"),
            violations: PathBuf::from("validation_report.csv"),
            summary: PathBuf::from("integration_summary.txt"),
            manifest: PathBuf::from("run_manifest.json"),
        }
    }
}

/// Header names of the six required input columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub global_id: String,
    pub name: String,
    pub entity_class: String,
    pub property_set: String,
    pub property: String,
    pub value: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            global_id: "GlobalId".into(),
            name: "Name".into(),
            entity_class: "IfcClass".into(),
            property_set: "PsetName".into(),
            property: "Property".into(),
            value: "Value".into(),
        }
    }
}

/// Classification and derived-result rules for the triple builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Entity classes containing any of these tokens become sensors.
    pub sensor_tokens: Vec<String>,
    /// Entity classes containing any of these tokens are equipment assets.
    pub equipment_keywords: Vec<String>,
    /// Property-set tokens that mark a record as energy relevant.
    pub energy_pset_tokens: Vec<String>,
    /// Property-name tokens that mark a record as energy relevant and metered in `power_unit`.
    pub power_property_tokens: Vec<String>,
    pub power_unit: String,
    pub unknown_unit: String,
    /// Local name (in the sdt namespace) of the lifecycle module tag.
    pub module: String,
    /// RFC 3339 timestamp stamped on every derived result.
    pub reference_timestamp: String,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            sensor_tokens: vec!["Sensor".into()],
            equipment_keywords: vec!["Equipment".into(), "Fan".into(), "Light".into()],
            energy_pset_tokens: vec!["EnergyUse".into()],
            power_property_tokens: vec!["Power".into()],
            power_unit: "kWh".into(),
            unknown_unit: "unknown".into(),
            module: "B6".into(),
            reference_timestamp: DEFAULT_REFERENCE_TIMESTAMP.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub inference: InferenceMode,
    /// Executable of a pySHACL-compatible checker.
    pub command: String,
    /// Extra arguments inserted before the data graph path.
    pub extra_args: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            inference: InferenceMode::Rdfs,
            command: "pyshacl".into(),
            extra_args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub coverage_rule: CoverageRule,
}

impl PipelineConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Load `path` if given, else `sdt.toml` when present, else defaults.
    pub fn discover(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::load(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Reject values that would only fail later, mid-run.
    pub fn check(&self) -> ConfigResult<()> {
        chrono::DateTime::parse_from_rfc3339(&self.mapping.reference_timestamp).map_err(|e| {
            ConfigError::InvalidTimestamp {
                value: self.mapping.reference_timestamp.clone(),
                message: e.to_string(),
            }
        })?;
        NamedNode::new(format!("{SDT_NS}{}", self.mapping.module)).map_err(|e| {
            ConfigError::InvalidModule {
                value: self.mapping.module.clone(),
                message: e.to_string(),
            }
        })?;
        Ok(())
    }
}
