//! Provenance tag: how a run's knowledge was derived and from what.
//!
//! The tag travels with the validated graph to the downstream graph-database
//! loader, which attaches it to the imported named graph.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single provenance record for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvenanceTag {
    /// Pipeline name, e.g. `demo_lifecycle_carbon`.
    pub pipeline: String,
    pub executed_at: DateTime<Utc>,
    /// Input files the run consumed, in the order they were read.
    pub sources: Vec<String>,
}

impl ProvenanceTag {
    pub fn new(pipeline: impl Into<String>, executed_at: DateTime<Utc>) -> Self {
        Self {
            pipeline: pipeline.into(),
            executed_at,
            sources: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn tag() -> ProvenanceTag {
        ProvenanceTag::new(
            "demo_lifecycle_carbon",
            Utc.with_ymd_and_hms(2025, 10, 8, 13, 0, 0).unwrap(),
        )
        .with_source("NTU_Campus_Properties.csv")
        .with_source("sdt_tbox_s1.ttl")
    }

    #[test]
    fn sources_keep_read_order() {
        assert_eq!(tag().sources, ["NTU_Campus_Properties.csv", "sdt_tbox_s1.ttl"]);
    }

    #[test]
    fn json_uses_loader_field_names() {
        let json = serde_json::to_value(tag()).unwrap();
        assert_eq!(json["pipeline"], "demo_lifecycle_carbon");
        assert_eq!(json["executedAt"], "2025-10-08T13:00:00Z");
        assert_eq!(json["sources"].as_array().unwrap().len(), 2);
    }
}
