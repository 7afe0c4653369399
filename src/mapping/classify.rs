//! Entity classification: ordered (predicate, outcome) rules, first match wins.

use oxigraph::model::NamedNodeRef;
use serde::{Deserialize, Serialize};

use crate::config::MappingConfig;
use crate::vocab;

/// Classification outcome for an entity node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Sensor,
    Asset,
}

impl EntityKind {
    /// RDF class asserted with `rdf:type`.
    pub fn class(self) -> NamedNodeRef<'static> {
        match self {
            Self::Sensor => vocab::sosa::SENSOR,
            Self::Asset => vocab::sdt::ASSET,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sensor => write!(f, "Sensor"),
            Self::Asset => write!(f, "Asset"),
        }
    }
}

/// Condition on the entity class string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassMatch {
    /// Class contains at least one of the tokens (case-sensitive substring).
    ContainsAny(Vec<String>),
    Always,
}

impl ClassMatch {
    pub fn matches(&self, entity_class: &str) -> bool {
        match self {
            Self::ContainsAny(tokens) => tokens.iter().any(|t| entity_class.contains(t.as_str())),
            Self::Always => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationRule {
    pub name: &'static str,
    pub when: ClassMatch,
    pub outcome: EntityKind,
}

/// Ordered rule list. Always ends in a default rule, so classification is total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    rules: Vec<ClassificationRule>,
}

impl Classifier {
    pub fn from_config(config: &MappingConfig) -> Self {
        Self {
            rules: vec![
                ClassificationRule {
                    name: "sensor",
                    when: ClassMatch::ContainsAny(config.sensor_tokens.clone()),
                    outcome: EntityKind::Sensor,
                },
                ClassificationRule {
                    name: "equipment",
                    when: ClassMatch::ContainsAny(config.equipment_keywords.clone()),
                    outcome: EntityKind::Asset,
                },
                ClassificationRule {
                    name: "default",
                    when: ClassMatch::Always,
                    outcome: EntityKind::Asset,
                },
            ],
        }
    }

    /// Evaluate rules top-down and return the first that fires.
    pub fn classify(&self, entity_class: &str) -> &ClassificationRule {
        self.rules
            .iter()
            .find(|rule| rule.when.matches(entity_class))
            .unwrap_or_else(|| &self.rules[self.rules.len() - 1])
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::from_config(&MappingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sensor_rule_fires_first() {
        let classifier = Classifier::default();
        let rule = classifier.classify("IfcSensor");
        assert_eq!(rule.outcome, EntityKind::Sensor);
        assert_eq!(rule.name, "sensor");
    }

    #[test]
    fn sensor_beats_equipment_keyword() {
        // Contains both "Sensor" and "Fan": priority order decides.
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("IfcFanSensor").outcome, EntityKind::Sensor);
    }

    #[test]
    fn equipment_keywords_classify_as_asset() {
        let classifier = Classifier::default();
        for class in ["IfcFan", "IfcLightFixture", "IfcFlowEquipment"] {
            let rule = classifier.classify(class);
            assert_eq!(rule.outcome, EntityKind::Asset);
            assert_eq!(rule.name, "equipment", "{class}");
        }
    }

    #[test]
    fn unknown_class_falls_through_to_default() {
        let classifier = Classifier::default();
        let rule = classifier.classify("IfcWall");
        assert_eq!(rule.outcome, EntityKind::Asset);
        assert_eq!(rule.name, "default");
    }

    #[test]
    fn matching_is_case_sensitive() {
        let classifier = Classifier::default();
        assert_eq!(classifier.classify("ifcsensor").name, "default");
    }

    #[test]
    fn configured_tokens_replace_defaults() {
        let config = MappingConfig {
            sensor_tokens: vec!["Detector".into()],
            ..Default::default()
        };
        let classifier = Classifier::from_config(&config);
        assert_eq!(classifier.classify("IfcSmokeDetector").outcome, EntityKind::Sensor);
        assert_eq!(classifier.classify("IfcSensor").outcome, EntityKind::Asset);
        assert_eq!(classifier.classify("IfcSensor").name, "default");
    }
}
