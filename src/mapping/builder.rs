//! Triple builder: one [`AttributeRecord`] into graph statements.

use std::collections::HashMap;

use oxigraph::model::vocab::{rdf, rdfs, xsd};
use oxigraph::model::{Literal, NamedNode, Triple};

use crate::config::MappingConfig;
use crate::error::RecordError;
use crate::record::AttributeRecord;
use crate::vocab::{self, SDT_NS};

use super::classify::{Classifier, EntityKind};
use super::coerce::{CoercedValue, coerce_value};

/// A `value` that could not be parsed as a number and was written as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueCoercionWarning {
    pub global_id: String,
    pub property: String,
    pub raw: String,
}

/// Statements produced for one record.
#[derive(Debug, Default)]
pub struct Emission {
    pub statements: Vec<Triple>,
    /// Set when this record classified its entity for the first time.
    pub classified: Option<EntityKind>,
    /// Derived result node touched by this record.
    pub derived_result: Option<NamedNode>,
    pub warning: Option<ValueCoercionWarning>,
}

/// Maps records to statements, remembering each entity's classification for the run.
#[derive(Debug)]
pub struct TripleBuilder {
    classifier: Classifier,
    energy_pset_tokens: Vec<String>,
    power_property_tokens: Vec<String>,
    power_unit: String,
    unknown_unit: String,
    module: NamedNode,
    timestamp: Literal,
    classified: HashMap<String, EntityKind>,
}

impl TripleBuilder {
    pub fn new(config: &MappingConfig) -> Self {
        Self {
            classifier: Classifier::from_config(config),
            energy_pset_tokens: config.energy_pset_tokens.clone(),
            power_property_tokens: config.power_property_tokens.clone(),
            power_unit: config.power_unit.clone(),
            unknown_unit: config.unknown_unit.clone(),
            module: NamedNode::new_unchecked(format!("{SDT_NS}{}", config.module)),
            timestamp: Literal::new_typed_literal(
                config.reference_timestamp.as_str(),
                xsd::DATE_TIME,
            ),
            classified: HashMap::new(),
        }
    }

    pub fn entity_count(&self) -> usize {
        self.classified.len()
    }

    /// Build the statements for one record. `row` is only used for error reporting.
    pub fn build(&mut self, record: &AttributeRecord, row: usize) -> Result<Emission, RecordError> {
        let entity = NamedNode::new(format!("{SDT_NS}{}", record.global_id)).map_err(|_| {
            RecordError::InvalidIdentifier {
                row,
                global_id: record.global_id.clone(),
            }
        })?;
        let mut emission = Emission::default();

        if !self.classified.contains_key(&record.global_id) {
            let rule = self.classifier.classify(&record.entity_class);
            tracing::debug!(
                global_id = %record.global_id,
                entity_class = %record.entity_class,
                rule = rule.name,
                kind = %rule.outcome,
                "classified entity"
            );
            self.classified.insert(record.global_id.clone(), rule.outcome);
            emission
                .statements
                .push(Triple::new(entity.clone(), rdf::TYPE, rule.outcome.class().into_owned()));
            emission.classified = Some(rule.outcome);
        }

        emission.statements.push(Triple::new(
            entity.clone(),
            rdfs::LABEL,
            Literal::new_simple_literal(record.name.as_str()),
        ));
        emission.statements.push(Triple::new(
            entity.clone(),
            vocab::sdt::IFC_GUID,
            Literal::new_simple_literal(record.global_id.as_str()),
        ));

        if self.is_energy_relevant(record) {
            let result = NamedNode::new_unchecked(format!("{}_operationalResult", entity.as_str()));
            self.emit_derived_result(record, &entity, &result, &mut emission);
            emission.derived_result = Some(result);
        }

        if !record.value.is_empty() {
            emission.statements.push(Triple::new(
                entity,
                vocab::sdt::SOURCE,
                Literal::new_simple_literal(format!(
                    "{}:{}={}",
                    record.property_set, record.property, record.value
                )),
            ));
        }

        Ok(emission)
    }

    fn is_energy_relevant(&self, record: &AttributeRecord) -> bool {
        contains_any(&record.property_set, &self.energy_pset_tokens)
            || contains_any(&record.property, &self.power_property_tokens)
    }

    fn emit_derived_result(
        &self,
        record: &AttributeRecord,
        entity: &NamedNode,
        result: &NamedNode,
        emission: &mut Emission,
    ) {
        let out = &mut emission.statements;
        out.push(Triple::new(
            result.clone(),
            rdf::TYPE,
            vocab::sdt::OPERATIONAL_CARBON_RESULT.into_owned(),
        ));
        out.push(Triple::new(result.clone(), vocab::sdt::ABOUT_ASSET, entity.clone()));
        out.push(Triple::new(result.clone(), vocab::sdt::HAS_MODULE, self.module.clone()));

        if !record.value.is_empty() {
            let value = coerce_value(&record.value);
            if let CoercedValue::RawText(raw) = &value {
                tracing::warn!(
                    global_id = %record.global_id,
                    property = %record.property,
                    value = %raw,
                    "value is not numeric, writing as string"
                );
                emission.warning = Some(ValueCoercionWarning {
                    global_id: record.global_id.clone(),
                    property: record.property.clone(),
                    raw: raw.clone(),
                });
            }
            out.push(Triple::new(result.clone(), vocab::sdt::VALUE, value.to_literal()));
        }

        let unit = if contains_any(&record.property, &self.power_property_tokens) {
            &self.power_unit
        } else {
            &self.unknown_unit
        };
        out.push(Triple::new(
            result.clone(),
            vocab::sdt::UNIT,
            Literal::new_simple_literal(unit.as_str()),
        ));
        out.push(Triple::new(result.clone(), vocab::sdt::TIMESTAMP, self.timestamp.clone()));
    }
}

fn contains_any(haystack: &str, tokens: &[String]) -> bool {
    tokens.iter().any(|t| haystack.contains(t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::{NamedNodeRef, Term};

    fn record(id: &str, class: &str, pset: &str, prop: &str, value: &str) -> AttributeRecord {
        AttributeRecord {
            global_id: id.into(),
            name: format!("{id} name"),
            entity_class: class.into(),
            property_set: pset.into(),
            property: prop.into(),
            value: value.into(),
        }
    }

    fn objects<'a>(statements: &'a [Triple], predicate: NamedNodeRef<'_>) -> Vec<&'a Term> {
        statements
            .iter()
            .filter(|t| t.predicate.as_ref() == predicate)
            .map(|t| &t.object)
            .collect()
    }

    #[test]
    fn sensor_record_scenario() {
        let mut builder = TripleBuilder::new(&MappingConfig::default());
        let rec = record("E1", "IfcSensor", "Pset_Sensor", "SensorType", "TEMPERATURE");
        let emission = builder.build(&rec, 1).unwrap();

        assert_eq!(emission.classified, Some(EntityKind::Sensor));
        assert!(emission.derived_result.is_none());
        assert!(emission.warning.is_none());

        let types = objects(&emission.statements, rdf::TYPE);
        assert_eq!(types, vec![&Term::from(vocab::sosa::SENSOR.into_owned())]);
        assert_eq!(objects(&emission.statements, rdfs::LABEL).len(), 1);
        assert_eq!(
            objects(&emission.statements, vocab::sdt::IFC_GUID),
            vec![&Term::from(Literal::new_simple_literal("E1"))]
        );
        assert_eq!(
            objects(&emission.statements, vocab::sdt::SOURCE),
            vec![&Term::from(Literal::new_simple_literal(
                "Pset_Sensor:SensorType=TEMPERATURE"
            ))]
        );
        assert_eq!(emission.statements.len(), 4);
    }

    #[test]
    fn fan_energy_record_scenario() {
        let mut builder = TripleBuilder::new(&MappingConfig::default());
        let rec = record("E2", "IfcFan", "Pset_EnergyUse", "EnergyUse_kWh", "125");
        let emission = builder.build(&rec, 1).unwrap();

        assert_eq!(emission.classified, Some(EntityKind::Asset));
        let result = emission.derived_result.clone().unwrap();
        assert_eq!(
            result.as_str(),
            "http://builtinsight.io/ontology/sdt#E2_operationalResult"
        );

        let values = objects(&emission.statements, vocab::sdt::VALUE);
        assert_eq!(
            values,
            vec![&Term::from(Literal::new_typed_literal("125.0", xsd::DECIMAL))]
        );
        assert_eq!(
            objects(&emission.statements, vocab::sdt::UNIT),
            vec![&Term::from(Literal::new_simple_literal("unknown"))]
        );
        assert_eq!(
            objects(&emission.statements, vocab::sdt::TIMESTAMP),
            vec![&Term::from(Literal::new_typed_literal(
                "2025-10-08T13:00:00Z",
                xsd::DATE_TIME
            ))]
        );
        assert_eq!(objects(&emission.statements, vocab::sdt::ABOUT_ASSET).len(), 1);
        assert_eq!(objects(&emission.statements, vocab::sdt::HAS_MODULE).len(), 1);
    }

    #[test]
    fn power_property_uses_kwh() {
        let mut builder = TripleBuilder::new(&MappingConfig::default());
        let rec = record("L1", "IfcLightFixture", "Pset_Light", "RatedPower", "40");
        let emission = builder.build(&rec, 1).unwrap();
        assert!(emission.derived_result.is_some());
        assert_eq!(
            objects(&emission.statements, vocab::sdt::UNIT),
            vec![&Term::from(Literal::new_simple_literal("kWh"))]
        );
    }

    #[test]
    fn non_numeric_value_degrades_with_warning() {
        let mut builder = TripleBuilder::new(&MappingConfig::default());
        let rec = record("E3", "IfcFan", "Pset_EnergyUse", "Rating", "A++");
        let emission = builder.build(&rec, 1).unwrap();

        assert_eq!(
            objects(&emission.statements, vocab::sdt::VALUE),
            vec![&Term::from(Literal::new_simple_literal("A++"))]
        );
        let warning = emission.warning.unwrap();
        assert_eq!(warning.global_id, "E3");
        assert_eq!(warning.raw, "A++");
    }

    #[test]
    fn empty_value_emits_no_annotation_or_value() {
        let mut builder = TripleBuilder::new(&MappingConfig::default());
        let rec = record("E4", "IfcFan", "Pset_EnergyUse", "EnergyUse_kWh", "");
        let emission = builder.build(&rec, 1).unwrap();

        assert!(objects(&emission.statements, vocab::sdt::SOURCE).is_empty());
        assert!(objects(&emission.statements, vocab::sdt::VALUE).is_empty());
        // The node itself still exists with its unit and timestamp.
        assert!(emission.derived_result.is_some());
        assert_eq!(objects(&emission.statements, vocab::sdt::UNIT).len(), 1);
    }

    #[test]
    fn type_is_decided_by_first_record_only() {
        let mut builder = TripleBuilder::new(&MappingConfig::default());
        let first = builder
            .build(&record("X1", "IfcWall", "Pset_A", "A", "1"), 1)
            .unwrap();
        let second = builder
            .build(&record("X1", "IfcSensor", "Pset_B", "B", "2"), 2)
            .unwrap();

        assert_eq!(first.classified, Some(EntityKind::Asset));
        assert_eq!(second.classified, None);
        assert!(objects(&second.statements, rdf::TYPE).is_empty());
        assert_eq!(builder.entity_count(), 1);
    }

    #[test]
    fn invalid_identifier_is_rejected() {
        let mut builder = TripleBuilder::new(&MappingConfig::default());
        let err = builder
            .build(&record("bad id", "IfcFan", "P", "Q", "1"), 9)
            .unwrap_err();
        assert!(matches!(err, RecordError::InvalidIdentifier { row: 9, .. }));
        assert_eq!(builder.entity_count(), 0);
    }
}
