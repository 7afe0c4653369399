//! Benchmarks for the record-to-statement mapping path.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use sdt_integrate::config::MappingConfig;
use sdt_integrate::graph::GraphAssembler;
use sdt_integrate::mapping::{Classifier, TripleBuilder, coerce_value};
use sdt_integrate::record::AttributeRecord;

fn records(n: usize) -> Vec<AttributeRecord> {
    let classes = ["IfcSensor", "IfcFan", "IfcLightFixture", "IfcWall"];
    let psets = ["Pset_EnergyUse", "Pset_Common", "Pset_SensorTypeCommon"];
    let props = ["EnergyUse_kWh", "NominalPower", "Status"];
    (0..n)
        .map(|i| AttributeRecord {
            global_id: format!("E{}", i / 4),
            name: format!("Element {}", i / 4),
            entity_class: classes[i % classes.len()].into(),
            property_set: psets[i % psets.len()].into(),
            property: props[i % props.len()].into(),
            value: if i % 5 == 0 { "n/a".into() } else { format!("{}.5", i) },
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let classifier = Classifier::from_config(&MappingConfig::default());
    c.bench_function("classify_light_fixture", |bench| {
        bench.iter(|| black_box(classifier.classify(black_box("IfcLightFixture"))))
    });
}

fn bench_coerce(c: &mut Criterion) {
    c.bench_function("coerce_numeric", |bench| {
        bench.iter(|| black_box(coerce_value(black_box(" 125.75 "))))
    });
    c.bench_function("coerce_text", |bench| {
        bench.iter(|| black_box(coerce_value(black_box("TEMPERATURE"))))
    });
}

fn bench_build_graph(c: &mut Criterion) {
    let input = records(1_000);
    let config = MappingConfig::default();

    c.bench_function("build_graph_1k_records", |bench| {
        bench.iter(|| {
            let mut builder = TripleBuilder::new(&config);
            let mut assembler = GraphAssembler::new();
            for (row, record) in input.iter().enumerate() {
                let emission = builder.build(record, row + 1).unwrap();
                assembler.extend(&emission.statements);
            }
            black_box(assembler.triple_count())
        })
    });
}

fn bench_serialize(c: &mut Criterion) {
    let mut builder = TripleBuilder::new(&MappingConfig::default());
    let mut assembler = GraphAssembler::new();
    for (row, record) in records(1_000).iter().enumerate() {
        let emission = builder.build(record, row + 1).unwrap();
        assembler.extend(&emission.statements);
    }

    c.bench_function("serialize_turtle_1k_records", |bench| {
        bench.iter(|| black_box(assembler.to_turtle().unwrap().len()))
    });
}

criterion_group!(benches, bench_classify, bench_coerce, bench_build_graph, bench_serialize);
criterion_main!(benches);
