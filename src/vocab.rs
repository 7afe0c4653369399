//! Namespace IRIs and vocabulary terms used by the mapping and reports.

use oxigraph::model::NamedNodeRef;

pub const SDT_NS: &str = "http://builtinsight.io/ontology/sdt#";
pub const SOSA_NS: &str = "http://www.w3.org/ns/sosa/";
pub const PROV_NS: &str = "http://www.w3.org/ns/prov#";
pub const IFC_NS: &str = "http://ifcowl.openbimstandards.org/IFC4x3#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const SH_NS: &str = "http://www.w3.org/ns/shacl#";

/// Prefixes bound on every serialized data graph. Readability only.
pub const PREFIXES: &[(&str, &str)] = &[
    ("sdt", SDT_NS),
    ("sosa", SOSA_NS),
    ("prov", PROV_NS),
    ("ifc", IFC_NS),
    ("rdfs", RDFS_NS),
    ("xsd", XSD_NS),
];

pub mod sdt {
    use super::NamedNodeRef;

    pub const ASSET: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://builtinsight.io/ontology/sdt#Asset");
    pub const OPERATIONAL_CARBON_RESULT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://builtinsight.io/ontology/sdt#OperationalCarbonResult");
    pub const IFC_GUID: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://builtinsight.io/ontology/sdt#ifcGUID");
    pub const SOURCE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://builtinsight.io/ontology/sdt#source");
    pub const ABOUT_ASSET: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://builtinsight.io/ontology/sdt#aboutAsset");
    pub const HAS_MODULE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://builtinsight.io/ontology/sdt#hasModule");
    pub const VALUE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://builtinsight.io/ontology/sdt#value");
    pub const UNIT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://builtinsight.io/ontology/sdt#unit");
    pub const TIMESTAMP: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://builtinsight.io/ontology/sdt#timestamp");
}

pub mod sosa {
    use super::NamedNodeRef;

    pub const SENSOR: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/sosa/Sensor");
}

pub mod sh {
    use super::NamedNodeRef;

    pub const NODE_SHAPE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://www.w3.org/ns/shacl#NodeShape");
}
