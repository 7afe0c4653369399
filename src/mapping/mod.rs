//! Mapping: attribute records into typed graph statements.
//!
//! - [`classify`]: ordered entity-classification rules (Sensor / Asset)
//! - [`coerce`]: numeric coercion with a text fallback
//! - [`builder`]: the [`TripleBuilder`] emitting entity, derived-result and
//!   annotation statements per record
//!
//! Entity nodes live at `sdt:{GlobalId}`. Records whose property set or property
//! name marks them as energy relevant also produce an operational-carbon result
//! node at `sdt:{GlobalId}_operationalResult`.

pub mod builder;
pub mod classify;
pub mod coerce;

pub use builder::{Emission, TripleBuilder, ValueCoercionWarning};
pub use classify::{ClassMatch, ClassificationRule, Classifier, EntityKind};
pub use coerce::{CoercedValue, coerce_value};
