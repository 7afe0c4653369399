//! Value coercion for derived results.

use oxigraph::model::Literal;
use oxigraph::model::vocab::xsd;

/// Outcome of coercing a raw cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CoercedValue {
    /// Parsed as a finite number; written as `xsd:decimal`.
    Numeric(f64),
    /// Kept verbatim as a plain string literal.
    RawText(String),
}

impl CoercedValue {
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric(_))
    }

    pub fn to_literal(&self) -> Literal {
        match self {
            Self::Numeric(v) => Literal::new_typed_literal(decimal_lexical(*v), xsd::DECIMAL),
            Self::RawText(s) => Literal::new_simple_literal(s.as_str()),
        }
    }
}

/// Parse `raw` as a number; never fails, only degrades to [`CoercedValue::RawText`].
///
/// `NaN` and infinities parse as `f64` but have no `xsd:decimal` form, so they stay text.
pub fn coerce_value(raw: &str) -> CoercedValue {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => CoercedValue::Numeric(v),
        _ => CoercedValue::RawText(raw.to_string()),
    }
}

/// Canonical-ish `xsd:decimal` lexical form. `Display` for `f64` never uses exponents.
fn decimal_lexical(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}
