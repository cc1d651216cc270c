//! Quantity datatypes (INT, REAL, PQ, MO, RTO)

use once_cell::sync::Lazy;
use rust_decimal::Decimal;

use crate::meta::{ClassMeta, Facets, FieldMeta, Occurs, CS_FACET};
use crate::vocab::NullFlavor;

use super::codes::Cv;

/// Integer number (INT)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Int {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The value
    pub value: Option<i64>,
}

impl Int {
    /// A non-null integer
    pub fn new(value: i64) -> Self {
        Self {
            null_flavor: None,
            value: Some(value),
        }
    }

    /// Binding metadata for INT
    pub fn meta() -> &'static ClassMeta {
        &INT_META
    }
}

/// Real number (REAL)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Real {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The value
    pub value: Option<f64>,
}

impl Real {
    /// A non-null real
    pub fn new(value: f64) -> Self {
        Self {
            null_flavor: None,
            value: Some(value),
        }
    }

    /// Binding metadata for REAL
    pub fn meta() -> &'static ClassMeta {
        &REAL_META
    }
}

/// Physical quantity (PQ)
///
/// A decimal magnitude with a UCUM unit; the unit defaults to the
/// dimensionless `1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pq {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The magnitude
    pub value: Option<Decimal>,
    /// UCUM unit
    pub unit: String,
    /// The same quantity in other unit systems
    pub translations: Vec<PqR>,
}

impl Default for Pq {
    fn default() -> Self {
        Self {
            null_flavor: None,
            value: None,
            unit: "1".to_string(),
            translations: Vec::new(),
        }
    }
}

impl Pq {
    /// A quantity with a UCUM unit
    pub fn new(value: Decimal, unit: impl Into<String>) -> Self {
        Self {
            value: Some(value),
            unit: unit.into(),
            ..Self::default()
        }
    }

    /// A dimensionless quantity
    pub fn dimensionless(value: Decimal) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// A null quantity with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            ..Self::default()
        }
    }

    /// Binding metadata for PQ
    pub fn meta() -> &'static ClassMeta {
        &PQ_META
    }
}

/// Physical quantity representation (PQR)
///
/// A PQ translation: a coded unit from another system together with its
/// magnitude.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PqR {
    /// The coded unit
    pub coding: Cv,
    /// The magnitude in the coded unit
    pub value: Option<Decimal>,
}

impl PqR {
    /// A translation with its coded unit
    pub fn new(value: Decimal, coding: Cv) -> Self {
        Self {
            coding,
            value: Some(value),
        }
    }

    /// Binding metadata for PQR
    pub fn meta() -> &'static ClassMeta {
        &PQR_META
    }
}

/// Monetary amount (MO)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mo {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The amount
    pub value: Option<Decimal>,
    /// ISO 4217 currency code
    pub currency: Option<String>,
}

impl Mo {
    /// An amount in a currency
    pub fn new(value: Decimal, currency: impl Into<String>) -> Self {
        Self {
            null_flavor: None,
            value: Some(value),
            currency: Some(currency.into()),
        }
    }

    /// Binding metadata for MO
    pub fn meta() -> &'static ClassMeta {
        &MO_META
    }
}

/// Any quantity (QTY)
///
/// The abstract quantity type, a tagged choice of its concrete
/// specializations.
#[derive(Debug, Clone, PartialEq)]
pub enum Qty {
    /// Integer
    Int(Int),
    /// Real
    Real(Real),
    /// Physical quantity
    Pq(Pq),
    /// Monetary amount
    Mo(Mo),
}

impl Qty {
    /// True when the wrapped value is zero
    pub fn is_zero(&self) -> bool {
        match self {
            Qty::Int(i) => i.value == Some(0),
            Qty::Real(r) => r.value == Some(0.0),
            Qty::Pq(p) => p.value == Some(Decimal::ZERO),
            Qty::Mo(m) => m.value == Some(Decimal::ZERO),
        }
    }

    /// The `xsi:type` name for the wrapped value
    pub fn type_name(&self) -> &'static str {
        match self {
            Qty::Int(_) => "INT",
            Qty::Real(_) => "REAL",
            Qty::Pq(_) => "PQ",
            Qty::Mo(_) => "MO",
        }
    }
}

impl Default for Qty {
    fn default() -> Self {
        Qty::Int(Int::new(1))
    }
}

/// Ratio (RTO)
///
/// A numerator over a denominator, each any quantity. Both default to
/// the integer 1.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rto {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// Numerator
    pub numerator: Box<Qty>,
    /// Denominator
    pub denominator: Box<Qty>,
}

impl Rto {
    /// A ratio from numerator and denominator
    pub fn new(numerator: Qty, denominator: Qty) -> Self {
        Self {
            null_flavor: None,
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
        }
    }

    /// Binding metadata for RTO
    pub fn meta() -> &'static ClassMeta {
        &RTO_META
    }
}

static INT_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "INT",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("value"),
        ],
    )
});

static REAL_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "REAL",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("value"),
        ],
    )
});

static PQ_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "PQ",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("value"),
            FieldMeta::attribute("unit")
                .with_default("1")
                .with_facets(Facets {
                    pattern: Some(CS_FACET.clone()),
                    ..Facets::default()
                }),
            FieldMeta::element("translation", Occurs::zero_or_more()),
        ],
    )
});

static PQR_META: Lazy<ClassMeta> = Lazy::new(|| {
    let mut fields = vec![FieldMeta::attribute("value")];
    fields.extend(Cv::meta().fields.iter().cloned());
    ClassMeta::hl7("PQR", fields)
});

static MO_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "MO",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("value"),
            FieldMeta::attribute("currency"),
        ],
    )
});

static RTO_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "RTO",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::element("numerator", Occurs::once()),
            FieldMeta::element("denominator", Occurs::once()),
        ],
    )
});

super::impl_any_value!(Int, Real, Pq, Mo, Rto);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_pq_default_unit() {
        let pq = Pq::dimensionless(dec("1.5"));
        assert_eq!(pq.unit, "1");
        let pq = Pq::new(dec("88"), "kg");
        assert_eq!(pq.unit, "kg");
    }

    #[test]
    fn test_qty_zero() {
        assert!(Qty::Int(Int::new(0)).is_zero());
        assert!(!Qty::Int(Int::new(2)).is_zero());
        assert!(Qty::Pq(Pq::dimensionless(dec("0"))).is_zero());
    }

    #[test]
    fn test_rto_defaults_to_unity() {
        let rto = Rto::default();
        assert_eq!(*rto.numerator, Qty::Int(Int::new(1)));
        assert_eq!(*rto.denominator, Qty::Int(Int::new(1)));
    }

    #[test]
    fn test_qty_type_names() {
        assert_eq!(Qty::Pq(Pq::default()).type_name(), "PQ");
        assert_eq!(Qty::Mo(Mo::default()).type_name(), "MO");
    }

    #[test]
    fn test_pqr_meta_includes_coding_fields() {
        assert!(PqR::meta().field("value").is_some());
        assert!(PqR::meta().field("codeSystem").is_some());
    }
}
