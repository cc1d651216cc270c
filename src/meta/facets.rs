//! Lexical facets for bound fields
//!
//! The constraining facets the schema attaches to simple-typed fields:
//! patterns, lengths, inclusive bounds and closed enumerations. Shared
//! HL7 lexical patterns (uid, cs, ts, bl) are compiled once and exported
//! as statics.

use crate::error::{Result, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// Pattern facet using regular expressions
///
/// Patterns are anchored: a value matches only when the whole lexical
/// form matches.
#[derive(Debug, Clone)]
pub struct PatternFacet {
    /// Regular expression pattern as written in the schema
    pub pattern: String,
    /// Compiled, anchored regex
    regex: Regex,
}

impl PatternFacet {
    /// Create a new pattern facet
    pub fn new(pattern: &str) -> Result<Self> {
        let anchored = format!("^(?:{})$", pattern);
        let regex = Regex::new(&anchored).map_err(|e| {
            crate::error::Error::Value(format!("Invalid pattern '{}': {}", pattern, e))
        })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Validate a value against this pattern
    pub fn validate(&self, value: &str) -> Result<()> {
        if self.regex.is_match(value) {
            Ok(())
        } else {
            Err(crate::error::Error::Validation(
                ValidationError::new(format!("Value does not match pattern '{}'", self.pattern))
                    .with_reason(format!("Value: '{}'", value)),
            ))
        }
    }

    /// Check a value without constructing an error
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Length facet constrains the length of a value
#[derive(Debug, Clone)]
pub struct LengthFacet {
    /// Required length in characters
    pub value: usize,
}

impl LengthFacet {
    /// Create a new length facet
    pub fn new(value: usize) -> Self {
        Self { value }
    }

    /// Validate a value against this facet
    pub fn validate(&self, value: &str) -> Result<()> {
        let len = value.chars().count();
        if len != self.value {
            Err(crate::error::Error::Validation(
                ValidationError::new(format!("Length must be exactly {}", self.value))
                    .with_reason(format!("Actual length: {}", len)),
            ))
        } else {
            Ok(())
        }
    }
}

/// Minimum length facet
#[derive(Debug, Clone)]
pub struct MinLengthFacet {
    /// Minimum length in characters
    pub value: usize,
}

impl MinLengthFacet {
    /// Create a new minimum length facet
    pub fn new(value: usize) -> Self {
        Self { value }
    }

    /// Validate a value against this facet
    pub fn validate(&self, value: &str) -> Result<()> {
        let len = value.chars().count();
        if len < self.value {
            Err(crate::error::Error::Validation(
                ValidationError::new(format!("Length must be at least {}", self.value))
                    .with_reason(format!("Actual length: {}", len)),
            ))
        } else {
            Ok(())
        }
    }
}

/// Maximum length facet
#[derive(Debug, Clone)]
pub struct MaxLengthFacet {
    /// Maximum length in characters
    pub value: usize,
}

impl MaxLengthFacet {
    /// Create a new maximum length facet
    pub fn new(value: usize) -> Self {
        Self { value }
    }

    /// Validate a value against this facet
    pub fn validate(&self, value: &str) -> Result<()> {
        let len = value.chars().count();
        if len > self.value {
            Err(crate::error::Error::Validation(
                ValidationError::new(format!("Length must be at most {}", self.value))
                    .with_reason(format!("Actual length: {}", len)),
            ))
        } else {
            Ok(())
        }
    }
}

/// Enumeration facet restricts values to a specific set
#[derive(Debug, Clone)]
pub struct EnumerationFacet {
    /// Allowed values
    pub values: Vec<String>,
}

impl EnumerationFacet {
    /// Create a new enumeration facet
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Validate a value against this enumeration
    pub fn validate(&self, value: &str) -> Result<()> {
        if self.values.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(crate::error::Error::Validation(
                ValidationError::new("Value is not in the enumeration")
                    .with_reason(format!("Allowed values: {:?}", self.values)),
            ))
        }
    }
}

/// Numeric bound for inclusive range facets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericBound {
    /// Integer bound
    Integer(i64),
    /// Decimal bound
    Decimal(Decimal),
}

impl NumericBound {
    /// Compare a lexical value with this bound
    ///
    /// The value is parsed as a decimal; a non-numeric value is a value
    /// error rather than a silent pass.
    pub fn compare(&self, value: &str) -> Result<Ordering> {
        let parsed = Decimal::from_str(value.trim()).map_err(|_| {
            crate::error::Error::Value(format!("'{}' is not a numeric value", value))
        })?;
        let bound = match self {
            NumericBound::Integer(i) => Decimal::from(*i),
            NumericBound::Decimal(d) => *d,
        };
        Ok(parsed.cmp(&bound))
    }
}

/// Minimum inclusive bound facet
#[derive(Debug, Clone)]
pub struct MinInclusiveFacet {
    /// Lower bound
    pub bound: NumericBound,
}

impl MinInclusiveFacet {
    /// Create a new minimum inclusive facet
    pub fn new(bound: NumericBound) -> Self {
        Self { bound }
    }

    /// Validate a lexical value against this facet
    pub fn validate(&self, value: &str) -> Result<()> {
        if self.bound.compare(value)? == Ordering::Less {
            Err(crate::error::Error::Validation(
                ValidationError::new(format!("Value must be at least {:?}", self.bound))
                    .with_reason(format!("Value: '{}'", value)),
            ))
        } else {
            Ok(())
        }
    }
}

/// Maximum inclusive bound facet
#[derive(Debug, Clone)]
pub struct MaxInclusiveFacet {
    /// Upper bound
    pub bound: NumericBound,
}

impl MaxInclusiveFacet {
    /// Create a new maximum inclusive facet
    pub fn new(bound: NumericBound) -> Self {
        Self { bound }
    }

    /// Validate a lexical value against this facet
    pub fn validate(&self, value: &str) -> Result<()> {
        if self.bound.compare(value)? == Ordering::Greater {
            Err(crate::error::Error::Validation(
                ValidationError::new(format!("Value must be at most {:?}", self.bound))
                    .with_reason(format!("Value: '{}'", value)),
            ))
        } else {
            Ok(())
        }
    }
}

/// The facets attached to one bound field
///
/// Application order is pattern, lengths, bounds, enumeration; the
/// first failing facet wins.
#[derive(Debug, Clone, Default)]
pub struct Facets {
    /// Pattern facet
    pub pattern: Option<PatternFacet>,
    /// Exact length facet
    pub length: Option<LengthFacet>,
    /// Minimum length facet
    pub min_length: Option<MinLengthFacet>,
    /// Maximum length facet
    pub max_length: Option<MaxLengthFacet>,
    /// Minimum inclusive bound
    pub min_inclusive: Option<MinInclusiveFacet>,
    /// Maximum inclusive bound
    pub max_inclusive: Option<MaxInclusiveFacet>,
    /// Enumeration facet
    pub enumeration: Option<EnumerationFacet>,
}

impl Facets {
    /// Create an empty facet set
    pub fn new() -> Self {
        Self::default()
    }

    /// Facet set with only a pattern
    pub fn pattern(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Some(PatternFacet::new(pattern)?),
            ..Self::default()
        })
    }

    /// Apply every present facet to a lexical value
    pub fn check(&self, value: &str) -> Result<()> {
        if let Some(ref facet) = self.pattern {
            facet.validate(value)?;
        }
        if let Some(ref facet) = self.length {
            facet.validate(value)?;
        }
        if let Some(ref facet) = self.min_length {
            facet.validate(value)?;
        }
        if let Some(ref facet) = self.max_length {
            facet.validate(value)?;
        }
        if let Some(ref facet) = self.min_inclusive {
            facet.validate(value)?;
        }
        if let Some(ref facet) = self.max_inclusive {
            facet.validate(value)?;
        }
        if let Some(ref facet) = self.enumeration {
            facet.validate(value)?;
        }
        Ok(())
    }
}

// Shared HL7 lexical patterns. The uid form admits OIDs, UUIDs and
// reserved identifiers.
const OID_PATTERN: &str = r"[0-2](\.(0|[1-9][0-9]*))+";
const UUID_PATTERN: &str =
    r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}";
const RUID_PATTERN: &str = r"[A-Za-z][A-Za-z0-9\-]+";

/// Pattern for uid-typed values (II root, codeSystem and friends)
pub static UID_FACET: Lazy<PatternFacet> = Lazy::new(|| {
    PatternFacet::new(&format!(
        "({})|({})|({})",
        OID_PATTERN, UUID_PATTERN, RUID_PATTERN
    ))
    .unwrap()
});

/// Pattern for cs-typed values (codes, units): no whitespace
pub static CS_FACET: Lazy<PatternFacet> = Lazy::new(|| PatternFacet::new(r"[^\s]+").unwrap());

/// Pattern for ts-typed values (HL7 timestamps)
pub static TS_FACET: Lazy<PatternFacet> = Lazy::new(|| {
    PatternFacet::new(r"[0-9]{1,8}|([0-9]{9,14}|[0-9]{14}\.[0-9]+)([+\-][0-9]{1,4})?").unwrap()
});

/// Pattern for bl-typed values
pub static BL_FACET: Lazy<PatternFacet> = Lazy::new(|| PatternFacet::new(r"true|false").unwrap());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_is_anchored() {
        let facet = PatternFacet::new(r"[0-9]+").unwrap();
        assert!(facet.validate("123").is_ok());
        assert!(facet.validate("a123").is_err());
        assert!(facet.validate("123a").is_err());
    }

    #[test]
    fn test_invalid_pattern_is_value_error() {
        let err = PatternFacet::new(r"[unclosed").unwrap_err();
        assert!(matches!(err, crate::error::Error::Value(_)));
    }

    #[test]
    fn test_length_facets() {
        assert!(LengthFacet::new(3).validate("abc").is_ok());
        assert!(LengthFacet::new(3).validate("ab").is_err());
        assert!(MinLengthFacet::new(2).validate("ab").is_ok());
        assert!(MinLengthFacet::new(2).validate("a").is_err());
        assert!(MaxLengthFacet::new(2).validate("ab").is_ok());
        assert!(MaxLengthFacet::new(2).validate("abc").is_err());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // Two chars, four bytes
        assert!(LengthFacet::new(2).validate("äö").is_ok());
    }

    #[test]
    fn test_enumeration_facet() {
        let facet = EnumerationFacet::new(vec!["TXT".into(), "B64".into()]);
        assert!(facet.validate("B64").is_ok());
        assert!(facet.validate("b64").is_err());
    }

    #[test]
    fn test_inclusive_bounds() {
        let min = MinInclusiveFacet::new(NumericBound::Integer(1));
        assert!(min.validate("1").is_ok());
        assert!(min.validate("0").is_err());
        assert!(min.validate("1.5").is_ok());
        assert!(min.validate("abc").is_err());

        let max = MaxInclusiveFacet::new(NumericBound::Decimal(Decimal::new(15, 1)));
        assert!(max.validate("1.5").is_ok());
        assert!(max.validate("1.6").is_err());
    }

    #[test]
    fn test_facets_order() {
        let facets = Facets {
            pattern: Some(PatternFacet::new(r"[0-9]+").unwrap()),
            max_length: Some(MaxLengthFacet::new(3)),
            ..Facets::default()
        };
        assert!(facets.check("12").is_ok());
        assert!(facets.check("1234").is_err());
        // Pattern failure reported before length failure
        let err = facets.check("abcd").unwrap_err();
        assert!(format!("{}", err).contains("pattern"));
    }

    #[test]
    fn test_uid_facet() {
        assert!(UID_FACET.is_match("2.16.840.1.113883.19.5"));
        assert!(UID_FACET.is_match("e1087611-32c8-49fb-b958-aeb7f3f579a4"));
        assert!(UID_FACET.is_match("HL7-ruid"));
        assert!(!UID_FACET.is_match("2..5"));
        assert!(!UID_FACET.is_match("3.1.2"));
        assert!(!UID_FACET.is_match(""));
    }

    #[test]
    fn test_ts_facet() {
        assert!(TS_FACET.is_match("2023"));
        assert!(TS_FACET.is_match("20230817"));
        assert!(TS_FACET.is_match("20230817123000"));
        assert!(TS_FACET.is_match("20230817123000.123"));
        assert!(TS_FACET.is_match("20230817123000-0500"));
        assert!(!TS_FACET.is_match("2023-08-17"));
        assert!(!TS_FACET.is_match("noon"));
    }

    #[test]
    fn test_cs_facet() {
        assert!(CS_FACET.is_match("completed"));
        assert!(!CS_FACET.is_match("two words"));
        assert!(!CS_FACET.is_match(""));
    }
}
