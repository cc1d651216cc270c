//! Time datatypes (TS, SXCM_TS, IVXB_TS, IVL_TS, PIVL_TS, EIVL_TS)
//!
//! HL7 timestamps are digit strings of varying precision
//! (`YYYY[MM[DD[HH[MM[SS[.s+]]]]]]` with an optional `+-ZZZZ` offset).
//! The lexical form is preserved through parsing so re-encoding is
//! byte-stable; a parsed calendar value is carried alongside for
//! comparison and conversion.
//!
//! Interval bounds are a sum type: an interval is given by exactly one
//! of the low/high/width/center combinations the schema's choice group
//! admits, not by four optional fields.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use once_cell::sync::Lazy;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::meta::{ClassMeta, Facets, FieldMeta, Occurs, TS_FACET};
use crate::vocab::{CalendarCycle, NullFlavor, SetOperator};

use super::codes::Ce;
use super::quantity::Pq;

/// Precision of a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TsPrecision {
    /// Year (4 digits)
    Year,
    /// Month (6 digits)
    Month,
    /// Day (8 digits)
    Day,
    /// Hour (10 digits)
    Hour,
    /// Minute (12 digits)
    Minute,
    /// Second (14 digits)
    Second,
    /// Fractional seconds
    Subsecond,
}

/// A parsed HL7 timestamp value
///
/// Holds the original lexical form plus its broken-down components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsValue {
    lexical: String,
    precision: TsPrecision,
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
    hour: Option<u32>,
    minute: Option<u32>,
    second: Option<u32>,
    nanosecond: Option<u32>,
    /// Offset east of UTC in minutes, when given
    offset_minutes: Option<i32>,
}

fn parse_digits(s: &str, what: &str) -> Result<u32> {
    s.parse()
        .map_err(|_| Error::Value(format!("'{}' is not a valid {}", s, what)))
}

impl TsValue {
    /// Parse an HL7 timestamp
    ///
    /// Accepts complete precisions only: 4, 6, 8, 10, 12 or 14 digits,
    /// optionally followed by fractional seconds and a `+-HHMM` offset.
    pub fn parse(s: &str) -> Result<Self> {
        TS_FACET.validate(s)?;

        // Offset sign cannot be the first character, the pattern
        // guarantees digits there.
        let (body, offset) = match s.find(['+', '-']) {
            Some(i) => (&s[..i], Some(&s[i..])),
            None => (s, None),
        };
        let (digits, fraction) = match body.split_once('.') {
            Some((d, f)) => (d, Some(f)),
            None => (body, None),
        };

        let precision = match (digits.len(), fraction) {
            (14, Some(_)) => TsPrecision::Subsecond,
            (14, None) => TsPrecision::Second,
            (12, None) => TsPrecision::Minute,
            (10, None) => TsPrecision::Hour,
            (8, None) => TsPrecision::Day,
            (6, None) => TsPrecision::Month,
            (4, None) => TsPrecision::Year,
            _ => {
                return Err(Error::Value(format!(
                    "'{}' has an incomplete timestamp precision",
                    s
                )))
            }
        };

        let year = parse_digits(&digits[0..4], "year")? as i32;
        let month = digits.get(4..6).map(|m| parse_digits(m, "month")).transpose()?;
        let day = digits.get(6..8).map(|d| parse_digits(d, "day")).transpose()?;
        let hour = digits.get(8..10).map(|h| parse_digits(h, "hour")).transpose()?;
        let minute = digits.get(10..12).map(|m| parse_digits(m, "minute")).transpose()?;
        let second = digits.get(12..14).map(|x| parse_digits(x, "second")).transpose()?;

        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(Error::Value(format!("'{}' has month out of range", s)));
            }
        }
        if let (Some(m), Some(d)) = (month, day) {
            if NaiveDate::from_ymd_opt(year, m, d).is_none() {
                return Err(Error::Value(format!("'{}' is not a calendar date", s)));
            }
        }
        if hour.map_or(false, |h| h > 23)
            || minute.map_or(false, |m| m > 59)
            || second.map_or(false, |x| x > 60)
        {
            return Err(Error::Value(format!("'{}' has time out of range", s)));
        }

        let nanosecond = fraction
            .map(|f| {
                // Right-pad to nanoseconds, truncating beyond
                let padded = format!("{:0<9}", f);
                parse_digits(&padded[..9], "fractional second")
            })
            .transpose()?;

        let offset_minutes = offset
            .map(|o| {
                let sign = if o.starts_with('-') { -1 } else { 1 };
                let digits = &o[1..];
                let minutes = match digits.len() {
                    2 => parse_digits(digits, "offset")? * 60,
                    4 => {
                        parse_digits(&digits[..2], "offset")? * 60
                            + parse_digits(&digits[2..], "offset")?
                    }
                    _ => {
                        return Err(Error::Value(format!(
                            "'{}' has an unsupported zone offset",
                            s
                        )))
                    }
                };
                Ok(sign * minutes as i32)
            })
            .transpose()?;

        Ok(Self {
            lexical: s.to_string(),
            precision,
            year,
            month,
            day,
            hour,
            minute,
            second,
            nanosecond,
            offset_minutes,
        })
    }

    /// The original lexical form
    pub fn as_str(&self) -> &str {
        &self.lexical
    }

    /// The timestamp's precision
    pub fn precision(&self) -> TsPrecision {
        self.precision
    }

    /// The calendar point, at Day precision or finer
    ///
    /// Missing time components are taken as zero; a missing offset is
    /// taken as UTC.
    pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
        let (month, day) = (self.month?, self.day?);
        let date = NaiveDate::from_ymd_opt(self.year, month, day)?;
        let time = date
            .and_hms_opt(
                self.hour.unwrap_or(0),
                self.minute.unwrap_or(0),
                self.second.unwrap_or(0).min(59),
            )?
            .checked_add_signed(chrono::Duration::nanoseconds(
                self.nanosecond.unwrap_or(0) as i64
            ))?;
        let offset = FixedOffset::east_opt(self.offset_minutes.unwrap_or(0) * 60)?;
        match offset.from_local_datetime(&time) {
            chrono::LocalResult::Single(dt) => Some(dt),
            _ => None,
        }
    }

    /// Compare two timestamps where possible
    ///
    /// Calendar points compare exactly; coarser values compare by their
    /// shared lexical prefix and are incomparable when one is a prefix
    /// of the other.
    pub fn partial_cmp(&self, other: &TsValue) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.to_datetime(), other.to_datetime()) {
            return Some(a.cmp(&b));
        }
        let a = self.digit_body();
        let b = other.digit_body();
        let n = a.len().min(b.len());
        match a[..n].cmp(&b[..n]) {
            Ordering::Equal if a.len() != b.len() => None,
            ord => Some(ord),
        }
    }

    fn digit_body(&self) -> &str {
        let end = self
            .lexical
            .find(['+', '-', '.'])
            .unwrap_or(self.lexical.len());
        &self.lexical[..end]
    }
}

impl FromStr for TsValue {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for TsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexical)
    }
}

/// Point in time (TS)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ts {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The timestamp
    pub value: Option<TsValue>,
}

impl Ts {
    /// Parse a timestamp value
    pub fn from_str(s: &str) -> Result<Self> {
        Ok(Self {
            null_flavor: None,
            value: Some(TsValue::parse(s)?),
        })
    }

    /// A null timestamp with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            value: None,
        }
    }

    /// Binding metadata for TS
    pub fn meta() -> &'static ClassMeta {
        &TS_META
    }
}

/// Timestamp set component (SXCM_TS)
///
/// A TS with the set operator relating it to the components before it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SxcmTs {
    /// The timestamp
    pub ts: Ts,
    /// How this component combines with its predecessors
    pub operator: SetOperator,
}

impl SxcmTs {
    /// A point component with the default include operator
    pub fn point(ts: Ts) -> Self {
        Self {
            ts,
            operator: SetOperator::default(),
        }
    }
}

/// Interval boundary timestamp (IVXB_TS)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IvxbTs {
    /// The boundary point
    pub ts: Ts,
    /// Whether the boundary itself belongs to the interval
    pub inclusive: bool,
}

impl IvxbTs {
    /// An inclusive boundary
    pub fn inclusive(ts: Ts) -> Self {
        Self {
            ts,
            inclusive: true,
        }
    }

    /// An exclusive boundary
    pub fn exclusive(ts: Ts) -> Self {
        Self {
            ts,
            inclusive: false,
        }
    }
}

impl Default for IvxbTs {
    fn default() -> Self {
        Self::inclusive(Ts::default())
    }
}

/// The bound combinations an IVL_TS admits
#[derive(Debug, Clone, PartialEq)]
pub enum IvlTsBounds {
    /// Low bound only
    Low(IvxbTs),
    /// Low and high bounds
    LowHigh {
        /// Low bound
        low: IvxbTs,
        /// High bound
        high: IvxbTs,
    },
    /// Low bound and width
    LowWidth {
        /// Low bound
        low: IvxbTs,
        /// Width of the interval
        width: Pq,
    },
    /// High bound only
    High(IvxbTs),
    /// Width only
    Width(Pq),
    /// Center point only
    Center(Ts),
    /// Center point and width
    CenterWidth {
        /// Center point
        center: Ts,
        /// Width of the interval
        width: Pq,
    },
}

/// Interval of time (IVL_TS)
///
/// Carries the inherited point `value` as well: CDA frequently writes
/// an effective time as `<effectiveTime value="..."/>` even where the
/// schema type is IVL_TS.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IvlTs {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// Set operator
    pub operator: SetOperator,
    /// Point form of the interval
    pub value: Option<TsValue>,
    /// The interval bounds
    pub bounds: Option<IvlTsBounds>,
}

impl IvlTs {
    /// An interval from inclusive low and high points
    pub fn low_high(low: Ts, high: Ts) -> Self {
        Self {
            bounds: Some(IvlTsBounds::LowHigh {
                low: IvxbTs::inclusive(low),
                high: IvxbTs::inclusive(high),
            }),
            ..Self::default()
        }
    }

    /// An interval open to the right
    pub fn from_low(low: Ts) -> Self {
        Self {
            bounds: Some(IvlTsBounds::Low(IvxbTs::inclusive(low))),
            ..Self::default()
        }
    }

    /// A point-form interval
    pub fn point(value: TsValue) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// A null interval with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            ..Self::default()
        }
    }

    /// Binding metadata for IVL_TS
    pub fn meta() -> &'static ClassMeta {
        &IVL_TS_META
    }
}

/// Interval boundary quantity (IVXB_PQ)
#[derive(Debug, Clone, PartialEq)]
pub struct IvxbPq {
    /// The boundary quantity
    pub pq: Pq,
    /// Whether the boundary itself belongs to the interval
    pub inclusive: bool,
}

impl IvxbPq {
    /// An inclusive boundary
    pub fn inclusive(pq: Pq) -> Self {
        Self {
            pq,
            inclusive: true,
        }
    }
}

/// The bound combinations an IVL_PQ admits
#[derive(Debug, Clone, PartialEq)]
pub enum IvlPqBounds {
    /// Low bound only
    Low(IvxbPq),
    /// Low and high bounds
    LowHigh {
        /// Low bound
        low: IvxbPq,
        /// High bound
        high: IvxbPq,
    },
    /// Low bound and width
    LowWidth {
        /// Low bound
        low: IvxbPq,
        /// Width of the interval
        width: Pq,
    },
    /// High bound only
    High(IvxbPq),
    /// Width only
    Width(Pq),
    /// Center quantity only
    Center(Pq),
    /// Center quantity and width
    CenterWidth {
        /// Center quantity
        center: Pq,
        /// Width of the interval
        width: Pq,
    },
}

/// Interval of physical quantities (IVL_PQ)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IvlPq {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// Set operator
    pub operator: SetOperator,
    /// The interval bounds
    pub bounds: Option<IvlPqBounds>,
}

impl IvlPq {
    /// An interval from inclusive low and high quantities
    pub fn low_high(low: Pq, high: Pq) -> Self {
        Self {
            bounds: Some(IvlPqBounds::LowHigh {
                low: IvxbPq::inclusive(low),
                high: IvxbPq::inclusive(high),
            }),
            ..Self::default()
        }
    }

    /// An interval given by its width alone
    pub fn width(width: Pq) -> Self {
        Self {
            bounds: Some(IvlPqBounds::Width(width)),
            ..Self::default()
        }
    }

    /// Binding metadata for IVL_PQ
    pub fn meta() -> &'static ClassMeta {
        &IVL_PQ_META
    }
}

/// Periodic interval of time (PIVL_TS)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PivlTs {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// Set operator
    pub operator: SetOperator,
    /// One occurrence of the repetition
    pub phase: Option<IvlTs>,
    /// Period between repetitions
    pub period: Option<Pq>,
    /// Calendar cycle the repetition aligns to
    pub alignment: Option<CalendarCycle>,
    /// Whether timing is at the institution's discretion
    pub institution_specified: bool,
}

impl PivlTs {
    /// A repetition with the given period
    pub fn every(period: Pq) -> Self {
        Self {
            period: Some(period),
            ..Self::default()
        }
    }

    /// Binding metadata for PIVL_TS
    pub fn meta() -> &'static ClassMeta {
        &PIVL_TS_META
    }
}

/// Event-related interval of time (EIVL_TS)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EivlTs {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// Set operator
    pub operator: SetOperator,
    /// The timing event (TimingEvent codes)
    pub event: Option<Ce>,
    /// Offset from the event
    pub offset: Option<IvlPq>,
}

impl EivlTs {
    /// Binding metadata for EIVL_TS
    pub fn meta() -> &'static ClassMeta {
        &EIVL_TS_META
    }
}

/// One component of a general time expression (GTS)
#[derive(Debug, Clone, PartialEq)]
pub enum TimeExpression {
    /// A single point
    Point(SxcmTs),
    /// An interval
    Interval(IvlTs),
    /// A periodic interval
    Periodic(PivlTs),
    /// An event-related interval
    EventRelated(EivlTs),
}

impl TimeExpression {
    /// The set operator of the component
    pub fn operator(&self) -> SetOperator {
        match self {
            TimeExpression::Point(p) => p.operator,
            TimeExpression::Interval(i) => i.operator,
            TimeExpression::Periodic(p) => p.operator,
            TimeExpression::EventRelated(e) => e.operator,
        }
    }

    /// The `xsi:type` name for the component
    pub fn type_name(&self) -> &'static str {
        match self {
            TimeExpression::Point(_) => "SXCM_TS",
            TimeExpression::Interval(_) => "IVL_TS",
            TimeExpression::Periodic(_) => "PIVL_TS",
            TimeExpression::EventRelated(_) => "EIVL_TS",
        }
    }
}

fn ts_value_field() -> FieldMeta {
    FieldMeta::attribute("value").with_facets(Facets {
        pattern: Some(TS_FACET.clone()),
        ..Facets::default()
    })
}

static TS_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "TS",
        vec![FieldMeta::attribute("nullFlavor"), ts_value_field()],
    )
});

static IVL_TS_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "IVL_TS",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("operator").with_default("I"),
            ts_value_field(),
            FieldMeta::element("low", Occurs::optional()),
            FieldMeta::element("high", Occurs::optional()),
            FieldMeta::element("width", Occurs::optional()),
            FieldMeta::element("center", Occurs::optional()),
        ],
    )
});

static IVL_PQ_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "IVL_PQ",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("operator").with_default("I"),
            FieldMeta::element("low", Occurs::optional()),
            FieldMeta::element("high", Occurs::optional()),
            FieldMeta::element("width", Occurs::optional()),
            FieldMeta::element("center", Occurs::optional()),
        ],
    )
});

static PIVL_TS_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "PIVL_TS",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("operator").with_default("I"),
            FieldMeta::attribute("alignment"),
            FieldMeta::attribute("institutionSpecified").with_default("false"),
            FieldMeta::element("phase", Occurs::optional()),
            FieldMeta::element("period", Occurs::optional()),
        ],
    )
});

static EIVL_TS_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "EIVL_TS",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("operator").with_default("I"),
            FieldMeta::element("event", Occurs::optional()),
            FieldMeta::element("offset", Occurs::optional()),
        ],
    )
});

super::impl_any_value!(Ts, IvlTs, IvlPq, PivlTs, EivlTs);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_precisions() {
        assert_eq!(TsValue::parse("2023").unwrap().precision(), TsPrecision::Year);
        assert_eq!(
            TsValue::parse("202308").unwrap().precision(),
            TsPrecision::Month
        );
        assert_eq!(
            TsValue::parse("20230817").unwrap().precision(),
            TsPrecision::Day
        );
        assert_eq!(
            TsValue::parse("20230817123000").unwrap().precision(),
            TsPrecision::Second
        );
        assert_eq!(
            TsValue::parse("20230817123000.25").unwrap().precision(),
            TsPrecision::Subsecond
        );
    }

    #[test]
    fn test_incomplete_precision_rejected() {
        assert!(TsValue::parse("202").is_err());
        assert!(TsValue::parse("20230").is_err());
        assert!(TsValue::parse("202308171").is_err());
    }

    #[test]
    fn test_lexical_preserved() {
        let ts = TsValue::parse("20230817123000-0500").unwrap();
        assert_eq!(ts.as_str(), "20230817123000-0500");
        assert_eq!(ts.to_string(), "20230817123000-0500");
    }

    #[test]
    fn test_to_datetime() {
        let ts = TsValue::parse("20230817123000-0500").unwrap();
        let dt = ts.to_datetime().unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);

        // Year precision has no calendar point
        assert!(TsValue::parse("2023").unwrap().to_datetime().is_none());
        // Day precision does
        assert!(TsValue::parse("20230817").unwrap().to_datetime().is_some());
    }

    #[test]
    fn test_calendar_rejects_bad_dates() {
        assert!(TsValue::parse("20230230").is_err());
        assert!(TsValue::parse("202313").is_err());
        assert!(TsValue::parse("2023081725").is_err());
    }

    #[test]
    fn test_partial_cmp() {
        let a = TsValue::parse("20230817").unwrap();
        let b = TsValue::parse("20230818").unwrap();
        assert_eq!(a.partial_cmp(&b), Some(Ordering::Less));

        // Different precisions sharing a prefix are incomparable
        let year = TsValue::parse("2023").unwrap();
        let month = TsValue::parse("202308").unwrap();
        assert_eq!(year.partial_cmp(&month), None);

        // But distinguishable at the shared precision
        let other_year = TsValue::parse("2024").unwrap();
        assert_eq!(other_year.partial_cmp(&month), Some(Ordering::Greater));
    }

    #[test]
    fn test_offset_comparison() {
        let east = TsValue::parse("20230817120000+0200").unwrap();
        let utc = TsValue::parse("20230817120000").unwrap();
        // 12:00+02:00 is 10:00 UTC
        assert_eq!(east.partial_cmp(&utc), Some(Ordering::Less));
    }

    #[test]
    fn test_ivl_constructors() {
        let ivl = IvlTs::low_high(
            Ts::from_str("20230801").unwrap(),
            Ts::from_str("20230831").unwrap(),
        );
        assert!(matches!(ivl.bounds, Some(IvlTsBounds::LowHigh { .. })));
        assert_eq!(ivl.operator, SetOperator::I);

        let point = IvlTs::point(TsValue::parse("202308").unwrap());
        assert!(point.bounds.is_none());
        assert!(point.value.is_some());
    }

    #[test]
    fn test_time_expression_operator() {
        let mut pivl = PivlTs::every(Pq::new(rust_decimal::Decimal::from(6), "h"));
        pivl.operator = SetOperator::A;
        let expr = TimeExpression::Periodic(pivl);
        assert_eq!(expr.operator(), SetOperator::A);
        assert_eq!(expr.type_name(), "PIVL_TS");
    }
}
