//! Decoding datatypes from the element tree
//!
//! Decoders are strict inside the HL7 namespace: unknown attributes or
//! child elements there are errors, while `xsi:*`, `xml:*` and
//! foreign-namespace content is ignored as wildcard material. Defaults
//! from the binding metadata are applied here, so an absent
//! `representation` reads back as TXT and an absent `unit` as `1`.

use base64::Engine;
use rust_decimal::Decimal;
use std::str::FromStr;
use url::Url;

use crate::datatypes::{
    Ad, AddressPart, Bl, Cd, Ce, Cr, Cs, Cv, Ed, EivlTs, En, Ii, Int, IvlPq, IvlPqBounds, IvlTs,
    IvlTsBounds, IvxbPq, IvxbTs, Mo, NamePart, On, PivlTs, Pn, Pq, PqR, Qty, Real, Rto, Sc, St,
    SxcmTs, Tel, TimeExpression, Tn, Ts, TsValue,
};
use crate::error::{Error, Result};
use crate::meta::{ClassMeta, FieldKind};
use crate::vocab::{
    BinaryDataEncoding, CalendarCycle, CompressionAlgorithm, EntityNamePartQualifier,
    EntityNameUse, IntegrityCheckAlgorithm, NullFlavor, PostalAddressUse, SetOperator,
    TelecommunicationAddressUse,
};
use crate::xml::reader::{Element, Node};

/// Decoding from an XML element
pub trait FromXml: Sized {
    /// Decode a value from an element
    fn from_xml(el: &Element) -> Result<Self>;
}

/// Reject content the metadata does not admit
///
/// Unqualified attributes and HL7-namespace children must appear in
/// the field table; `xsi:*`, `xml:*` and foreign namespaces pass as
/// wildcard content. Character data is only allowed when the table has
/// a text field, and unknown child elements only when it has a
/// wildcard field (the mixed-content decoders recognize those by wire
/// name themselves).
pub(crate) fn check_content(el: &Element, meta: &ClassMeta) -> Result<()> {
    for qname in el.attributes.keys() {
        match qname.namespace.as_deref() {
            None => {
                if meta
                    .field_of_kind(&qname.local_name, FieldKind::Attribute)
                    .is_none()
                {
                    return Err(Error::Decode(format!(
                        "Unexpected attribute '{}' on {}",
                        qname.local_name, meta.name
                    )));
                }
            }
            // Wildcard: xsi/xml and foreign namespaces
            Some(_) => {}
        }
    }

    let allow_text = meta.field_of_kind("$", FieldKind::Text).is_some();
    let open_content = meta.field_of_kind("*", FieldKind::Wildcard).is_some();
    for node in &el.children {
        match node {
            Node::Element(child) => match child.namespace() {
                None | Some(crate::HL7_V3_NAMESPACE) => {
                    if !open_content
                        && meta
                            .field_of_kind(child.local_name(), FieldKind::Element)
                            .is_none()
                    {
                        return Err(Error::Decode(format!(
                            "Unexpected element '{}' in {}",
                            child.local_name(),
                            meta.name
                        )));
                    }
                }
                Some(_) => {}
            },
            Node::Text(text) => {
                if !allow_text && !text.trim().is_empty() {
                    return Err(Error::Decode(format!(
                        "Unexpected text content in {}",
                        meta.name
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Parse the nullFlavor attribute and enforce its exclusivity
///
/// A null value must carry nothing besides the flavor itself.
pub(crate) fn null_flavor_of(el: &Element) -> Result<Option<NullFlavor>> {
    let Some(value) = el.attribute("nullFlavor") else {
        return Ok(None);
    };
    let flavor = NullFlavor::from_str(value)?;

    let extra_attr = el
        .attributes
        .keys()
        .find(|q| q.namespace.is_none() && q.local_name != "nullFlavor");
    if let Some(attr) = extra_attr {
        return Err(Error::Decode(format!(
            "Null value carries attribute '{}'",
            attr.local_name
        )));
    }
    let has_content = el.children.iter().any(|node| match node {
        Node::Element(child) => !matches!(child.namespace(), Some(ns) if ns != crate::HL7_V3_NAMESPACE),
        Node::Text(text) => !text.trim().is_empty(),
    });
    if has_content {
        return Err(Error::Decode(
            "Null value carries element or text content".to_string(),
        ));
    }

    Ok(Some(flavor))
}

pub(crate) fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::Decode(format!("'{}' is not a boolean", value))),
    }
}

fn parse_i64(value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Decode(format!("'{}' is not an integer", value)))
}

fn parse_f64(value: &str) -> Result<f64> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Decode(format!("'{}' is not a real number", value)))
}

fn parse_decimal(value: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|_| Error::Decode(format!("'{}' is not a decimal number", value)))
}

/// Parse a space-separated set-valued attribute
///
/// The empty string is the empty set.
pub(crate) fn parse_set<T>(value: &str) -> Result<Vec<T>>
where
    T: FromStr<Err = Error>,
{
    value.split_whitespace().map(T::from_str).collect()
}

fn attr_code<T>(el: &Element, name: &str) -> Result<Option<T>>
where
    T: FromStr<Err = Error>,
{
    el.attribute(name).map(T::from_str).transpose()
}

fn attr_string(el: &Element, name: &str) -> Option<String> {
    el.attribute(name).map(|s| s.to_string())
}

fn attr_bool(el: &Element, name: &str) -> Result<Option<bool>> {
    el.attribute(name).map(parse_bool).transpose()
}

/// The xsi:type of an element with any prefix stripped
pub(crate) fn xsi_type(el: &Element) -> Option<&str> {
    el.attribute_ns(crate::XSI_NAMESPACE, "type")
        .map(|t| match t.split_once(':') {
            Some((_, local)) => local,
            None => t,
        })
}

fn collect_children<T: FromXml>(el: &Element, name: &str) -> Result<Vec<T>> {
    el.children_named(name).map(T::from_xml).collect()
}

fn optional_child<T: FromXml>(el: &Element, name: &str) -> Result<Option<T>> {
    el.first_child(name).map(T::from_xml).transpose()
}

impl FromXml for Bl {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Bl::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            value: attr_bool(el, "value")?,
        })
    }
}

impl FromXml for Ii {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Ii::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            root: attr_string(el, "root"),
            extension: attr_string(el, "extension"),
            assigning_authority_name: attr_string(el, "assigningAuthorityName"),
            displayable: attr_bool(el, "displayable")?,
        })
    }
}

impl FromXml for Cs {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Cs::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            code: attr_string(el, "code"),
        })
    }
}

fn decode_coded_attrs(el: &Element) -> Result<Cv> {
    Ok(Cv {
        null_flavor: null_flavor_of(el)?,
        code: attr_string(el, "code"),
        code_system: attr_string(el, "codeSystem"),
        code_system_name: attr_string(el, "codeSystemName"),
        code_system_version: attr_string(el, "codeSystemVersion"),
        display_name: attr_string(el, "displayName"),
        original_text: optional_child(el, "originalText")?,
    })
}

impl FromXml for Cd {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Cd::meta())?;
        let base = decode_coded_attrs(el)?;
        Ok(Self {
            null_flavor: base.null_flavor,
            code: base.code,
            code_system: base.code_system,
            code_system_name: base.code_system_name,
            code_system_version: base.code_system_version,
            display_name: base.display_name,
            original_text: base.original_text,
            qualifiers: collect_children(el, "qualifier")?,
            translations: collect_children(el, "translation")?,
        })
    }
}

impl FromXml for Ce {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Ce::meta())?;
        let base = decode_coded_attrs(el)?;
        Ok(Self {
            null_flavor: base.null_flavor,
            code: base.code,
            code_system: base.code_system,
            code_system_name: base.code_system_name,
            code_system_version: base.code_system_version,
            display_name: base.display_name,
            original_text: base.original_text,
            translations: collect_children(el, "translation")?,
        })
    }
}

impl FromXml for Cv {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Cv::meta())?;
        decode_coded_attrs(el)
    }
}

impl FromXml for Cr {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Cr::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            name: optional_child(el, "name")?,
            value: optional_child(el, "value")?,
            inverted: attr_bool(el, "inverted")?.unwrap_or(false),
        })
    }
}

impl FromXml for St {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, St::meta())?;
        let null_flavor = null_flavor_of(el)?;
        let text = el.text();
        Ok(Self {
            null_flavor,
            value: if null_flavor.is_some() || text.is_empty() {
                None
            } else {
                Some(text)
            },
            language: attr_string(el, "language"),
        })
    }
}

impl FromXml for Sc {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Sc::meta())?;
        let null_flavor = null_flavor_of(el)?;
        let text = el.text();
        Ok(Self {
            null_flavor,
            value: if null_flavor.is_some() || text.is_empty() {
                None
            } else {
                Some(text)
            },
            language: attr_string(el, "language"),
            code: attr_string(el, "code"),
            code_system: attr_string(el, "codeSystem"),
            code_system_name: attr_string(el, "codeSystemName"),
            display_name: attr_string(el, "displayName"),
        })
    }
}

impl FromXml for Ed {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Ed::meta())?;
        let null_flavor = null_flavor_of(el)?;
        let text = el.text();
        let integrity_check = el
            .attribute("integrityCheck")
            .map(|raw| {
                let cleaned: String = raw.split_whitespace().collect();
                base64::engine::general_purpose::STANDARD
                    .decode(cleaned)
                    .map_err(|e| Error::Decode(format!("integrityCheck is not base64: {}", e)))
            })
            .transpose()?;

        Ok(Self {
            null_flavor,
            text: if null_flavor.is_some() || text.is_empty() {
                None
            } else {
                Some(text)
            },
            media_type: attr_string(el, "mediaType").unwrap_or_else(|| "text/plain".to_string()),
            language: attr_string(el, "language"),
            compression: attr_code::<CompressionAlgorithm>(el, "compression")?,
            integrity_check,
            integrity_check_algorithm: attr_code::<IntegrityCheckAlgorithm>(
                el,
                "integrityCheckAlgorithm",
            )?,
            representation: attr_code::<BinaryDataEncoding>(el, "representation")?
                .unwrap_or_default(),
            reference: optional_child(el, "reference")?,
            thumbnail: optional_child::<Ed>(el, "thumbnail")?.map(Box::new),
        })
    }
}

impl FromXml for Tel {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Tel::meta())?;
        let value = el.attribute("value").map(Url::parse).transpose()?;
        let use_codes = match el.attribute("use") {
            Some(raw) => parse_set::<TelecommunicationAddressUse>(raw)?,
            None => Vec::new(),
        };
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            value,
            use_codes,
            useable_period: collect_children(el, "useablePeriod")?,
        })
    }
}

impl FromXml for Ad {
    fn from_xml(el: &Element) -> Result<Self> {
        // Attribute strictness comes from the table; the part elements
        // fall under its wildcard and are recognized by wire name.
        check_content(el, Ad::meta())?;
        let null_flavor = null_flavor_of(el)?;
        let use_codes = match el.attribute("use") {
            Some(raw) => parse_set::<PostalAddressUse>(raw)?,
            None => Vec::new(),
        };

        let mut parts = Vec::new();
        let mut useable_period = Vec::new();
        for node in &el.children {
            match node {
                Node::Text(text) => {
                    if !text.trim().is_empty() {
                        parts.push(AddressPart::Text(text.clone()));
                    }
                }
                Node::Element(child) => match child.local_name() {
                    "useablePeriod" => useable_period.push(SxcmTs::from_xml(child)?),
                    name => match AddressPart::kind_for_element(name) {
                        Some(kind) => parts.push(AddressPart::Part {
                            kind,
                            value: child.text(),
                        }),
                        None => {
                            if matches!(
                                child.namespace(),
                                None | Some(crate::HL7_V3_NAMESPACE)
                            ) {
                                return Err(Error::Decode(format!(
                                    "Unexpected element '{}' in AD",
                                    name
                                )));
                            }
                        }
                    },
                },
            }
        }

        Ok(Self {
            null_flavor,
            parts,
            use_codes,
            is_not_ordered: attr_bool(el, "isNotOrdered")?,
            useable_period,
        })
    }
}

impl FromXml for En {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, En::meta())?;
        let null_flavor = null_flavor_of(el)?;
        let use_codes = match el.attribute("use") {
            Some(raw) => parse_set::<EntityNameUse>(raw)?,
            None => Vec::new(),
        };

        let mut parts = Vec::new();
        let mut valid_time = None;
        for node in &el.children {
            match node {
                Node::Text(text) => {
                    if !text.trim().is_empty() {
                        parts.push(NamePart::Text(text.clone()));
                    }
                }
                Node::Element(child) => match child.local_name() {
                    "validTime" => valid_time = Some(IvlTs::from_xml(child)?),
                    name => match NamePart::kind_for_element(name) {
                        Some(kind) => {
                            let qualifiers = match child.attribute("qualifier") {
                                Some(raw) => parse_set::<EntityNamePartQualifier>(raw)?,
                                None => Vec::new(),
                            };
                            parts.push(NamePart::Part {
                                kind,
                                value: child.text(),
                                qualifiers,
                            });
                        }
                        None => {
                            if matches!(
                                child.namespace(),
                                None | Some(crate::HL7_V3_NAMESPACE)
                            ) {
                                return Err(Error::Decode(format!(
                                    "Unexpected element '{}' in EN",
                                    name
                                )));
                            }
                        }
                    },
                },
            }
        }

        Ok(Self {
            null_flavor,
            parts,
            use_codes,
            valid_time,
        })
    }
}

impl FromXml for Pn {
    fn from_xml(el: &Element) -> Result<Self> {
        Ok(Pn(En::from_xml(el)?))
    }
}

impl FromXml for On {
    fn from_xml(el: &Element) -> Result<Self> {
        let en = En::from_xml(el)?;
        for part in &en.parts {
            if let NamePart::Part { kind, .. } = part {
                if matches!(
                    kind,
                    crate::vocab::EntityNamePartType::Fam | crate::vocab::EntityNamePartType::Giv
                ) {
                    return Err(Error::Decode(format!(
                        "Organization names cannot carry {} parts",
                        kind
                    )));
                }
            }
        }
        Ok(On(en))
    }
}

impl FromXml for Tn {
    fn from_xml(el: &Element) -> Result<Self> {
        let en = En::from_xml(el)?;
        let mut value = None;
        for part in en.parts {
            match part {
                NamePart::Text(text) => match value {
                    None => value = Some(text),
                    Some(ref mut existing) => existing.push_str(&text),
                },
                NamePart::Part { .. } => {
                    return Err(Error::Decode(
                        "Trivial names carry text only, not typed parts".to_string(),
                    ))
                }
            }
        }
        Ok(Self {
            null_flavor: en.null_flavor,
            value,
        })
    }
}

impl FromXml for Int {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Int::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            value: el.attribute("value").map(parse_i64).transpose()?,
        })
    }
}

impl FromXml for Real {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Real::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            value: el.attribute("value").map(parse_f64).transpose()?,
        })
    }
}

impl FromXml for Pq {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Pq::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            value: el.attribute("value").map(parse_decimal).transpose()?,
            unit: attr_string(el, "unit").unwrap_or_else(|| "1".to_string()),
            translations: collect_children(el, "translation")?,
        })
    }
}

impl FromXml for PqR {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, PqR::meta())?;
        Ok(Self {
            coding: decode_coded_attrs(el)?,
            value: el.attribute("value").map(parse_decimal).transpose()?,
        })
    }
}

impl FromXml for Mo {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Mo::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            value: el.attribute("value").map(parse_decimal).transpose()?,
            currency: attr_string(el, "currency"),
        })
    }
}

impl FromXml for Qty {
    fn from_xml(el: &Element) -> Result<Self> {
        match xsi_type(el) {
            Some("INT") => Ok(Qty::Int(Int::from_xml(el)?)),
            Some("REAL") => Ok(Qty::Real(Real::from_xml(el)?)),
            Some("PQ") => Ok(Qty::Pq(Pq::from_xml(el)?)),
            Some("MO") => Ok(Qty::Mo(Mo::from_xml(el)?)),
            Some(other) => Err(Error::Decode(format!(
                "'{}' is not a quantity type",
                other
            ))),
            None => Err(Error::Decode(format!(
                "Element '{}' needs an xsi:type to select its quantity type",
                el.local_name()
            ))),
        }
    }
}

impl FromXml for Rto {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Rto::meta())?;
        let numerator = el
            .first_child("numerator")
            .map(Qty::from_xml)
            .transpose()?
            .unwrap_or_default();
        let denominator = el
            .first_child("denominator")
            .map(Qty::from_xml)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
        })
    }
}

impl FromXml for Ts {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, Ts::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            value: el.attribute("value").map(TsValue::parse).transpose()?,
        })
    }
}

/// Metadata for elements that carry TS attributes plus operator/inclusive
fn sxcm_meta(name: &'static str, extra: &'static str) -> ClassMeta {
    ClassMeta::hl7(
        name,
        vec![
            crate::meta::FieldMeta::attribute("nullFlavor"),
            crate::meta::FieldMeta::attribute("value"),
            crate::meta::FieldMeta::attribute(extra),
        ],
    )
}

impl FromXml for SxcmTs {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, &sxcm_meta("SXCM_TS", "operator"))?;
        Ok(Self {
            ts: Ts {
                null_flavor: null_flavor_of(el)?,
                value: el.attribute("value").map(TsValue::parse).transpose()?,
            },
            operator: attr_code::<SetOperator>(el, "operator")?.unwrap_or_default(),
        })
    }
}

impl FromXml for IvxbTs {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, &sxcm_meta("IVXB_TS", "inclusive"))?;
        Ok(Self {
            ts: Ts {
                null_flavor: null_flavor_of(el)?,
                value: el.attribute("value").map(TsValue::parse).transpose()?,
            },
            inclusive: attr_bool(el, "inclusive")?.unwrap_or(true),
        })
    }
}

impl FromXml for IvxbPq {
    fn from_xml(el: &Element) -> Result<Self> {
        Ok(Self {
            pq: Pq {
                null_flavor: null_flavor_of(el)?,
                value: el.attribute("value").map(parse_decimal).transpose()?,
                unit: attr_string(el, "unit").unwrap_or_else(|| "1".to_string()),
                translations: Vec::new(),
            },
            inclusive: attr_bool(el, "inclusive")?.unwrap_or(true),
        })
    }
}

impl FromXml for IvlTs {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, IvlTs::meta())?;
        let low = optional_child::<IvxbTs>(el, "low")?;
        let high = optional_child::<IvxbTs>(el, "high")?;
        let width = optional_child::<Pq>(el, "width")?;
        let center = optional_child::<Ts>(el, "center")?;

        let bounds = match (low, high, width, center) {
            (None, None, None, None) => None,
            (Some(low), None, None, None) => Some(IvlTsBounds::Low(low)),
            (Some(low), Some(high), None, None) => Some(IvlTsBounds::LowHigh { low, high }),
            (Some(low), None, Some(width), None) => Some(IvlTsBounds::LowWidth { low, width }),
            (None, Some(high), None, None) => Some(IvlTsBounds::High(high)),
            (None, None, Some(width), None) => Some(IvlTsBounds::Width(width)),
            (None, None, None, Some(center)) => Some(IvlTsBounds::Center(center)),
            (None, None, Some(width), Some(center)) => {
                Some(IvlTsBounds::CenterWidth { center, width })
            }
            _ => {
                return Err(Error::Decode(
                    "Interval bounds are not one of the admitted combinations".to_string(),
                ))
            }
        };

        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            operator: attr_code::<SetOperator>(el, "operator")?.unwrap_or_default(),
            value: el.attribute("value").map(TsValue::parse).transpose()?,
            bounds,
        })
    }
}

impl FromXml for IvlPq {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, IvlPq::meta())?;
        let low = optional_child::<IvxbPq>(el, "low")?;
        let high = optional_child::<IvxbPq>(el, "high")?;
        let width = optional_child::<Pq>(el, "width")?;
        let center = optional_child::<Pq>(el, "center")?;

        let bounds = match (low, high, width, center) {
            (None, None, None, None) => None,
            (Some(low), None, None, None) => Some(IvlPqBounds::Low(low)),
            (Some(low), Some(high), None, None) => Some(IvlPqBounds::LowHigh { low, high }),
            (Some(low), None, Some(width), None) => Some(IvlPqBounds::LowWidth { low, width }),
            (None, Some(high), None, None) => Some(IvlPqBounds::High(high)),
            (None, None, Some(width), None) => Some(IvlPqBounds::Width(width)),
            (None, None, None, Some(center)) => Some(IvlPqBounds::Center(center)),
            (None, None, Some(width), Some(center)) => {
                Some(IvlPqBounds::CenterWidth { center, width })
            }
            _ => {
                return Err(Error::Decode(
                    "Interval bounds are not one of the admitted combinations".to_string(),
                ))
            }
        };

        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            operator: attr_code::<SetOperator>(el, "operator")?.unwrap_or_default(),
            bounds,
        })
    }
}

impl FromXml for PivlTs {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, PivlTs::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            operator: attr_code::<SetOperator>(el, "operator")?.unwrap_or_default(),
            phase: optional_child(el, "phase")?,
            period: optional_child(el, "period")?,
            alignment: attr_code::<CalendarCycle>(el, "alignment")?,
            institution_specified: attr_bool(el, "institutionSpecified")?.unwrap_or(false),
        })
    }
}

impl FromXml for EivlTs {
    fn from_xml(el: &Element) -> Result<Self> {
        check_content(el, EivlTs::meta())?;
        Ok(Self {
            null_flavor: null_flavor_of(el)?,
            operator: attr_code::<SetOperator>(el, "operator")?.unwrap_or_default(),
            event: optional_child(el, "event")?,
            offset: optional_child(el, "offset")?,
        })
    }
}

impl FromXml for TimeExpression {
    fn from_xml(el: &Element) -> Result<Self> {
        match xsi_type(el) {
            Some("IVL_TS") => Ok(TimeExpression::Interval(IvlTs::from_xml(el)?)),
            Some("PIVL_TS") => Ok(TimeExpression::Periodic(PivlTs::from_xml(el)?)),
            Some("EIVL_TS") => Ok(TimeExpression::EventRelated(EivlTs::from_xml(el)?)),
            Some("SXCM_TS") | Some("TS") | None => {
                Ok(TimeExpression::Point(SxcmTs::from_xml(el)?))
            }
            Some(other) => Err(Error::Decode(format!(
                "'{}' is not a time expression type",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::reader::Document;

    fn parse(xml: &str) -> Element {
        Document::from_str(xml).unwrap().into_root().unwrap()
    }

    #[test]
    fn test_decode_ii() {
        let el = parse(r#"<id root="2.16.840.1.113883.19.5" extension="42"/>"#);
        let id = Ii::from_xml(&el).unwrap();
        assert_eq!(id.root.as_deref(), Some("2.16.840.1.113883.19.5"));
        assert_eq!(id.extension.as_deref(), Some("42"));
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let el = parse(r#"<id root="1.2.3" bogus="x"/>"#);
        assert!(matches!(Ii::from_xml(&el), Err(Error::Decode(_))));
    }

    #[test]
    fn test_null_excludes_other_content() {
        let el = parse(r#"<id nullFlavor="UNK"/>"#);
        assert_eq!(Ii::from_xml(&el).unwrap().null_flavor, Some(NullFlavor::Unk));

        let el = parse(r#"<id nullFlavor="UNK" root="1.2.3"/>"#);
        assert!(Ii::from_xml(&el).is_err());
    }

    #[test]
    fn test_decode_cd_with_translation() {
        let el = parse(
            r#"<code code="11450-4" codeSystem="2.16.840.1.113883.6.1" displayName="Problem list">
                 <translation code="PL" codeSystem="2.16.840.1.113883.19"/>
               </code>"#,
        );
        let cd = Cd::from_xml(&el).unwrap();
        assert_eq!(cd.code.as_deref(), Some("11450-4"));
        assert_eq!(cd.translations.len(), 1);
        assert_eq!(cd.translations[0].code.as_deref(), Some("PL"));
    }

    #[test]
    fn test_cv_rejects_translation() {
        let el = parse(r#"<name code="x" codeSystem="1.2.3"><translation code="y"/></name>"#);
        assert!(Cv::from_xml(&el).is_err());
    }

    #[test]
    fn test_decode_ed_defaults() {
        let el = parse(r#"<text>hello</text>"#);
        let ed = Ed::from_xml(&el).unwrap();
        assert_eq!(ed.media_type, "text/plain");
        assert_eq!(ed.representation, BinaryDataEncoding::Txt);
        assert_eq!(ed.text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_decode_tel_use_set() {
        let el = parse(r#"<telecom value="tel:(555)555-2003" use="HP EC"/>"#);
        let tel = Tel::from_xml(&el).unwrap();
        assert_eq!(
            tel.use_codes,
            vec![
                TelecommunicationAddressUse::Hp,
                TelecommunicationAddressUse::Ec
            ]
        );
    }

    #[test]
    fn test_decode_tel_empty_use_set() {
        let el = parse(r#"<telecom value="tel:(555)555-2003" use=""/>"#);
        assert!(Tel::from_xml(&el).unwrap().use_codes.is_empty());
    }

    #[test]
    fn test_decode_ad() {
        let el = parse(
            r#"<addr use="HP">
                 <streetAddressLine>1004 Healthcare Dr.</streetAddressLine>
                 <city>Portland</city>
                 <state>OR</state>
                 <postalCode>97266</postalCode>
               </addr>"#,
        );
        let ad = Ad::from_xml(&el).unwrap();
        assert_eq!(ad.use_codes, vec![PostalAddressUse::Hp]);
        assert_eq!(ad.parts.len(), 4);
        assert_eq!(
            ad.part(crate::vocab::AddressPartType::Cty),
            Some("Portland")
        );
    }

    #[test]
    fn test_decode_en_with_qualifier() {
        let el = parse(
            r#"<name use="L"><given>Henry</given><family>Levin</family><suffix qualifier="NB">the 7th</suffix></name>"#,
        );
        let en = En::from_xml(&el).unwrap();
        assert_eq!(en.use_codes, vec![EntityNameUse::L]);
        assert_eq!(en.parts.len(), 3);
        assert!(matches!(
            &en.parts[2],
            NamePart::Part { qualifiers, .. } if qualifiers == &vec![EntityNamePartQualifier::Nb]
        ));
    }

    #[test]
    fn test_decode_qty_by_xsi_type() {
        let el = parse(
            r#"<numerator xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="PQ" value="600" unit="mg"/>"#,
        );
        let qty = Qty::from_xml(&el).unwrap();
        assert!(matches!(qty, Qty::Pq(ref pq) if pq.unit == "mg"));

        let el = parse(r#"<numerator value="600"/>"#);
        assert!(Qty::from_xml(&el).is_err());
    }

    #[test]
    fn test_decode_ivl_ts() {
        let el = parse(r#"<effectiveTime><low value="20230801"/><high value="20230831"/></effectiveTime>"#);
        let ivl = IvlTs::from_xml(&el).unwrap();
        assert!(matches!(ivl.bounds, Some(IvlTsBounds::LowHigh { .. })));

        let el = parse(r#"<effectiveTime value="20230817"/>"#);
        let ivl = IvlTs::from_xml(&el).unwrap();
        assert!(ivl.bounds.is_none());
        assert_eq!(ivl.value.unwrap().as_str(), "20230817");
    }

    #[test]
    fn test_decode_ivl_conflicting_bounds() {
        let el = parse(
            r#"<effectiveTime><low value="20230801"/><high value="20230831"/><width value="30" unit="d"/></effectiveTime>"#,
        );
        assert!(IvlTs::from_xml(&el).is_err());
    }

    #[test]
    fn test_decode_pivl() {
        let el = parse(
            r#"<effectiveTime xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="PIVL_TS" institutionSpecified="true"><period value="6" unit="h"/></effectiveTime>"#,
        );
        let expr = TimeExpression::from_xml(&el).unwrap();
        match expr {
            TimeExpression::Periodic(pivl) => {
                assert!(pivl.institution_specified);
                assert_eq!(pivl.period.unwrap().unit, "h");
            }
            other => panic!("expected periodic, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_inclusive_default() {
        let el = parse(r#"<low value="20230801" inclusive="false"/>"#);
        assert!(!IvxbTs::from_xml(&el).unwrap().inclusive);
        let el = parse(r#"<low value="20230801"/>"#);
        assert!(IvxbTs::from_xml(&el).unwrap().inclusive);
    }
}
