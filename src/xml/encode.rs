//! Encoding datatypes to the element tree
//!
//! Encoders omit what the defaults supply: an attribute equal to its
//! schema default is not written, empty optional content is skipped,
//! and set-valued attributes join their codes with single spaces. A
//! null value serializes as its `nullFlavor` attribute alone.

use base64::Engine;

use crate::datatypes::{
    Ad, AddressPart, Bl, Cd, Ce, Cr, Cs, Cv, Ed, EivlTs, En, Ii, Int, IvlPq, IvlPqBounds, IvlTs,
    IvlTsBounds, IvxbPq, IvxbTs, Mo, NamePart, On, PivlTs, Pn, Pq, PqR, Qty, Real, Rto, Sc, St,
    SxcmTs, Tel, TimeExpression, Tn, Ts,
};
use crate::error::{Error, Result};
use crate::namespaces::QName;
use crate::vocab::{BinaryDataEncoding, NullFlavor, SetOperator};
use crate::xml::reader::Element;

/// Encoding to an XML element
pub trait ToXml {
    /// Encode the value as an element with the given name
    fn to_xml(&self, name: &str) -> Result<Element>;
}

fn null_element(name: &str, flavor: NullFlavor) -> Element {
    let mut el = Element::hl7(name);
    el.set_attribute("nullFlavor", flavor.as_str());
    el
}

fn set_opt(el: &mut Element, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        el.set_attribute(name, value);
    }
}

fn set_bool(el: &mut Element, name: &str, value: Option<bool>) {
    if let Some(value) = value {
        el.set_attribute(name, if value { "true" } else { "false" });
    }
}

fn set_code_set<T: Copy>(el: &mut Element, name: &str, codes: &[T], as_str: fn(&T) -> &'static str)
{
    if !codes.is_empty() {
        let joined = codes.iter().map(as_str).collect::<Vec<_>>().join(" ");
        el.set_attribute(name, joined);
    }
}

fn set_xsi_type(el: &mut Element, type_name: &str) {
    el.set_attribute_qname(
        QName::namespaced(crate::XSI_NAMESPACE, "type"),
        type_name,
    );
}

fn set_operator(el: &mut Element, operator: SetOperator) {
    if operator != SetOperator::I {
        el.set_attribute("operator", operator.as_str());
    }
}

impl ToXml for Bl {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_bool(&mut el, "value", self.value);
        Ok(el)
    }
}

impl ToXml for Ii {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_opt(&mut el, "root", self.root.as_deref());
        set_opt(&mut el, "extension", self.extension.as_deref());
        set_opt(
            &mut el,
            "assigningAuthorityName",
            self.assigning_authority_name.as_deref(),
        );
        set_bool(&mut el, "displayable", self.displayable);
        Ok(el)
    }
}

impl ToXml for Cs {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_opt(&mut el, "code", self.code.as_deref());
        Ok(el)
    }
}

fn encode_coded_attrs(
    el: &mut Element,
    code: Option<&str>,
    code_system: Option<&str>,
    code_system_name: Option<&str>,
    code_system_version: Option<&str>,
    display_name: Option<&str>,
) {
    set_opt(el, "code", code);
    set_opt(el, "codeSystem", code_system);
    set_opt(el, "codeSystemName", code_system_name);
    set_opt(el, "codeSystemVersion", code_system_version);
    set_opt(el, "displayName", display_name);
}

impl ToXml for Cd {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        encode_coded_attrs(
            &mut el,
            self.code.as_deref(),
            self.code_system.as_deref(),
            self.code_system_name.as_deref(),
            self.code_system_version.as_deref(),
            self.display_name.as_deref(),
        );
        if let Some(ref text) = self.original_text {
            el.add_child(text.to_xml("originalText")?);
        }
        for qualifier in &self.qualifiers {
            el.add_child(qualifier.to_xml("qualifier")?);
        }
        for translation in &self.translations {
            el.add_child(translation.to_xml("translation")?);
        }
        Ok(el)
    }
}

impl ToXml for Ce {
    fn to_xml(&self, name: &str) -> Result<Element> {
        Cd::from(self.clone()).to_xml(name)
    }
}

impl ToXml for Cv {
    fn to_xml(&self, name: &str) -> Result<Element> {
        Cd::from(self.clone()).to_xml(name)
    }
}

impl ToXml for Cr {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        if self.inverted {
            el.set_attribute("inverted", "true");
        }
        if let Some(ref role_name) = self.name {
            el.add_child(role_name.to_xml("name")?);
        }
        if let Some(ref value) = self.value {
            el.add_child(value.to_xml("value")?);
        }
        Ok(el)
    }
}

impl ToXml for St {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_opt(&mut el, "language", self.language.as_deref());
        if let Some(ref value) = self.value {
            el.add_text(value);
        }
        Ok(el)
    }
}

impl ToXml for Sc {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_opt(&mut el, "language", self.language.as_deref());
        set_opt(&mut el, "code", self.code.as_deref());
        set_opt(&mut el, "codeSystem", self.code_system.as_deref());
        set_opt(&mut el, "codeSystemName", self.code_system_name.as_deref());
        set_opt(&mut el, "displayName", self.display_name.as_deref());
        if let Some(ref value) = self.value {
            el.add_text(value);
        }
        Ok(el)
    }
}

impl ToXml for Ed {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        if self.media_type != "text/plain" {
            el.set_attribute("mediaType", &self.media_type);
        }
        set_opt(&mut el, "language", self.language.as_deref());
        if let Some(compression) = self.compression {
            el.set_attribute("compression", compression.as_str());
        }
        if let Some(ref check) = self.integrity_check {
            el.set_attribute(
                "integrityCheck",
                base64::engine::general_purpose::STANDARD.encode(check),
            );
        }
        if let Some(algorithm) = self.integrity_check_algorithm {
            el.set_attribute("integrityCheckAlgorithm", algorithm.as_str());
        }
        if self.representation != BinaryDataEncoding::Txt {
            el.set_attribute("representation", self.representation.as_str());
        }
        if let Some(ref reference) = self.reference {
            el.add_child(reference.to_xml("reference")?);
        }
        if let Some(ref thumbnail) = self.thumbnail {
            el.add_child(thumbnail.to_xml("thumbnail")?);
        }
        if let Some(ref text) = self.text {
            el.add_text(text);
        }
        Ok(el)
    }
}

impl ToXml for Tel {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        if let Some(ref value) = self.value {
            el.set_attribute("value", value.as_str());
        }
        set_code_set(&mut el, "use", &self.use_codes, |u| u.as_str());
        for period in &self.useable_period {
            el.add_child(period.to_xml("useablePeriod")?);
        }
        Ok(el)
    }
}

impl ToXml for Ad {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_code_set(&mut el, "use", &self.use_codes, |u| u.as_str());
        set_bool(&mut el, "isNotOrdered", self.is_not_ordered);
        for part in &self.parts {
            match part {
                AddressPart::Text(text) => el.add_text(text),
                AddressPart::Part { kind, value } => {
                    let part_name = AddressPart::element_name(*kind).ok_or_else(|| {
                        Error::Encode(format!(
                            "Address part type {} has no dedicated element",
                            kind
                        ))
                    })?;
                    let mut part_el = Element::hl7(part_name);
                    part_el.add_text(value);
                    el.add_child(part_el);
                }
            }
        }
        for period in &self.useable_period {
            el.add_child(period.to_xml("useablePeriod")?);
        }
        Ok(el)
    }
}

impl ToXml for En {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_code_set(&mut el, "use", &self.use_codes, |u| u.as_str());
        for part in &self.parts {
            match part {
                NamePart::Text(text) => el.add_text(text),
                NamePart::Part {
                    kind,
                    value,
                    qualifiers,
                } => {
                    let mut part_el = Element::hl7(NamePart::element_name(*kind));
                    set_code_set(&mut part_el, "qualifier", qualifiers, |q| q.as_str());
                    part_el.add_text(value);
                    el.add_child(part_el);
                }
            }
        }
        if let Some(ref valid_time) = self.valid_time {
            el.add_child(valid_time.to_xml("validTime")?);
        }
        Ok(el)
    }
}

impl ToXml for Pn {
    fn to_xml(&self, name: &str) -> Result<Element> {
        self.0.to_xml(name)
    }
}

impl ToXml for On {
    fn to_xml(&self, name: &str) -> Result<Element> {
        self.as_en().to_xml(name)
    }
}

impl ToXml for Tn {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        if let Some(ref value) = self.value {
            el.add_text(value);
        }
        Ok(el)
    }
}

impl ToXml for Int {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        if let Some(value) = self.value {
            el.set_attribute("value", value.to_string());
        }
        Ok(el)
    }
}

impl ToXml for Real {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        if let Some(value) = self.value {
            el.set_attribute("value", value.to_string());
        }
        Ok(el)
    }
}

fn encode_pq_attrs(el: &mut Element, pq: &Pq) {
    if let Some(value) = pq.value {
        el.set_attribute("value", value.to_string());
    }
    if pq.unit != "1" {
        el.set_attribute("unit", &pq.unit);
    }
}

impl ToXml for Pq {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        encode_pq_attrs(&mut el, self);
        for translation in &self.translations {
            el.add_child(translation.to_xml("translation")?);
        }
        Ok(el)
    }
}

impl ToXml for PqR {
    fn to_xml(&self, name: &str) -> Result<Element> {
        let mut el = self.coding.to_xml(name)?;
        if let Some(value) = self.value {
            el.set_attribute("value", value.to_string());
        }
        Ok(el)
    }
}

impl ToXml for Mo {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        if let Some(value) = self.value {
            el.set_attribute("value", value.to_string());
        }
        set_opt(&mut el, "currency", self.currency.as_deref());
        Ok(el)
    }
}

impl ToXml for Qty {
    fn to_xml(&self, name: &str) -> Result<Element> {
        let mut el = match self {
            Qty::Int(int) => int.to_xml(name)?,
            Qty::Real(real) => real.to_xml(name)?,
            Qty::Pq(pq) => pq.to_xml(name)?,
            Qty::Mo(mo) => mo.to_xml(name)?,
        };
        set_xsi_type(&mut el, self.type_name());
        Ok(el)
    }
}

impl ToXml for Rto {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        el.add_child(self.numerator.to_xml("numerator")?);
        el.add_child(self.denominator.to_xml("denominator")?);
        Ok(el)
    }
}

impl ToXml for Ts {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        if let Some(ref value) = self.value {
            el.set_attribute("value", value.as_str());
        }
        Ok(el)
    }
}

impl ToXml for SxcmTs {
    fn to_xml(&self, name: &str) -> Result<Element> {
        let mut el = self.ts.to_xml(name)?;
        if self.ts.null_flavor.is_none() {
            set_operator(&mut el, self.operator);
        }
        Ok(el)
    }
}

impl ToXml for IvxbTs {
    fn to_xml(&self, name: &str) -> Result<Element> {
        let mut el = self.ts.to_xml(name)?;
        if self.ts.null_flavor.is_none() && !self.inclusive {
            el.set_attribute("inclusive", "false");
        }
        Ok(el)
    }
}

impl ToXml for IvxbPq {
    fn to_xml(&self, name: &str) -> Result<Element> {
        let mut el = self.pq.to_xml(name)?;
        if self.pq.null_flavor.is_none() && !self.inclusive {
            el.set_attribute("inclusive", "false");
        }
        Ok(el)
    }
}

impl ToXml for IvlTs {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_operator(&mut el, self.operator);
        if let Some(ref value) = self.value {
            el.set_attribute("value", value.as_str());
        }
        match &self.bounds {
            None => {}
            Some(IvlTsBounds::Low(low)) => el.add_child(low.to_xml("low")?),
            Some(IvlTsBounds::LowHigh { low, high }) => {
                el.add_child(low.to_xml("low")?);
                el.add_child(high.to_xml("high")?);
            }
            Some(IvlTsBounds::LowWidth { low, width }) => {
                el.add_child(low.to_xml("low")?);
                el.add_child(width.to_xml("width")?);
            }
            Some(IvlTsBounds::High(high)) => el.add_child(high.to_xml("high")?),
            Some(IvlTsBounds::Width(width)) => el.add_child(width.to_xml("width")?),
            Some(IvlTsBounds::Center(center)) => el.add_child(center.to_xml("center")?),
            Some(IvlTsBounds::CenterWidth { center, width }) => {
                el.add_child(center.to_xml("center")?);
                el.add_child(width.to_xml("width")?);
            }
        }
        Ok(el)
    }
}

impl ToXml for IvlPq {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_operator(&mut el, self.operator);
        match &self.bounds {
            None => {}
            Some(IvlPqBounds::Low(low)) => el.add_child(low.to_xml("low")?),
            Some(IvlPqBounds::LowHigh { low, high }) => {
                el.add_child(low.to_xml("low")?);
                el.add_child(high.to_xml("high")?);
            }
            Some(IvlPqBounds::LowWidth { low, width }) => {
                el.add_child(low.to_xml("low")?);
                el.add_child(width.to_xml("width")?);
            }
            Some(IvlPqBounds::High(high)) => el.add_child(high.to_xml("high")?),
            Some(IvlPqBounds::Width(width)) => el.add_child(width.to_xml("width")?),
            Some(IvlPqBounds::Center(center)) => el.add_child(center.to_xml("center")?),
            Some(IvlPqBounds::CenterWidth { center, width }) => {
                el.add_child(center.to_xml("center")?);
                el.add_child(width.to_xml("width")?);
            }
        }
        Ok(el)
    }
}

impl ToXml for PivlTs {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_operator(&mut el, self.operator);
        if let Some(alignment) = self.alignment {
            el.set_attribute("alignment", alignment.as_str());
        }
        if self.institution_specified {
            el.set_attribute("institutionSpecified", "true");
        }
        if let Some(ref phase) = self.phase {
            el.add_child(phase.to_xml("phase")?);
        }
        if let Some(ref period) = self.period {
            el.add_child(period.to_xml("period")?);
        }
        Ok(el)
    }
}

impl ToXml for EivlTs {
    fn to_xml(&self, name: &str) -> Result<Element> {
        if let Some(flavor) = self.null_flavor {
            return Ok(null_element(name, flavor));
        }
        let mut el = Element::hl7(name);
        set_operator(&mut el, self.operator);
        if let Some(ref event) = self.event {
            el.add_child(event.to_xml("event")?);
        }
        if let Some(ref offset) = self.offset {
            el.add_child(offset.to_xml("offset")?);
        }
        Ok(el)
    }
}

impl ToXml for TimeExpression {
    fn to_xml(&self, name: &str) -> Result<Element> {
        let mut el = match self {
            TimeExpression::Point(point) => point.to_xml(name)?,
            TimeExpression::Interval(interval) => interval.to_xml(name)?,
            TimeExpression::Periodic(periodic) => periodic.to_xml(name)?,
            TimeExpression::EventRelated(event) => event.to_xml(name)?,
        };
        set_xsi_type(&mut el, self.type_name());
        Ok(el)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::TsValue;
    use crate::xml::writer::to_string;

    #[test]
    fn test_encode_ii() {
        let id = Ii::with_extension("2.16.840.1.113883.19.5", "42");
        let xml = to_string(&id.to_xml("id").unwrap()).unwrap();
        assert_eq!(
            xml,
            r#"<id xmlns="urn:hl7-org:v3" root="2.16.840.1.113883.19.5" extension="42"/>"#
        );
    }

    #[test]
    fn test_encode_null_is_flavor_alone() {
        let id = Ii::null(NullFlavor::Unk);
        let xml = to_string(&id.to_xml("id").unwrap()).unwrap();
        assert_eq!(xml, r#"<id xmlns="urn:hl7-org:v3" nullFlavor="UNK"/>"#);
    }

    #[test]
    fn test_encode_defaults_omitted() {
        let pq = Pq::dimensionless(rust_decimal::Decimal::from(5));
        let xml = to_string(&pq.to_xml("quantity").unwrap()).unwrap();
        assert_eq!(xml, r#"<quantity xmlns="urn:hl7-org:v3" value="5"/>"#);

        let ed = Ed::plain("note");
        let xml = to_string(&ed.to_xml("text").unwrap()).unwrap();
        assert_eq!(xml, r#"<text xmlns="urn:hl7-org:v3">note</text>"#);
    }

    #[test]
    fn test_encode_use_set_joined() {
        let tel = Tel::phone("(555)555-2003")
            .unwrap()
            .with_use(crate::vocab::TelecommunicationAddressUse::Hp)
            .with_use(crate::vocab::TelecommunicationAddressUse::Ec);
        let el = tel.to_xml("telecom").unwrap();
        assert_eq!(el.attribute("use"), Some("HP EC"));
    }

    #[test]
    fn test_encode_qty_sets_xsi_type() {
        let qty = Qty::Pq(Pq::new(rust_decimal::Decimal::from(600), "mg"));
        let el = qty.to_xml("numerator").unwrap();
        assert_eq!(el.attribute_ns(crate::XSI_NAMESPACE, "type"), Some("PQ"));
    }

    #[test]
    fn test_encode_ivl_ts_point() {
        let ivl = IvlTs::point(TsValue::parse("20230817").unwrap());
        let xml = to_string(&ivl.to_xml("effectiveTime").unwrap()).unwrap();
        assert_eq!(
            xml,
            r#"<effectiveTime xmlns="urn:hl7-org:v3" value="20230817"/>"#
        );
    }

    #[test]
    fn test_encode_unmappable_address_part() {
        let ad = Ad::from_parts(vec![AddressPart::part(
            crate::vocab::AddressPartType::Al,
            "somewhere",
        )]);
        assert!(matches!(ad.to_xml("addr"), Err(Error::Encode(_))));
    }
}
