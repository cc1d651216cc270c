//! Integration tests for datatype decoding, encoding and validation

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use cdatypes::datatypes::{
    Ad, Cd, Ed, En, Ii, IvlTs, IvlTsBounds, Pq, Qty, Rto, Tel, TimeExpression, Ts,
};
use cdatypes::validate::Validate;
use cdatypes::vocab::{NullFlavor, PostalAddressUse, SetOperator};
use cdatypes::xml::{to_string, Document, FromXml, ToXml};

fn decode<T: FromXml>(xml: &str) -> T {
    let doc = Document::from_str(xml).unwrap();
    T::from_xml(doc.root().unwrap()).unwrap()
}

fn round_trip<T: FromXml + ToXml + PartialEq + std::fmt::Debug>(xml: &str, name: &str) {
    let first: T = decode(xml);
    let encoded = to_string(&first.to_xml(name).unwrap()).unwrap();
    let doc = Document::from_str(&encoded).unwrap();
    let second = T::from_xml(doc.root().unwrap()).unwrap();
    assert_eq!(first, second, "value changed across {}", encoded);
}

#[test]
fn decodes_clinical_document_header_ids() {
    let id: Ii = decode(r#"<id root="2.16.840.1.113883.19.5" extension="996-756-495"/>"#);
    assert_eq!(id.root.as_deref(), Some("2.16.840.1.113883.19.5"));
    assert!(id.validate().is_ok());
}

#[test]
fn decodes_loinc_code_with_translation() {
    let cd: Cd = decode(
        r#"<code code="34133-9" codeSystem="2.16.840.1.113883.6.1"
               codeSystemName="LOINC" displayName="Summarization of episode note">
             <originalText>Discharge summary</originalText>
             <translation code="DS" codeSystem="2.16.840.1.113883.19"/>
           </code>"#,
    );
    assert_eq!(cd.code_system_name.as_deref(), Some("LOINC"));
    assert_eq!(
        cd.original_text.as_ref().unwrap().text.as_deref(),
        Some("Discharge summary")
    );
    assert_eq!(cd.translations.len(), 1);
    assert!(cd.validate().is_ok());
}

#[test]
fn null_flavored_value_round_trips() {
    let xml = r#"<effectiveTime nullFlavor="UNK"/>"#;
    let ivl: IvlTs = decode(xml);
    assert_eq!(ivl.null_flavor, Some(NullFlavor::Unk));
    assert!(ivl.bounds.is_none());
    round_trip::<IvlTs>(xml, "effectiveTime");
}

#[test]
fn effective_time_interval_round_trips() {
    round_trip::<IvlTs>(
        r#"<effectiveTime><low value="20230801"/><high value="20230831" inclusive="false"/></effectiveTime>"#,
        "effectiveTime",
    );
}

#[test]
fn dose_quantity_round_trips() {
    round_trip::<Pq>(r#"<doseQuantity value="1.5" unit="mg"/>"#, "doseQuantity");
}

#[test]
fn address_mixed_content_round_trips() {
    round_trip::<Ad>(
        r#"<addr use="HP"><streetAddressLine>1004 Healthcare Dr.</streetAddressLine><city>Portland</city><state>OR</state><postalCode>97266</postalCode></addr>"#,
        "addr",
    );
}

#[test]
fn person_name_round_trips() {
    round_trip::<En>(
        r#"<name use="L"><prefix>Dr.</prefix><given>Henry</given><family>Seven</family></name>"#,
        "name",
    );
}

#[test]
fn telecom_round_trips() {
    round_trip::<Tel>(r#"<telecom value="tel:(555)555-1003" use="HP"/>"#, "telecom");
}

#[test]
fn encoded_defaults_are_elided() {
    let ed: Ed = decode(r#"<text representation="TXT" mediaType="text/plain">note</text>"#);
    let xml = to_string(&ed.to_xml("text").unwrap()).unwrap();
    assert_eq!(xml, r#"<text xmlns="urn:hl7-org:v3">note</text>"#);
}

#[test]
fn ratio_requires_xsi_type() {
    let rto: Rto = decode(
        r#"<ratio xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
             <numerator xsi:type="PQ" value="600" unit="mg"/>
             <denominator xsi:type="PQ" value="5" unit="mL"/>
           </ratio>"#,
    );
    assert!(matches!(*rto.numerator, Qty::Pq(ref pq) if pq.unit == "mg"));
    assert!(rto.validate().is_ok());

    let encoded = to_string(&rto.to_xml("ratio").unwrap()).unwrap();
    assert!(encoded.contains(r#"xsi:type="PQ""#));
}

#[test]
fn dosing_schedule_decodes_as_time_expression() {
    let expr: TimeExpression = decode(
        r#"<effectiveTime xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
               xsi:type="PIVL_TS" operator="A" institutionSpecified="true">
             <period value="6" unit="h"/>
           </effectiveTime>"#,
    );
    assert_eq!(expr.operator(), SetOperator::A);
    match expr {
        TimeExpression::Periodic(ref pivl) => {
            assert_eq!(pivl.period.as_ref().unwrap().value, Some(Decimal::from(6)));
        }
        ref other => panic!("expected a periodic interval, got {:?}", other),
    }
}

#[test]
fn timestamp_precision_survives_round_trip() {
    for lexical in ["2023", "202308", "20230817", "20230817123000-0500"] {
        let ts = Ts::from_str(lexical).unwrap();
        let xml = to_string(&ts.to_xml("time").unwrap()).unwrap();
        assert!(xml.contains(&format!(r#"value="{}""#, lexical)));
    }
}

#[test]
fn invalid_timestamp_is_rejected() {
    let doc = Document::from_str(r#"<time value="2023-08-17"/>"#).unwrap();
    assert!(Ts::from_xml(doc.root().unwrap()).is_err());
}

#[test]
fn interval_bound_order_is_validated() {
    let ivl: IvlTs = decode(
        r#"<effectiveTime><low value="20231001"/><high value="20230901"/></effectiveTime>"#,
    );
    assert!(matches!(ivl.bounds, Some(IvlTsBounds::LowHigh { .. })));
    let errors = ivl.validate().unwrap_err();
    assert!(errors[0].message.contains("low is after its high"));
}

#[test]
fn unknown_hl7_content_is_rejected_foreign_is_ignored() {
    let doc = Document::from_str(r#"<id root="1.2.3" mystery="?"/>"#).unwrap();
    assert!(Ii::from_xml(doc.root().unwrap()).is_err());

    let doc = Document::from_str(
        r#"<id xmlns:ext="urn:example:ext" root="1.2.3" ext:flag="true"/>"#,
    )
    .unwrap();
    assert!(Ii::from_xml(doc.root().unwrap()).is_ok());
}

#[test]
fn postal_address_use_codes_parse_as_set() {
    let ad: Ad = decode(r#"<addr use="HP PST"><city>Portland</city></addr>"#);
    assert_eq!(
        ad.use_codes,
        vec![PostalAddressUse::Hp, PostalAddressUse::Pst]
    );
}
