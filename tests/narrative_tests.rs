//! Integration tests for the narrative block

use cdatypes::narrative::{CellKind, Item, ListType, Text};
use cdatypes::validate::Validate;
use cdatypes::xml::{to_string, Document, FromXml, ToXml};

const SECTION_TEXT: &str = include_str!("fixtures/section_text.xml");

fn parse_fixture() -> Text {
    let doc = Document::from_str(SECTION_TEXT).unwrap();
    Text::from_xml(doc.root().unwrap()).unwrap()
}

#[test]
fn fixture_structure() {
    let text = parse_fixture();
    assert_eq!(text.items.len(), 4);
    assert!(matches!(text.items[0], Item::Paragraph(_)));
    assert!(matches!(text.items[1], Item::List(_)));
    assert!(matches!(text.items[2], Item::Table(_)));
    assert!(matches!(text.items[3], Item::Paragraph(_)));
}

#[test]
fn fixture_validates() {
    assert!(parse_fixture().validate().is_ok());
}

#[test]
fn list_contents() {
    let text = parse_fixture();
    let Item::List(list) = &text.items[1] else {
        panic!("expected a list");
    };
    assert_eq!(list.list_type, ListType::Ordered);
    assert!(list.caption.is_some());
    assert_eq!(list.items.len(), 2);
    assert!(matches!(&list.items[0].items[0], Item::Chars(t) if t == "Theodur 200mg BID"));
}

#[test]
fn table_contents() {
    let text = parse_fixture();
    let Item::Table(table) = &text.items[2] else {
        panic!("expected a table");
    };
    assert_eq!(table.border.as_deref(), Some("1"));
    let head = table.head.as_ref().unwrap();
    assert_eq!(head.rows[0].cells.len(), 3);
    assert_eq!(head.rows[0].cells[0].kind, CellKind::Header);
    assert_eq!(table.bodies[0].rows.len(), 2);
    assert_eq!(table.bodies[0].rows[1].cells[2].kind, CellKind::Data);
}

#[test]
fn plain_text_flattens_blocks() {
    let text = parse_fixture();
    let plain = text.plain_text();
    assert!(plain.contains("Patient is a 67 year old male"));
    assert!(plain.contains("asthma"));
    assert!(plain.contains("Theodur 200mg BID Proventil inhaler 2 puffs QID PRN"));
    assert!(plain.contains("Body weight 88 kg"));
}

#[test]
fn multimedia_references_collected() {
    let text = parse_fixture();
    assert_eq!(text.referenced_objects(), vec!["MM1"]);
}

#[test]
fn fixture_survives_round_trip() {
    let text = parse_fixture();
    let encoded = to_string(&text.to_xml("text").unwrap()).unwrap();
    let doc = Document::from_str(&encoded).unwrap();
    let again = Text::from_xml(doc.root().unwrap()).unwrap();
    assert_eq!(text, again);
}

#[test]
fn revision_marks_decode() {
    let doc = Document::from_str(
        r#"<text><content revised="delete">Theodur 200mg BID</content><content revised="insert">Theodur 300mg BID</content></text>"#,
    )
    .unwrap();
    let text = Text::from_xml(doc.root().unwrap()).unwrap();
    assert_eq!(text.items.len(), 2);
    let Item::Content(first) = &text.items[0] else {
        panic!("expected content");
    };
    assert_eq!(
        first.revised,
        Some(cdatypes::narrative::Revised::Delete)
    );
}

#[test]
fn narrative_media_type_is_checked() {
    let doc =
        Document::from_str(r#"<text mediaType="text/x-hl7-text+xml"><paragraph>ok</paragraph></text>"#)
            .unwrap();
    assert!(Text::from_xml(doc.root().unwrap()).is_ok());

    let doc = Document::from_str(r#"<text mediaType="text/html"/>"#).unwrap();
    assert!(Text::from_xml(doc.root().unwrap()).is_err());
}
