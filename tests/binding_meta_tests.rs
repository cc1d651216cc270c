//! The binding metadata model exercised against a non-HL7 schema
//!
//! A hand-built field table for the classic purchase-order schema,
//! checked against a parsed instance. This keeps the metadata layer
//! honest independent of the CDA tables: occurrence bounds, facets and
//! field lookups behave the same for any vocabulary.

use cdatypes::meta::{ClassMeta, Facets, FieldKind, FieldMeta, Occurs, PatternFacet};
use cdatypes::xml::{Document, Element};

const PURCHASE_ORDER: &str = include_str!("fixtures/purchase_order.xml");

fn purchase_order_meta() -> ClassMeta {
    ClassMeta {
        name: "PurchaseOrderType",
        namespace: None,
        fields: vec![
            FieldMeta::attribute("orderDate"),
            FieldMeta::element("shipTo", Occurs::once()),
            FieldMeta::element("billTo", Occurs::once()),
            FieldMeta::element("comment", Occurs::optional()),
            FieldMeta::element("items", Occurs::once()),
        ],
    }
}

fn item_meta() -> ClassMeta {
    ClassMeta {
        name: "ItemType",
        namespace: None,
        fields: vec![
            FieldMeta::attribute("partNum").with_facets(Facets {
                pattern: Some(PatternFacet::new(r"\d{3}-[A-Z]{2}").unwrap()),
                ..Facets::default()
            }),
            FieldMeta::element("productName", Occurs::once()),
            FieldMeta::element("quantity", Occurs::once()),
            FieldMeta::element("USPrice", Occurs::once()),
            FieldMeta::element("comment", Occurs::optional()),
            FieldMeta::element("shipDate", Occurs::optional()),
        ],
    }
}

fn count(el: &Element, name: &str) -> u32 {
    el.children_named(name).count() as u32
}

fn check_occurrences(el: &Element, meta: &ClassMeta) -> Vec<String> {
    meta.elements()
        .filter_map(|field| field.check_count(count(el, field.name)).err())
        .map(|err| err.to_string())
        .collect()
}

#[test]
fn fixture_satisfies_the_field_table() {
    let doc = Document::from_str(PURCHASE_ORDER).unwrap();
    let root = doc.root().unwrap();
    assert_eq!(root.local_name(), "purchaseOrder");

    let problems = check_occurrences(root, &purchase_order_meta());
    assert!(problems.is_empty(), "unexpected problems: {:?}", problems);
}

#[test]
fn items_match_their_facets() {
    let doc = Document::from_str(PURCHASE_ORDER).unwrap();
    let root = doc.root().unwrap();
    let items = root.first_child("items").unwrap();
    let meta = item_meta();
    let part_num_facets = meta.field("partNum").unwrap().facets.as_ref().unwrap();

    let mut seen = 0;
    for item in items.children_named("item") {
        seen += 1;
        assert!(check_occurrences(item, &meta).is_empty());
        let part_num = item.attribute("partNum").unwrap();
        assert!(part_num_facets.check(part_num).is_ok());
    }
    assert_eq!(seen, 2);
}

#[test]
fn missing_required_element_is_reported() {
    let doc = Document::from_str(r#"<purchaseOrder><items/></purchaseOrder>"#).unwrap();
    let problems = check_occurrences(doc.root().unwrap(), &purchase_order_meta());
    // shipTo and billTo are both missing
    assert_eq!(problems.len(), 2);
    assert!(problems[0].contains("at least 1 required"));
}

#[test]
fn repeated_single_element_is_reported() {
    let doc = Document::from_str(
        r#"<purchaseOrder><shipTo/><shipTo/><billTo/><items/></purchaseOrder>"#,
    )
    .unwrap();
    let problems = check_occurrences(doc.root().unwrap(), &purchase_order_meta());
    assert_eq!(problems.len(), 1);
    assert!(problems[0].contains("at most 1 allowed"));
}

#[test]
fn facet_rejects_malformed_part_number() {
    let meta = item_meta();
    let facets = meta.field("partNum").unwrap().facets.as_ref().unwrap();
    assert!(facets.check("872-AA").is_ok());
    assert!(facets.check("872-aa").is_err());
    assert!(facets.check("8-AA").is_err());
}

#[test]
fn field_lookup_by_kind() {
    let meta = purchase_order_meta();
    assert!(meta
        .field_of_kind("orderDate", FieldKind::Attribute)
        .is_some());
    assert!(meta.field_of_kind("orderDate", FieldKind::Element).is_none());
    assert_eq!(meta.attributes().count(), 1);
    assert_eq!(meta.elements().count(), 4);
}
