//! JSON conversion
//!
//! Converts decoded element trees to JSON for inspection and the CLI:
//! attributes are prefixed with `@`, character content lives under `$`,
//! and repeated child elements collapse into arrays. An element with
//! nothing but text becomes a plain JSON string.

use serde_json::{Map, Value as JsonValue};

use crate::error::Result;
use crate::xml::encode::ToXml;
use crate::xml::reader::{Element, Node};

/// Attribute key prefix in converted output
const ATTR_PREFIX: &str = "@";

/// Key for character content in converted output
const TEXT_KEY: &str = "$";

/// Convert an element tree to a JSON value
pub fn element_to_json(el: &Element) -> JsonValue {
    let mut map = Map::new();

    for (qname, value) in &el.attributes {
        let key = match qname.namespace.as_deref() {
            Some(crate::XSI_NAMESPACE) => format!("{}xsi:{}", ATTR_PREFIX, qname.local_name),
            Some(crate::XML_NAMESPACE) => format!("{}xml:{}", ATTR_PREFIX, qname.local_name),
            _ => format!("{}{}", ATTR_PREFIX, qname.local_name),
        };
        map.insert(key, JsonValue::String(value.clone()));
    }

    let mut text = String::new();
    for node in &el.children {
        match node {
            Node::Text(t) => text.push_str(t),
            Node::Element(child) => {
                let key = child.local_name().to_string();
                let value = element_to_json(child);
                match map.get_mut(&key) {
                    None => {
                        map.insert(key, value);
                    }
                    Some(JsonValue::Array(existing)) => existing.push(value),
                    Some(existing) => {
                        let first = existing.take();
                        *existing = JsonValue::Array(vec![first, value]);
                    }
                }
            }
        }
    }

    let has_text = !text.trim().is_empty();
    if map.is_empty() {
        return if has_text {
            JsonValue::String(text)
        } else {
            JsonValue::Object(map)
        };
    }
    if has_text {
        map.insert(TEXT_KEY.to_string(), JsonValue::String(text));
    }

    JsonValue::Object(map)
}

/// Convert any encodable value to JSON under the given element name
pub fn to_json<T: ToXml>(value: &T, name: &str) -> Result<JsonValue> {
    let el = value.to_xml(name)?;
    let mut map = Map::new();
    map.insert(name.to_string(), element_to_json(&el));
    Ok(JsonValue::Object(map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::Ii;
    use crate::xml::reader::Document;

    #[test]
    fn test_attributes_prefixed() {
        let doc = Document::from_str(r#"<id root="1.2.3" extension="42"/>"#).unwrap();
        let json = element_to_json(doc.root().unwrap());
        assert_eq!(json["@root"], "1.2.3");
        assert_eq!(json["@extension"], "42");
    }

    #[test]
    fn test_text_only_element_is_string() {
        let doc = Document::from_str(r#"<city>Portland</city>"#).unwrap();
        let json = element_to_json(doc.root().unwrap());
        assert_eq!(json, serde_json::json!("Portland"));
    }

    #[test]
    fn test_mixed_gets_text_key() {
        let doc = Document::from_str(r#"<text language="en">note</text>"#).unwrap();
        let json = element_to_json(doc.root().unwrap());
        assert_eq!(json["@language"], "en");
        assert_eq!(json["$"], "note");
    }

    #[test]
    fn test_repeats_become_arrays() {
        let doc = Document::from_str(
            r#"<code><translation code="a"/><translation code="b"/></code>"#,
        )
        .unwrap();
        let json = element_to_json(doc.root().unwrap());
        let translations = json["translation"].as_array().unwrap();
        assert_eq!(translations.len(), 2);
        assert_eq!(translations[1]["@code"], "b");
    }

    #[test]
    fn test_to_json_wraps_root() {
        let id = Ii::with_extension("2.16.840.1.113883.19.5", "42");
        let json = to_json(&id, "id").unwrap();
        assert_eq!(json["id"]["@extension"], "42");
    }
}
