//! XML serialization of element trees
//!
//! Writes an [`Element`] tree back to XML with quick-xml. The HL7 v3
//! namespace is declared once as the default namespace on the root;
//! `xsi` is declared there too when the tree uses it. Output is compact
//! by default; indentation is available but reflows mixed content, so
//! narrative blocks should be written compact.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::xml::reader::{Element, Node};

/// XML writer configuration
#[derive(Debug, Clone)]
pub struct XmlWriter {
    /// Spaces per indent level, None for compact output
    indent: Option<usize>,
    /// Whether to emit an XML declaration
    declaration: bool,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self {
            indent: None,
            declaration: true,
        }
    }
}

impl XmlWriter {
    /// A compact writer with an XML declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent nested elements by the given number of spaces
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    /// Suppress the XML declaration
    pub fn without_declaration(mut self) -> Self {
        self.declaration = false;
        self
    }

    /// Serialize an element tree to a string
    ///
    /// The element is written as the document root with the namespace
    /// declarations the tree needs.
    pub fn write_document(&self, root: &Element) -> Result<String> {
        let mut writer = match self.indent {
            Some(n) => Writer::new_with_indent(Vec::new(), b' ', n),
            None => Writer::new(Vec::new()),
        };

        if self.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(|e| Error::Encode(format!("Failed to write declaration: {}", e)))?;
        }

        let uses_xsi = tree_uses_namespace(root, crate::XSI_NAMESPACE);
        write_element(&mut writer, root, true, uses_xsi)?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Encode(format!("Output is not UTF-8: {}", e)))
    }
}

/// Serialize an element tree without a declaration, compact
pub fn to_string(root: &Element) -> Result<String> {
    XmlWriter::new().without_declaration().write_document(root)
}

fn tree_uses_namespace(el: &Element, namespace: &str) -> bool {
    el.attributes
        .keys()
        .any(|qname| qname.namespace.as_deref() == Some(namespace))
        || el.child_elements().any(|c| tree_uses_namespace(c, namespace))
}

fn serialized_name(el: &Element) -> Result<String> {
    match el.namespace() {
        None | Some(crate::HL7_V3_NAMESPACE) => Ok(el.local_name().to_string()),
        Some(ns) => Err(Error::Encode(format!(
            "Element '{}' is in unexpected namespace '{}'",
            el.local_name(),
            ns
        ))),
    }
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    el: &Element,
    is_root: bool,
    declare_xsi: bool,
) -> Result<()> {
    let name = serialized_name(el)?;
    let mut start = BytesStart::new(name.as_str());

    if is_root {
        if el.namespace() == Some(crate::HL7_V3_NAMESPACE) {
            start.push_attribute(("xmlns", crate::HL7_V3_NAMESPACE));
        }
        if declare_xsi {
            start.push_attribute(("xmlns:xsi", crate::XSI_NAMESPACE));
        }
    }

    for (qname, value) in &el.attributes {
        let attr_name = match qname.namespace.as_deref() {
            None => qname.local_name.clone(),
            Some(crate::XSI_NAMESPACE) => format!("xsi:{}", qname.local_name),
            Some(crate::XML_NAMESPACE) => format!("xml:{}", qname.local_name),
            Some(ns) => {
                return Err(Error::Encode(format!(
                    "Attribute '{}' is in unexpected namespace '{}'",
                    qname.local_name, ns
                )))
            }
        };
        start.push_attribute((attr_name.as_str(), value.as_str()));
    }

    if el.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Encode(format!("Failed to write element: {}", e)))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Encode(format!("Failed to write element: {}", e)))?;

    for node in &el.children {
        match node {
            Node::Element(child) => write_element(writer, child, false, false)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(|e| Error::Encode(format!("Failed to write text: {}", e)))?,
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(name.as_str())))
        .map_err(|e| Error::Encode(format!("Failed to write element: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::reader::Document;

    #[test]
    fn test_write_empty_element() {
        let mut el = Element::hl7("id");
        el.set_attribute("root", "1.2.3");
        let xml = XmlWriter::new().write_document(&el).unwrap();
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?><id xmlns="urn:hl7-org:v3" root="1.2.3"/>"#
        );
    }

    #[test]
    fn test_write_text_is_escaped() {
        let mut el = Element::hl7("t");
        el.add_text("a & b < c");
        let xml = to_string(&el).unwrap();
        assert_eq!(xml, r#"<t xmlns="urn:hl7-org:v3">a &amp; b &lt; c</t>"#);
    }

    #[test]
    fn test_xsi_declared_when_used() {
        let mut el = Element::hl7("value");
        el.set_attribute_qname(
            crate::namespaces::QName::namespaced(crate::XSI_NAMESPACE, "type"),
            "PQ",
        );
        el.set_attribute("value", "88");
        let xml = to_string(&el).unwrap();
        assert!(xml.contains(r#"xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance""#));
        assert!(xml.contains(r#"xsi:type="PQ""#));
    }

    #[test]
    fn test_round_trip_through_reader() {
        let source = r#"<paragraph xmlns="urn:hl7-org:v3">before <content>middle</content> after</paragraph>"#;
        let doc = Document::from_str(source).unwrap();
        let xml = to_string(doc.root().unwrap()).unwrap();
        assert_eq!(xml, source);
    }
}
