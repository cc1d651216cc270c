//! XML document tree
//!
//! A small namespace-aware element tree read with quick-xml. Mixed
//! content is preserved in order: an element's children are a sequence
//! of child elements and character runs, which the narrative block
//! depends on.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::namespaces::{NamespaceContext, QName};
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One node of element content
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A child element
    Element(Element),
    /// A character run
    Text(String),
}

/// XML element in the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Element attributes in document order
    pub attributes: IndexMap<QName, String>,
    /// Child nodes in document order
    pub children: Vec<Node>,
    /// Namespace declarations made on this element
    pub namespaces: NamespaceContext,
}

impl Element {
    /// Create a new element
    pub fn new(qname: QName) -> Self {
        Self {
            qname,
            attributes: IndexMap::new(),
            children: Vec::new(),
            namespaces: NamespaceContext::new(),
        }
    }

    /// Create an element in the HL7 v3 namespace
    pub fn hl7(local_name: impl Into<String>) -> Self {
        Self::new(QName::hl7(local_name))
    }

    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Get an unqualified or same-namespace attribute value by local name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(qname, _)| qname.local_name == name && qname.namespace.is_none())
            .map(|(_, value)| value.as_str())
    }

    /// Get an attribute value by qualified name
    pub fn attribute_qname(&self, qname: &QName) -> Option<&str> {
        self.attributes.get(qname).map(|s| s.as_str())
    }

    /// Get an attribute in a specific namespace by local name
    pub fn attribute_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(qname, _)| {
                qname.local_name == name && qname.namespace.as_deref() == Some(namespace)
            })
            .map(|(_, value)| value.as_str())
    }

    /// Set an unqualified attribute
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(QName::local(name), value.into());
    }

    /// Set an attribute by qualified name
    pub fn set_attribute_qname(&mut self, qname: QName, value: impl Into<String>) {
        self.attributes.insert(qname, value.into());
    }

    /// Add a child element
    pub fn add_child(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Add a character run
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Iterate over child elements
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Child elements with the given local name
    pub fn children_named<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a Element> + use<'a, 'n> {
        self.child_elements().filter(move |el| el.local_name() == name)
    }

    /// First child element with the given local name
    pub fn first_child(&self, name: &str) -> Option<&Element> {
        self.children_named(name).next()
    }

    /// Concatenated direct character content
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let Node::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }

    /// True when the element has neither children nor attributes beyond
    /// whitespace
    pub fn is_effectively_empty(&self) -> bool {
        self.attributes.is_empty()
            && self.children.iter().all(|node| match node {
                Node::Element(_) => false,
                Node::Text(t) => t.trim().is_empty(),
            })
    }
}

/// XML Document representation
#[derive(Debug)]
pub struct Document {
    /// Root element of the document
    pub root: Option<Element>,
}

impl Document {
    /// Parse an XML document from a string with default limits
    pub fn from_str(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes(), &Limits::default())
    }

    /// Parse an XML document from bytes
    pub fn parse(xml: &[u8], limits: &Limits) -> Result<Self> {
        limits.check_size(xml.len())?;

        let mut reader = Reader::from_reader(xml);
        let mut root = None;
        // Each stack entry carries the element and the namespace scope
        // in force for its content.
        let mut stack: Vec<(Element, NamespaceContext)> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let scope = stack
                        .last()
                        .map(|(_, scope)| scope.clone())
                        .unwrap_or_default();
                    let (element, scope) = parse_element(&e, scope, limits)?;
                    limits.check_depth(stack.len() + 1)?;
                    stack.push((element, scope));
                }
                Ok(Event::End(_)) => {
                    if let Some((current, _)) = stack.pop() {
                        if let Some((parent, _)) = stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let scope = stack
                        .last()
                        .map(|(_, scope)| scope.clone())
                        .unwrap_or_default();
                    let (element, _) = parse_element(&e, scope, limits)?;
                    if let Some((parent, _)) = stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some((current, _)) = stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?
                            .to_string();
                        limits.check_text_len(text.len())?;
                        current.add_text(text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some((current, _)) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                        limits.check_text_len(text.len())?;
                        current.add_text(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // Comments, processing instructions, declarations
            }
            buf.clear();
        }

        if root.is_none() {
            return Err(Error::Xml("Document has no root element".to_string()));
        }

        Ok(Document { root })
    }

    /// Get the root element
    pub fn root(&self) -> Option<&Element> {
        self.root.as_ref()
    }

    /// Consume the document, yielding the root element
    pub fn into_root(self) -> Option<Element> {
        self.root
    }
}

/// Parse an element from a start tag, resolving namespaces
fn parse_element(
    start: &BytesStart,
    mut scope: NamespaceContext,
    limits: &Limits,
) -> Result<(Element, NamespaceContext)> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
        .to_string();

    // First pass: namespace declarations, which affect this element's
    // own name resolution.
    let mut decls = 0usize;
    let mut plain_attrs: Vec<(String, String)> = Vec::new();
    let mut declared = NamespaceContext::new();

    for attr_result in start.attributes() {
        let attr =
            attr_result.map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;
        let attr_name = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?
            .to_string();
        let attr_value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
            .to_string();

        if attr_name == "xmlns" {
            scope.set_default_namespace(&attr_value);
            declared.set_default_namespace(&attr_value);
            decls += 1;
        } else if let Some(prefix) = attr_name.strip_prefix("xmlns:") {
            scope.add_prefix(prefix, &attr_value);
            declared.add_prefix(prefix, &attr_value);
            decls += 1;
        } else {
            plain_attrs.push((attr_name, attr_value));
        }
    }

    limits.check_namespaces(decls)?;
    limits.check_attributes(plain_attrs.len())?;

    // Element names take the default namespace; attribute names do not.
    let qname = match name.split_once(':') {
        Some((prefix, local)) => {
            let namespace = scope
                .get_namespace(prefix)
                .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
            QName::namespaced(namespace, local)
        }
        None => QName::new(scope.get_default_namespace(), name.as_str()),
    };

    let mut element = Element::new(qname);
    element.namespaces = declared;

    for (attr_name, attr_value) in plain_attrs {
        let attr_qname = match attr_name.split_once(':') {
            Some(("xml", local)) => QName::namespaced(crate::XML_NAMESPACE, local),
            Some((prefix, local)) => {
                let namespace = scope
                    .get_namespace(prefix)
                    .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
                QName::namespaced(namespace, local)
            }
            None => QName::local(attr_name.as_str()),
        };
        element.attributes.insert(attr_qname, attr_value);
    }

    Ok((element, scope))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_xml() {
        let doc = Document::from_str(r#"<root><child>text</child></root>"#).unwrap();

        let root = doc.root().unwrap();
        assert_eq!(root.local_name(), "root");
        let child = root.first_child("child").unwrap();
        assert_eq!(child.text(), "text");
    }

    #[test]
    fn test_parse_with_attributes() {
        let doc =
            Document::from_str(r#"<id root="2.16.840.1.113883.19.5" extension="42"/>"#).unwrap();

        let root = doc.root().unwrap();
        assert_eq!(root.attribute("root"), Some("2.16.840.1.113883.19.5"));
        assert_eq!(root.attribute("extension"), Some("42"));
    }

    #[test]
    fn test_default_namespace_applies_to_elements_not_attributes() {
        let xml = r#"<observation xmlns="urn:hl7-org:v3" classCode="OBS"><id root="1.2.3"/></observation>"#;
        let doc = Document::from_str(xml).unwrap();

        let root = doc.root().unwrap();
        assert_eq!(root.namespace(), Some(crate::HL7_V3_NAMESPACE));
        assert_eq!(root.attribute("classCode"), Some("OBS"));

        let id = root.first_child("id").unwrap();
        assert_eq!(id.namespace(), Some(crate::HL7_V3_NAMESPACE));
    }

    #[test]
    fn test_prefixed_attribute() {
        let xml = r#"<value xmlns="urn:hl7-org:v3" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="PQ" value="88"/>"#;
        let doc = Document::from_str(xml).unwrap();

        let root = doc.root().unwrap();
        assert_eq!(root.attribute_ns(crate::XSI_NAMESPACE, "type"), Some("PQ"));
        assert_eq!(root.attribute("value"), Some("88"));
    }

    #[test]
    fn test_unknown_prefix_is_error() {
        let err = Document::from_str(r#"<x:root/>"#).unwrap_err();
        assert!(matches!(err, Error::Namespace(_)));
    }

    #[test]
    fn test_mixed_content_order_preserved() {
        let xml = r#"<paragraph>before <content>middle</content> after</paragraph>"#;
        let doc = Document::from_str(xml).unwrap();

        let root = doc.root().unwrap();
        assert_eq!(root.children.len(), 3);
        assert!(matches!(&root.children[0], Node::Text(t) if t == "before "));
        assert!(matches!(&root.children[1], Node::Element(_)));
        assert!(matches!(&root.children[2], Node::Text(t) if t == " after"));
    }

    #[test]
    fn test_depth_limit() {
        let mut xml = String::new();
        for _ in 0..20 {
            xml.push_str("<a>");
        }
        for _ in 0..20 {
            xml.push_str("</a>");
        }
        let limits = Limits {
            max_depth: 10,
            ..Limits::default()
        };
        let err = Document::parse(xml.as_bytes(), &limits).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }

    #[test]
    fn test_no_root_is_error() {
        assert!(Document::from_str("").is_err());
        assert!(Document::from_str("<!-- only a comment -->").is_err());
    }

    #[test]
    fn test_entity_unescaping() {
        let doc = Document::from_str(r#"<t>a &amp; b &lt; c</t>"#).unwrap();
        assert_eq!(doc.root().unwrap().text(), "a & b < c");
    }
}
