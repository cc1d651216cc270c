//! XML namespace handling
//!
//! This module provides utilities for working with XML namespaces,
//! qualified names (QNames), namespace prefix mappings, and the NCName
//! checks the narrative block needs for its ID attributes.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName in the HL7 v3 namespace
    pub fn hl7(local_name: impl Into<String>) -> Self {
        Self::namespaced(crate::HL7_V3_NAMESPACE, local_name)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace context for resolving prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: HashMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self {
            prefixes: HashMap::new(),
            default_namespace: None,
        }
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Number of declarations held by this context
    pub fn len(&self) -> usize {
        self.prefixes.len() + usize::from(self.default_namespace.is_some())
    }

    /// True when no declarations are present
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a prefixed name to a QName
    pub fn resolve(&self, prefixed_name: &str) -> Result<QName> {
        if let Some((prefix, local)) = prefixed_name.split_once(':') {
            let namespace = self
                .get_namespace(prefix)
                .ok_or_else(|| Error::Namespace(format!("Unknown prefix: {}", prefix)))?;
            Ok(QName::namespaced(namespace, local))
        } else {
            Ok(QName::new(self.default_namespace.clone(), prefixed_name))
        }
    }
}

impl Default for NamespaceContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a string is a valid NCName (non-colonized name)
///
/// Narrative IDs and IDREFs are NCName-typed in the schema.
pub fn is_valid_ncname(name: &str) -> bool {
    if name.is_empty() || name.contains(':') {
        return false;
    }

    name.chars()
        .next()
        .map(|c| c.is_alphabetic() || c == '_')
        .unwrap_or(false)
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid NCName: '{}'", name)))
    }
}

/// Split a prefixed name into prefix and local name
pub fn split_prefixed(name: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = name.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qname_creation() {
        let qname = QName::hl7("observation");
        assert_eq!(qname.namespace.as_deref(), Some(crate::HL7_V3_NAMESPACE));
        assert_eq!(qname.local_name, "observation");
    }

    #[test]
    fn test_qname_display() {
        let qname = QName::namespaced("urn:hl7-org:v3", "id");
        assert_eq!(qname.to_string(), "{urn:hl7-org:v3}id");

        let qname_local = QName::local("id");
        assert_eq!(qname_local.to_string(), "id");
    }

    #[test]
    fn test_namespace_context() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xsi", crate::XSI_NAMESPACE);
        ctx.set_default_namespace(crate::HL7_V3_NAMESPACE);

        assert_eq!(ctx.get_namespace("xsi"), Some(crate::XSI_NAMESPACE));
        assert_eq!(ctx.get_default_namespace(), Some(crate::HL7_V3_NAMESPACE));
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_resolve_prefixed_name() {
        let mut ctx = NamespaceContext::new();
        ctx.add_prefix("xsi", crate::XSI_NAMESPACE);

        let qname = ctx.resolve("xsi:type").unwrap();
        assert_eq!(qname.namespace.as_deref(), Some(crate::XSI_NAMESPACE));
        assert_eq!(qname.local_name, "type");

        assert!(ctx.resolve("unknown:type").is_err());
    }

    #[test]
    fn test_ncname() {
        assert!(is_valid_ncname("fn-1"));
        assert!(is_valid_ncname("_tbl"));
        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("1st"));
        assert!(!is_valid_ncname("a:b"));
    }
}
