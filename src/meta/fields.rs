//! Field and class binding metadata
//!
//! Each bound type carries a table describing how its fields map to
//! XML: serialized name, element/attribute kind, namespace, occurrence
//! bounds and lexical facets. The tables drive validation and the
//! strict-content checks of the decoders.

use crate::meta::facets::Facets;
use crate::meta::occurs::Occurs;

/// How a field is serialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Child element
    Element,
    /// Attribute on the owning element
    Attribute,
    /// Character content of the owning element
    Text,
    /// Any foreign-namespace content (ignored on decode)
    Wildcard,
}

/// Binding metadata for one field
#[derive(Debug, Clone)]
pub struct FieldMeta {
    /// Serialized name (element or attribute local name)
    pub name: &'static str,
    /// How the field is serialized
    pub kind: FieldKind,
    /// Namespace URI (None for unqualified attributes)
    pub namespace: Option<&'static str>,
    /// Occurrence bounds
    pub occurs: Occurs,
    /// Whether the field is required
    pub required: bool,
    /// Fixed or defaulted lexical value, if any
    pub default: Option<&'static str>,
    /// Lexical facets applying to the field's value
    pub facets: Option<Facets>,
}

impl FieldMeta {
    /// Element field with the given occurrence bounds
    pub fn element(name: &'static str, occurs: Occurs) -> Self {
        Self {
            name,
            kind: FieldKind::Element,
            namespace: Some(crate::HL7_V3_NAMESPACE),
            occurs,
            required: occurs.min > 0,
            default: None,
            facets: None,
        }
    }

    /// Unqualified attribute field
    pub fn attribute(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Attribute,
            namespace: None,
            occurs: Occurs::optional(),
            required: false,
            default: None,
            facets: None,
        }
    }

    /// Character content field
    pub fn text() -> Self {
        Self {
            name: "$",
            kind: FieldKind::Text,
            namespace: None,
            occurs: Occurs::optional(),
            required: false,
            default: None,
            facets: None,
        }
    }

    /// Wildcard field for open content
    ///
    /// Mixed-content types (AD, EN) admit part elements the table does
    /// not enumerate individually; their decoders recognize them by
    /// wire name.
    pub fn wildcard() -> Self {
        Self {
            name: "*",
            kind: FieldKind::Wildcard,
            namespace: None,
            occurs: Occurs::zero_or_more(),
            required: false,
            default: None,
            facets: None,
        }
    }

    /// Mark the field required
    pub fn required(mut self) -> Self {
        self.required = true;
        if self.occurs.min == 0 {
            self.occurs.min = 1;
        }
        self
    }

    /// Attach a default value
    pub fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    /// Attach facets
    pub fn with_facets(mut self, facets: Facets) -> Self {
        self.facets = Some(facets);
        self
    }

    /// Check an occurrence count against the bounds
    pub fn check_count(&self, count: u32) -> Result<(), crate::error::ValidationError> {
        if self.occurs.is_missing(count) {
            Err(crate::error::ValidationError::new(format!(
                "'{}' occurs {} time(s), at least {} required",
                self.name, count, self.occurs.min
            ))
            .with_field(self.name))
        } else if self.occurs.is_exceeded(count) {
            let max = self.occurs.max.unwrap_or(u32::MAX);
            Err(crate::error::ValidationError::new(format!(
                "'{}' occurs {} time(s), at most {} allowed",
                self.name, count, max
            ))
            .with_field(self.name))
        } else {
            Ok(())
        }
    }
}

/// Binding metadata for one bound type
#[derive(Debug, Clone)]
pub struct ClassMeta {
    /// Type name as the schema spells it
    pub name: &'static str,
    /// Target namespace of the type's elements
    pub namespace: Option<&'static str>,
    /// Ordered field table
    pub fields: Vec<FieldMeta>,
}

impl ClassMeta {
    /// Create a class meta in the HL7 v3 namespace
    pub fn hl7(name: &'static str, fields: Vec<FieldMeta>) -> Self {
        Self {
            name,
            namespace: Some(crate::HL7_V3_NAMESPACE),
            fields,
        }
    }

    /// Look up a field by serialized name
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Look up a field by serialized name and kind
    pub fn field_of_kind(&self, name: &str, kind: FieldKind) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name && f.kind == kind)
    }

    /// Iterate over attribute fields
    pub fn attributes(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Attribute)
    }

    /// Iterate over element fields
    pub fn elements(&self) -> impl Iterator<Item = &FieldMeta> {
        self.fields.iter().filter(|f| f.kind == FieldKind::Element)
    }
}
