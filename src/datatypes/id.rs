//! Instance identifiers (II)

use crate::meta::{ClassMeta, Facets, FieldMeta, UID_FACET};
use crate::vocab::NullFlavor;
use once_cell::sync::Lazy;

/// Instance identifier (II)
///
/// A globally unique identifier: an OID, UUID or reserved identifier in
/// `root`, optionally scoped by an `extension` the assigning authority
/// chooses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ii {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// Unique root (OID, UUID or reserved identifier)
    pub root: Option<String>,
    /// Identifier within the root's scope
    pub extension: Option<String>,
    /// Human-readable name of the assigning authority
    pub assigning_authority_name: Option<String>,
    /// Whether the identifier is intended for human eyes
    pub displayable: Option<bool>,
}

impl Ii {
    /// Identifier consisting of a root alone
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Identifier with a root and an extension
    pub fn with_extension(root: impl Into<String>, extension: impl Into<String>) -> Self {
        Self {
            root: Some(root.into()),
            extension: Some(extension.into()),
            ..Self::default()
        }
    }

    /// A null identifier with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            ..Self::default()
        }
    }

    /// Binding metadata for II
    pub fn meta() -> &'static ClassMeta {
        &II_META
    }
}

static II_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "II",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("root").with_facets(Facets {
                pattern: Some(UID_FACET.clone()),
                ..Facets::default()
            }),
            FieldMeta::attribute("extension"),
            FieldMeta::attribute("assigningAuthorityName"),
            FieldMeta::attribute("displayable"),
        ],
    )
});

super::impl_any_value!(Ii);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::AnyValue;

    #[test]
    fn test_construction() {
        let id = Ii::with_extension("2.16.840.1.113883.19.5", "42");
        assert_eq!(id.root.as_deref(), Some("2.16.840.1.113883.19.5"));
        assert_eq!(id.extension.as_deref(), Some("42"));
        assert!(!id.is_null());
    }

    #[test]
    fn test_null() {
        let id = Ii::null(NullFlavor::Nav);
        assert!(id.is_null());
        assert!(id.root.is_none());
    }

    #[test]
    fn test_meta() {
        let meta = Ii::meta();
        assert_eq!(meta.name, "II");
        let root = meta.field("root").unwrap();
        assert!(root.facets.as_ref().unwrap().pattern.is_some());
        assert_eq!(meta.attributes().count(), 5);
        assert_eq!(meta.elements().count(), 0);
    }
}
