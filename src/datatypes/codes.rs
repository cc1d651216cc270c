//! Coded value datatypes (CD, CE, CV, CS, CR)
//!
//! The schema derives CE, CV and CS from CD by restriction, each
//! dropping fields. Here every narrowing is its own struct, with
//! widening `From` conversions back up the chain.

use crate::meta::{ClassMeta, Facets, FieldMeta, Occurs, CS_FACET, UID_FACET};
use crate::vocab::NullFlavor;
use once_cell::sync::Lazy;

use super::text::Ed;

/// Concept descriptor (CD)
///
/// A code from a code system, with optional qualifiers and translations
/// into other code systems.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cd {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The code
    pub code: Option<String>,
    /// OID of the code system
    pub code_system: Option<String>,
    /// Human-readable code system name
    pub code_system_name: Option<String>,
    /// Code system version
    pub code_system_version: Option<String>,
    /// Display name for the code
    pub display_name: Option<String>,
    /// The text this code was derived from
    pub original_text: Option<Ed>,
    /// Qualifiers refining the concept
    pub qualifiers: Vec<Cr>,
    /// The same concept in other code systems
    pub translations: Vec<Cd>,
}

impl Cd {
    /// A code in a code system
    pub fn new(code: impl Into<String>, code_system: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            code_system: Some(code_system.into()),
            ..Self::default()
        }
    }

    /// Attach a display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// A null concept with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            ..Self::default()
        }
    }

    /// Binding metadata for CD
    pub fn meta() -> &'static ClassMeta {
        &CD_META
    }
}

/// Coded with equivalents (CE): CD without qualifiers
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ce {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The code
    pub code: Option<String>,
    /// OID of the code system
    pub code_system: Option<String>,
    /// Human-readable code system name
    pub code_system_name: Option<String>,
    /// Code system version
    pub code_system_version: Option<String>,
    /// Display name for the code
    pub display_name: Option<String>,
    /// The text this code was derived from
    pub original_text: Option<Ed>,
    /// The same concept in other code systems
    pub translations: Vec<Cd>,
}

impl Ce {
    /// A code in a code system
    pub fn new(code: impl Into<String>, code_system: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            code_system: Some(code_system.into()),
            ..Self::default()
        }
    }

    /// A null value with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            ..Self::default()
        }
    }

    /// Binding metadata for CE
    pub fn meta() -> &'static ClassMeta {
        &CE_META
    }
}

/// Coded value (CV): CE without translations
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cv {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The code
    pub code: Option<String>,
    /// OID of the code system
    pub code_system: Option<String>,
    /// Human-readable code system name
    pub code_system_name: Option<String>,
    /// Code system version
    pub code_system_version: Option<String>,
    /// Display name for the code
    pub display_name: Option<String>,
    /// The text this code was derived from
    pub original_text: Option<Ed>,
}

impl Cv {
    /// A code in a code system
    pub fn new(code: impl Into<String>, code_system: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            code_system: Some(code_system.into()),
            ..Self::default()
        }
    }

    /// Binding metadata for CV
    pub fn meta() -> &'static ClassMeta {
        &CV_META
    }
}

/// Coded simple value (CS)
///
/// Only the code is carried; the code system is fixed by the context
/// the value appears in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cs {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The code
    pub code: Option<String>,
}

impl Cs {
    /// A bare code
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            null_flavor: None,
            code: Some(code.into()),
        }
    }

    /// Binding metadata for CS
    pub fn meta() -> &'static ClassMeta {
        &CS_META
    }
}

/// Concept role (CR)
///
/// A qualifier on a CD: a named role and the concept filling it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cr {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The role name
    pub name: Option<Cv>,
    /// The concept filling the role
    pub value: Option<Cd>,
    /// Whether the role's sense is inverted
    pub inverted: bool,
}

impl Cr {
    /// A named qualifier
    pub fn new(name: Cv, value: Cd) -> Self {
        Self {
            null_flavor: None,
            name: Some(name),
            value: Some(value),
            inverted: false,
        }
    }

    /// Binding metadata for CR
    pub fn meta() -> &'static ClassMeta {
        &CR_META
    }
}

impl From<Cv> for Ce {
    fn from(cv: Cv) -> Self {
        Self {
            null_flavor: cv.null_flavor,
            code: cv.code,
            code_system: cv.code_system,
            code_system_name: cv.code_system_name,
            code_system_version: cv.code_system_version,
            display_name: cv.display_name,
            original_text: cv.original_text,
            translations: Vec::new(),
        }
    }
}

impl From<Ce> for Cd {
    fn from(ce: Ce) -> Self {
        Self {
            null_flavor: ce.null_flavor,
            code: ce.code,
            code_system: ce.code_system,
            code_system_name: ce.code_system_name,
            code_system_version: ce.code_system_version,
            display_name: ce.display_name,
            original_text: ce.original_text,
            qualifiers: Vec::new(),
            translations: ce.translations,
        }
    }
}

impl From<Cv> for Cd {
    fn from(cv: Cv) -> Self {
        Cd::from(Ce::from(cv))
    }
}

fn coded_attribute_fields() -> Vec<FieldMeta> {
    vec![
        FieldMeta::attribute("nullFlavor"),
        FieldMeta::attribute("code").with_facets(Facets {
            pattern: Some(CS_FACET.clone()),
            ..Facets::default()
        }),
        FieldMeta::attribute("codeSystem").with_facets(Facets {
            pattern: Some(UID_FACET.clone()),
            ..Facets::default()
        }),
        FieldMeta::attribute("codeSystemName"),
        FieldMeta::attribute("codeSystemVersion"),
        FieldMeta::attribute("displayName"),
    ]
}

static CD_META: Lazy<ClassMeta> = Lazy::new(|| {
    let mut fields = coded_attribute_fields();
    fields.push(FieldMeta::element("originalText", Occurs::optional()));
    fields.push(FieldMeta::element("qualifier", Occurs::zero_or_more()));
    fields.push(FieldMeta::element("translation", Occurs::zero_or_more()));
    ClassMeta::hl7("CD", fields)
});

static CE_META: Lazy<ClassMeta> = Lazy::new(|| {
    let mut fields = coded_attribute_fields();
    fields.push(FieldMeta::element("originalText", Occurs::optional()));
    fields.push(FieldMeta::element("translation", Occurs::zero_or_more()));
    ClassMeta::hl7("CE", fields)
});

static CV_META: Lazy<ClassMeta> = Lazy::new(|| {
    let mut fields = coded_attribute_fields();
    fields.push(FieldMeta::element("originalText", Occurs::optional()));
    ClassMeta::hl7("CV", fields)
});

static CS_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "CS",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("code").with_facets(Facets {
                pattern: Some(CS_FACET.clone()),
                ..Facets::default()
            }),
        ],
    )
});

static CR_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "CR",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("inverted").with_default("false"),
            FieldMeta::element("name", Occurs::optional()),
            FieldMeta::element("value", Occurs::optional()),
        ],
    )
});

super::impl_any_value!(Cd, Ce, Cv, Cs, Cr);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::AnyValue;

    #[test]
    fn test_construction() {
        let cd = Cd::new("11450-4", "2.16.840.1.113883.6.1").with_display_name("Problem list");
        assert_eq!(cd.code.as_deref(), Some("11450-4"));
        assert_eq!(cd.display_name.as_deref(), Some("Problem list"));
        assert!(cd.translations.is_empty());
    }

    #[test]
    fn test_widening() {
        let cv = Cv::new("completed", "2.16.840.1.113883.5.14");
        let ce: Ce = cv.clone().into();
        assert_eq!(ce.code, cv.code);
        let cd: Cd = cv.into();
        assert_eq!(cd.code.as_deref(), Some("completed"));
        assert!(cd.qualifiers.is_empty());
    }

    #[test]
    fn test_null_excludes_content() {
        let cd = Cd::null(NullFlavor::Oth);
        assert!(cd.is_null());
        assert!(cd.code.is_none());
    }

    #[test]
    fn test_metas_mirror_restriction() {
        assert!(Cd::meta().field("qualifier").is_some());
        assert!(Ce::meta().field("qualifier").is_none());
        assert!(Ce::meta().field("translation").is_some());
        assert!(Cv::meta().field("translation").is_none());
        assert!(Cs::meta().field("codeSystem").is_none());
        assert_eq!(Cr::meta().field("inverted").unwrap().default, Some("false"));
    }
}
