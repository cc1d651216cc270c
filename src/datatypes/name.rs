//! Entity names (EN, ENXP, PN, ON, TN)
//!
//! Like addresses, names are mixed content: free text interleaved with
//! typed parts (`family`, `given`, `prefix`, `suffix`). PN, ON and TN
//! are schema restrictions of EN; their constructors reject the part
//! kinds the restriction forbids instead of carrying fixed fields.

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::meta::{ClassMeta, FieldMeta, Occurs};
use crate::vocab::{EntityNamePartQualifier, EntityNamePartType, EntityNameUse, NullFlavor};

use super::time::IvlTs;

/// One piece of a name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePart {
    /// Free text between part elements
    Text(String),
    /// A typed part (ENXP)
    Part {
        /// What the part is
        kind: EntityNamePartType,
        /// The part's text
        value: String,
        /// Qualifiers (space-separated set on the wire)
        qualifiers: Vec<EntityNamePartQualifier>,
    },
}

impl NamePart {
    /// A typed part without qualifiers
    pub fn part(kind: EntityNamePartType, value: impl Into<String>) -> Self {
        NamePart::Part {
            kind,
            value: value.into(),
            qualifiers: Vec::new(),
        }
    }

    /// A family name part
    pub fn family(value: impl Into<String>) -> Self {
        Self::part(EntityNamePartType::Fam, value)
    }

    /// A given name part
    pub fn given(value: impl Into<String>) -> Self {
        Self::part(EntityNamePartType::Giv, value)
    }

    /// The part's text regardless of form
    pub fn text(&self) -> &str {
        match self {
            NamePart::Text(t) => t,
            NamePart::Part { value, .. } => value,
        }
    }

    /// The wire element name for a typed part
    pub fn element_name(kind: EntityNamePartType) -> &'static str {
        match kind {
            EntityNamePartType::Fam => "family",
            EntityNamePartType::Giv => "given",
            EntityNamePartType::Pfx => "prefix",
            EntityNamePartType::Sfx => "suffix",
            EntityNamePartType::Del => "delimiter",
        }
    }

    /// The part type a wire element name maps to
    pub fn kind_for_element(name: &str) -> Option<EntityNamePartType> {
        let kind = match name {
            "family" => EntityNamePartType::Fam,
            "given" => EntityNamePartType::Giv,
            "prefix" => EntityNamePartType::Pfx,
            "suffix" => EntityNamePartType::Sfx,
            "delimiter" => EntityNamePartType::Del,
            _ => return None,
        };
        Some(kind)
    }
}

/// Entity name (EN)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct En {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// Ordered name pieces
    pub parts: Vec<NamePart>,
    /// Use codes (space-separated set on the wire)
    pub use_codes: Vec<EntityNameUse>,
    /// Period during which the name was in use
    pub valid_time: Option<IvlTs>,
}

impl En {
    /// A name from its parts
    pub fn from_parts(parts: Vec<NamePart>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    /// A null name with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            ..Self::default()
        }
    }

    /// Add a use code
    pub fn with_use(mut self, use_code: EntityNameUse) -> Self {
        self.use_codes.push(use_code);
        self
    }

    /// The first part of the given kind
    pub fn part(&self, kind: EntityNamePartType) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            NamePart::Part { kind: k, value, .. } if *k == kind => Some(value.as_str()),
            _ => None,
        })
    }

    /// Binding metadata for EN
    pub fn meta() -> &'static ClassMeta {
        &EN_META
    }
}

/// Person name (PN): an EN whose parts carry no nobility qualifier
/// restrictions beyond EN's own; structurally identical, kept distinct
/// for the schema's restriction
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pn(pub En);

impl Pn {
    /// A person name from its parts
    pub fn from_parts(parts: Vec<NamePart>) -> Self {
        Self(En::from_parts(parts))
    }

    /// The classic given/family construction
    pub fn given_family(given: impl Into<String>, family: impl Into<String>) -> Self {
        Self::from_parts(vec![NamePart::given(given), NamePart::family(family)])
    }
}

/// Organization name (ON): an EN without person parts
///
/// Construction rejects family and given parts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct On(pub(crate) En);

impl On {
    /// An organization name from its parts
    pub fn from_parts(parts: Vec<NamePart>) -> Result<Self> {
        for part in &parts {
            if let NamePart::Part { kind, .. } = part {
                if matches!(kind, EntityNamePartType::Fam | EntityNamePartType::Giv) {
                    return Err(Error::Value(format!(
                        "organization names cannot carry {} parts",
                        kind
                    )));
                }
            }
        }
        Ok(Self(En::from_parts(parts)))
    }

    /// An organization name from plain text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(En::from_parts(vec![NamePart::Text(text.into())]))
    }

    /// The wrapped name
    pub fn as_en(&self) -> &En {
        &self.0
    }

    /// Consume into the wrapped name
    pub fn into_en(self) -> En {
        self.0
    }
}

/// Trivial name (TN): a single text run and nothing else
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Tn {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The name text
    pub value: Option<String>,
}

impl Tn {
    /// A trivial name
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            null_flavor: None,
            value: Some(value.into()),
        }
    }
}

impl From<Tn> for En {
    fn from(tn: Tn) -> Self {
        En {
            null_flavor: tn.null_flavor,
            parts: tn.value.into_iter().map(NamePart::Text).collect(),
            ..En::default()
        }
    }
}

static EN_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "EN",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("use"),
            FieldMeta::element("validTime", Occurs::optional()),
            FieldMeta::text(),
            FieldMeta::wildcard(),
        ],
    )
});

super::impl_any_value!(En, Tn);

impl crate::datatypes::AnyValue for Pn {
    fn null_flavor(&self) -> Option<NullFlavor> {
        self.0.null_flavor
    }
}

impl crate::datatypes::AnyValue for On {
    fn null_flavor(&self) -> Option<NullFlavor> {
        self.0.null_flavor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name() {
        let pn = Pn::given_family("Henry", "Levin");
        assert_eq!(pn.0.part(EntityNamePartType::Giv), Some("Henry"));
        assert_eq!(pn.0.part(EntityNamePartType::Fam), Some("Levin"));
    }

    #[test]
    fn test_suffix_with_qualifier() {
        let en = En::from_parts(vec![
            NamePart::given("Henry"),
            NamePart::family("Levin"),
            NamePart::Part {
                kind: EntityNamePartType::Sfx,
                value: "the 7th".to_string(),
                qualifiers: vec![EntityNamePartQualifier::Nb],
            },
        ]);
        assert_eq!(en.part(EntityNamePartType::Sfx), Some("the 7th"));
    }

    #[test]
    fn test_organization_rejects_person_parts() {
        assert!(On::from_parts(vec![NamePart::family("Levin")]).is_err());
        let on = On::from_text("Good Health Clinic");
        assert_eq!(on.as_en().parts.len(), 1);
    }

    #[test]
    fn test_trivial_name_widens() {
        let en: En = Tn::new("GHC").into();
        assert_eq!(en.parts, vec![NamePart::Text("GHC".to_string())]);
    }

    #[test]
    fn test_element_names() {
        for kind in EntityNamePartType::ALL {
            let name = NamePart::element_name(*kind);
            assert_eq!(NamePart::kind_for_element(name), Some(*kind));
        }
    }
}
