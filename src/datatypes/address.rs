//! Postal address (AD, ADXP)
//!
//! An address is mixed content: free text interleaved with typed part
//! elements (`streetAddressLine`, `city`, ...). Parts are kept as one
//! ordered list of a sum type, so document order survives round trips.

use once_cell::sync::Lazy;

use crate::meta::{ClassMeta, FieldMeta, Occurs};
use crate::vocab::{AddressPartType, NullFlavor, PostalAddressUse};

use super::time::SxcmTs;

/// One piece of an address
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressPart {
    /// Free text between part elements
    Text(String),
    /// A typed part (ADXP)
    Part {
        /// What the part is
        kind: AddressPartType,
        /// The part's text
        value: String,
    },
}

impl AddressPart {
    /// A typed part
    pub fn part(kind: AddressPartType, value: impl Into<String>) -> Self {
        AddressPart::Part {
            kind,
            value: value.into(),
        }
    }

    /// The part's text regardless of form
    pub fn text(&self) -> &str {
        match self {
            AddressPart::Text(t) => t,
            AddressPart::Part { value, .. } => value,
        }
    }

    /// The wire element name for a typed part
    ///
    /// None for the part types the document schema gives no dedicated
    /// element (AL, INT); such parts cannot be encoded.
    pub fn element_name(kind: AddressPartType) -> Option<&'static str> {
        let name = match kind {
            AddressPartType::Al | AddressPartType::Int => return None,
            AddressPartType::Adl => "additionalLocator",
            AddressPartType::Unid => "unitID",
            AddressPartType::Unit => "unitType",
            AddressPartType::Dal => "deliveryAddressLine",
            AddressPartType::Dinst => "deliveryInstallationType",
            AddressPartType::Dinsta => "deliveryInstallationArea",
            AddressPartType::Dinstq => "deliveryInstallationQualifier",
            AddressPartType::Dmod => "deliveryMode",
            AddressPartType::Dmodid => "deliveryModeIdentifier",
            AddressPartType::Sal => "streetAddressLine",
            AddressPartType::Bnr => "houseNumber",
            AddressPartType::Bnn => "houseNumberNumeric",
            AddressPartType::Bns => "buildingNumberSuffix",
            AddressPartType::Str => "streetName",
            AddressPartType::Stb => "streetNameBase",
            AddressPartType::Sttyp => "streetNameType",
            AddressPartType::Dir => "direction",
            AddressPartType::Car => "careOf",
            AddressPartType::Cen => "censusTract",
            AddressPartType::Cnt => "country",
            AddressPartType::Cpa => "county",
            AddressPartType::Cty => "city",
            AddressPartType::Del => "delimiter",
            AddressPartType::Pob => "postBox",
            AddressPartType::Pre => "precinct",
            AddressPartType::Sta => "state",
            AddressPartType::Zip => "postalCode",
        };
        Some(name)
    }

    /// The part type a wire element name maps to
    pub fn kind_for_element(name: &str) -> Option<AddressPartType> {
        let kind = match name {
            "additionalLocator" => AddressPartType::Adl,
            "unitID" => AddressPartType::Unid,
            "unitType" => AddressPartType::Unit,
            "deliveryAddressLine" => AddressPartType::Dal,
            "deliveryInstallationType" => AddressPartType::Dinst,
            "deliveryInstallationArea" => AddressPartType::Dinsta,
            "deliveryInstallationQualifier" => AddressPartType::Dinstq,
            "deliveryMode" => AddressPartType::Dmod,
            "deliveryModeIdentifier" => AddressPartType::Dmodid,
            "streetAddressLine" => AddressPartType::Sal,
            "houseNumber" => AddressPartType::Bnr,
            "houseNumberNumeric" => AddressPartType::Bnn,
            "buildingNumberSuffix" => AddressPartType::Bns,
            "streetName" => AddressPartType::Str,
            "streetNameBase" => AddressPartType::Stb,
            "streetNameType" => AddressPartType::Sttyp,
            "direction" => AddressPartType::Dir,
            "careOf" => AddressPartType::Car,
            "censusTract" => AddressPartType::Cen,
            "country" => AddressPartType::Cnt,
            "county" => AddressPartType::Cpa,
            "city" => AddressPartType::Cty,
            "delimiter" => AddressPartType::Del,
            "postBox" => AddressPartType::Pob,
            "precinct" => AddressPartType::Pre,
            "state" => AddressPartType::Sta,
            "postalCode" => AddressPartType::Zip,
            _ => return None,
        };
        Some(kind)
    }
}

/// Postal address (AD)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ad {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// Ordered address pieces
    pub parts: Vec<AddressPart>,
    /// Use codes (space-separated set on the wire)
    pub use_codes: Vec<PostalAddressUse>,
    /// Whether part order is not significant
    pub is_not_ordered: Option<bool>,
    /// Periods during which the address is usable
    pub useable_period: Vec<SxcmTs>,
}

impl Ad {
    /// An address from its parts
    pub fn from_parts(parts: Vec<AddressPart>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    /// A null address with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            ..Self::default()
        }
    }

    /// Add a use code
    pub fn with_use(mut self, use_code: PostalAddressUse) -> Self {
        self.use_codes.push(use_code);
        self
    }

    /// The first part of the given kind
    pub fn part(&self, kind: AddressPartType) -> Option<&str> {
        self.parts.iter().find_map(|p| match p {
            AddressPart::Part { kind: k, value } if *k == kind => Some(value.as_str()),
            _ => None,
        })
    }

    /// Binding metadata for AD
    pub fn meta() -> &'static ClassMeta {
        &AD_META
    }
}

static AD_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "AD",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("use"),
            FieldMeta::attribute("isNotOrdered"),
            FieldMeta::element("useablePeriod", Occurs::zero_or_more()),
            FieldMeta::text(),
            FieldMeta::wildcard(),
        ],
    )
});

super::impl_any_value!(Ad);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parts_keep_order() {
        let ad = Ad::from_parts(vec![
            AddressPart::part(AddressPartType::Sal, "1004 Healthcare Dr."),
            AddressPart::part(AddressPartType::Cty, "Portland"),
            AddressPart::part(AddressPartType::Sta, "OR"),
            AddressPart::part(AddressPartType::Zip, "97266"),
        ]);
        assert_eq!(ad.part(AddressPartType::Cty), Some("Portland"));
        assert_eq!(ad.parts[0].text(), "1004 Healthcare Dr.");
    }

    #[test]
    fn test_element_name_round_trip() {
        for kind in AddressPartType::ALL {
            if let Some(name) = AddressPart::element_name(*kind) {
                assert_eq!(AddressPart::kind_for_element(name), Some(*kind));
            }
        }
        assert_eq!(AddressPart::kind_for_element("bogus"), None);
        assert_eq!(AddressPart::element_name(AddressPartType::Al), None);
    }

    #[test]
    fn test_mixed_text() {
        let ad = Ad::from_parts(vec![
            AddressPart::Text("c/o ".to_string()),
            AddressPart::part(AddressPartType::Car, "Ward 3"),
        ]);
        assert_eq!(ad.parts.len(), 2);
        assert_eq!(ad.parts[1].text(), "Ward 3");
    }
}
