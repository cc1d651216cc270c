//! Telecommunication address (TEL)

use once_cell::sync::Lazy;
use url::Url;

use crate::error::Result;
use crate::meta::{ClassMeta, FieldMeta, Occurs};
use crate::vocab::{NullFlavor, TelecommunicationAddressUse};

use super::time::SxcmTs;

/// Telecommunication address (TEL)
///
/// A URL a party can be reached at (`tel:`, `mailto:`, `fax:`, `http:`
/// and the like), with use codes and periods of usability.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tel {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The address itself
    pub value: Option<Url>,
    /// Use codes (space-separated set on the wire)
    pub use_codes: Vec<TelecommunicationAddressUse>,
    /// Periods during which the address is usable
    pub useable_period: Vec<SxcmTs>,
}

impl Tel {
    /// An address from a URL string
    pub fn new(value: &str) -> Result<Self> {
        Ok(Self {
            value: Some(Url::parse(value)?),
            ..Self::default()
        })
    }

    /// A telephone number address
    pub fn phone(number: &str) -> Result<Self> {
        Self::new(&format!("tel:{}", number))
    }

    /// An email address
    pub fn email(address: &str) -> Result<Self> {
        Self::new(&format!("mailto:{}", address))
    }

    /// A null address with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            ..Self::default()
        }
    }

    /// Add a use code
    pub fn with_use(mut self, use_code: TelecommunicationAddressUse) -> Self {
        self.use_codes.push(use_code);
        self
    }

    /// Binding metadata for TEL
    pub fn meta() -> &'static ClassMeta {
        &TEL_META
    }
}

static TEL_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "TEL",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("value"),
            FieldMeta::attribute("use"),
            FieldMeta::element("useablePeriod", Occurs::zero_or_more()),
        ],
    )
});

super::impl_any_value!(Tel);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datatypes::AnyValue;

    #[test]
    fn test_phone() {
        let tel = Tel::phone("+1(555)555-1234").unwrap();
        assert_eq!(tel.value.as_ref().unwrap().scheme(), "tel");
    }

    #[test]
    fn test_email_with_use() {
        let tel = Tel::email("info@example.org")
            .unwrap()
            .with_use(TelecommunicationAddressUse::Wp);
        assert_eq!(tel.use_codes, vec![TelecommunicationAddressUse::Wp]);
    }

    #[test]
    fn test_invalid_url() {
        assert!(Tel::new("not a url").is_err());
    }

    #[test]
    fn test_null() {
        let tel = Tel::null(NullFlavor::Unk);
        assert!(tel.is_null());
        assert!(tel.value.is_none());
    }
}
