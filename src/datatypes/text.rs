//! Text datatypes (ED, ST, SC)

use base64::Engine;
use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::meta::{ClassMeta, Facets, FieldMeta, Occurs, CS_FACET, UID_FACET};
use crate::vocab::{BinaryDataEncoding, CompressionAlgorithm, IntegrityCheckAlgorithm, NullFlavor};

use super::tel::Tel;

/// Encapsulated data (ED)
///
/// Text or binary content with its media type; binary content travels
/// base64-encoded with an optional integrity check over the raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Ed {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// Character content (base64 text when representation is B64)
    pub text: Option<String>,
    /// Media type of the content
    pub media_type: String,
    /// Language of the content
    pub language: Option<String>,
    /// Compression applied to the raw bytes
    pub compression: Option<CompressionAlgorithm>,
    /// Integrity check bytes (base64 on the wire)
    pub integrity_check: Option<Vec<u8>>,
    /// Algorithm the integrity check was computed with
    pub integrity_check_algorithm: Option<IntegrityCheckAlgorithm>,
    /// How the content is represented
    pub representation: BinaryDataEncoding,
    /// Reference to the content instead of carrying it inline
    pub reference: Option<Tel>,
    /// An abbreviated rendition of the content
    pub thumbnail: Option<Box<Ed>>,
}

impl Default for Ed {
    fn default() -> Self {
        Self {
            null_flavor: None,
            text: None,
            media_type: "text/plain".to_string(),
            language: None,
            compression: None,
            integrity_check: None,
            integrity_check_algorithm: None,
            representation: BinaryDataEncoding::default(),
            reference: None,
            thumbnail: None,
        }
    }
}

impl Ed {
    /// Plain text content
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Base64-encoded binary content with a media type
    pub fn binary(bytes: &[u8], media_type: impl Into<String>) -> Self {
        Self {
            text: Some(base64::engine::general_purpose::STANDARD.encode(bytes)),
            media_type: media_type.into(),
            representation: BinaryDataEncoding::B64,
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

    /// The content as raw bytes
    ///
    /// TXT content yields its UTF-8 bytes; B64 content is decoded,
    /// ignoring embedded whitespace.
    pub fn decoded_bytes(&self) -> Result<Vec<u8>> {
        let text = self.text.as_deref().unwrap_or("");
        match self.representation {
            BinaryDataEncoding::Txt => Ok(text.as_bytes().to_vec()),
            BinaryDataEncoding::B64 => {
                let cleaned: String = text.split_whitespace().collect();
                if cleaned.is_empty() {
                    return Ok(Vec::new());
                }
                base64::engine::general_purpose::STANDARD
                    .decode(&cleaned)
                    .map_err(|e| Error::Decode(format!("not a valid base64 encoding: {}", e)))
            }
        }
    }

    /// Binding metadata for ED
    pub fn meta() -> &'static ClassMeta {
        &ED_META
    }
}

/// Character string (ST)
///
/// The schema derives ST from ED by fixing the media type to
/// `text/plain` and the representation to TXT; those constants are not
/// carried here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct St {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The string value
    pub value: Option<String>,
    /// Language of the string
    pub language: Option<String>,
}

impl St {
    /// A plain string
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            null_flavor: None,
            value: Some(value.into()),
            language: None,
        }
    }

    /// A null string with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            value: None,
            language: None,
        }
    }

    /// Binding metadata for ST
    pub fn meta() -> &'static ClassMeta {
        &ST_META
    }
}

impl From<&str> for St {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<St> for Ed {
    fn from(st: St) -> Self {
        Self {
            null_flavor: st.null_flavor,
            text: st.value,
            language: st.language,
            ..Self::default()
        }
    }
}

/// Character string with code (SC)
///
/// A string that may additionally carry a coding. A code is only
/// meaningful with its code system; validation enforces the pairing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sc {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The string value
    pub value: Option<String>,
    /// Language of the string
    pub language: Option<String>,
    /// The code
    pub code: Option<String>,
    /// OID of the code system
    pub code_system: Option<String>,
    /// Human-readable code system name
    pub code_system_name: Option<String>,
    /// Display name for the code
    pub display_name: Option<String>,
}

impl Sc {
    /// A plain string without coding
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A string with a coding
    pub fn coded(
        value: impl Into<String>,
        code: impl Into<String>,
        code_system: impl Into<String>,
    ) -> Self {
        Self {
            value: Some(value.into()),
            code: Some(code.into()),
            code_system: Some(code_system.into()),
            ..Self::default()
        }
    }

    /// Binding metadata for SC
    pub fn meta() -> &'static ClassMeta {
        &SC_META
    }
}

static ED_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "ED",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("mediaType").with_default("text/plain"),
            FieldMeta::attribute("language"),
            FieldMeta::attribute("compression"),
            FieldMeta::attribute("integrityCheck"),
            FieldMeta::attribute("integrityCheckAlgorithm"),
            FieldMeta::attribute("representation").with_default("TXT"),
            FieldMeta::element("reference", Occurs::optional()),
            FieldMeta::element("thumbnail", Occurs::optional()),
            FieldMeta::text(),
        ],
    )
});

static ST_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "ST",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("language"),
            FieldMeta::text(),
        ],
    )
});

static SC_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "SC",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("language"),
            FieldMeta::attribute("code").with_facets(Facets {
                pattern: Some(CS_FACET.clone()),
                ..Facets::default()
            }),
            FieldMeta::attribute("codeSystem").with_facets(Facets {
                pattern: Some(UID_FACET.clone()),
                ..Facets::default()
            }),
            FieldMeta::attribute("codeSystemName"),
            FieldMeta::attribute("displayName"),
            FieldMeta::text(),
        ],
    )
});

super::impl_any_value!(Ed, St, Sc);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        let ed = Ed::plain("hello");
        assert_eq!(ed.media_type, "text/plain");
        assert_eq!(ed.representation, BinaryDataEncoding::Txt);
        assert_eq!(ed.decoded_bytes().unwrap(), b"hello");
    }

    #[test]
    fn test_binary_round_trip() {
        let ed = Ed::binary(&[0xde, 0xad, 0xbe, 0xef], "application/octet-stream");
        assert_eq!(ed.representation, BinaryDataEncoding::B64);
        assert_eq!(ed.decoded_bytes().unwrap(), vec![0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_b64_with_whitespace() {
        let ed = Ed {
            text: Some("SGVs bG8=".to_string()),
            representation: BinaryDataEncoding::B64,
            ..Ed::default()
        };
        assert_eq!(ed.decoded_bytes().unwrap(), b"Hello");
    }

    #[test]
    fn test_invalid_b64() {
        let ed = Ed {
            text: Some("!!!".to_string()),
            representation: BinaryDataEncoding::B64,
            ..Ed::default()
        };
        assert!(matches!(ed.decoded_bytes(), Err(Error::Decode(_))));
    }

    #[test]
    fn test_empty_b64_is_empty() {
        let ed = Ed {
            representation: BinaryDataEncoding::B64,
            ..Ed::default()
        };
        assert_eq!(ed.decoded_bytes().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_st_widens_to_ed() {
        let st = St::new("note");
        let ed: Ed = st.into();
        assert_eq!(ed.text.as_deref(), Some("note"));
        assert_eq!(ed.media_type, "text/plain");
    }

    #[test]
    fn test_ed_meta_defaults() {
        let meta = Ed::meta();
        assert_eq!(
            meta.field("mediaType").unwrap().default,
            Some("text/plain")
        );
        assert_eq!(meta.field("representation").unwrap().default, Some("TXT"));
    }
}
