//! # cdatypes
//!
//! HL7 v3 CDA datatypes, vocabulary code systems and narrative block
//! markup as native Rust types, with the runtime that reads, writes and
//! validates them.
//!
//! ## Features
//!
//! - The CDA abstract datatypes (II, CD/CE/CV/CS, ED/ST, TS and its
//!   interval/periodic forms, PQ, AD, EN, TEL, ...)
//! - Vocabulary code systems as enums round-tripping through their
//!   HL7 codes
//! - The StrucDoc narrative block with mixed content preserved
//! - Strict XML decoding and default-eliding encoding over quick-xml
//! - Error-accumulating validation with paths
//! - JSON conversion for inspection and tooling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cdatypes::datatypes::Ii;
//! use cdatypes::xml::{Document, FromXml, ToXml};
//!
//! let doc = Document::from_str(r#"<id root="2.16.840.1.113883.19.5" extension="42"/>"#)?;
//! let id = Ii::from_xml(doc.root().unwrap())?;
//! assert_eq!(id.extension.as_deref(), Some("42"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Utilities
pub mod namespaces;

// Binding metadata
pub mod meta;

// The data model
pub mod datatypes;
pub mod narrative;
pub mod vocab;

// Runtime
pub mod json;
pub mod validate;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
pub use validate::Validate;

/// Version of the cdatypes library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// HL7 v3 namespace
pub const HL7_V3_NAMESPACE: &str = "urn:hl7-org:v3";

/// XML Schema instance namespace
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// XML namespace
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";
