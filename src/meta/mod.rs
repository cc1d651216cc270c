//! Binding metadata model
//!
//! The declarative description of how bound types map to XML: field
//! kinds (element, attribute, text, wildcard), namespaces, occurrence
//! bounds and lexical facets. Datatype and narrative modules expose a
//! `ClassMeta` table per type; the validator and the strict decoders
//! consume them.

pub mod facets;
pub mod fields;
pub mod occurs;

pub use facets::{
    EnumerationFacet, Facets, LengthFacet, MaxInclusiveFacet, MaxLengthFacet, MinInclusiveFacet,
    MinLengthFacet, NumericBound, PatternFacet, BL_FACET, CS_FACET, TS_FACET, UID_FACET,
};
pub use fields::{ClassMeta, FieldKind, FieldMeta};
pub use occurs::Occurs;
