//! XML runtime
//!
//! The element tree, its reader and writer, and the typed
//! decode/encode traits the datatypes and narrative block implement.

pub mod decode;
pub mod encode;
mod narrative;
pub mod reader;
pub mod writer;

pub use decode::FromXml;
pub use encode::ToXml;
pub use reader::{Document, Element, Node};
pub use writer::{to_string, XmlWriter};
