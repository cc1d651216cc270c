//! HL7 v3 CDA abstract datatypes
//!
//! The value shapes CDA documents are built from, as native Rust types.
//! Where the schema expresses a choice group as rows of optional
//! sibling fields, these types use a sum type instead; where it derives
//! a narrowed type by restriction, the narrowed type simply does not
//! carry the restricted fields.
//!
//! Every type deriving from the abstract ANY carries an optional
//! [`NullFlavor`](crate::vocab::NullFlavor); a value with a null flavor
//! set carries no other content.

pub mod address;
pub mod codes;
pub mod id;
pub mod name;
pub mod quantity;
pub mod tel;
pub mod text;
pub mod time;

pub use address::{Ad, AddressPart};
pub use codes::{Cd, Ce, Cr, Cs, Cv};
pub use id::Ii;
pub use name::{En, NamePart, On, Pn, Tn};
pub use quantity::{Int, Mo, Pq, PqR, Qty, Real, Rto};
pub use tel::Tel;
pub use text::{Ed, Sc, St};
pub use time::{
    EivlTs, IvlPq, IvlPqBounds, IvlTs, IvlTsBounds, IvxbPq, IvxbTs, PivlTs, SxcmTs,
    TimeExpression, Ts, TsPrecision, TsValue,
};

use crate::meta::{ClassMeta, FieldMeta};
use crate::vocab::NullFlavor;
use once_cell::sync::Lazy;

/// Common surface of every datatype deriving from ANY
pub trait AnyValue {
    /// The null flavor, if the value is null
    fn null_flavor(&self) -> Option<NullFlavor>;

    /// True when a null flavor is present
    fn is_null(&self) -> bool {
        self.null_flavor().is_some()
    }
}

macro_rules! impl_any_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::datatypes::AnyValue for $ty {
                fn null_flavor(&self) -> Option<$crate::vocab::NullFlavor> {
                    self.null_flavor
                }
            }
        )+
    };
}

pub(crate) use impl_any_value;

/// Boolean (BL)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bl {
    /// Null flavor
    pub null_flavor: Option<NullFlavor>,
    /// The boolean value
    pub value: Option<bool>,
}

impl Bl {
    /// A non-null boolean
    pub fn new(value: bool) -> Self {
        Self {
            null_flavor: None,
            value: Some(value),
        }
    }

    /// A null boolean with the given flavor
    pub fn null(flavor: NullFlavor) -> Self {
        Self {
            null_flavor: Some(flavor),
            value: None,
        }
    }

    /// Binding metadata for BL
    pub fn meta() -> &'static ClassMeta {
        &BL_META
    }
}

impl From<bool> for Bl {
    fn from(value: bool) -> Self {
        Self::new(value)
    }
}

static BL_META: Lazy<ClassMeta> = Lazy::new(|| {
    ClassMeta::hl7(
        "BL",
        vec![
            FieldMeta::attribute("nullFlavor"),
            FieldMeta::attribute("value"),
        ],
    )
});

impl_any_value!(Bl);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bl() {
        let b = Bl::new(true);
        assert!(!b.is_null());
        assert_eq!(b.value, Some(true));

        let n = Bl::null(NullFlavor::Unk);
        assert!(n.is_null());
        assert_eq!(n.null_flavor(), Some(NullFlavor::Unk));
        assert_eq!(n.value, None);
    }

    #[test]
    fn test_bl_default_is_absent() {
        let b = Bl::default();
        assert!(!b.is_null());
        assert_eq!(b.value, None);
    }
}
