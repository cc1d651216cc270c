//! HL7 v3 vocabulary code systems
//!
//! Closed enumerations the datatypes draw their coded values from.
//! Every system round-trips through its HL7 code string: `as_str` gives
//! the exact normative code, `FromStr` accepts nothing else.

pub mod act;
pub mod data;
pub mod entity;
pub mod name_address;
pub mod null_flavor;

pub use act::{ActClass, ActMood, ActRelationshipType, ParticipationType};
pub use data::{
    BinaryDataEncoding, CalendarCycle, CompressionAlgorithm, IntegrityCheckAlgorithm, SetOperator,
    TimingEvent,
};
pub use entity::{AdministrativeGender, EntityClass, EntityDeterminer, RoleClass};
pub use name_address::{
    AddressPartType, EntityNamePartQualifier, EntityNamePartType, EntityNameUse, PostalAddressUse,
    TelecommunicationAddressUse,
};
pub use null_flavor::NullFlavor;

use std::collections::HashMap;

lazy_static::lazy_static! {
    /// Code systems with HL7-assigned OIDs, by system name
    pub static ref CODE_SYSTEM_OIDS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("NullFlavor", "2.16.840.1.113883.5.1008");
        m.insert("ActClass", "2.16.840.1.113883.5.6");
        m.insert("ActMood", "2.16.840.1.113883.5.1001");
        m.insert("ActRelationshipType", "2.16.840.1.113883.5.1002");
        m.insert("ParticipationType", "2.16.840.1.113883.5.90");
        m.insert("EntityClass", "2.16.840.1.113883.5.41");
        m.insert("EntityDeterminer", "2.16.840.1.113883.5.30");
        m.insert("RoleClass", "2.16.840.1.113883.5.110");
        m.insert("AdministrativeGender", "2.16.840.1.113883.5.1");
        m.insert("TelecommunicationAddressUse", "2.16.840.1.113883.5.1119");
        m.insert("PostalAddressUse", "2.16.840.1.113883.5.1119");
        m.insert("EntityNameUse", "2.16.840.1.113883.5.45");
        m.insert("AddressPartType", "2.16.840.1.113883.5.16");
        m.insert("CompressionAlgorithm", "2.16.840.1.113883.5.1009");
        m.insert("IntegrityCheckAlgorithm", "2.16.840.1.113883.5.1010");
        m.insert("TimingEvent", "2.16.840.1.113883.5.139");
        m
    };
}

/// Look up the OID of a code system by its name
pub fn code_system_oid(name: &str) -> Option<&'static str> {
    CODE_SYSTEM_OIDS.get(name).copied()
}

/// Define a code system enum with code round-tripping and serde support
///
/// Variants serialize to the exact HL7 code, which is not always a
/// valid Rust identifier (`SHA-1`, `QUANTIFIED_KIND`), so every variant
/// names its code explicitly.
macro_rules! code_system {
    (
        $(#[$outer:meta])*
        $name:ident, $system:expr, {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, )+
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// All codes of this system in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Code system OID, when HL7 assigns one
            pub const CODE_SYSTEM: Option<&'static str> = $system;

            /// The HL7 code for this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $( $code => Ok($name::$variant), )+
                    _ => Err($crate::error::Error::Value(format!(
                        concat!("'{}' is not a ", stringify!($name), " code"),
                        s
                    ))),
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
            where
                S: ::serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let s = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                s.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use code_system;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip_all_codes() {
        // Spot the systems with irregular codes; the per-system modules
        // cover the rest.
        for v in IntegrityCheckAlgorithm::ALL {
            assert_eq!(IntegrityCheckAlgorithm::from_str(v.as_str()).unwrap(), *v);
        }
        for v in EntityDeterminer::ALL {
            assert_eq!(EntityDeterminer::from_str(v.as_str()).unwrap(), *v);
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(NullFlavor::from_str("nope").is_err());
        // Case sensitive
        assert!(NullFlavor::from_str("unk").is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&NullFlavor::Asku).unwrap();
        assert_eq!(json, "\"ASKU\"");
        let back: NullFlavor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NullFlavor::Asku);
    }

    #[test]
    fn test_registry_agrees_with_the_system_consts() {
        assert_eq!(code_system_oid("NullFlavor"), NullFlavor::CODE_SYSTEM);
        assert_eq!(code_system_oid("ActMood"), ActMood::CODE_SYSTEM);
        assert_eq!(
            code_system_oid("TimingEvent"),
            TimingEvent::CODE_SYSTEM
        );
        // Systems without an assigned OID are absent
        assert_eq!(code_system_oid("SetOperator"), None);
        assert_eq!(SetOperator::CODE_SYSTEM, None);
    }
}
