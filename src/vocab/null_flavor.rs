//! Null flavors
//!
//! HL7's answer to "why is this value absent": a coded reason carried
//! where a value would otherwise be. The codes form a specialization
//! hierarchy rooted at NI; `parent` and `implies` expose it.

use super::code_system;

code_system! {
    /// Reason a value is absent (code system 2.16.840.1.113883.5.1008)
    NullFlavor, Some("2.16.840.1.113883.5.1008"), {
        /// No information
        Ni => "NI",
        /// Invalid
        Inv => "INV",
        /// Derived
        Der => "DER",
        /// Other (not in the domain's value set)
        Oth => "OTH",
        /// Negative infinity
        Ninf => "NINF",
        /// Positive infinity
        Pinf => "PINF",
        /// Un-encodable
        Unc => "UNC",
        /// Masked
        Msk => "MSK",
        /// Not applicable
        Na => "NA",
        /// Unknown
        Unk => "UNK",
        /// Asked but unknown
        Asku => "ASKU",
        /// Temporarily unavailable
        Nav => "NAV",
        /// Not asked
        Nask => "NASK",
        /// Trace amount
        Trc => "TRC",
        /// Sufficient quantity
        Qs => "QS",
    }
}

impl NullFlavor {
    /// The next more general flavor, None for the root NI
    pub fn parent(&self) -> Option<NullFlavor> {
        use NullFlavor::*;
        match self {
            Ni => None,
            Inv | Unk => Some(Ni),
            Der | Oth | Msk | Na | Unc => Some(Inv),
            Ninf | Pinf => Some(Oth),
            Asku | Trc | Qs => Some(Unk),
            Nav | Nask => Some(Asku),
        }
    }

    /// Reflexive transitive ancestor test
    ///
    /// `NINF.implies(INV)` holds: a negative-infinity null is also an
    /// invalid null.
    pub fn implies(&self, other: NullFlavor) -> bool {
        let mut current = Some(*self);
        while let Some(flavor) = current {
            if flavor == other {
                return true;
            }
            current = flavor.parent();
        }
        false
    }
}

impl Default for NullFlavor {
    fn default() -> Self {
        NullFlavor::Ni
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip() {
        for v in NullFlavor::ALL {
            assert_eq!(NullFlavor::from_str(v.as_str()).unwrap(), *v);
        }
    }

    #[test]
    fn test_parent_chain() {
        assert_eq!(NullFlavor::Ni.parent(), None);
        assert_eq!(NullFlavor::Ninf.parent(), Some(NullFlavor::Oth));
        assert_eq!(NullFlavor::Oth.parent(), Some(NullFlavor::Inv));
        assert_eq!(NullFlavor::Nav.parent(), Some(NullFlavor::Asku));
        assert_eq!(NullFlavor::Asku.parent(), Some(NullFlavor::Unk));
    }

    #[test]
    fn test_implies() {
        assert!(NullFlavor::Ninf.implies(NullFlavor::Inv));
        assert!(NullFlavor::Ninf.implies(NullFlavor::Ni));
        assert!(NullFlavor::Ninf.implies(NullFlavor::Ninf));
        assert!(!NullFlavor::Ninf.implies(NullFlavor::Unk));
        assert!(!NullFlavor::Ni.implies(NullFlavor::Unk));
    }

    #[test]
    fn test_every_flavor_reaches_root() {
        for v in NullFlavor::ALL {
            assert!(v.implies(NullFlavor::Ni));
        }
    }
}
