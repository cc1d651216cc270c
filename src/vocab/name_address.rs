//! Name and address code systems
//!
//! Use codes for names, postal and telecom addresses, plus the part
//! types the mixed-content AD and EN types tag their pieces with.

use super::code_system;

code_system! {
    /// Telecom address use (2.16.840.1.113883.5.1119)
    TelecommunicationAddressUse, Some("2.16.840.1.113883.5.1119"), {
        /// Home
        H => "H",
        /// Primary home
        Hp => "HP",
        /// Vacation home
        Hv => "HV",
        /// Work place
        Wp => "WP",
        /// Direct
        Dir => "DIR",
        /// Public
        Pub => "PUB",
        /// Bad address
        Bad => "BAD",
        /// Temporary
        Tmp => "TMP",
        /// Answering service
        As => "AS",
        /// Emergency contact
        Ec => "EC",
        /// Mobile contact
        Mc => "MC",
        /// Pager
        Pg => "PG",
    }
}

code_system! {
    /// Postal address use (2.16.840.1.113883.5.1119)
    PostalAddressUse, Some("2.16.840.1.113883.5.1119"), {
        /// Home
        H => "H",
        /// Primary home
        Hp => "HP",
        /// Vacation home
        Hv => "HV",
        /// Work place
        Wp => "WP",
        /// Direct
        Dir => "DIR",
        /// Public
        Pub => "PUB",
        /// Bad address
        Bad => "BAD",
        /// Temporary
        Tmp => "TMP",
        /// Physical visit address
        Phys => "PHYS",
        /// Postal address
        Pst => "PST",
        /// Alphabetic representation
        Abc => "ABC",
        /// Ideographic representation
        Ide => "IDE",
        /// Syllabic representation
        Syl => "SYL",
        /// Search-format
        Srch => "SRCH",
        /// Phonetic sound-alike
        Sndx => "SNDX",
        /// Soundex encoding
        Soundex => "SOUNDEX",
    }
}

code_system! {
    /// Entity name use (2.16.840.1.113883.5.45)
    EntityNameUse, Some("2.16.840.1.113883.5.45"), {
        /// License
        C => "C",
        /// Legal
        L => "L",
        /// Official registry
        Or => "OR",
        /// Pseudonym
        P => "P",
        /// Artist or stage name
        A => "A",
        /// Indigenous or tribal
        I => "I",
        /// Religious
        R => "R",
        /// Alphabetic representation
        Abc => "ABC",
        /// Ideographic representation
        Ide => "IDE",
        /// Syllabic representation
        Syl => "SYL",
        /// Search-format
        Srch => "SRCH",
        /// Phonetic sound-alike
        Sndx => "SNDX",
        /// Soundex encoding
        Soundex => "SOUNDEX",
        /// Assigned name
        Asgn => "ASGN",
        /// Phonetic
        Phon => "PHON",
    }
}

code_system! {
    /// Address part type (2.16.840.1.113883.5.16)
    AddressPartType, Some("2.16.840.1.113883.5.16"), {
        /// Address line
        Al => "AL",
        /// Additional locator
        Adl => "ADL",
        /// Unit identifier
        Unid => "UNID",
        /// Unit designator
        Unit => "UNIT",
        /// Delivery address line
        Dal => "DAL",
        /// Delivery installation type
        Dinst => "DINST",
        /// Delivery installation area
        Dinsta => "DINSTA",
        /// Delivery installation qualifier
        Dinstq => "DINSTQ",
        /// Delivery mode
        Dmod => "DMOD",
        /// Delivery mode identifier
        Dmodid => "DMODID",
        /// Street address line
        Sal => "SAL",
        /// Building number
        Bnr => "BNR",
        /// Building number numeric
        Bnn => "BNN",
        /// Building number suffix
        Bns => "BNS",
        /// Street name
        Str => "STR",
        /// Street name base
        Stb => "STB",
        /// Street type
        Sttyp => "STTYP",
        /// Direction
        Dir => "DIR",
        /// Intersection
        Int => "INT",
        /// Care-of
        Car => "CAR",
        /// Census tract
        Cen => "CEN",
        /// Country
        Cnt => "CNT",
        /// County or parish
        Cpa => "CPA",
        /// Municipality or city
        Cty => "CTY",
        /// Delimiter
        Del => "DEL",
        /// Post box
        Pob => "POB",
        /// Precinct
        Pre => "PRE",
        /// State or province
        Sta => "STA",
        /// Postal code
        Zip => "ZIP",
    }
}

code_system! {
    /// Entity name part type
    EntityNamePartType, None, {
        /// Family name
        Fam => "FAM",
        /// Given name
        Giv => "GIV",
        /// Prefix
        Pfx => "PFX",
        /// Suffix
        Sfx => "SFX",
        /// Delimiter
        Del => "DEL",
    }
}

code_system! {
    /// Entity name part qualifier
    EntityNamePartQualifier, None, {
        /// Legal status
        Ls => "LS",
        /// Academic
        Ac => "AC",
        /// Nobility
        Nb => "NB",
        /// Professional
        Pr => "PR",
        /// Honorific
        Hon => "HON",
        /// Birth
        Br => "BR",
        /// Acquired
        Ad => "AD",
        /// Spouse
        Sp => "SP",
        /// Middle name
        Mid => "MID",
        /// Call me
        Cl => "CL",
        /// Initial
        In => "IN",
        /// Title
        Title => "TITLE",
        /// Voorvoegsel
        Vv => "VV",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip() {
        for v in TelecommunicationAddressUse::ALL {
            assert_eq!(
                TelecommunicationAddressUse::from_str(v.as_str()).unwrap(),
                *v
            );
        }
        for v in PostalAddressUse::ALL {
            assert_eq!(PostalAddressUse::from_str(v.as_str()).unwrap(), *v);
        }
        for v in EntityNameUse::ALL {
            assert_eq!(EntityNameUse::from_str(v.as_str()).unwrap(), *v);
        }
        for v in AddressPartType::ALL {
            assert_eq!(AddressPartType::from_str(v.as_str()).unwrap(), *v);
        }
        for v in EntityNamePartType::ALL {
            assert_eq!(EntityNamePartType::from_str(v.as_str()).unwrap(), *v);
        }
        for v in EntityNamePartQualifier::ALL {
            assert_eq!(EntityNamePartQualifier::from_str(v.as_str()).unwrap(), *v);
        }
    }

    #[test]
    fn test_postal_extends_telecom_core() {
        // The core H/HP/HV/WP/DIR/PUB/BAD/TMP codes are shared
        for code in ["H", "HP", "HV", "WP", "DIR", "PUB", "BAD", "TMP"] {
            assert!(TelecommunicationAddressUse::from_str(code).is_ok());
            assert!(PostalAddressUse::from_str(code).is_ok());
        }
        // PHYS is postal-only
        assert!(PostalAddressUse::from_str("PHYS").is_ok());
        assert!(TelecommunicationAddressUse::from_str("PHYS").is_err());
    }
}
