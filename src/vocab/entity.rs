//! Entity and role code systems

use super::code_system;

code_system! {
    /// Kind of entity (2.16.840.1.113883.5.41)
    EntityClass, Some("2.16.840.1.113883.5.41"), {
        /// Entity (root)
        Ent => "ENT",
        /// Animal
        Anm => "ANM",
        /// Chemical substance
        Chem => "CHEM",
        /// Device
        Dev => "DEV",
        /// Food
        Food => "FOOD",
        /// Health chart entity
        Hce => "HCE",
        /// Living subject
        Liv => "LIV",
        /// City or town
        City => "CITY",
        /// Material
        Mat => "MAT",
        /// Microorganism
        Mic => "MIC",
        /// Manufactured material
        Mmat => "MMAT",
        /// Nation
        Nat => "NAT",
        /// Organization
        Org => "ORG",
        /// Place
        Plc => "PLC",
        /// Plant
        Plnt => "PLNT",
        /// Person
        Psn => "PSN",
        /// Public institution
        Pub => "PUB",
        /// Group
        Rgrp => "RGRP",
        /// State or province
        State => "STATE",
    }
}

code_system! {
    /// Whether an entity is an instance or a kind (2.16.840.1.113883.5.30)
    EntityDeterminer, Some("2.16.840.1.113883.5.30"), {
        /// A specific entity
        Instance => "INSTANCE",
        /// A kind of entity
        Kind => "KIND",
        /// A quantified kind of entity
        QuantifiedKind => "QUANTIFIED_KIND",
    }
}

code_system! {
    /// Kind of role an entity plays (2.16.840.1.113883.5.110)
    RoleClass, Some("2.16.840.1.113883.5.110"), {
        /// Role (root)
        Rol => "ROL",
        /// Assigned entity
        Assigned => "ASSIGNED",
        /// Patient
        Pat => "PAT",
        /// Personal relationship
        Prs => "PRS",
        /// Contact
        Con => "CON",
        /// Caregiver
        Caregiver => "CAREGIVER",
        /// Agent
        Agnt => "AGNT",
        /// Guarantor
        Guar => "GUAR",
        /// Guardian
        Guard => "GUARD",
        /// Emergency contact
        Econ => "ECON",
        /// Next of kin
        Nok => "NOK",
        /// Employee
        Emp => "EMP",
        /// Sponsor
        Spnsr => "SPNSR",
        /// Student
        Std => "STD",
        /// Underwriter
        Undwrt => "UNDWRT",
        /// Healthcare provider
        Prov => "PROV",
        /// Clinical research investigator
        Crinv => "CRINV",
        /// Clinical research sponsor
        Crspnsr => "CRSPNSR",
        /// Manufactured product
        Manu => "MANU",
        /// Service delivery location
        Sdloc => "SDLOC",
        /// Dedicated service delivery location
        Dsdloc => "DSDLOC",
        /// Incidental service delivery location
        Isdloc => "ISDLOC",
        /// Owned entity
        Own => "OWN",
        /// Regulated product
        Rgpr => "RGPR",
        /// Territory of authority
        Terr => "TERR",
        /// Held entity
        Hld => "HLD",
        /// Maintained entity
        Mnt => "MNT",
        /// Warranted product
        Wrte => "WRTE",
    }
}

code_system! {
    /// Administrative gender (2.16.840.1.113883.5.1)
    AdministrativeGender, Some("2.16.840.1.113883.5.1"), {
        /// Female
        F => "F",
        /// Male
        M => "M",
        /// Undifferentiated
        Un => "UN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip() {
        for v in EntityClass::ALL {
            assert_eq!(EntityClass::from_str(v.as_str()).unwrap(), *v);
        }
        for v in RoleClass::ALL {
            assert_eq!(RoleClass::from_str(v.as_str()).unwrap(), *v);
        }
        for v in AdministrativeGender::ALL {
            assert_eq!(AdministrativeGender::from_str(v.as_str()).unwrap(), *v);
        }
    }

    #[test]
    fn test_irregular_casing() {
        assert_eq!(EntityDeterminer::QuantifiedKind.as_str(), "QUANTIFIED_KIND");
        assert!(EntityDeterminer::from_str("QuantifiedKind").is_err());
    }
}
