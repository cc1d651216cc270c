//! Act-related code systems
//!
//! Class, mood, relationship and participation codes for acts, in the
//! subsets the document schemas admit.

use super::code_system;

code_system! {
    /// Kind of act (code system 2.16.840.1.113883.5.6)
    ActClass, Some("2.16.840.1.113883.5.6"), {
        Act => "ACT",
        Accm => "ACCM",
        Acct => "ACCT",
        Acsn => "ACSN",
        Adjud => "ADJUD",
        Alrt => "ALRT",
        Battery => "BATTERY",
        Cluster => "CLUSTER",
        Cntrct => "CNTRCT",
        Cond => "COND",
        Cons => "CONS",
        Diet => "DIET",
        Dispact => "DISPACT",
        /// Document
        Doc => "DOC",
        /// Clinical document
        Docclin => "DOCCLIN",
        Enc => "ENC",
        Img => "IMG",
        Infrm => "INFRM",
        Inve => "INVE",
        List => "LIST",
        Mprot => "MPROT",
        /// Observation
        Obs => "OBS",
        Pcpr => "PCPR",
        Proc => "PROC",
        Reg => "REG",
        Rev => "REV",
        /// Substance administration
        Sbadm => "SBADM",
        Spcobs => "SPCOBS",
        Spctrt => "SPCTRT",
        Sply => "SPLY",
        Store => "STORE",
        Subst => "SUBST",
        Trns => "TRNS",
        Verif => "VERIF",
        Xact => "XACT",
    }
}

code_system! {
    /// Mood of an act: event, intent, request... (2.16.840.1.113883.5.1001)
    ActMood, Some("2.16.840.1.113883.5.1001"), {
        /// Intent
        Int => "INT",
        /// Appointment
        Apt => "APT",
        /// Appointment request
        Arq => "ARQ",
        /// Definition
        Def => "DEF",
        /// Event (occurred)
        Evn => "EVN",
        /// Promise
        Prms => "PRMS",
        /// Proposal
        Prp => "PRP",
        /// Request or order
        Rqo => "RQO",
    }
}

code_system! {
    /// How two acts relate (2.16.840.1.113883.5.1002)
    ActRelationshipType, Some("2.16.840.1.113883.5.1002"), {
        /// Is appendage
        Apnd => "APND",
        /// Is excerpt of
        Xcrpt => "XCRPT",
        /// Has component
        Comp => "COMP",
        /// Is derived from
        Driv => "DRIV",
        /// Episode link
        Elnk => "ELNK",
        /// Evaluates (goal)
        Gevl => "GEVL",
        /// Is manifestation of
        Mfst => "MFST",
        /// Has option
        Optn => "OPTN",
        /// Has pertinent information
        Pert => "PERT",
        /// Refers to
        Refr => "REFR",
        /// Has reference values
        Refv => "REFV",
        /// Replaces
        Rplc => "RPLC",
        /// Has reason
        Rson => "RSON",
        /// Starts after start of
        Sas => "SAS",
        /// Is sequel
        Seql => "SEQL",
        /// Has support
        Sprt => "SPRT",
        /// Has subject
        Subj => "SUBJ",
        /// Succeeds
        Succ => "SUCC",
        /// Updates
        Updt => "UPDT",
        /// Transformation
        Xfrm => "XFRM",
        /// Is etiology for
        Caus => "CAUS",
        /// Covered by
        Covby => "COVBY",
        /// Has explanation
        Expl => "EXPL",
        /// Matches
        Mtch => "MTCH",
        /// Items located
        Itemsloc => "ITEMSLOC",
    }
}

code_system! {
    /// How an entity participates in an act (2.16.840.1.113883.5.90)
    ParticipationType, Some("2.16.840.1.113883.5.90"), {
        /// Author
        Aut => "AUT",
        /// Authenticator
        Authen => "AUTHEN",
        /// Custodian
        Cst => "CST",
        /// Device
        Dev => "DEV",
        /// Direct target
        Dir => "DIR",
        /// Data entry person
        Ent => "ENT",
        /// Indirect target
        Ind => "IND",
        /// Informant
        Inf => "INF",
        /// Legal authenticator
        La => "LA",
        /// Location
        Loc => "LOC",
        /// Notification contact
        Not => "NOT",
        /// Primary information recipient
        Prcp => "PRCP",
        /// Performer
        Prf => "PRF",
        /// Record target
        Rct => "RCT",
        /// Receiver
        Rcv => "RCV",
        /// Referrer
        Ref => "REF",
        /// Responsible party
        Resp => "RESP",
        /// Subject
        Sbj => "SBJ",
        /// Specimen
        Spc => "SPC",
        /// Tracker
        Trc => "TRC",
        /// Verifier
        Vrf => "VRF",
        /// Witness
        Wit => "WIT",
        /// Consumable
        Csm => "CSM",
        /// Product
        Prd => "PRD",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_round_trip() {
        for v in ActClass::ALL {
            assert_eq!(ActClass::from_str(v.as_str()).unwrap(), *v);
        }
        for v in ActMood::ALL {
            assert_eq!(ActMood::from_str(v.as_str()).unwrap(), *v);
        }
        for v in ActRelationshipType::ALL {
            assert_eq!(ActRelationshipType::from_str(v.as_str()).unwrap(), *v);
        }
        for v in ParticipationType::ALL {
            assert_eq!(ParticipationType::from_str(v.as_str()).unwrap(), *v);
        }
    }

    #[test]
    fn test_code_systems_assigned() {
        assert_eq!(ActClass::CODE_SYSTEM, Some("2.16.840.1.113883.5.6"));
        assert_eq!(ActMood::CODE_SYSTEM, Some("2.16.840.1.113883.5.1001"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ActClass::Docclin.to_string(), "DOCCLIN");
        assert_eq!(ActMood::Evn.to_string(), "EVN");
    }
}
