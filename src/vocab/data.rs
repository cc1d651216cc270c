//! Data-handling code systems
//!
//! Codes used inside the datatypes themselves: set operators for time
//! expressions, compression and integrity-check algorithms for
//! encapsulated data, timing events and calendar cycles.

use super::code_system;

code_system! {
    /// How a set component combines with what precedes it
    SetOperator, None, {
        /// Intersect
        A => "A",
        /// Exclude
        E => "E",
        /// Convex hull
        H => "H",
        /// Include (union), the default
        I => "I",
        /// Periodic hull
        P => "P",
    }
}

impl Default for SetOperator {
    fn default() -> Self {
        SetOperator::I
    }
}

code_system! {
    /// Compression algorithm for encapsulated data (2.16.840.1.113883.5.1009)
    CompressionAlgorithm, Some("2.16.840.1.113883.5.1009"), {
        /// Deflate
        Df => "DF",
        /// Gzip
        Gz => "GZ",
        /// Zlib
        Zl => "ZL",
        /// Unix compress
        Z => "Z",
        /// Bzip2
        Bz => "BZ",
        /// 7z
        Z7 => "Z7",
    }
}

code_system! {
    /// Integrity check algorithm for encapsulated data (2.16.840.1.113883.5.1010)
    IntegrityCheckAlgorithm, Some("2.16.840.1.113883.5.1010"), {
        /// SHA-1
        Sha1 => "SHA-1",
        /// SHA-256
        Sha256 => "SHA-256",
    }
}

code_system! {
    /// Representation of encapsulated data content
    BinaryDataEncoding, None, {
        /// Plain text
        Txt => "TXT",
        /// Base64-encoded binary
        B64 => "B64",
    }
}

impl Default for BinaryDataEncoding {
    fn default() -> Self {
        BinaryDataEncoding::Txt
    }
}

code_system! {
    /// Event a dose timing is related to (2.16.840.1.113883.5.139)
    TimingEvent, Some("2.16.840.1.113883.5.139"), {
        /// Before meal
        Ac => "AC",
        /// Before lunch
        Acd => "ACD",
        /// Before breakfast
        Acm => "ACM",
        /// Before dinner
        Acv => "ACV",
        /// Meal
        C => "C",
        /// Lunch
        Cd => "CD",
        /// Breakfast
        Cm => "CM",
        /// Dinner
        Cv => "CV",
        /// Bedtime
        Hs => "HS",
        /// Between meals
        Ic => "IC",
        /// Between lunch and dinner
        Icd => "ICD",
        /// Between breakfast and lunch
        Icm => "ICM",
        /// Between dinner and bedtime
        Icv => "ICV",
        /// After meal
        Pc => "PC",
        /// After lunch
        Pcd => "PCD",
        /// After breakfast
        Pcm => "PCM",
        /// After dinner
        Pcv => "PCV",
        /// Upon waking
        Wake => "WAKE",
    }
}

code_system! {
    /// Calendar cycle a periodic interval aligns to
    CalendarCycle, None, {
        /// Week of the year
        Cw => "CW",
        /// Year
        Cy => "CY",
        /// Day of the month
        D => "D",
        /// Day of the month (numbered)
        Dm => "DM",
        /// Day of the week
        Dw => "DW",
        /// Day of the year
        Dy => "DY",
        /// Hour of the day
        H => "H",
        /// Hour of the day (numbered)
        Hd => "HD",
        /// Month of the year
        M => "M",
        /// Minute of the hour
        Min => "MIN",
        /// Month of the year (numbered)
        My => "MY",
        /// Minute of the hour (numbered)
        N => "N",
        /// Minute of the hour within a day
        Nh => "NH",
        /// Second of the minute
        S => "S",
        /// Second of the minute (numbered)
        Sy => "SY",
        /// Week of the year (numbered)
        W => "W",
    }
}
