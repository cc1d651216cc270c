//! Property tests for lexical forms

use proptest::prelude::*;

use cdatypes::datatypes::{TsPrecision, TsValue};
use cdatypes::meta::{TS_FACET, UID_FACET};

proptest! {
    #[test]
    fn date_timestamps_round_trip(year in 1900u32..2100, month in 1u32..=12, day in 1u32..=28) {
        let lexical = format!("{:04}{:02}{:02}", year, month, day);
        let ts = TsValue::parse(&lexical).unwrap();
        prop_assert_eq!(ts.as_str(), lexical.as_str());
        prop_assert_eq!(ts.precision(), TsPrecision::Day);
        prop_assert!(ts.to_datetime().is_some());
    }

    #[test]
    fn second_timestamps_round_trip(
        year in 1900u32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
        second in 0u32..60,
    ) {
        let lexical = format!("{:04}{:02}{:02}{:02}{:02}{:02}", year, month, day, hour, minute, second);
        let ts = TsValue::parse(&lexical).unwrap();
        prop_assert_eq!(ts.as_str(), lexical.as_str());
        prop_assert_eq!(ts.precision(), TsPrecision::Second);
    }

    #[test]
    fn parse_never_panics(input in "\\PC*") {
        let _ = TsValue::parse(&input);
    }

    #[test]
    fn parse_agrees_with_pattern_on_digits(input in "[0-9]{1,16}") {
        // Whatever parses must also match the lexical pattern
        if TsValue::parse(&input).is_ok() {
            prop_assert!(TS_FACET.is_match(&input));
        }
    }

    #[test]
    fn oids_match_the_uid_pattern(segments in prop::collection::vec(0u32..100_000, 2..10)) {
        let mut oid = "2".to_string();
        for segment in segments {
            oid.push('.');
            oid.push_str(&segment.to_string());
        }
        prop_assert!(UID_FACET.is_match(&oid));
    }

    #[test]
    fn whitespace_never_passes_the_cs_pattern(code in "[a-z]{1,5}", ws in " |\t|\n") {
        let value = format!("{}{}{}", code, ws, code);
        prop_assert!(!cdatypes::meta::CS_FACET.is_match(&value));
    }
}

#[test]
fn fixture_parses_from_disk() {
    // File-based path exercised the way the CLI reads input
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("section_text.xml");
    std::fs::write(&path, include_str!("fixtures/section_text.xml")).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let doc = cdatypes::xml::Document::parse(&bytes, &cdatypes::limits::Limits::default()).unwrap();
    assert_eq!(doc.root().unwrap().local_name(), "text");
}
