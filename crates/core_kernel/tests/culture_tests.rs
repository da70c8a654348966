//! Tests for culture code parsing

use core_kernel::{CoreError, CultureCode};
use proptest::prelude::*;

#[test]
fn test_parse_language_only() {
    let code = CultureCode::parse("fr").unwrap();
    assert_eq!(code.as_str(), "fr");
    assert_eq!(code.language(), "fr");
}

#[test]
fn test_parse_with_region() {
    let code: CultureCode = "en-gb".parse().unwrap();
    assert_eq!(code.to_string(), "en-GB");
}

#[test]
fn test_parse_trims_whitespace() {
    let code = CultureCode::parse("  de-DE ").unwrap();
    assert_eq!(code.as_str(), "de-DE");
}

#[test]
fn test_reject_malformed() {
    let result = CultureCode::parse("en_US_not!valid");
    assert!(matches!(result, Err(CoreError::InvalidCulture(_))));
}

#[test]
fn test_reject_empty() {
    assert!(matches!(CultureCode::parse(""), Err(CoreError::InvalidCulture(_))));
}

#[test]
fn test_equal_after_canonicalization() {
    assert_eq!(
        CultureCode::parse("NB-no").unwrap(),
        CultureCode::parse("nb-NO").unwrap()
    );
}

#[test]
fn test_serde_roundtrip_rejects_invalid() {
    let ok: CultureCode = serde_json::from_str("\"es-es\"").unwrap();
    assert_eq!(ok.as_str(), "es-ES");

    let bad: Result<CultureCode, _> = serde_json::from_str("\"!!\"");
    assert!(bad.is_err());
}

proptest! {
    #[test]
    fn canonical_form_is_stable(
        language in "[a-z]{2,3}",
        region in proptest::option::of("[A-Z]{2}")
    ) {
        let raw = match &region {
            Some(region) => format!("{}-{}", language, region),
            None => language.clone(),
        };
        let code = CultureCode::parse(&raw).unwrap();
        let reparsed = CultureCode::parse(code.as_str()).unwrap();
        prop_assert_eq!(&code, &reparsed);
        prop_assert_eq!(code.language(), language.as_str());
    }
}
