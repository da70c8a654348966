//! Tests for core_kernel error types

use core_kernel::error::CoreError;

#[test]
fn test_core_error_validation() {
    let error = CoreError::validation("Invalid input");

    match error {
        CoreError::Validation(msg) => assert_eq!(msg, "Invalid input"),
        _ => panic!("Expected Validation error"),
    }
}

#[test]
fn test_core_error_configuration() {
    let error = CoreError::configuration("missing provider");
    assert!(error.to_string().contains("missing provider"));
}

#[test]
fn test_core_error_from_uuid_error() {
    let uuid_error = uuid::Uuid::parse_str("nope").unwrap_err();
    let error: CoreError = uuid_error.into();

    assert!(matches!(error, CoreError::InvalidIdentifier(_)));
}

#[test]
fn test_invalid_culture_display() {
    let error = CoreError::InvalidCulture("xx_!!".to_string());
    assert_eq!(error.to_string(), "Invalid culture code: 'xx_!!'");
}
