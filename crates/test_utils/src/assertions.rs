//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for dictionary types that give
//! more meaningful error messages than standard assertions.

use domain_dictionary::{DictionaryItem, Language};
use infra_db::DatabaseError;

/// Asserts that two items carry the same translation content
///
/// Row identities and ordering are ignored; only the language/value pairs
/// are compared.
pub fn assert_same_translations(actual: &DictionaryItem, expected: &DictionaryItem) {
    assert_eq!(
        actual.translation_values(),
        expected.translation_values(),
        "Translations of '{}' differ from '{}'",
        actual.item_key,
        expected.item_key
    );
}

/// Asserts that exactly one of the languages is the default
pub fn assert_single_default(languages: &[Language]) {
    let defaults: Vec<_> = languages
        .iter()
        .filter(|l| l.is_default)
        .map(|l| l.iso_code.as_str())
        .collect();
    assert_eq!(
        defaults.len(),
        1,
        "Expected exactly one default language, found {:?}",
        defaults
    );
}

/// Asserts that every translation read from the store carries its identity
/// and the ISO code of its language
pub fn assert_translations_loaded(item: &DictionaryItem) {
    for translation in &item.translations {
        assert!(
            translation.id.is_some(),
            "Translation for language {} of '{}' has no identity",
            translation.language_id,
            item.item_key
        );
        assert!(
            translation.language_iso_code.is_some(),
            "Translation for language {} of '{}' has no ISO code",
            translation.language_id,
            item.item_key
        );
    }
}

/// Asserts that a result failed with a duplicate entry error
pub fn assert_duplicate<T: std::fmt::Debug>(result: Result<T, DatabaseError>) {
    match result {
        Err(DatabaseError::DuplicateEntry(_)) => {}
        other => panic!("Expected DuplicateEntry, got {:?}", other),
    }
}
