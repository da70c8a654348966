//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating random test data
//! that maintains domain invariants.

use proptest::prelude::*;
use std::collections::BTreeMap;

/// Strategy for generating dotted dictionary keys such as `Footer.Links.Home`
pub fn item_key_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_]{0,15}(\\.[A-Za-z][A-Za-z0-9_]{0,15}){0,3}"
}

/// Strategy for generating translation text without control characters
pub fn translation_value_strategy() -> impl Strategy<Value = String> {
    "\\PC{0,80}"
}

/// Strategy for generating well-formed culture tags in mixed case
pub fn culture_tag_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("en-US".to_string()),
        Just("en-gb".to_string()),
        Just("DA-dk".to_string()),
        Just("fr".to_string()),
        Just("de-DE".to_string()),
        Just("zh-Hant-TW".to_string()),
        Just("es-419".to_string()),
        Just("nb-NO".to_string()),
    ]
}

/// Strategy for generating a translation set over the given languages
///
/// Each language appears at most once, matching the one-translation-per-
/// language rule.
pub fn translations_strategy(language_ids: Vec<i64>) -> impl Strategy<Value = BTreeMap<i64, String>> {
    let size = language_ids.len();
    proptest::sample::subsequence(language_ids, 0..=size)
        .prop_flat_map(|ids| {
            let count = ids.len();
            (Just(ids), proptest::collection::vec(translation_value_strategy(), count))
        })
        .prop_map(|(ids, values)| ids.into_iter().zip(values).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::CultureCode;

    proptest! {
        #[test]
        fn generated_keys_are_valid(key in item_key_strategy()) {
            let item = domain_dictionary::DictionaryItem::new(key);
            prop_assert!(item.validate_for_save().is_ok());
        }

        #[test]
        fn generated_cultures_parse(tag in culture_tag_strategy()) {
            prop_assert!(CultureCode::parse(&tag).is_ok());
        }

        #[test]
        fn translation_sets_stay_within_languages(set in translations_strategy(vec![1, 2, 3])) {
            prop_assert!(set.len() <= 3);
            prop_assert!(set.keys().all(|id| (1..=3).contains(id)));
        }
    }
}
