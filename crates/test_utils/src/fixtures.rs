//! Pre-built Test Fixtures
//!
//! Provides ready-to-use languages and item keys. Fixtures are unsaved;
//! identities are assigned when a repository stores them.

use core_kernel::CultureCode;
use domain_dictionary::{DictionaryItem, Language};

/// Fixture for language test data
pub struct LanguageFixtures;

impl LanguageFixtures {
    /// English (United States), marked as the default language
    pub fn english() -> Language {
        Self::language("en-US", "English (United States)").as_default()
    }

    /// Danish (Denmark)
    pub fn danish() -> Language {
        Self::language("da-DK", "Dansk (Danmark)")
    }

    /// French (France), marked as mandatory
    pub fn french() -> Language {
        Self::language("fr-FR", "Français (France)").as_mandatory()
    }

    /// German (Germany)
    pub fn german() -> Language {
        Self::language("de-DE", "Deutsch (Deutschland)")
    }

    fn language(iso_code: &str, culture_name: &str) -> Language {
        Language {
            id: None,
            iso_code: CultureCode::parse(iso_code).unwrap_or_else(|e| panic!("fixture {iso_code}: {e}")),
            culture_name: culture_name.to_string(),
            is_default: false,
            is_mandatory: false,
            fallback_language_id: None,
        }
    }
}

/// Fixture for dictionary item test data
pub struct ItemFixtures;

impl ItemFixtures {
    /// A root navigation key
    pub fn navigation_key() -> &'static str {
        "Navigation"
    }

    /// A key nested below the navigation key
    pub fn home_key() -> &'static str {
        "Navigation.Home"
    }

    /// A key unrelated to the navigation tree
    pub fn copyright_key() -> &'static str {
        "Footer.Copyright"
    }

    /// A root item with no translations
    pub fn untranslated(key: &str) -> DictionaryItem {
        DictionaryItem::new(key)
    }
}
