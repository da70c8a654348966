//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else.

use core_kernel::{CultureCode, DictionaryItemUid};
use domain_dictionary::{DictionaryItem, Language};

/// Builder for constructing test dictionary items
pub struct TestDictionaryItemBuilder {
    item_key: String,
    parent_id: Option<DictionaryItemUid>,
    translations: Vec<(i64, String)>,
}

impl Default for TestDictionaryItemBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDictionaryItemBuilder {
    /// Creates a new builder with a random root key and no translations
    pub fn new() -> Self {
        Self {
            item_key: format!("Test.{}", DictionaryItemUid::new().to_storage()),
            parent_id: None,
            translations: Vec::new(),
        }
    }

    /// Sets the item key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.item_key = key.into();
        self
    }

    /// Places the item below a parent
    pub fn with_parent(mut self, parent_id: DictionaryItemUid) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Adds a translation
    pub fn with_translation(mut self, language_id: i64, value: impl Into<String>) -> Self {
        self.translations.push((language_id, value.into()));
        self
    }

    /// Builds the unsaved item
    pub fn build(self) -> DictionaryItem {
        let mut item = DictionaryItem::new(self.item_key);
        item.parent_id = self.parent_id;
        for (language_id, value) in self.translations {
            item.set_translation(language_id, value);
        }
        item
    }
}

/// Builder for constructing test languages
pub struct TestLanguageBuilder {
    iso_code: String,
    culture_name: String,
    is_default: bool,
    is_mandatory: bool,
    fallback_language_id: Option<i64>,
}

impl Default for TestLanguageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLanguageBuilder {
    /// Creates a builder for a non-default Spanish language
    pub fn new() -> Self {
        Self {
            iso_code: "es-ES".to_string(),
            culture_name: "Español (España)".to_string(),
            is_default: false,
            is_mandatory: false,
            fallback_language_id: None,
        }
    }

    /// Sets the culture code
    pub fn with_iso_code(mut self, iso_code: impl Into<String>) -> Self {
        self.iso_code = iso_code.into();
        self
    }

    /// Sets the display name
    pub fn with_culture_name(mut self, name: impl Into<String>) -> Self {
        self.culture_name = name.into();
        self
    }

    /// Marks the language as default
    pub fn default_language(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Marks the language as mandatory
    pub fn mandatory(mut self) -> Self {
        self.is_mandatory = true;
        self
    }

    /// Sets the fallback language
    pub fn with_fallback(mut self, language_id: i64) -> Self {
        self.fallback_language_id = Some(language_id);
        self
    }

    /// Builds the unsaved language
    ///
    /// # Panics
    ///
    /// Panics if the culture code is invalid
    pub fn build(self) -> Language {
        Language {
            id: None,
            iso_code: CultureCode::parse(&self.iso_code)
                .unwrap_or_else(|e| panic!("invalid test culture '{}': {}", self.iso_code, e)),
            culture_name: self.culture_name,
            is_default: self.is_default,
            is_mandatory: self.is_mandatory,
            fallback_language_id: self.fallback_language_id,
        }
    }
}
