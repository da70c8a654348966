//! Dictionary items and their translations

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::{CultureCode, DictionaryItemUid, TranslationUid};

use crate::error::DictionaryError;

/// Maximum length of a dictionary item key
pub const MAX_KEY_LENGTH: usize = 1000;

/// A keyed dictionary entry with its translations
///
/// The `id` is assigned by the store on first save; until then the item
/// is transient. The `unique_id` is generated on construction and never
/// changes, so it can be used to reference the item across databases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DictionaryItem {
    /// Store-assigned identity, `None` until saved
    pub id: Option<i64>,
    /// External unique token
    pub unique_id: DictionaryItemUid,
    /// Unique token of the parent item, `None` for root items
    pub parent_id: Option<DictionaryItemUid>,
    /// The dictionary key, unique across the store
    #[validate(length(min = 1, max = 1000))]
    pub item_key: String,
    /// Translations, at most one per language
    pub translations: Vec<DictionaryTranslation>,
}

impl DictionaryItem {
    /// Creates a new root item with no translations
    pub fn new(item_key: impl Into<String>) -> Self {
        Self {
            id: None,
            unique_id: DictionaryItemUid::new(),
            parent_id: None,
            item_key: item_key.into(),
            translations: Vec::new(),
        }
    }

    /// Creates a new item below the given parent
    pub fn with_parent(item_key: impl Into<String>, parent_id: DictionaryItemUid) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(item_key)
        }
    }

    /// Returns true once the item has been saved
    pub fn has_identity(&self) -> bool {
        self.id.is_some()
    }

    /// Sets the translation for a language, replacing any existing value
    pub fn set_translation(&mut self, language_id: i64, value: impl Into<String>) {
        let value = value.into();
        match self
            .translations
            .iter_mut()
            .find(|t| t.language_id == language_id)
        {
            Some(existing) => existing.value = value,
            None => self
                .translations
                .push(DictionaryTranslation::new(language_id, value)),
        }
    }

    /// Removes the translation for a language
    ///
    /// # Returns
    ///
    /// `true` if a translation was removed
    pub fn remove_translation(&mut self, language_id: i64) -> bool {
        let before = self.translations.len();
        self.translations.retain(|t| t.language_id != language_id);
        self.translations.len() != before
    }

    /// Returns the translated value for a language, if any
    pub fn translation(&self, language_id: i64) -> Option<&str> {
        self.translations
            .iter()
            .find(|t| t.language_id == language_id)
            .map(|t| t.value.as_str())
    }

    /// Returns the translation content keyed by language id
    ///
    /// Two items with equal maps carry the same translations regardless of
    /// row identities or ordering.
    pub fn translation_values(&self) -> BTreeMap<i64, String> {
        self.translations
            .iter()
            .map(|t| (t.language_id, t.value.clone()))
            .collect()
    }

    /// Validates the item before it is written to the store
    ///
    /// # Errors
    ///
    /// - `InvalidItem` when the key is blank
    /// - `ValidationFailed` when the key exceeds the maximum length
    /// - `DuplicateTranslation` when two translations share a language
    pub fn validate_for_save(&self) -> Result<(), DictionaryError> {
        if self.item_key.trim().is_empty() {
            return Err(DictionaryError::invalid_item("item key must not be blank"));
        }
        self.validate()?;

        let mut seen = HashSet::with_capacity(self.translations.len());
        for translation in &self.translations {
            if translation.language_id <= 0 {
                return Err(DictionaryError::invalid_item(format!(
                    "translation references invalid language id {}",
                    translation.language_id
                )));
            }
            if !seen.insert(translation.language_id) {
                return Err(DictionaryError::DuplicateTranslation {
                    key: self.item_key.clone(),
                    language_id: translation.language_id,
                });
            }
        }

        if self.parent_id == Some(self.unique_id) {
            return Err(DictionaryError::invalid_item("an item cannot be its own parent"));
        }

        Ok(())
    }
}

/// The text of a dictionary item in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryTranslation {
    /// Store-assigned identity, `None` until saved
    pub id: Option<i64>,
    /// External unique token
    pub unique_id: TranslationUid,
    /// Identity of the language this text is written in
    pub language_id: i64,
    /// ISO code of the language, populated when read from the store
    pub language_iso_code: Option<CultureCode>,
    /// The translated text
    pub value: String,
}

impl DictionaryTranslation {
    /// Creates a new unsaved translation
    pub fn new(language_id: i64, value: impl Into<String>) -> Self {
        Self {
            id: None,
            unique_id: TranslationUid::new(),
            language_id,
            language_iso_code: None,
            value: value.into(),
        }
    }
}
