//! Languages that dictionary translations are written in

use serde::{Deserialize, Serialize};
use validator::Validate;

use core_kernel::CultureCode;

use crate::error::DictionaryError;

/// Maximum length of a language display name
pub const MAX_CULTURE_NAME_LENGTH: usize = 100;

/// A language available for translations
///
/// Exactly one language in the store is the default. Translations point at
/// languages by identity; a language owns none of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Language {
    /// Store-assigned identity, `None` until saved
    pub id: Option<i64>,
    /// Culture code, unique across the store
    pub iso_code: CultureCode,
    /// Display name such as "English (United States)"
    #[validate(length(min = 1, max = 100))]
    pub culture_name: String,
    /// Whether this is the default language
    pub is_default: bool,
    /// Whether content must be translated into this language
    pub is_mandatory: bool,
    /// Language to fall back to when a translation is missing
    pub fallback_language_id: Option<i64>,
}

impl Language {
    /// Creates a new, non-default language
    ///
    /// # Errors
    ///
    /// Returns a culture error if `iso_code` is not a valid language tag
    pub fn new(iso_code: &str, culture_name: impl Into<String>) -> Result<Self, DictionaryError> {
        Ok(Self {
            id: None,
            iso_code: CultureCode::parse(iso_code)?,
            culture_name: culture_name.into(),
            is_default: false,
            is_mandatory: false,
            fallback_language_id: None,
        })
    }

    /// Marks this language as the default
    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Marks this language as mandatory
    pub fn as_mandatory(mut self) -> Self {
        self.is_mandatory = true;
        self
    }

    /// Sets the fallback language
    pub fn with_fallback(mut self, language_id: i64) -> Self {
        self.fallback_language_id = Some(language_id);
        self
    }

    /// Returns true once the language has been saved
    pub fn has_identity(&self) -> bool {
        self.id.is_some()
    }

    /// Validates the language before it is written to the store
    pub fn validate_for_save(&self) -> Result<(), DictionaryError> {
        if self.culture_name.trim().is_empty() {
            return Err(DictionaryError::invalid_language("culture name must not be blank"));
        }
        self.validate()?;

        if let (Some(id), Some(fallback)) = (self.id, self.fallback_language_id) {
            if id == fallback {
                return Err(DictionaryError::invalid_language(format!(
                    "language '{}' cannot fall back to itself",
                    self.iso_code
                )));
            }
        }

        Ok(())
    }
}
