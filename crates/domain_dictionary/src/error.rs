//! Dictionary domain errors
//!
//! This module defines the errors raised when dictionary items or
//! languages fail validation before they reach the store.

use thiserror::Error;

use core_kernel::CoreError;

/// Errors that can occur in the dictionary domain
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Dictionary item data failed validation
    #[error("Invalid dictionary item: {0}")]
    InvalidItem(String),

    /// An item carries two translations for the same language
    #[error("Dictionary item '{key}' has more than one translation for language {language_id}")]
    DuplicateTranslation { key: String, language_id: i64 },

    /// Language data failed validation
    #[error("Invalid language: {0}")]
    InvalidLanguage(String),

    /// The default language cannot be removed
    #[error("Cannot delete the default language '{0}'")]
    CannotDeleteDefaultLanguage(String),

    /// Field-level validation failed
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Culture code or identifier error from the kernel
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl DictionaryError {
    /// Creates an InvalidItem error with a message
    pub fn invalid_item(message: impl Into<String>) -> Self {
        DictionaryError::InvalidItem(message.into())
    }

    /// Creates an InvalidLanguage error with a message
    pub fn invalid_language(message: impl Into<String>) -> Self {
        DictionaryError::InvalidLanguage(message.into())
    }
}

impl From<validator::ValidationErrors> for DictionaryError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DictionaryError::ValidationFailed(errors.to_string())
    }
}
