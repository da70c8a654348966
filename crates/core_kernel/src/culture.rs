//! Culture codes for languages
//!
//! A culture code is a BCP-47 language tag such as `en-US` or `fr`. Codes
//! are parsed with `unic-langid` and kept in canonical casing, so `EN-us`
//! and `en-US` refer to the same language.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

use crate::error::CoreError;

/// A validated, canonicalized culture code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CultureCode(String);

impl CultureCode {
    /// Parses and canonicalizes a culture code
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidCulture` when the value is blank or is not
    /// a well-formed language tag.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidCulture(value.to_string()));
        }

        let langid: LanguageIdentifier = trimmed
            .parse()
            .map_err(|_| CoreError::InvalidCulture(value.to_string()))?;

        Ok(Self(langid.to_string()))
    }

    /// Returns the canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the primary language subtag (`en` for `en-US`)
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for CultureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CultureCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CultureCode {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CultureCode> for String {
    fn from(code: CultureCode) -> String {
        code.0
    }
}

impl AsRef<str> for CultureCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
