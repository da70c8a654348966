//! Filter predicates for dictionary and language queries
//!
//! Filters are plain data. The infrastructure layer renders them to SQL for
//! the configured dialect; `matches` evaluates the same predicate in memory.
//!
//! Key equality is exact. Prefix and substring matching ignore case for
//! ASCII letters only, which is what SQLite's `LIKE` does; other letters
//! compare as written. PostgreSQL's `ILIKE` also folds non-ASCII letters,
//! so on that store a key such as `Æble` is found by `æ` in SQL but not by
//! `matches`.

use core_kernel::{CultureCode, DictionaryItemUid};

use crate::item::DictionaryItem;
use crate::language::Language;

/// Predicate over dictionary items
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DictionaryFilter {
    /// Matches every item
    #[default]
    All,
    /// Key equals the value exactly
    KeyEquals(String),
    /// Key starts with the value, ignoring ASCII case
    KeyStartsWith(String),
    /// Key contains the value, ignoring ASCII case
    KeyContains(String),
    /// Item sits directly below the parent; `None` selects root items
    ParentIs(Option<DictionaryItemUid>),
    /// Item has a translation for the language id
    HasTranslationFor(i64),
    /// All inner filters match
    And(Vec<DictionaryFilter>),
    /// Any inner filter matches
    Or(Vec<DictionaryFilter>),
    /// The inner filter does not match
    Not(Box<DictionaryFilter>),
}

impl DictionaryFilter {
    pub fn key_equals(key: impl Into<String>) -> Self {
        DictionaryFilter::KeyEquals(key.into())
    }

    pub fn key_starts_with(prefix: impl Into<String>) -> Self {
        DictionaryFilter::KeyStartsWith(prefix.into())
    }

    pub fn key_contains(fragment: impl Into<String>) -> Self {
        DictionaryFilter::KeyContains(fragment.into())
    }

    pub fn roots() -> Self {
        DictionaryFilter::ParentIs(None)
    }

    pub fn children_of(parent_id: DictionaryItemUid) -> Self {
        DictionaryFilter::ParentIs(Some(parent_id))
    }

    /// Combines this filter with another using AND
    pub fn and(self, other: DictionaryFilter) -> Self {
        match self {
            DictionaryFilter::All => other,
            DictionaryFilter::And(mut filters) => {
                filters.push(other);
                DictionaryFilter::And(filters)
            }
            current => DictionaryFilter::And(vec![current, other]),
        }
    }

    /// Combines this filter with another using OR
    pub fn or(self, other: DictionaryFilter) -> Self {
        match self {
            DictionaryFilter::Or(mut filters) => {
                filters.push(other);
                DictionaryFilter::Or(filters)
            }
            current => DictionaryFilter::Or(vec![current, other]),
        }
    }

    /// Negates this filter
    pub fn negate(self) -> Self {
        DictionaryFilter::Not(Box::new(self))
    }

    /// Evaluates the filter against an item in memory
    pub fn matches(&self, item: &DictionaryItem) -> bool {
        match self {
            DictionaryFilter::All => true,
            DictionaryFilter::KeyEquals(key) => item.item_key == *key,
            DictionaryFilter::KeyStartsWith(prefix) => item
                .item_key
                .to_ascii_lowercase()
                .starts_with(&prefix.to_ascii_lowercase()),
            DictionaryFilter::KeyContains(fragment) => item
                .item_key
                .to_ascii_lowercase()
                .contains(&fragment.to_ascii_lowercase()),
            DictionaryFilter::ParentIs(parent) => item.parent_id == *parent,
            DictionaryFilter::HasTranslationFor(language_id) => item
                .translations
                .iter()
                .any(|t| t.language_id == *language_id),
            DictionaryFilter::And(filters) => filters.iter().all(|f| f.matches(item)),
            DictionaryFilter::Or(filters) => filters.iter().any(|f| f.matches(item)),
            DictionaryFilter::Not(inner) => !inner.matches(item),
        }
    }
}

/// Predicate over languages
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LanguageFilter {
    /// Matches every language
    #[default]
    All,
    /// ISO code equals the value
    IsoCodeEquals(CultureCode),
    /// Language is the default
    IsDefault,
    /// Language is mandatory
    IsMandatory,
    /// All inner filters match
    And(Vec<LanguageFilter>),
}

impl LanguageFilter {
    /// Combines this filter with another using AND
    pub fn and(self, other: LanguageFilter) -> Self {
        match self {
            LanguageFilter::All => other,
            LanguageFilter::And(mut filters) => {
                filters.push(other);
                LanguageFilter::And(filters)
            }
            current => LanguageFilter::And(vec![current, other]),
        }
    }

    /// Evaluates the filter against a language in memory
    pub fn matches(&self, language: &Language) -> bool {
        match self {
            LanguageFilter::All => true,
            LanguageFilter::IsoCodeEquals(code) => language.iso_code == *code,
            LanguageFilter::IsDefault => language.is_default,
            LanguageFilter::IsMandatory => language.is_mandatory,
            LanguageFilter::And(filters) => filters.iter().all(|f| f.matches(language)),
        }
    }
}
