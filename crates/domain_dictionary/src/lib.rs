//! Dictionary Domain
//!
//! This crate models the translation dictionary of the content-management
//! system: keyed dictionary items, their per-language translations, and
//! the languages those translations are written in.
//!
//! # Model
//!
//! - **DictionaryItem**: a unique key (e.g. `"Footer.Copyright"`), an
//!   integer identity assigned by the store, an external unique token, an
//!   optional parent item, and zero or more translations.
//! - **DictionaryTranslation**: the text of one item in one language. An
//!   item holds at most one translation per language.
//! - **Language**: a culture code and display name. Languages are saved
//!   independently and referenced by translations through their identity.
//!
//! # Examples
//!
//! ```rust
//! use domain_dictionary::DictionaryItem;
//!
//! let mut item = DictionaryItem::new("Footer.Copyright");
//! item.set_translation(1, "All rights reserved");
//! item.set_translation(2, "Tous droits réservés");
//! item.set_translation(1, "All rights reserved.");
//!
//! assert_eq!(item.translations.len(), 2);
//! assert_eq!(item.translation(1), Some("All rights reserved."));
//! ```

pub mod item;
pub mod language;
pub mod query;
pub mod error;

pub use item::{DictionaryItem, DictionaryTranslation};
pub use language::Language;
pub use query::{DictionaryFilter, LanguageFilter};
pub use error::DictionaryError;
