//! Schema installation
//!
//! Creates the language, dictionary item and translation tables in the
//! syntax of the configured dialect. Every statement is idempotent, so
//! installing into an existing database leaves it untouched.
//!
//! ```sql
//! languages(id, iso_code UNIQUE, culture_name, is_default, is_mandatory, fallback_language_id)
//! dictionary_items(id, unique_id UNIQUE, parent_id, item_key UNIQUE)
//! dictionary_translations(id, unique_id UNIQUE, item_id, language_id, value, UNIQUE(item_id, language_id))
//! ```

use std::sync::Arc;

use tracing::info;

use domain_dictionary::item::MAX_KEY_LENGTH;
use domain_dictionary::language::MAX_CULTURE_NAME_LENGTH;

use crate::dialect::SqlSyntax;
use crate::error::DatabaseError;
use crate::scope::Scope;

pub const LANGUAGES_TABLE: &str = "languages";
pub const DICTIONARY_ITEMS_TABLE: &str = "dictionary_items";
pub const DICTIONARY_TRANSLATIONS_TABLE: &str = "dictionary_translations";

/// Length of a hyphenated UUID stored as text
const UNIQUE_ID_LENGTH: usize = 36;
/// Longest BCP-47 tag the store accepts
const MAX_ISO_CODE_LENGTH: usize = 35;

/// Generates and applies the dictionary schema for one dialect
#[derive(Debug, Clone)]
pub struct SchemaCreator {
    syntax: Arc<dyn SqlSyntax>,
}

impl SchemaCreator {
    pub fn new(syntax: Arc<dyn SqlSyntax>) -> Self {
        Self { syntax }
    }

    /// Returns the DDL statements in the order they must run
    pub fn statements(&self) -> Vec<String> {
        let identity = self.syntax.identity_column();
        let languages = self.syntax.quote_identifier(LANGUAGES_TABLE);
        let items = self.syntax.quote_identifier(DICTIONARY_ITEMS_TABLE);
        let translations = self.syntax.quote_identifier(DICTIONARY_TRANSLATIONS_TABLE);

        vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {languages} (\
                 id {identity}, \
                 iso_code VARCHAR({MAX_ISO_CODE_LENGTH}) NOT NULL UNIQUE, \
                 culture_name VARCHAR({MAX_CULTURE_NAME_LENGTH}) NOT NULL, \
                 is_default BIGINT NOT NULL DEFAULT 0, \
                 is_mandatory BIGINT NOT NULL DEFAULT 0, \
                 fallback_language_id BIGINT NULL REFERENCES {languages} (id))"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {items} (\
                 id {identity}, \
                 unique_id VARCHAR({UNIQUE_ID_LENGTH}) NOT NULL UNIQUE, \
                 parent_id VARCHAR({UNIQUE_ID_LENGTH}) NULL REFERENCES {items} (unique_id), \
                 item_key VARCHAR({MAX_KEY_LENGTH}) NOT NULL UNIQUE)"
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {translations} (\
                 id {identity}, \
                 unique_id VARCHAR({UNIQUE_ID_LENGTH}) NOT NULL UNIQUE, \
                 item_id BIGINT NOT NULL REFERENCES {items} (id), \
                 language_id BIGINT NOT NULL REFERENCES {languages} (id), \
                 value TEXT NOT NULL, \
                 UNIQUE (item_id, language_id))"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS ix_dictionary_items_parent_id ON {items} (parent_id)"
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS ix_dictionary_translations_language_id ON {translations} (language_id)"
            ),
        ]
    }

    /// Applies the schema inside the given scope
    ///
    /// The caller completes the scope to make the tables visible.
    pub async fn install(&self, scope: &mut Scope) -> Result<(), DatabaseError> {
        info!(provider = self.syntax.provider_name(), "Installing dictionary schema");

        for statement in self.statements() {
            let mut sql = scope.sql();
            sql.push(&statement);
            scope.execute(&sql).await.map_err(|e| match e {
                DatabaseError::OutOfScope => e,
                other => DatabaseError::SchemaFailed(other.to_string()),
            })?;
        }

        info!(provider = self.syntax.provider_name(), "Dictionary schema installed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{PostgresSyntax, SqliteSyntax};

    #[test]
    fn test_statements_use_dialect_identity() {
        let pg = SchemaCreator::new(Arc::new(PostgresSyntax)).statements();
        assert!(pg[0].contains("GENERATED BY DEFAULT AS IDENTITY"));

        let lite = SchemaCreator::new(Arc::new(SqliteSyntax)).statements();
        assert!(lite[0].contains("INTEGER PRIMARY KEY AUTOINCREMENT"));
    }

    #[test]
    fn test_tables_created_before_references() {
        let statements = SchemaCreator::new(Arc::new(SqliteSyntax)).statements();
        let position = |table: &str| {
            statements
                .iter()
                .position(|s| s.starts_with(&format!("CREATE TABLE IF NOT EXISTS \"{}\"", table)))
                .unwrap()
        };

        assert!(position(LANGUAGES_TABLE) < position(DICTIONARY_TRANSLATIONS_TABLE));
        assert!(position(DICTIONARY_ITEMS_TABLE) < position(DICTIONARY_TRANSLATIONS_TABLE));
    }

    #[test]
    fn test_translation_pair_is_unique() {
        let statements = SchemaCreator::new(Arc::new(PostgresSyntax)).statements();
        assert!(statements[2].contains("UNIQUE (item_id, language_id)"));
    }
}
