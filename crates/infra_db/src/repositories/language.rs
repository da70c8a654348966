//! Language repository
//!
//! Maintains the single-default rule: saving a default language clears the
//! flag everywhere else, the first language saved becomes the default, and
//! the default can neither be unset directly nor deleted.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::any::AnyRow;
use tracing::{debug, info, instrument};

use core_kernel::CultureCode;
use domain_dictionary::{DictionaryError, Language, LanguageFilter};

use super::{
    chunk_size, distinct_ids, read_flag, read_i64, read_optional_i64, read_text, ReadRepository,
    WriteRepository,
};
use crate::error::DatabaseError;
use crate::scope::Scope;
use crate::sql::Sql;

const LANGUAGE_SELECT: &str = "SELECT id, iso_code, culture_name, is_default, is_mandatory, \
     fallback_language_id FROM languages";

/// Repository for languages
#[derive(Debug, Clone, Copy, Default)]
pub struct LanguageRepository;

impl LanguageRepository {
    pub fn new() -> Self {
        Self
    }

    /// Returns the language with the given culture code
    #[instrument(skip(self, scope), fields(scope_id = %scope.id(), iso_code = %iso_code))]
    pub async fn get_by_iso_code(
        &self,
        scope: &mut Scope,
        iso_code: &CultureCode,
    ) -> Result<Option<Language>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push(LANGUAGE_SELECT)
            .push(" WHERE iso_code = ")
            .push_bind(iso_code.as_str());
        self.fetch_one(scope, &sql).await
    }

    /// Returns the default language, if any language has been saved
    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    pub async fn get_default(&self, scope: &mut Scope) -> Result<Option<Language>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push(LANGUAGE_SELECT)
            .push(" WHERE is_default = 1 ORDER BY id");
        self.fetch_one(scope, &sql).await
    }

    async fn fetch_all(&self, scope: &mut Scope, sql: &Sql) -> Result<Vec<Language>, DatabaseError> {
        let rows = sql.fetch_all(scope.connection()?).await?;
        rows.iter().map(language_from_row).collect()
    }

    async fn fetch_one(&self, scope: &mut Scope, sql: &Sql) -> Result<Option<Language>, DatabaseError> {
        match sql.fetch_optional(scope.connection()?).await? {
            Some(row) => Ok(Some(language_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn default_language_id(&self, scope: &mut Scope) -> Result<Option<i64>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push("SELECT id FROM languages WHERE is_default = 1 ORDER BY id");
        match sql.fetch_optional(scope.connection()?).await? {
            Some(row) => Ok(Some(read_i64(&row, "id")?)),
            None => Ok(None),
        }
    }

    async fn id_exists(&self, scope: &mut Scope, id: i64) -> Result<bool, DatabaseError> {
        let mut sql = scope.sql();
        sql.push("SELECT COUNT(*) FROM languages WHERE id = ").push_bind(id);
        Ok(sql.fetch_scalar(scope.connection()?).await? > 0)
    }

    /// Resolves the default flag `language` will be stored with
    ///
    /// A language is promoted when no default exists yet. Un-flagging the
    /// current default is rejected.
    async fn resolve_default_flag(
        &self,
        scope: &mut Scope,
        language: &Language,
    ) -> Result<bool, DatabaseError> {
        if language.is_default {
            return Ok(true);
        }

        match self.default_language_id(scope).await? {
            None => {
                debug!(iso_code = %language.iso_code, "No default language yet, promoting");
                Ok(true)
            }
            Some(default_id) if Some(default_id) == language.id => Err(DictionaryError::invalid_language(format!(
                "'{}' is the default language; make another language the default instead",
                language.iso_code
            ))
            .into()),
            Some(_) => Ok(false),
        }
    }

    /// Clears the default flag on every language except `default_id`
    ///
    /// Must run after the `default_id` row is written.
    async fn clear_other_defaults(&self, scope: &mut Scope, default_id: i64) -> Result<(), DatabaseError> {
        let mut sql = scope.sql();
        sql.push("UPDATE languages SET is_default = 0 WHERE is_default = 1 AND id <> ")
            .push_bind(default_id);
        let cleared = scope.execute(&sql).await?;
        if cleared > 0 {
            debug!(cleared, "Cleared previous default language");
        }
        Ok(())
    }
}

#[async_trait]
impl ReadRepository for LanguageRepository {
    type Entity = Language;
    type Filter = LanguageFilter;

    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    async fn get(&self, scope: &mut Scope, id: i64) -> Result<Option<Language>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push(LANGUAGE_SELECT).push(" WHERE id = ").push_bind(id);
        self.fetch_one(scope, &sql).await
    }

    #[instrument(skip(self, scope, ids), fields(scope_id = %scope.id(), count = ids.len()))]
    async fn get_many(&self, scope: &mut Scope, ids: &[i64]) -> Result<Vec<Language>, DatabaseError> {
        let requested = distinct_ids(ids);
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let size = chunk_size(scope.syntax().as_ref());
        let mut by_id = HashMap::with_capacity(requested.len());
        for chunk in requested.chunks(size) {
            let mut sql = scope.sql();
            sql.push(LANGUAGE_SELECT)
                .push(" WHERE id IN ")
                .push_bind_list(chunk.iter().copied());
            for language in self.fetch_all(scope, &sql).await? {
                if let Some(id) = language.id {
                    by_id.insert(id, language);
                }
            }
        }

        Ok(requested.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    async fn get_all(&self, scope: &mut Scope) -> Result<Vec<Language>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push(LANGUAGE_SELECT).push(" ORDER BY iso_code");
        self.fetch_all(scope, &sql).await
    }

    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    async fn exists(&self, scope: &mut Scope, filter: &LanguageFilter) -> Result<bool, DatabaseError> {
        Ok(self.count(scope, filter).await? > 0)
    }

    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    async fn count(&self, scope: &mut Scope, filter: &LanguageFilter) -> Result<i64, DatabaseError> {
        let mut sql = scope.sql();
        sql.push("SELECT COUNT(*) FROM languages WHERE ");
        push_filter(&mut sql, filter);
        sql.fetch_scalar(scope.connection()?).await
    }
}

#[async_trait]
impl WriteRepository for LanguageRepository {
    #[instrument(skip(self, scope, language), fields(scope_id = %scope.id(), iso_code = %language.iso_code))]
    async fn add_or_update(&self, scope: &mut Scope, language: &mut Language) -> Result<(), DatabaseError> {
        language.validate_for_save()?;

        if let Some(id) = language.id {
            if !self.id_exists(scope, id).await? {
                return Err(DatabaseError::not_found("Language", id));
            }
        }
        if let Some(fallback) = language.fallback_language_id {
            if !self.id_exists(scope, fallback).await? {
                return Err(DatabaseError::ForeignKeyViolation(format!(
                    "fallback language {} does not exist",
                    fallback
                )));
            }
        }

        let is_default = self.resolve_default_flag(scope, language).await?;

        let id = match language.id {
            None => {
                let mut sql = scope.sql();
                sql.push("INSERT INTO languages (iso_code, culture_name, is_default, is_mandatory, fallback_language_id) VALUES (")
                    .push_bind(language.iso_code.as_str())
                    .push(", ")
                    .push_bind(&language.culture_name)
                    .push(", ")
                    .push_bind(is_default)
                    .push(", ")
                    .push_bind(language.is_mandatory)
                    .push(", ")
                    .push_bind(language.fallback_language_id)
                    .push(") RETURNING id");
                let id = sql.fetch_scalar(scope.connection()?).await?;
                info!(language_id = id, is_default, "Language created");
                id
            }
            Some(id) => {
                let mut sql = scope.sql();
                sql.push("UPDATE languages SET iso_code = ")
                    .push_bind(language.iso_code.as_str())
                    .push(", culture_name = ")
                    .push_bind(&language.culture_name)
                    .push(", is_default = ")
                    .push_bind(is_default)
                    .push(", is_mandatory = ")
                    .push_bind(language.is_mandatory)
                    .push(", fallback_language_id = ")
                    .push_bind(language.fallback_language_id)
                    .push(" WHERE id = ")
                    .push_bind(id);
                scope.execute(&sql).await?;
                info!(language_id = id, is_default, "Language updated");
                id
            }
        };

        if is_default {
            self.clear_other_defaults(scope, id).await?;
        }
        language.id = Some(id);
        language.is_default = is_default;
        Ok(())
    }

    /// Deletes a language and every translation written in it
    ///
    /// Languages falling back to the deleted one lose their fallback.
    #[instrument(skip(self, scope, language), fields(scope_id = %scope.id(), iso_code = %language.iso_code))]
    async fn delete(&self, scope: &mut Scope, language: &Language) -> Result<(), DatabaseError> {
        let id = language
            .id
            .ok_or_else(|| DatabaseError::not_found("Language", &language.iso_code))?;
        let stored = self
            .get(scope, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Language", id))?;

        if stored.is_default {
            return Err(DictionaryError::CannotDeleteDefaultLanguage(stored.iso_code.to_string()).into());
        }

        let mut fallbacks = scope.sql();
        fallbacks
            .push("UPDATE languages SET fallback_language_id = NULL WHERE fallback_language_id = ")
            .push_bind(id);
        let detached = scope.execute(&fallbacks).await?;

        let mut translations = scope.sql();
        translations
            .push("DELETE FROM dictionary_translations WHERE language_id = ")
            .push_bind(id);
        let removed = scope.execute(&translations).await?;

        let mut sql = scope.sql();
        sql.push("DELETE FROM languages WHERE id = ").push_bind(id);
        scope.execute(&sql).await?;

        info!(language_id = id, detached, removed, "Language deleted");
        Ok(())
    }
}

/// Renders a filter as a boolean SQL expression over `languages`
fn push_filter(sql: &mut Sql, filter: &LanguageFilter) {
    match filter {
        LanguageFilter::All => {
            sql.push("1 = 1");
        }
        LanguageFilter::IsoCodeEquals(iso_code) => {
            sql.push("iso_code = ").push_bind(iso_code.as_str());
        }
        LanguageFilter::IsDefault => {
            sql.push("is_default = 1");
        }
        LanguageFilter::IsMandatory => {
            sql.push("is_mandatory = 1");
        }
        LanguageFilter::And(filters) if filters.is_empty() => {
            sql.push("1 = 1");
        }
        LanguageFilter::And(filters) => {
            sql.push("(");
            for (index, inner) in filters.iter().enumerate() {
                if index > 0 {
                    sql.push(" AND ");
                }
                push_filter(sql, inner);
            }
            sql.push(")");
        }
    }
}

fn language_from_row(row: &AnyRow) -> Result<Language, DatabaseError> {
    let iso_code = CultureCode::parse(&read_text(row, "iso_code")?)
        .map_err(|e| DatabaseError::mapping("iso_code", e))?;

    Ok(Language {
        id: Some(read_i64(row, "id")?),
        iso_code,
        culture_name: read_text(row, "culture_name")?,
        is_default: read_flag(row, "is_default")?,
        is_mandatory: read_flag(row, "is_mandatory")?,
        fallback_language_id: read_optional_i64(row, "fallback_language_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::dialect::SqliteSyntax;

    #[test]
    fn test_language_filter_sql() {
        let mut sql = Sql::new(Arc::new(SqliteSyntax));
        let filter = LanguageFilter::IsMandatory
            .and(LanguageFilter::IsoCodeEquals(CultureCode::parse("da-DK").unwrap()));
        push_filter(&mut sql, &filter);

        assert_eq!(sql.text(), "(is_mandatory = 1 AND iso_code = ?)");
        assert_eq!(sql.args(), &[crate::sql::SqlArg::Text("da-DK".to_string())]);
    }
}
