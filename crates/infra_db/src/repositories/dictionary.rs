//! Dictionary item repository
//!
//! Items and their translations live in two tables. An item is always
//! loaded together with its translations; translation rows are read in one
//! batched join per chunk of items, never one query per item.
//!
//! Items form a tree through `parent_id`, which holds the parent's unique
//! token. Deleting an item deletes its whole subtree.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use sqlx::any::AnyRow;
use tracing::{debug, info, instrument};

use core_kernel::{CultureCode, DictionaryItemUid, TranslationUid};
use domain_dictionary::{DictionaryError, DictionaryFilter, DictionaryItem, DictionaryTranslation};

use super::{
    chunk_size, distinct_ids, read_i64, read_optional_text, read_text, ReadRepository,
    WriteRepository,
};
use crate::error::DatabaseError;
use crate::scope::Scope;
use crate::sql::{escape_like, Sql};

const ITEM_SELECT: &str = "SELECT id, unique_id, parent_id, item_key FROM dictionary_items";

const TRANSLATION_SELECT: &str = "SELECT t.id AS id, t.unique_id AS unique_id, t.item_id AS item_id, \
     t.language_id AS language_id, l.iso_code AS iso_code, t.value AS value \
     FROM dictionary_translations t INNER JOIN languages l ON l.id = t.language_id";

/// Repository for dictionary items and their translations
///
/// # Example
///
/// ```rust,ignore
/// let repository = DictionaryRepository::new();
/// let mut scope = provider.create_scope().await?;
///
/// let mut item = DictionaryItem::new("Footer.Copyright");
/// item.set_translation(english.id.unwrap(), "All rights reserved");
/// repository.add_or_update(&mut scope, &mut item).await?;
///
/// let loaded = repository.get_by_key(&mut scope, "Footer.Copyright").await?;
/// scope.complete().await?;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DictionaryRepository;

impl DictionaryRepository {
    pub fn new() -> Self {
        Self
    }

    /// Returns the item with the given key
    ///
    /// Keys are compared exactly.
    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    pub async fn get_by_key(
        &self,
        scope: &mut Scope,
        key: &str,
    ) -> Result<Option<DictionaryItem>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push(ITEM_SELECT).push(" WHERE item_key = ").push_bind(key);
        Ok(self.fetch_items(scope, &sql).await?.into_iter().next())
    }

    /// Returns the item with the given unique token
    #[instrument(skip(self, scope), fields(scope_id = %scope.id(), unique_id = %unique_id))]
    pub async fn get_by_unique_id(
        &self,
        scope: &mut Scope,
        unique_id: DictionaryItemUid,
    ) -> Result<Option<DictionaryItem>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push(ITEM_SELECT)
            .push(" WHERE unique_id = ")
            .push_bind(unique_id.to_storage());
        Ok(self.fetch_items(scope, &sql).await?.into_iter().next())
    }

    /// Returns the items for the unique tokens that exist, in request order
    #[instrument(skip(self, scope, unique_ids), fields(scope_id = %scope.id(), count = unique_ids.len()))]
    pub async fn get_many_by_unique_ids(
        &self,
        scope: &mut Scope,
        unique_ids: &[DictionaryItemUid],
    ) -> Result<Vec<DictionaryItem>, DatabaseError> {
        let mut seen = HashSet::with_capacity(unique_ids.len());
        let requested: Vec<DictionaryItemUid> = unique_ids
            .iter()
            .copied()
            .filter(|uid| seen.insert(*uid))
            .collect();
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let size = chunk_size(scope.syntax().as_ref());
        let mut found = Vec::with_capacity(requested.len());
        for chunk in requested.chunks(size) {
            let mut sql = scope.sql();
            sql.push(ITEM_SELECT)
                .push(" WHERE unique_id IN ")
                .push_bind_list(chunk.iter().map(|uid| uid.to_storage()));
            found.extend(self.fetch_item_rows(scope, &sql).await?);
        }
        self.load_translations(scope, &mut found).await?;

        let mut by_uid: HashMap<DictionaryItemUid, DictionaryItem> =
            found.into_iter().map(|item| (item.unique_id, item)).collect();
        let items: Vec<_> = requested
            .iter()
            .filter_map(|uid| by_uid.remove(uid))
            .collect();

        debug!(requested = requested.len(), found = items.len(), "Loaded items by unique id");
        Ok(items)
    }

    /// Returns the direct children of an item, or the root items for `None`
    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    pub async fn get_children(
        &self,
        scope: &mut Scope,
        parent_id: Option<DictionaryItemUid>,
    ) -> Result<Vec<DictionaryItem>, DatabaseError> {
        self.find(scope, &DictionaryFilter::ParentIs(parent_id)).await
    }

    /// Returns every item below `parent_id` that matches the filter
    ///
    /// With `None` the whole dictionary is searched. Results are ordered
    /// level by level, then by key.
    #[instrument(skip(self, scope, filter), fields(scope_id = %scope.id()))]
    pub async fn get_descendants(
        &self,
        scope: &mut Scope,
        parent_id: Option<DictionaryItemUid>,
        filter: &DictionaryFilter,
    ) -> Result<Vec<DictionaryItem>, DatabaseError> {
        let Some(parent_id) = parent_id else {
            return self.find(scope, filter).await;
        };

        let levels = self.descendant_levels(scope, parent_id.to_storage()).await?;
        let ids: Vec<i64> = levels.into_iter().flatten().map(|(id, _)| id).collect();
        let items = self.get_many(scope, &ids).await?;

        Ok(items.into_iter().filter(|item| filter.matches(item)).collect())
    }

    /// Returns the items matching the filter, ordered by key
    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    pub async fn find(
        &self,
        scope: &mut Scope,
        filter: &DictionaryFilter,
    ) -> Result<Vec<DictionaryItem>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push(ITEM_SELECT).push(" WHERE ");
        push_filter(&mut sql, filter);
        sql.push(" ORDER BY item_key");

        let items = self.fetch_items(scope, &sql).await?;
        debug!(count = items.len(), "Found items");
        Ok(items)
    }

    /// Returns true if an item with the given identity exists
    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    pub async fn exists_by_id(&self, scope: &mut Scope, id: i64) -> Result<bool, DatabaseError> {
        let mut sql = scope.sql();
        sql.push("SELECT COUNT(*) FROM dictionary_items WHERE id = ").push_bind(id);
        Ok(sql.fetch_scalar(scope.connection()?).await? > 0)
    }

    /// Returns every item key mapped to its unique token
    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    pub async fn get_key_map(
        &self,
        scope: &mut Scope,
    ) -> Result<BTreeMap<String, DictionaryItemUid>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push("SELECT item_key, unique_id FROM dictionary_items");

        let rows = sql.fetch_all(scope.connection()?).await?;
        rows.iter()
            .map(|row| -> Result<_, DatabaseError> {
                Ok((read_text(row, "item_key")?, parse_item_uid(row, "unique_id")?))
            })
            .collect()
    }

    async fn fetch_items(
        &self,
        scope: &mut Scope,
        sql: &Sql,
    ) -> Result<Vec<DictionaryItem>, DatabaseError> {
        let mut items = self.fetch_item_rows(scope, sql).await?;
        self.load_translations(scope, &mut items).await?;
        Ok(items)
    }

    async fn fetch_item_rows(
        &self,
        scope: &mut Scope,
        sql: &Sql,
    ) -> Result<Vec<DictionaryItem>, DatabaseError> {
        let rows = sql.fetch_all(scope.connection()?).await?;
        rows.iter().map(item_from_row).collect()
    }

    /// Replaces each item's translations with the rows stored for it
    async fn load_translations(
        &self,
        scope: &mut Scope,
        items: &mut [DictionaryItem],
    ) -> Result<(), DatabaseError> {
        let ids: Vec<i64> = items.iter().filter_map(|item| item.id).collect();
        if ids.is_empty() {
            return Ok(());
        }

        let size = chunk_size(scope.syntax().as_ref());
        let mut by_item: HashMap<i64, Vec<DictionaryTranslation>> = HashMap::new();
        for chunk in ids.chunks(size) {
            let mut sql = scope.sql();
            sql.push(TRANSLATION_SELECT)
                .push(" WHERE t.item_id IN ")
                .push_bind_list(chunk.iter().copied())
                .push(" ORDER BY t.item_id, t.language_id");

            let rows = sql.fetch_all(scope.connection()?).await?;
            for row in &rows {
                let item_id = read_i64(row, "item_id")?;
                by_item
                    .entry(item_id)
                    .or_default()
                    .push(translation_from_row(row)?);
            }
        }

        for item in items.iter_mut() {
            item.translations = item
                .id
                .and_then(|id| by_item.remove(&id))
                .unwrap_or_default();
        }
        Ok(())
    }

    /// Collects the subtree below an item, one vector per depth
    ///
    /// Each entry is `(id, unique_id)`. Items already visited are skipped,
    /// so a corrupted cycle cannot loop forever.
    async fn descendant_levels(
        &self,
        scope: &mut Scope,
        root_unique_id: String,
    ) -> Result<Vec<Vec<(i64, String)>>, DatabaseError> {
        let size = chunk_size(scope.syntax().as_ref());
        let mut visited = HashSet::from([root_unique_id.clone()]);
        let mut frontier = vec![root_unique_id];
        let mut levels = Vec::new();

        while !frontier.is_empty() {
            let mut level = Vec::new();
            for chunk in frontier.chunks(size) {
                let mut sql = scope.sql();
                sql.push("SELECT id, unique_id FROM dictionary_items WHERE parent_id IN ")
                    .push_bind_list(chunk.iter())
                    .push(" ORDER BY item_key");

                let rows = sql.fetch_all(scope.connection()?).await?;
                for row in &rows {
                    let unique_id = read_text(row, "unique_id")?;
                    if visited.insert(unique_id.clone()) {
                        level.push((read_i64(row, "id")?, unique_id));
                    }
                }
            }

            if level.is_empty() {
                break;
            }
            frontier = level.iter().map(|(_, uid)| uid.clone()).collect();
            levels.push(level);
        }

        Ok(levels)
    }

    async fn stored_unique_id(
        &self,
        scope: &mut Scope,
        id: i64,
    ) -> Result<Option<DictionaryItemUid>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push("SELECT unique_id FROM dictionary_items WHERE id = ").push_bind(id);
        match sql.fetch_optional(scope.connection()?).await? {
            Some(row) => Ok(Some(parse_item_uid(&row, "unique_id")?)),
            None => Ok(None),
        }
    }

    async fn unique_id_exists(
        &self,
        scope: &mut Scope,
        unique_id: DictionaryItemUid,
    ) -> Result<bool, DatabaseError> {
        let mut sql = scope.sql();
        sql.push("SELECT COUNT(*) FROM dictionary_items WHERE unique_id = ")
            .push_bind(unique_id.to_storage());
        Ok(sql.fetch_scalar(scope.connection()?).await? > 0)
    }

    /// Fails if `parent_id` is missing or lies inside the subtree of `item`
    async fn check_parent(
        &self,
        scope: &mut Scope,
        item: &DictionaryItem,
    ) -> Result<(), DatabaseError> {
        let Some(parent_id) = item.parent_id else {
            return Ok(());
        };

        if !self.unique_id_exists(scope, parent_id).await? {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "parent item '{}' does not exist",
                parent_id
            )));
        }

        if !item.has_identity() {
            return Ok(());
        }

        // Walk up from the new parent; meeting the item itself means a cycle
        let mut visited = HashSet::new();
        let mut current = Some(parent_id.to_storage());
        let own = item.unique_id.to_storage();
        while let Some(unique_id) = current {
            if unique_id == own {
                return Err(DictionaryError::invalid_item(format!(
                    "moving '{}' below '{}' would create a cycle",
                    item.item_key, parent_id
                ))
                .into());
            }
            if !visited.insert(unique_id.clone()) {
                break;
            }

            let mut sql = scope.sql();
            sql.push("SELECT parent_id FROM dictionary_items WHERE unique_id = ")
                .push_bind(unique_id);
            current = match sql.fetch_optional(scope.connection()?).await? {
                Some(row) => read_optional_text(&row, "parent_id")?,
                None => None,
            };
        }

        Ok(())
    }

    async fn replace_translations(
        &self,
        scope: &mut Scope,
        item_id: i64,
        translations: &mut [DictionaryTranslation],
    ) -> Result<(), DatabaseError> {
        let mut delete = scope.sql();
        delete
            .push("DELETE FROM dictionary_translations WHERE item_id = ")
            .push_bind(item_id);
        let removed = scope.execute(&delete).await?;

        for translation in translations.iter_mut() {
            let mut insert = scope.sql();
            insert
                .push("INSERT INTO dictionary_translations (unique_id, item_id, language_id, value) VALUES (")
                .push_bind(translation.unique_id.to_storage())
                .push(", ")
                .push_bind(item_id)
                .push(", ")
                .push_bind(translation.language_id)
                .push(", ")
                .push_bind(&translation.value)
                .push(") RETURNING id");
            translation.id = Some(insert.fetch_scalar(scope.connection()?).await?);
        }

        debug!(item_id, removed, inserted = translations.len(), "Translations replaced");
        Ok(())
    }
}

#[async_trait]
impl ReadRepository for DictionaryRepository {
    type Entity = DictionaryItem;
    type Filter = DictionaryFilter;

    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    async fn get(&self, scope: &mut Scope, id: i64) -> Result<Option<DictionaryItem>, DatabaseError> {
        let mut sql = scope.sql();
        sql.push(ITEM_SELECT).push(" WHERE id = ").push_bind(id);
        Ok(self.fetch_items(scope, &sql).await?.into_iter().next())
    }

    #[instrument(skip(self, scope, ids), fields(scope_id = %scope.id(), count = ids.len()))]
    async fn get_many(&self, scope: &mut Scope, ids: &[i64]) -> Result<Vec<DictionaryItem>, DatabaseError> {
        let requested = distinct_ids(ids);
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let size = chunk_size(scope.syntax().as_ref());
        let mut found = Vec::with_capacity(requested.len());
        for chunk in requested.chunks(size) {
            let mut sql = scope.sql();
            sql.push(ITEM_SELECT)
                .push(" WHERE id IN ")
                .push_bind_list(chunk.iter().copied());
            found.extend(self.fetch_item_rows(scope, &sql).await?);
        }
        self.load_translations(scope, &mut found).await?;

        let mut by_id: HashMap<i64, DictionaryItem> = found
            .into_iter()
            .filter_map(|item| item.id.map(|id| (id, item)))
            .collect();
        let items: Vec<_> = requested.iter().filter_map(|id| by_id.remove(id)).collect();

        debug!(requested = requested.len(), found = items.len(), "Loaded items by id");
        Ok(items)
    }

    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    async fn get_all(&self, scope: &mut Scope) -> Result<Vec<DictionaryItem>, DatabaseError> {
        self.find(scope, &DictionaryFilter::All).await
    }

    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    async fn exists(&self, scope: &mut Scope, filter: &DictionaryFilter) -> Result<bool, DatabaseError> {
        Ok(self.count(scope, filter).await? > 0)
    }

    #[instrument(skip(self, scope), fields(scope_id = %scope.id()))]
    async fn count(&self, scope: &mut Scope, filter: &DictionaryFilter) -> Result<i64, DatabaseError> {
        let mut sql = scope.sql();
        sql.push("SELECT COUNT(*) FROM dictionary_items WHERE ");
        push_filter(&mut sql, filter);
        sql.fetch_scalar(scope.connection()?).await
    }
}

#[async_trait]
impl WriteRepository for DictionaryRepository {
    /// Saves the item and makes its stored translations equal to
    /// `item.translations`
    ///
    /// A transient item is inserted; a saved item is updated by identity.
    /// The unique token of a saved item never changes: the stored token is
    /// written back into `item`.
    #[instrument(skip(self, scope, item), fields(scope_id = %scope.id(), item_key = %item.item_key))]
    async fn add_or_update(&self, scope: &mut Scope, item: &mut DictionaryItem) -> Result<(), DatabaseError> {
        item.validate_for_save()?;

        let item_id = match item.id {
            None => {
                self.check_parent(scope, item).await?;

                let mut sql = scope.sql();
                sql.push("INSERT INTO dictionary_items (unique_id, parent_id, item_key) VALUES (")
                    .push_bind(item.unique_id.to_storage())
                    .push(", ")
                    .push_bind(item.parent_id.map(|p| p.to_storage()))
                    .push(", ")
                    .push_bind(&item.item_key)
                    .push(") RETURNING id");
                let id = sql.fetch_scalar(scope.connection()?).await?;
                item.id = Some(id);
                info!(item_id = id, "Dictionary item created");
                id
            }
            Some(id) => {
                item.unique_id = self
                    .stored_unique_id(scope, id)
                    .await?
                    .ok_or_else(|| DatabaseError::not_found("DictionaryItem", id))?;
                item.validate_for_save()?;
                self.check_parent(scope, item).await?;

                let mut sql = scope.sql();
                sql.push("UPDATE dictionary_items SET parent_id = ")
                    .push_bind(item.parent_id.map(|p| p.to_storage()))
                    .push(", item_key = ")
                    .push_bind(&item.item_key)
                    .push(" WHERE id = ")
                    .push_bind(id);
                scope.execute(&sql).await?;
                info!(item_id = id, "Dictionary item updated");
                id
            }
        };

        self.replace_translations(scope, item_id, &mut item.translations).await
    }

    /// Deletes the item, its subtree, and every translation they own
    #[instrument(skip(self, scope, item), fields(scope_id = %scope.id(), item_key = %item.item_key))]
    async fn delete(&self, scope: &mut Scope, item: &DictionaryItem) -> Result<(), DatabaseError> {
        let id = item
            .id
            .ok_or_else(|| DatabaseError::not_found("DictionaryItem", item.unique_id))?;
        let unique_id = self
            .stored_unique_id(scope, id)
            .await?
            .ok_or_else(|| DatabaseError::not_found("DictionaryItem", id))?;

        let mut levels = vec![vec![(id, unique_id.to_storage())]];
        levels.extend(self.descendant_levels(scope, unique_id.to_storage()).await?);
        let all_ids: Vec<i64> = levels.iter().flatten().map(|(id, _)| *id).collect();

        let size = chunk_size(scope.syntax().as_ref());
        for chunk in all_ids.chunks(size) {
            let mut sql = scope.sql();
            sql.push("DELETE FROM dictionary_translations WHERE item_id IN ")
                .push_bind_list(chunk.iter().copied());
            scope.execute(&sql).await?;
        }

        // Children reference their parent, so remove the deepest level first
        for level in levels.iter().rev() {
            let ids: Vec<i64> = level.iter().map(|(id, _)| *id).collect();
            for chunk in ids.chunks(size) {
                let mut sql = scope.sql();
                sql.push("DELETE FROM dictionary_items WHERE id IN ")
                    .push_bind_list(chunk.iter().copied());
                scope.execute(&sql).await?;
            }
        }

        info!(item_id = id, removed = all_ids.len(), "Dictionary item deleted");
        Ok(())
    }
}

/// Renders a filter as a boolean SQL expression over `dictionary_items`
fn push_filter(sql: &mut Sql, filter: &DictionaryFilter) {
    match filter {
        DictionaryFilter::All => {
            sql.push("1 = 1");
        }
        DictionaryFilter::KeyEquals(key) => {
            sql.push("item_key = ").push_bind(key);
        }
        DictionaryFilter::KeyStartsWith(prefix) => {
            sql.push_like("item_key", format!("{}%", escape_like(prefix)));
        }
        DictionaryFilter::KeyContains(fragment) => {
            sql.push_like("item_key", format!("%{}%", escape_like(fragment)));
        }
        DictionaryFilter::ParentIs(None) => {
            sql.push("parent_id IS NULL");
        }
        DictionaryFilter::ParentIs(Some(parent_id)) => {
            sql.push("parent_id = ").push_bind(parent_id.to_storage());
        }
        DictionaryFilter::HasTranslationFor(language_id) => {
            sql.push(
                "EXISTS (SELECT 1 FROM dictionary_translations dt \
                 WHERE dt.item_id = dictionary_items.id AND dt.language_id = ",
            )
            .push_bind(*language_id)
            .push(")");
        }
        DictionaryFilter::And(filters) => push_group(sql, filters, " AND ", "1 = 1"),
        DictionaryFilter::Or(filters) => push_group(sql, filters, " OR ", "1 = 0"),
        DictionaryFilter::Not(inner) => {
            sql.push("NOT (");
            push_filter(sql, inner);
            sql.push(")");
        }
    }
}

fn push_group(sql: &mut Sql, filters: &[DictionaryFilter], separator: &str, empty: &str) {
    if filters.is_empty() {
        sql.push(empty);
        return;
    }
    sql.push("(");
    for (index, filter) in filters.iter().enumerate() {
        if index > 0 {
            sql.push(separator);
        }
        push_filter(sql, filter);
    }
    sql.push(")");
}

fn parse_item_uid(row: &AnyRow, column: &str) -> Result<DictionaryItemUid, DatabaseError> {
    read_text(row, column)?
        .parse()
        .map_err(|e| DatabaseError::mapping(column, e))
}

fn item_from_row(row: &AnyRow) -> Result<DictionaryItem, DatabaseError> {
    let parent_id = match read_optional_text(row, "parent_id")? {
        Some(value) => Some(
            value
                .parse()
                .map_err(|e| DatabaseError::mapping("parent_id", e))?,
        ),
        None => None,
    };

    Ok(DictionaryItem {
        id: Some(read_i64(row, "id")?),
        unique_id: parse_item_uid(row, "unique_id")?,
        parent_id,
        item_key: read_text(row, "item_key")?,
        translations: Vec::new(),
    })
}

fn translation_from_row(row: &AnyRow) -> Result<DictionaryTranslation, DatabaseError> {
    let unique_id: TranslationUid = read_text(row, "unique_id")?
        .parse()
        .map_err(|e| DatabaseError::mapping("unique_id", e))?;
    let iso_code = CultureCode::parse(&read_text(row, "iso_code")?)
        .map_err(|e| DatabaseError::mapping("iso_code", e))?;

    Ok(DictionaryTranslation {
        id: Some(read_i64(row, "id")?),
        unique_id,
        language_id: read_i64(row, "language_id")?,
        language_iso_code: Some(iso_code),
        value: read_text(row, "value")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::dialect::{PostgresSyntax, SqliteSyntax};

    fn render(filter: &DictionaryFilter) -> Sql {
        let mut sql = Sql::new(Arc::new(PostgresSyntax));
        push_filter(&mut sql, filter);
        sql
    }

    #[test]
    fn test_key_filters() {
        assert_eq!(render(&DictionaryFilter::key_equals("Home")).text(), "item_key = $1");

        let prefix = render(&DictionaryFilter::key_starts_with("50%"));
        assert_eq!(prefix.text(), "item_key ILIKE $1 ESCAPE '\\'");
        assert_eq!(prefix.args(), &[crate::sql::SqlArg::Text("50\\%%".to_string())]);
    }

    #[test]
    fn test_combinators_nest() {
        let filter = DictionaryFilter::roots()
            .and(DictionaryFilter::key_contains("nav").or(DictionaryFilter::HasTranslationFor(2)))
            .and(DictionaryFilter::key_equals("x").negate());
        let sql = render(&filter);

        assert!(sql.text().starts_with("(parent_id IS NULL AND ("));
        assert!(sql.text().contains(" OR EXISTS (SELECT 1 FROM dictionary_translations dt"));
        assert!(sql.text().ends_with("NOT (item_key = $3))"));
        assert_eq!(sql.args().len(), 3);
    }

    #[test]
    fn test_empty_groups() {
        assert_eq!(render(&DictionaryFilter::Or(vec![])).text(), "1 = 0");
        assert_eq!(render(&DictionaryFilter::And(vec![])).text(), "1 = 1");
    }

    #[test]
    fn test_sqlite_parent_filter() {
        let mut sql = Sql::new(Arc::new(SqliteSyntax));
        let parent = DictionaryItemUid::new();
        push_filter(&mut sql, &DictionaryFilter::children_of(parent));

        assert_eq!(sql.text(), "parent_id = ?");
        assert_eq!(sql.args(), &[crate::sql::SqlArg::Text(parent.to_storage())]);
    }
}
