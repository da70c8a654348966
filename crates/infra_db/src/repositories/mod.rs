//! Repository implementations for the dictionary aggregates
//!
//! Repositories hold no connection of their own. Every operation takes the
//! caller's `&mut Scope`, so all reads and writes of a unit of work share
//! one connection and one transaction.
//!
//! # Architecture
//!
//! Each repository follows these principles:
//! - Lookups return `Option`; `NotFound` is reserved for writes that target
//!   a missing identity
//! - Entities are validated before any statement is sent
//! - Id lists are queried in chunks bounded by the dialect's parameter limit
//! - Filters are rendered to SQL matching their in-memory `matches`, except
//!   for non-ASCII case folding under PostgreSQL `ILIKE`

pub mod dictionary;
pub mod language;

pub use dictionary::DictionaryRepository;
pub use language::LanguageRepository;

use async_trait::async_trait;
use sqlx::any::AnyRow;
use sqlx::Row;

use crate::dialect::SqlSyntax;
use crate::error::DatabaseError;
use crate::scope::Scope;

/// Upper bound on ids bound into a single `IN` list
const MAX_CHUNK_SIZE: usize = 500;

/// Parameters kept free for the non-list part of a chunked statement
const RESERVED_PARAMETERS: usize = 10;

/// Read operations shared by all repositories
#[async_trait]
pub trait ReadRepository: Send + Sync {
    /// The aggregate this repository loads
    type Entity: Send;
    /// Predicate accepted by `exists` and `count`
    type Filter: Send + Sync;

    /// Returns the entity with the given identity, if any
    async fn get(&self, scope: &mut Scope, id: i64) -> Result<Option<Self::Entity>, DatabaseError>;

    /// Returns the entities for the ids that exist, in request order
    ///
    /// Missing ids are omitted rather than reported.
    async fn get_many(&self, scope: &mut Scope, ids: &[i64]) -> Result<Vec<Self::Entity>, DatabaseError>;

    /// Returns every entity
    async fn get_all(&self, scope: &mut Scope) -> Result<Vec<Self::Entity>, DatabaseError>;

    /// Returns true if any entity matches the filter
    async fn exists(&self, scope: &mut Scope, filter: &Self::Filter) -> Result<bool, DatabaseError>;

    /// Counts the entities matching the filter
    async fn count(&self, scope: &mut Scope, filter: &Self::Filter) -> Result<i64, DatabaseError>;
}

/// Write operations shared by all repositories
#[async_trait]
pub trait WriteRepository: ReadRepository {
    /// Inserts a transient entity or updates a saved one
    ///
    /// Store-assigned identities are written back into `entity`.
    async fn add_or_update(&self, scope: &mut Scope, entity: &mut Self::Entity) -> Result<(), DatabaseError>;

    /// Deletes a saved entity and everything it owns
    async fn delete(&self, scope: &mut Scope, entity: &Self::Entity) -> Result<(), DatabaseError>;
}

/// Number of ids a single `IN` list may carry on this dialect
pub(crate) fn chunk_size(syntax: &dyn SqlSyntax) -> usize {
    syntax
        .max_parameters()
        .saturating_sub(RESERVED_PARAMETERS)
        .clamp(1, MAX_CHUNK_SIZE)
}

/// Removes repeated ids while keeping the first occurrence of each
pub(crate) fn distinct_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

pub(crate) fn read_i64(row: &AnyRow, column: &str) -> Result<i64, DatabaseError> {
    row.try_get::<i64, _>(column)
        .map_err(|e| DatabaseError::mapping(column, e))
}

pub(crate) fn read_optional_i64(row: &AnyRow, column: &str) -> Result<Option<i64>, DatabaseError> {
    row.try_get::<Option<i64>, _>(column)
        .map_err(|e| DatabaseError::mapping(column, e))
}

pub(crate) fn read_text(row: &AnyRow, column: &str) -> Result<String, DatabaseError> {
    row.try_get::<String, _>(column)
        .map_err(|e| DatabaseError::mapping(column, e))
}

pub(crate) fn read_optional_text(row: &AnyRow, column: &str) -> Result<Option<String>, DatabaseError> {
    row.try_get::<Option<String>, _>(column)
        .map_err(|e| DatabaseError::mapping(column, e))
}

/// Flags are stored as 0/1 integers
pub(crate) fn read_flag(row: &AnyRow, column: &str) -> Result<bool, DatabaseError> {
    Ok(read_i64(row, column)? != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{PostgresSyntax, SqliteSyntax};

    #[test]
    fn test_chunk_size_respects_dialect_limit() {
        assert_eq!(chunk_size(&PostgresSyntax), MAX_CHUNK_SIZE);
        assert!(chunk_size(&SqliteSyntax) <= SqliteSyntax.max_parameters());
    }

    #[test]
    fn test_distinct_ids_keeps_order() {
        assert_eq!(distinct_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(distinct_ids(&[]).is_empty());
    }
}
