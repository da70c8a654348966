//! SQL dialects and provider-name resolution
//!
//! Every supported database engine is described by a `SqlSyntax`
//! implementation: how parameters are written, how identity columns are
//! declared, which connection strings it accepts, and which retry policies
//! apply to it. The `DialectRegistry` resolves a provider name from the
//! configuration to one of these handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Describes the SQL syntax and connection behaviour of one database engine
pub trait SqlSyntax: Send + Sync + fmt::Debug {
    /// Canonical provider name, e.g. `"postgres"`
    fn provider_name(&self) -> &'static str;

    /// Alternative provider names that resolve to this dialect
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns true if the connection string targets this engine
    fn accepts_connection_string(&self, connection_string: &str) -> bool;

    /// Renders the placeholder for the 1-based parameter `index`
    fn placeholder(&self, index: usize) -> String;

    /// Column definition of an auto-incrementing integer primary key
    fn identity_column(&self) -> &'static str;

    /// Operator for case-insensitive `LIKE` matching
    fn case_insensitive_like(&self) -> &'static str;

    /// Maximum number of bind parameters a single statement may carry
    fn max_parameters(&self) -> usize;

    /// Quotes an identifier
    fn quote_identifier(&self, identifier: &str) -> String {
        format!("\"{}\"", identifier.replace('"', "\"\""))
    }

    /// Policy applied when acquiring connections
    fn connection_retry_policy(&self) -> RetryPolicy;

    /// Policy applied when re-running a failed unit of work
    fn command_retry_policy(&self) -> RetryPolicy;
}

/// PostgreSQL dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresSyntax;

impl SqlSyntax for PostgresSyntax {
    fn provider_name(&self) -> &'static str {
        "postgres"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["postgresql", "pg", "npgsql"]
    }

    fn accepts_connection_string(&self, connection_string: &str) -> bool {
        connection_string.starts_with("postgres://") || connection_string.starts_with("postgresql://")
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${}", index)
    }

    fn identity_column(&self) -> &'static str {
        "BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY"
    }

    fn case_insensitive_like(&self) -> &'static str {
        "ILIKE"
    }

    fn max_parameters(&self) -> usize {
        65_535
    }

    fn connection_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(5, Duration::from_millis(200), Duration::from_secs(5))
    }

    fn command_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(3, Duration::from_millis(100), Duration::from_secs(2))
    }
}

/// SQLite dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteSyntax;

impl SqlSyntax for SqliteSyntax {
    fn provider_name(&self) -> &'static str {
        "sqlite"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["sqlite3", "microsoft.data.sqlite"]
    }

    fn accepts_connection_string(&self, connection_string: &str) -> bool {
        connection_string.starts_with("sqlite:")
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn identity_column(&self) -> &'static str {
        "INTEGER PRIMARY KEY AUTOINCREMENT"
    }

    // Folds ASCII letters only
    fn case_insensitive_like(&self) -> &'static str {
        "LIKE"
    }

    fn max_parameters(&self) -> usize {
        // SQLITE_MAX_VARIABLE_NUMBER before 3.32
        999
    }

    fn connection_retry_policy(&self) -> RetryPolicy {
        // Local files either open or they do not
        RetryPolicy::none()
    }

    fn command_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(5, Duration::from_millis(50), Duration::from_secs(1))
    }
}

/// Registry of dialect handlers keyed by provider name
///
/// Lookups are case-insensitive and honour each dialect's aliases.
///
/// # Example
///
/// ```rust
/// use infra_db::dialect::DialectRegistry;
///
/// let registry = DialectRegistry::with_defaults();
/// let syntax = registry.resolve("PostgreSQL").unwrap();
/// assert_eq!(syntax.provider_name(), "postgres");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DialectRegistry {
    dialects: HashMap<String, Arc<dyn SqlSyntax>>,
}

impl DialectRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the PostgreSQL and SQLite dialects
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PostgresSyntax));
        registry.register(Arc::new(SqliteSyntax));
        registry
    }

    /// Registers a dialect under its provider name and aliases
    ///
    /// A later registration for the same name replaces the earlier one.
    pub fn register(&mut self, syntax: Arc<dyn SqlSyntax>) {
        let names = std::iter::once(syntax.provider_name()).chain(syntax.aliases().iter().copied());
        for name in names {
            self.dialects.insert(name.to_ascii_lowercase(), Arc::clone(&syntax));
        }
    }

    /// Resolves the dialect for a provider name
    pub fn resolve(&self, provider_name: &str) -> Option<Arc<dyn SqlSyntax>> {
        self.dialects
            .get(&provider_name.trim().to_ascii_lowercase())
            .cloned()
    }

    /// Returns the canonical provider names, sorted
    pub fn providers(&self) -> Vec<&'static str> {
        let mut providers: Vec<&'static str> =
            self.dialects.values().map(|s| s.provider_name()).collect();
        providers.sort_unstable();
        providers.dedup();
        providers
    }
}
