//! Database factory and resolved configuration
//!
//! The factory turns `DatabaseSettings` into an immutable
//! `DatabaseConfiguration` exactly once. Configuration resolves the SQL
//! dialect and retry policies from the provider name and creates the
//! connection pool. Afterwards `database()` hands out cheap `Database`
//! handles that build dialect-aware statements and acquire connections.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseFactory, DatabaseSettings};
//!
//! let factory = DatabaseFactory::new();
//! factory.configure(&DatabaseSettings::new("sqlite://cms.db?mode=rwc", "sqlite"))?;
//!
//! let database = factory.database()?;
//! let mut sql = database.sql();
//! sql.push("SELECT COUNT(*) FROM languages");
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use sqlx::any::AnyPoolOptions;
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool, Transaction};
use tracing::{debug, info};

use core_kernel::{HealthCheckResult, HealthCheckable};

use crate::dialect::{DialectRegistry, SqlSyntax};
use crate::error::DatabaseError;
use crate::retry::RetryPolicy;
use crate::settings::{redact_connection_string, DatabaseSettings};
use crate::sql::Sql;

/// Validated, immutable database configuration
#[derive(Clone)]
pub struct DatabaseConfiguration {
    connection_string: String,
    syntax: Arc<dyn SqlSyntax>,
    connection_retry: RetryPolicy,
    command_retry: RetryPolicy,
    settings: DatabaseSettings,
}

impl DatabaseConfiguration {
    /// Validates settings and resolves the dialect for their provider
    ///
    /// # Errors
    ///
    /// - `InvalidConnectionString` if the connection string is blank or
    ///   does not target the resolved provider
    /// - `UnknownProvider` if no dialect is registered for the provider
    pub fn resolve(
        settings: &DatabaseSettings,
        registry: &DialectRegistry,
    ) -> Result<Self, DatabaseError> {
        let connection_string = settings.connection_string.trim();
        if connection_string.is_empty() {
            return Err(DatabaseError::InvalidConnectionString(
                "connection string is empty".to_string(),
            ));
        }

        let provider_name = settings.provider_name.trim();
        if provider_name.is_empty() {
            return Err(DatabaseError::UnknownProvider(String::new()));
        }

        let syntax = registry
            .resolve(provider_name)
            .ok_or_else(|| DatabaseError::UnknownProvider(provider_name.to_string()))?;

        if !syntax.accepts_connection_string(connection_string) {
            return Err(DatabaseError::InvalidConnectionString(format!(
                "'{}' is not a {} connection string",
                redact_connection_string(connection_string),
                syntax.provider_name()
            )));
        }

        if settings.max_connections == 0 || settings.min_connections > settings.max_connections {
            return Err(DatabaseError::InvalidConnectionString(format!(
                "invalid pool size: min {} max {}",
                settings.min_connections, settings.max_connections
            )));
        }

        Ok(Self {
            connection_string: connection_string.to_string(),
            connection_retry: syntax.connection_retry_policy(),
            command_retry: syntax.command_retry_policy(),
            syntax,
            settings: settings.clone(),
        })
    }

    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Canonical provider name of the resolved dialect
    pub fn provider_name(&self) -> &'static str {
        self.syntax.provider_name()
    }

    pub fn syntax(&self) -> &Arc<dyn SqlSyntax> {
        &self.syntax
    }

    pub fn connection_retry_policy(&self) -> RetryPolicy {
        self.connection_retry
    }

    pub fn command_retry_policy(&self) -> RetryPolicy {
        self.command_retry
    }

    pub fn settings(&self) -> &DatabaseSettings {
        &self.settings
    }
}

impl fmt::Debug for DatabaseConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfiguration")
            .field("connection_string", &redact_connection_string(&self.connection_string))
            .field("provider_name", &self.provider_name())
            .field("connection_retry", &self.connection_retry)
            .field("command_retry", &self.command_retry)
            .finish()
    }
}

/// Handle to a configured database
///
/// Cloning is cheap: clones share the configuration and the pool.
#[derive(Debug, Clone)]
pub struct Database {
    configuration: Arc<DatabaseConfiguration>,
    pool: AnyPool,
}

impl Database {
    pub fn configuration(&self) -> &DatabaseConfiguration {
        &self.configuration
    }

    pub fn syntax(&self) -> &Arc<dyn SqlSyntax> {
        self.configuration.syntax()
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Creates an empty statement builder for this database's dialect
    pub fn sql(&self) -> Sql {
        Sql::new(Arc::clone(self.configuration.syntax()))
    }

    /// Acquires a pooled connection under the connection retry policy
    pub async fn connect(&self) -> Result<PoolConnection<Any>, DatabaseError> {
        let pool = &self.pool;
        self.configuration
            .connection_retry_policy()
            .execute("acquire connection", || async move {
                pool.acquire().await.map_err(DatabaseError::from)
            })
            .await
    }

    /// Acquires a connection and begins a transaction on it
    pub async fn begin(&self) -> Result<Transaction<'static, Any>, DatabaseError> {
        let pool = &self.pool;
        self.configuration
            .connection_retry_policy()
            .execute("begin transaction", || async move {
                pool.begin().await.map_err(DatabaseError::from)
            })
            .await
    }

    /// Closes the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        info!(provider = self.configuration.provider_name(), "Database pool closed");
    }
}

#[async_trait]
impl HealthCheckable for Database {
    /// Checks database connectivity with a trivial query
    async fn health_check(&self) -> HealthCheckResult {
        let adapter_id = format!("{}-database", self.configuration.provider_name());
        let start = Instant::now();

        let result = match self.connect().await {
            Ok(mut conn) => {
                let mut sql = self.sql();
                sql.push("SELECT CAST(1 AS BIGINT)");
                sql.fetch_scalar(&mut conn).await
            }
            Err(e) => Err(e),
        };

        let latency_ms = start.elapsed().as_millis() as u64;
        match result {
            Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
        }
    }
}

/// Creates `Database` handles from a one-time configuration
///
/// The configuration is write-once: `configure` succeeds for the first
/// caller and fails with `AlreadyConfigured` for every later one. No lock
/// guards reads, since the configured state never changes.
#[derive(Debug)]
pub struct DatabaseFactory {
    registry: DialectRegistry,
    database: OnceCell<Database>,
}

impl DatabaseFactory {
    /// Creates an unconfigured factory with the built-in dialects
    pub fn new() -> Self {
        Self::with_registry(DialectRegistry::with_defaults())
    }

    /// Creates an unconfigured factory with a custom dialect registry
    pub fn with_registry(registry: DialectRegistry) -> Self {
        Self {
            registry,
            database: OnceCell::new(),
        }
    }

    /// Creates a factory and configures it in one step
    pub fn configured(settings: &DatabaseSettings) -> Result<Self, DatabaseError> {
        let factory = Self::new();
        factory.configure(settings)?;
        Ok(factory)
    }

    /// Configures the factory
    ///
    /// Resolves the dialect and retry policies and creates the connection
    /// pool. Connections are opened lazily, so an unreachable server is
    /// reported by the first scope rather than here. Must run inside a
    /// Tokio runtime.
    ///
    /// # Errors
    ///
    /// - `AlreadyConfigured` if the factory was configured before
    /// - `InvalidConnectionString` / `UnknownProvider` for bad settings
    pub fn configure(&self, settings: &DatabaseSettings) -> Result<(), DatabaseError> {
        if self.database.get().is_some() {
            return Err(DatabaseError::AlreadyConfigured);
        }

        let configuration = DatabaseConfiguration::resolve(settings, &self.registry)?;

        sqlx::any::install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(settings.acquire_timeout())
            .max_lifetime(settings.max_lifetime())
            .idle_timeout(settings.idle_timeout())
            .connect_lazy(configuration.connection_string())
            .map_err(|e| DatabaseError::InvalidConnectionString(e.to_string()))?;

        info!(
            provider = configuration.provider_name(),
            connection = %redact_connection_string(configuration.connection_string()),
            max_connections = settings.max_connections,
            "Database factory configured"
        );

        let database = Database {
            configuration: Arc::new(configuration),
            pool,
        };

        self.database
            .set(database)
            .map_err(|_| DatabaseError::AlreadyConfigured)
    }

    /// Returns true once `configure` has succeeded
    pub fn is_configured(&self) -> bool {
        self.database.get().is_some()
    }

    /// Returns the resolved configuration, if configured
    pub fn configuration(&self) -> Option<&DatabaseConfiguration> {
        self.database.get().map(|db| db.configuration())
    }

    /// Returns a handle to the configured database
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if `configure` has not succeeded yet
    pub fn database(&self) -> Result<Database, DatabaseError> {
        let database = self.database.get().ok_or(DatabaseError::NotConfigured)?;
        debug!(provider = database.configuration.provider_name(), "Database handle requested");
        Ok(database.clone())
    }

    /// Returns the dialect registry used for provider resolution
    pub fn registry(&self) -> &DialectRegistry {
        &self.registry
    }
}

impl Default for DatabaseFactory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_empty_connection_string() {
        let settings = DatabaseSettings::new("  ", "sqlite");
        let result = DatabaseConfiguration::resolve(&settings, &DialectRegistry::with_defaults());
        assert!(matches!(result, Err(DatabaseError::InvalidConnectionString(_))));
    }

    #[test]
    fn test_resolve_rejects_unknown_provider() {
        let settings = DatabaseSettings::new("sqlite://cms.db", "System.Data.SqlClient");
        let result = DatabaseConfiguration::resolve(&settings, &DialectRegistry::with_defaults());
        assert!(matches!(result, Err(DatabaseError::UnknownProvider(p)) if p == "System.Data.SqlClient"));
    }

    #[test]
    fn test_resolve_rejects_mismatched_connection_string() {
        let settings = DatabaseSettings::new("postgres://localhost/cms", "sqlite");
        let result = DatabaseConfiguration::resolve(&settings, &DialectRegistry::with_defaults());
        assert!(matches!(result, Err(DatabaseError::InvalidConnectionString(_))));
    }

    #[test]
    fn test_resolve_picks_dialect_policies() {
        let settings = DatabaseSettings::new("postgres://cms:pw@localhost/cms", "PostgreSQL");
        let configuration =
            DatabaseConfiguration::resolve(&settings, &DialectRegistry::with_defaults()).unwrap();

        assert_eq!(configuration.provider_name(), "postgres");
        assert_eq!(configuration.connection_retry_policy().max_attempts(), 5);
        assert!(!format!("{:?}", configuration).contains("pw"));
    }

    #[test]
    fn test_empty_registry_knows_no_provider() {
        let settings = DatabaseSettings::new("sqlite://cms.db", "sqlite");
        let result = DatabaseConfiguration::resolve(&settings, &DialectRegistry::new());
        assert!(matches!(result, Err(DatabaseError::UnknownProvider(_))));
    }
}
