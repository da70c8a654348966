//! Explicit database scopes
//!
//! A `Scope` owns exactly one live connection, inside a transaction, for
//! as long as it is active. Callers create a scope from the
//! `ScopeProvider` and pass `&mut Scope` to every repository call; nothing
//! is looked up implicitly from the current thread or request.
//!
//! A scope ends in one of three ways:
//! - `complete()` commits the transaction
//! - `rollback()` discards it
//! - dropping an active scope rolls back
//!
//! Any use of a scope after `complete()` or `rollback()` fails with
//! `DatabaseError::OutOfScope`.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{Any, AnyConnection, Transaction};
use tracing::{debug, warn};

use core_kernel::ScopeId;

use crate::dialect::SqlSyntax;
use crate::error::DatabaseError;
use crate::factory::{Database, DatabaseFactory};
use crate::sql::Sql;

/// Boxed future returned by units of work passed to `ScopeProvider::in_scope`
pub type ScopeFuture<'s, T> = Pin<Box<dyn Future<Output = Result<T, DatabaseError>> + Send + 's>>;

/// Creates scopes over a configured database
#[derive(Debug, Clone)]
pub struct ScopeProvider {
    database: Database,
}

impl ScopeProvider {
    /// Creates a provider over a database handle
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Creates a provider from a factory
    ///
    /// # Errors
    ///
    /// Returns `NotConfigured` if the factory has not been configured
    pub fn from_factory(factory: &DatabaseFactory) -> Result<Self, DatabaseError> {
        Ok(Self::new(factory.database()?))
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Opens a new scope with its own connection and transaction
    pub async fn create_scope(&self) -> Result<Scope, DatabaseError> {
        let transaction = self.database.begin().await?;
        let scope = Scope {
            id: ScopeId::new_v7(),
            syntax: Arc::clone(self.database.syntax()),
            transaction: Some(transaction),
            opened_at: Utc::now(),
        };
        debug!(scope_id = %scope.id, "Scope opened");
        Ok(scope)
    }

    /// Runs a unit of work in a fresh scope and completes it on success
    ///
    /// If the work (or the commit) fails with a transient error, the scope
    /// is rolled back and the whole unit is retried in a new scope under
    /// the dialect's command retry policy.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let count = provider
    ///     .in_scope(|scope| Box::pin(async move {
    ///         repository.count(scope, &DictionaryFilter::All).await
    ///     }))
    ///     .await?;
    /// ```
    pub async fn in_scope<T, F>(&self, mut work: F) -> Result<T, DatabaseError>
    where
        F: for<'s> FnMut(&'s mut Scope) -> ScopeFuture<'s, T>,
    {
        let policy = self.database.configuration().command_retry_policy();
        let mut attempt = 1;

        loop {
            let mut scope = self.create_scope().await?;
            let result = work(&mut scope).await;
            let outcome = match result {
                Ok(value) => scope.complete().await.map(|_| value),
                Err(error) => {
                    if let Err(rollback_error) = scope.rollback().await {
                        warn!(scope_id = %scope.id(), error = %rollback_error, "Rollback failed");
                    }
                    Err(error)
                }
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(error) if policy.should_retry(attempt, &error) => {
                    let delay = policy.delay_for(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient failure in unit of work, retrying in a new scope"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

/// A unit of work owning one connection inside a transaction
pub struct Scope {
    id: ScopeId,
    syntax: Arc<dyn SqlSyntax>,
    transaction: Option<Transaction<'static, Any>>,
    opened_at: DateTime<Utc>,
}

impl Scope {
    pub fn id(&self) -> ScopeId {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn syntax(&self) -> &Arc<dyn SqlSyntax> {
        &self.syntax
    }

    /// Returns true until the scope is completed or rolled back
    pub fn is_active(&self) -> bool {
        self.transaction.is_some()
    }

    /// Creates an empty statement builder for this scope's dialect
    pub fn sql(&self) -> Sql {
        Sql::new(Arc::clone(&self.syntax))
    }

    /// Returns the scope's connection
    ///
    /// # Errors
    ///
    /// Returns `OutOfScope` once the scope has been completed or rolled back
    pub fn connection(&mut self) -> Result<&mut AnyConnection, DatabaseError> {
        self.transaction
            .as_deref_mut()
            .ok_or(DatabaseError::OutOfScope)
    }

    /// Executes a statement on this scope's connection
    pub async fn execute(&mut self, sql: &Sql) -> Result<u64, DatabaseError> {
        sql.execute(self.connection()?).await
    }

    /// Commits the transaction and releases the connection
    pub async fn complete(&mut self) -> Result<(), DatabaseError> {
        let transaction = self.transaction.take().ok_or(DatabaseError::OutOfScope)?;
        transaction
            .commit()
            .await
            .map_err(|e| match DatabaseError::from(&e) {
                transient @ DatabaseError::Transient(_) => transient,
                _ => DatabaseError::TransactionFailed(e.to_string()),
            })?;
        debug!(scope_id = %self.id, elapsed_ms = self.elapsed_ms(), "Scope completed");
        Ok(())
    }

    /// Rolls back the transaction and releases the connection
    pub async fn rollback(&mut self) -> Result<(), DatabaseError> {
        let transaction = self.transaction.take().ok_or(DatabaseError::OutOfScope)?;
        transaction
            .rollback()
            .await
            .map_err(|e| DatabaseError::TransactionFailed(e.to_string()))?;
        debug!(scope_id = %self.id, elapsed_ms = self.elapsed_ms(), "Scope rolled back");
        Ok(())
    }

    fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.opened_at).num_milliseconds()
    }
}

impl std::fmt::Debug for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scope")
            .field("id", &self.id)
            .field("provider", &self.syntax.provider_name())
            .field("active", &self.is_active())
            .field("opened_at", &self.opened_at)
            .finish()
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        if self.transaction.is_some() {
            // The transaction rolls itself back when dropped
            warn!(scope_id = %self.id, "Scope dropped without completion, rolling back");
        }
    }
}
