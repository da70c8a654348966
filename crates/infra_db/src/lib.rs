//! Infrastructure Database Layer
//!
//! This crate provides data access for the translation dictionary on any
//! of the supported SQL engines (PostgreSQL and SQLite) through SQLx.
//!
//! # Architecture
//!
//! - **Configuration**: `DatabaseFactory::configure` turns `DatabaseSettings`
//!   into an immutable `DatabaseConfiguration` exactly once, resolving the
//!   SQL dialect and retry policies from the provider name.
//! - **Scopes**: a `Scope` owns one connection inside a transaction. Scopes
//!   are created by a `ScopeProvider` and passed explicitly to every
//!   repository call.
//! - **Repositories**: `DictionaryRepository` and `LanguageRepository`
//!   implement the shared `ReadRepository` / `WriteRepository` traits.
//! - **Schema**: `SchemaCreator` installs the tables for the configured
//!   dialect.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{DatabaseFactory, DatabaseSettings, ScopeProvider, SchemaCreator};
//! use infra_db::{DictionaryRepository, ReadRepository};
//!
//! let factory = DatabaseFactory::configured(&DatabaseSettings::from_env()?)?;
//! let provider = ScopeProvider::from_factory(&factory)?;
//!
//! let mut scope = provider.create_scope().await?;
//! SchemaCreator::new(scope.syntax().clone()).install(&mut scope).await?;
//! let items = DictionaryRepository::new().get_all(&mut scope).await?;
//! scope.complete().await?;
//! ```

pub mod error;
pub mod settings;
pub mod dialect;
pub mod retry;
pub mod sql;
pub mod factory;
pub mod scope;
pub mod schema;
pub mod repositories;

pub use error::DatabaseError;
pub use settings::DatabaseSettings;
pub use dialect::{DialectRegistry, PostgresSyntax, SqlSyntax, SqliteSyntax};
pub use retry::RetryPolicy;
pub use sql::Sql;
pub use factory::{Database, DatabaseConfiguration, DatabaseFactory};
pub use scope::{Scope, ScopeFuture, ScopeProvider};
pub use schema::SchemaCreator;
pub use repositories::{DictionaryRepository, LanguageRepository, ReadRepository, WriteRepository};
