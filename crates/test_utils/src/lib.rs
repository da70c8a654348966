//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! dictionary test suites.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built languages and item keys
//! - `builders`: Builder patterns for test data construction
//! - `database`: Temporary SQLite databases with the schema installed
//! - `assertions`: Custom assertion helpers for dictionary types
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
