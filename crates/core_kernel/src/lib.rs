//! Core Kernel - Foundational types and utilities for the dictionary system
//!
//! This crate provides the building blocks shared by the domain and
//! infrastructure crates:
//! - Strongly typed unique identifiers
//! - Validated culture codes
//! - Health-check ports for infrastructure components

pub mod identifiers;
pub mod culture;
pub mod ports;
pub mod error;

pub use identifiers::{DictionaryItemUid, TranslationUid, ScopeId};
pub use culture::CultureCode;
pub use ports::{AdapterHealth, HealthCheckResult, HealthCheckable};
pub use error::CoreError;
