//! Database error types
//!
//! This module defines the error types that can occur during database
//! configuration, scope handling, and repository operations, mapping
//! driver errors from every supported dialect onto one taxonomy.

use thiserror::Error;

use domain_dictionary::DictionaryError;

/// Errors that can occur during database operations
///
/// The variants fall into four groups:
/// - configuration errors, raised once at configure time
/// - usage errors (not configured, already configured, out of scope)
/// - store errors mapped from the SQL driver
/// - domain validation errors raised before a write
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The factory was used before `configure` ran
    #[error("Database factory is not configured")]
    NotConfigured,

    /// `configure` was called on an already configured factory
    #[error("Database factory is already configured")]
    AlreadyConfigured,

    /// Connection string is missing or does not fit the provider
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// No dialect is registered for the provider name
    #[error("No SQL dialect registered for provider '{0}'")]
    UnknownProvider(String),

    /// The scope has already been completed or rolled back
    #[error("Operation attempted outside of an active scope")]
    OutOfScope,

    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check or not-null constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// A failure that may succeed when retried (lock contention, serialization failure)
    #[error("Transient database failure: {0}")]
    Transient(String),

    /// Transaction error
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Schema installation error
    #[error("Schema installation failed: {0}")]
    SchemaFailed(String),

    /// A row could not be mapped to a domain value
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Entity failed domain validation
    #[error("Validation failed: {0}")]
    Validation(#[from] DictionaryError),
}

impl DatabaseError {
    /// Creates a not found error for a specific entity type and identifier
    ///
    /// # Arguments
    ///
    /// * `entity` - The type of entity (e.g., "DictionaryItem", "Language")
    /// * `id` - The identifier that was not found
    ///
    /// # Example
    ///
    /// ```rust
    /// use infra_db::DatabaseError;
    ///
    /// let error = DatabaseError::not_found("DictionaryItem", 42);
    /// assert!(error.to_string().contains("DictionaryItem"));
    /// ```
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    /// Creates a duplicate entry error
    ///
    /// # Arguments
    ///
    /// * `entity` - The type of entity
    /// * `field` - The field that caused the duplicate
    /// * `value` - The duplicate value
    pub fn duplicate(entity: &str, field: &str, value: impl std::fmt::Display) -> Self {
        DatabaseError::DuplicateEntry(format!(
            "{} with {} '{}' already exists",
            entity, field, value
        ))
    }

    /// Creates a mapping error for a column that could not be decoded
    pub fn mapping(column: &str, detail: impl std::fmt::Display) -> Self {
        DatabaseError::Mapping(format!("column '{}': {}", column, detail))
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }

    /// Checks if retrying the failed operation may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, DatabaseError::Transient(_)) || self.is_connection_error()
    }

    /// Checks if this error is a configuration or usage error
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::NotConfigured
                | DatabaseError::AlreadyConfigured
                | DatabaseError::OutOfScope
                | DatabaseError::InvalidConnectionString(_)
                | DatabaseError::UnknownProvider(_)
        )
    }
}

// PostgreSQL SQLSTATE codes that are safe to retry
// https://www.postgresql.org/docs/current/errcodes-appendix.html
const POSTGRES_TRANSIENT_CODES: &[&str] = &["40001", "40P01", "55P03", "57P01", "57P03", "53300"];

// SQLite primary result codes: SQLITE_BUSY (5) and SQLITE_LOCKED (6)
const SQLITE_TRANSIENT_PRIMARY_CODES: &[i64] = &[5, 6];

fn is_transient_code(code: &str) -> bool {
    if POSTGRES_TRANSIENT_CODES.contains(&code) || code.starts_with("08") {
        return true;
    }
    // SQLSTATE codes are always five characters
    if code.len() >= 5 {
        return false;
    }
    // SQLite extended codes carry the primary code in the low byte
    code.parse::<i64>()
        .map(|extended| SQLITE_TRANSIENT_PRIMARY_CODES.contains(&(extended & 0xff)))
        .unwrap_or(false)
}

/// Converts SQLx errors to more specific DatabaseError variants
///
/// Constraint violations are classified through the driver-neutral
/// `ErrorKind`; transient failures are recognized by their PostgreSQL
/// SQLSTATE or SQLite result code.
impl From<&sqlx::Error> for DatabaseError {
    fn from(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::PoolClosed => {
                DatabaseError::ConnectionFailed("connection pool is closed".to_string())
            }
            sqlx::Error::Io(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::Tls(e) => DatabaseError::ConnectionFailed(e.to_string()),
            sqlx::Error::Configuration(e) => DatabaseError::InvalidConnectionString(e.to_string()),
            sqlx::Error::ColumnNotFound(column) => {
                DatabaseError::mapping(column, "column not found in result set")
            }
            sqlx::Error::ColumnDecode { index, source } => DatabaseError::mapping(index, source),
            sqlx::Error::Decode(e) => DatabaseError::Mapping(e.to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => DatabaseError::DuplicateEntry(message),
                    sqlx::error::ErrorKind::ForeignKeyViolation => {
                        DatabaseError::ForeignKeyViolation(message)
                    }
                    sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::CheckViolation => {
                        DatabaseError::ConstraintViolation(message)
                    }
                    _ => match db_err.code() {
                        Some(code) if is_transient_code(code.as_ref()) => {
                            DatabaseError::Transient(message)
                        }
                        _ => DatabaseError::QueryFailed(message),
                    },
                }
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        DatabaseError::from(&error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_codes() {
        assert!(is_transient_code("40001"));
        assert!(is_transient_code("08006"));
        assert!(is_transient_code("5"));
        // SQLITE_BUSY_SNAPSHOT
        assert!(is_transient_code("517"));
        // SQLITE_CONSTRAINT_UNIQUE
        assert!(!is_transient_code("2067"));
        assert!(!is_transient_code("23505"));
        // insufficient_privilege, whose low byte looks like SQLITE_BUSY
        assert!(!is_transient_code("42501"));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(error.is_not_found());
    }

    #[test]
    fn test_pool_timeout_is_transient() {
        let error = DatabaseError::from(sqlx::Error::PoolTimedOut);
        assert!(error.is_transient());
        assert!(error.is_connection_error());
    }

    #[test]
    fn test_usage_errors() {
        assert!(DatabaseError::OutOfScope.is_usage_error());
        assert!(!DatabaseError::OutOfScope.is_transient());
        assert!(!DatabaseError::PoolExhausted.is_usage_error());
    }
}
