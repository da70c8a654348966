//! Dialect-aware SQL builder
//!
//! `Sql` accumulates statement text and its bound arguments, writing each
//! placeholder in the syntax of the configured dialect (`$n` for
//! PostgreSQL, `?` for SQLite). The statement is executed against the
//! connection owned by a `Scope`.

use std::sync::Arc;

use sqlx::any::{AnyArguments, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyConnection, Row};
use tracing::trace;

use crate::dialect::SqlSyntax;
use crate::error::DatabaseError;

/// A value bound to a statement parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlArg {
    Int(i64),
    Text(String),
    NullInt,
    NullText,
}

impl From<i64> for SqlArg {
    fn from(value: i64) -> Self {
        SqlArg::Int(value)
    }
}

impl From<bool> for SqlArg {
    fn from(value: bool) -> Self {
        SqlArg::Int(i64::from(value))
    }
}

impl From<String> for SqlArg {
    fn from(value: String) -> Self {
        SqlArg::Text(value)
    }
}

impl From<&str> for SqlArg {
    fn from(value: &str) -> Self {
        SqlArg::Text(value.to_string())
    }
}

impl From<&String> for SqlArg {
    fn from(value: &String) -> Self {
        SqlArg::Text(value.clone())
    }
}

impl From<Option<i64>> for SqlArg {
    fn from(value: Option<i64>) -> Self {
        value.map_or(SqlArg::NullInt, SqlArg::Int)
    }
}

impl From<Option<String>> for SqlArg {
    fn from(value: Option<String>) -> Self {
        value.map_or(SqlArg::NullText, SqlArg::Text)
    }
}

/// A SQL statement under construction
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use infra_db::dialect::PostgresSyntax;
/// use infra_db::sql::Sql;
///
/// let mut sql = Sql::new(Arc::new(PostgresSyntax));
/// sql.push("SELECT id FROM languages WHERE iso_code = ")
///     .push_bind("en-US")
///     .push(" OR id IN ")
///     .push_bind_list([1i64, 2]);
///
/// assert_eq!(sql.text(), "SELECT id FROM languages WHERE iso_code = $1 OR id IN ($2, $3)");
/// ```
#[derive(Debug, Clone)]
pub struct Sql {
    syntax: Arc<dyn SqlSyntax>,
    text: String,
    args: Vec<SqlArg>,
}

impl Sql {
    /// Creates an empty statement for the given dialect
    pub fn new(syntax: Arc<dyn SqlSyntax>) -> Self {
        Self {
            syntax,
            text: String::new(),
            args: Vec::new(),
        }
    }

    /// Appends raw statement text
    pub fn push(&mut self, fragment: &str) -> &mut Self {
        self.text.push_str(fragment);
        self
    }

    /// Appends a placeholder and binds its argument
    pub fn push_bind(&mut self, arg: impl Into<SqlArg>) -> &mut Self {
        self.args.push(arg.into());
        let placeholder = self.syntax.placeholder(self.args.len());
        self.text.push_str(&placeholder);
        self
    }

    /// Appends a parenthesized, comma-separated placeholder list
    ///
    /// An empty list renders `(NULL)`, which matches nothing in an `IN`.
    pub fn push_bind_list<I, A>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = A>,
        A: Into<SqlArg>,
    {
        self.text.push('(');
        let mut first = true;
        for arg in args {
            if !first {
                self.text.push_str(", ");
            }
            first = false;
            self.push_bind(arg);
        }
        if first {
            self.text.push_str("NULL");
        }
        self.text.push(')');
        self
    }

    /// Appends a case-insensitive `LIKE` comparison of `column` with `pattern`
    ///
    /// `pattern` is used verbatim; escape user input with `escape_like`.
    pub fn push_like(&mut self, column: &str, pattern: String) -> &mut Self {
        let operator = self.syntax.case_insensitive_like();
        self.text.push_str(column);
        self.text.push(' ');
        self.text.push_str(operator);
        self.text.push(' ');
        self.push_bind(pattern);
        self.text.push_str(" ESCAPE '\\'");
        self
    }

    /// The statement text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The bound arguments in placeholder order
    pub fn args(&self) -> &[SqlArg] {
        &self.args
    }

    /// The dialect this statement is written for
    pub fn syntax(&self) -> &Arc<dyn SqlSyntax> {
        &self.syntax
    }

    fn query(&self) -> Query<'_, Any, AnyArguments<'_>> {
        trace!(sql = %self.text, params = self.args.len(), "Preparing statement");
        let mut query = sqlx::query::<Any>(&self.text);
        for arg in &self.args {
            query = match arg {
                SqlArg::Int(value) => query.bind(*value),
                SqlArg::Text(value) => query.bind(value.clone()),
                SqlArg::NullInt => query.bind(None::<i64>),
                SqlArg::NullText => query.bind(None::<String>),
            };
        }
        query
    }

    /// Executes the statement, returning the number of affected rows
    pub async fn execute(&self, conn: &mut AnyConnection) -> Result<u64, DatabaseError> {
        let result = self.query().execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    /// Fetches all rows
    pub async fn fetch_all(&self, conn: &mut AnyConnection) -> Result<Vec<AnyRow>, DatabaseError> {
        Ok(self.query().fetch_all(&mut *conn).await?)
    }

    /// Fetches at most one row
    pub async fn fetch_optional(
        &self,
        conn: &mut AnyConnection,
    ) -> Result<Option<AnyRow>, DatabaseError> {
        Ok(self.query().fetch_optional(&mut *conn).await?)
    }

    /// Fetches the first column of the first row as an integer
    pub async fn fetch_scalar(&self, conn: &mut AnyConnection) -> Result<i64, DatabaseError> {
        let row = self.query().fetch_one(&mut *conn).await?;
        Ok(row.try_get::<i64, _>(0)?)
    }
}

/// Escapes `LIKE` wildcards so the value matches literally
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{PostgresSyntax, SqliteSyntax};

    #[test]
    fn test_postgres_placeholders_are_numbered() {
        let mut sql = Sql::new(Arc::new(PostgresSyntax));
        sql.push("UPDATE t SET a = ")
            .push_bind(1i64)
            .push(", b = ")
            .push_bind("x")
            .push(" WHERE id = ")
            .push_bind(Some(3i64));

        assert_eq!(sql.text(), "UPDATE t SET a = $1, b = $2 WHERE id = $3");
        assert_eq!(
            sql.args(),
            &[SqlArg::Int(1), SqlArg::Text("x".to_string()), SqlArg::Int(3)]
        );
    }

    #[test]
    fn test_sqlite_placeholders_are_positional() {
        let mut sql = Sql::new(Arc::new(SqliteSyntax));
        sql.push("SELECT * FROM t WHERE id IN ").push_bind_list(vec![1i64, 2, 3]);

        assert_eq!(sql.text(), "SELECT * FROM t WHERE id IN (?, ?, ?)");
    }

    #[test]
    fn test_empty_bind_list_matches_nothing() {
        let mut sql = Sql::new(Arc::new(SqliteSyntax));
        sql.push("id IN ").push_bind_list(Vec::<i64>::new());

        assert_eq!(sql.text(), "id IN (NULL)");
        assert!(sql.args().is_empty());
    }

    #[test]
    fn test_like_uses_dialect_operator() {
        let mut pg = Sql::new(Arc::new(PostgresSyntax));
        pg.push_like("item_key", "a%".to_string());
        assert_eq!(pg.text(), "item_key ILIKE $1 ESCAPE '\\'");

        let mut lite = Sql::new(Arc::new(SqliteSyntax));
        lite.push_like("item_key", "a%".to_string());
        assert_eq!(lite.text(), "item_key LIKE ? ESCAPE '\\'");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_null_args() {
        assert_eq!(SqlArg::from(None::<String>), SqlArg::NullText);
        assert_eq!(SqlArg::from(None::<i64>), SqlArg::NullInt);
        assert_eq!(SqlArg::from(true), SqlArg::Int(1));
    }
}
