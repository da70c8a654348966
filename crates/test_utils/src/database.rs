//! Database Test Utilities
//!
//! Every `TestDatabase` is a fresh SQLite file in its own temporary
//! directory, configured through the regular `DatabaseFactory` and with the
//! dictionary schema installed. The file is removed when the value drops.

use std::path::Path;

use tempfile::TempDir;

use domain_dictionary::Language;
use infra_db::{
    Database, DatabaseError, DatabaseFactory, DatabaseSettings, LanguageRepository, SchemaCreator,
    Scope, ScopeProvider, WriteRepository,
};

use crate::fixtures::LanguageFixtures;

/// Error type returned by test database setup
pub type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

const DATABASE_FILE: &str = "dictionary.db";
const TEST_MAX_CONNECTIONS: u32 = 4;

/// Builds SQLite settings for a database file, creating it on first use
pub fn sqlite_settings(path: &Path) -> DatabaseSettings {
    DatabaseSettings::new(format!("sqlite://{}?mode=rwc", path.display()), "sqlite")
        .max_connections(TEST_MAX_CONNECTIONS)
        .min_connections(0)
        .acquire_timeout_secs(10)
}

/// A throwaway SQLite database for one test
pub struct TestDatabase {
    _dir: TempDir,
    factory: DatabaseFactory,
    provider: ScopeProvider,
}

impl TestDatabase {
    /// Creates an empty database with the dictionary schema installed
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn new() -> TestResult<Self> {
        let dir = tempfile::tempdir()?;
        let settings = sqlite_settings(&dir.path().join(DATABASE_FILE));
        let factory = DatabaseFactory::configured(&settings)?;
        let provider = ScopeProvider::from_factory(&factory)?;

        let test_db = Self {
            _dir: dir,
            factory,
            provider,
        };
        test_db.install_schema().await?;
        Ok(test_db)
    }

    /// Creates a database with English (default), Danish and French saved
    pub async fn with_languages() -> TestResult<(Self, SeededLanguages)> {
        let test_db = Self::new().await?;
        let languages = test_db.seed_languages().await?;
        Ok((test_db, languages))
    }

    async fn install_schema(&self) -> Result<(), DatabaseError> {
        let mut scope = self.scope().await?;
        SchemaCreator::new(scope.syntax().clone())
            .install(&mut scope)
            .await?;
        scope.complete().await
    }

    pub fn factory(&self) -> &DatabaseFactory {
        &self.factory
    }

    pub fn provider(&self) -> &ScopeProvider {
        &self.provider
    }

    pub fn database(&self) -> &Database {
        self.provider.database()
    }

    /// Opens a new scope on the test database
    pub async fn scope(&self) -> Result<Scope, DatabaseError> {
        self.provider.create_scope().await
    }

    /// Counts the committed rows of a table
    pub async fn count_rows(&self, table: &str) -> Result<i64, DatabaseError> {
        let mut scope = self.scope().await?;
        let mut sql = scope.sql();
        sql.push("SELECT COUNT(*) FROM ")
            .push(&scope.syntax().quote_identifier(table));
        let count = sql.fetch_scalar(scope.connection()?).await?;
        scope.complete().await?;
        Ok(count)
    }

    /// Saves the fixture languages and returns them with their identities
    pub async fn seed_languages(&self) -> Result<SeededLanguages, DatabaseError> {
        let repository = LanguageRepository::new();
        let mut english = LanguageFixtures::english();
        let mut danish = LanguageFixtures::danish();
        let mut french = LanguageFixtures::french();

        let mut scope = self.scope().await?;
        repository.add_or_update(&mut scope, &mut english).await?;
        repository.add_or_update(&mut scope, &mut danish).await?;
        repository.add_or_update(&mut scope, &mut french).await?;
        scope.complete().await?;

        Ok(SeededLanguages {
            english,
            danish,
            french,
        })
    }
}

/// Languages saved by `TestDatabase::seed_languages`
#[derive(Debug, Clone)]
pub struct SeededLanguages {
    pub english: Language,
    pub danish: Language,
    pub french: Language,
}

impl SeededLanguages {
    /// Identity of the default (English) language
    pub fn english_id(&self) -> i64 {
        self.english.id.unwrap_or_default()
    }

    pub fn danish_id(&self) -> i64 {
        self.danish.id.unwrap_or_default()
    }

    pub fn french_id(&self) -> i64 {
        self.french.id.unwrap_or_default()
    }
}

/// Helper macro for running database tests
///
/// ```rust,ignore
/// db_test!(test_counts_languages, |db| {
///     assert_eq!(db.count_rows("languages").await.unwrap(), 0);
/// });
/// ```
#[macro_export]
macro_rules! db_test {
    ($name:ident, |$db:ident| $body:block) => {
        #[tokio::test]
        async fn $name() {
            let $db = $crate::database::TestDatabase::new()
                .await
                .expect("Failed to create test database");
            $body
        }
    };
}
