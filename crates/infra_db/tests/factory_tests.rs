//! Integration tests for database configuration and the factory

use std::sync::Arc;

use core_kernel::{AdapterHealth, HealthCheckable};
use infra_db::{
    DatabaseError, DatabaseFactory, DatabaseSettings, DialectRegistry, RetryPolicy, ScopeProvider,
    SqlSyntax,
};
use test_utils::sqlite_settings;

fn temp_settings() -> (tempfile::TempDir, DatabaseSettings) {
    let dir = tempfile::tempdir().unwrap();
    let settings = sqlite_settings(&dir.path().join("factory.db"));
    (dir, settings)
}

// ============================================================================
// Configure-once contract
// ============================================================================

mod configure_tests {
    use super::*;

    #[tokio::test]
    async fn test_configure_twice_fails() {
        let (_dir, settings) = temp_settings();
        let factory = DatabaseFactory::new();

        factory.configure(&settings).unwrap();
        let second = factory.configure(&settings);

        assert!(matches!(second, Err(DatabaseError::AlreadyConfigured)));
        assert!(factory.is_configured());
    }

    #[tokio::test]
    async fn test_database_before_configure_fails() {
        let factory = DatabaseFactory::new();

        assert!(matches!(factory.database(), Err(DatabaseError::NotConfigured)));
        assert!(matches!(
            ScopeProvider::from_factory(&factory),
            Err(DatabaseError::NotConfigured)
        ));
        assert!(factory.configuration().is_none());
    }

    #[tokio::test]
    async fn test_failed_configure_leaves_factory_unconfigured() {
        let (_dir, settings) = temp_settings();
        let factory = DatabaseFactory::new();

        let bad = DatabaseSettings::new(settings.connection_string.clone(), "oracle");
        assert!(matches!(
            factory.configure(&bad),
            Err(DatabaseError::UnknownProvider(p)) if p == "oracle"
        ));
        assert!(!factory.is_configured());

        factory.configure(&settings).unwrap();
        assert!(factory.is_configured());
    }

    #[tokio::test]
    async fn test_configuration_is_exposed() {
        let (_dir, settings) = temp_settings();
        let factory = DatabaseFactory::configured(&settings.clone().max_connections(3)).unwrap();

        let configuration = factory.configuration().unwrap();
        assert_eq!(configuration.provider_name(), "sqlite");
        assert_eq!(configuration.settings().max_connections, 3);
        assert_eq!(configuration.connection_retry_policy(), RetryPolicy::none());
        assert!(configuration.command_retry_policy().max_attempts() > 1);
    }
}

// ============================================================================
// Settings validation
// ============================================================================

mod validation_tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_connection_string() {
        let factory = DatabaseFactory::new();
        let result = factory.configure(&DatabaseSettings::new("", "sqlite"));

        assert!(matches!(result, Err(DatabaseError::InvalidConnectionString(_))));
    }

    #[tokio::test]
    async fn test_connection_string_for_other_provider() {
        let factory = DatabaseFactory::new();
        let result = factory.configure(&DatabaseSettings::new("postgres://localhost/cms", "sqlite"));

        assert!(matches!(result, Err(DatabaseError::InvalidConnectionString(_))));
    }

    #[tokio::test]
    async fn test_blank_provider_is_unknown() {
        let (_dir, settings) = temp_settings();
        let factory = DatabaseFactory::new();
        let result = factory.configure(&DatabaseSettings::new(settings.connection_string, "  "));

        assert!(matches!(result, Err(DatabaseError::UnknownProvider(_))));
    }

    #[tokio::test]
    async fn test_provider_alias_in_any_case() {
        let (_dir, settings) = temp_settings();
        let factory = DatabaseFactory::new();
        factory
            .configure(&DatabaseSettings::new(settings.connection_string, "Microsoft.Data.Sqlite"))
            .unwrap();

        assert_eq!(factory.configuration().unwrap().provider_name(), "sqlite");
    }

    #[tokio::test]
    async fn test_zero_pool_size_rejected() {
        let (_dir, settings) = temp_settings();
        let factory = DatabaseFactory::new();

        let result = factory.configure(&settings.max_connections(0));
        assert!(matches!(result, Err(DatabaseError::InvalidConnectionString(_))));
    }
}

// ============================================================================
// Custom dialects
// ============================================================================

mod registry_tests {
    use super::*;
    use infra_db::SqliteSyntax;

    /// SQLite under a vendor-specific provider name
    #[derive(Debug)]
    struct EmbeddedSyntax;

    impl SqlSyntax for EmbeddedSyntax {
        fn provider_name(&self) -> &'static str {
            "embedded"
        }

        fn accepts_connection_string(&self, connection_string: &str) -> bool {
            SqliteSyntax.accepts_connection_string(connection_string)
        }

        fn placeholder(&self, index: usize) -> String {
            SqliteSyntax.placeholder(index)
        }

        fn identity_column(&self) -> &'static str {
            SqliteSyntax.identity_column()
        }

        fn case_insensitive_like(&self) -> &'static str {
            SqliteSyntax.case_insensitive_like()
        }

        fn max_parameters(&self) -> usize {
            100
        }

        fn connection_retry_policy(&self) -> RetryPolicy {
            RetryPolicy::none()
        }

        fn command_retry_policy(&self) -> RetryPolicy {
            RetryPolicy::none()
        }
    }

    #[tokio::test]
    async fn test_registered_dialect_is_resolved() {
        let (_dir, settings) = temp_settings();
        let mut registry = DialectRegistry::with_defaults();
        registry.register(Arc::new(EmbeddedSyntax));

        let factory = DatabaseFactory::with_registry(registry);
        factory
            .configure(&DatabaseSettings::new(settings.connection_string, "Embedded"))
            .unwrap();

        let database = factory.database().unwrap();
        assert_eq!(database.syntax().provider_name(), "embedded");
        assert_eq!(database.syntax().max_parameters(), 100);
    }

    #[tokio::test]
    async fn test_default_registry_rejects_custom_name() {
        let (_dir, settings) = temp_settings();
        let result = DatabaseFactory::configured(&DatabaseSettings::new(
            settings.connection_string,
            "embedded",
        ));

        assert!(matches!(result, Err(DatabaseError::UnknownProvider(_))));
    }
}

// ============================================================================
// Health checks
// ============================================================================

mod health_tests {
    use super::*;

    #[tokio::test]
    async fn test_sqlite_database_is_healthy() {
        let (_dir, settings) = temp_settings();
        let factory = DatabaseFactory::configured(&settings).unwrap();

        let result = factory.database().unwrap().health_check().await;

        assert_eq!(result.status, AdapterHealth::Healthy);
        assert_eq!(result.adapter_id, "sqlite-database");
    }

    #[tokio::test]
    async fn test_unreachable_database_is_unhealthy() {
        let dir = tempfile::tempdir().unwrap();
        // mode=ro refuses to create the missing file
        let missing = format!("sqlite://{}?mode=ro", dir.path().join("missing.db").display());
        let factory = DatabaseFactory::configured(
            &DatabaseSettings::new(missing, "sqlite").acquire_timeout_secs(2),
        )
        .unwrap();

        let result = factory.database().unwrap().health_check().await;

        assert_eq!(result.status, AdapterHealth::Unhealthy);
        assert!(result.message.is_some());
    }
}
