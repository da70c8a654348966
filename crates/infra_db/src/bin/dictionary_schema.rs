//! Dictionary schema installer
//!
//! Installs the dictionary tables into the configured database and exits.
//! Running it against a database that already has the schema is a no-op.
//!
//! # Usage
//!
//! ```bash
//! DICTIONARY_DB_CONNECTION_STRING=sqlite://cms.db?mode=rwc \
//! DICTIONARY_DB_PROVIDER_NAME=sqlite \
//! cargo run --bin dictionary-schema
//! ```
//!
//! # Environment Variables
//!
//! * `DICTIONARY_DB_CONNECTION_STRING` - Database URL
//! * `DICTIONARY_DB_PROVIDER_NAME` - `postgres` or `sqlite` (aliases accepted)
//! * `DICTIONARY_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! * `RUST_LOG` - Log filter (default: info)

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::HealthCheckable;
use infra_db::{DatabaseFactory, DatabaseSettings, SchemaCreator, ScopeProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    init_tracing();

    let settings = DatabaseSettings::from_env().context("failed to read database settings")?;
    let factory = DatabaseFactory::configured(&settings).context("failed to configure database")?;
    let database = factory.database()?;

    let health = database.health_check().await;
    if !health.is_healthy() {
        anyhow::bail!(
            "database is unreachable: {}",
            health.message.unwrap_or_default()
        );
    }

    let provider = ScopeProvider::new(database.clone());
    let creator = SchemaCreator::new(database.syntax().clone());
    provider
        .in_scope(|scope| {
            let creator = creator.clone();
            Box::pin(async move { creator.install(scope).await })
        })
        .await
        .context("failed to install schema")?;

    database.close().await;
    tracing::info!("Schema installation complete");
    Ok(())
}

/// Initializes the tracing subscriber from `RUST_LOG`, defaulting to info
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
