//! Database connection pool using the OnceCell pattern.
//!
//! One `mongodb::Client` per process, built lazily on first access from
//! [`Settings`] and torn down exactly once at application shutdown via
//! [`close`]. The driver's internal pool handles connection reuse; the
//! settings only bound its size and wait time.

use std::time::Duration;

use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use tokio::sync::OnceCell;

use crate::error::PoolError;
use crate::settings::{self, Settings};

static CLIENT: OnceCell<(Client, Database)> = OnceCell::const_new();

/// Parse the connection string and apply the configured pool bounds.
async fn build_options(db: &settings::Database) -> Result<ClientOptions, PoolError> {
    let mut options = ClientOptions::parse(&db.uri).await?;
    options.max_pool_size = Some(db.max_pool_size);
    options.min_pool_size = Some(db.min_pool_size);
    // The driver exposes no wait-queue timeout; the wait for a usable
    // connection is bounded through server selection instead.
    options.server_selection_timeout = Some(Duration::from_millis(db.max_wait_millis));
    Ok(options)
}

async fn init() -> Result<(Client, Database), PoolError> {
    dotenvy::dotenv().ok();

    let settings = Settings::new()?;
    let db = settings.database;

    let options = build_options(&db).await?;
    let client = Client::with_options(options)?;
    let database = client.database(&db.database);

    tracing::info!(database = %db.database, "connected to MongoDB");
    Ok((client, database))
}

/// Get or initialize the shared database handle.
pub async fn database() -> Result<&'static Database, PoolError> {
    let (_, database) = CLIENT.get_or_try_init(init).await?;
    Ok(database)
}

/// Release the underlying client. Safe to call when the pool was never
/// initialized; must be invoked once at application shutdown.
pub async fn close() {
    if let Some((client, _)) = CLIENT.get() {
        tracing::info!("shutting down MongoDB client");
        client.clone().shutdown().await;
    }
}
