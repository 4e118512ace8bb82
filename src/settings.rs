use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Database {
    /// MongoDB connection string.
    pub uri: String,
    /// Name of the database holding the `profiles` collection.
    pub database: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    /// Maximum time to wait for a usable connection, in milliseconds.
    /// Applied as the driver's server-selection timeout, which is where the
    /// 3.x driver bounds that wait (it has no wait-queue timeout option).
    pub max_wait_millis: u64,
}

impl Default for Database {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".into(),
            database: "profiledesk".into(),
            max_pool_size: 10,
            min_pool_size: 1,
            max_wait_millis: 5_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    pub database: Database,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("database.uri", "mongodb://localhost:27017")?
            .set_default("database.database", "profiledesk")?
            .set_default("database.max_pool_size", 10_i64)?
            .set_default("database.min_pool_size", 1_i64)?
            .set_default("database.max_wait_millis", 5_000_i64)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            // Double separator so multi-word keys survive: DATABASE__MAX_POOL_SIZE
            // maps to database.max_pool_size.
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }
}
