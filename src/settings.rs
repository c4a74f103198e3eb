use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
    pub max_connections: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub address: String,
}

impl Settings {
    /// Defaults, then an optional `trivia.toml`, then `TRIVIA__*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::builder()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(Environment::with_prefix("TRIVIA").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database.path", "trivia.db")?
            .set_default("database.max_connections", 5)?
            .set_default("server.address", "0.0.0.0:8080")
    }
}
