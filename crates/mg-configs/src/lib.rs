//! # mg-configs
//!
//! Layered configuration for the Mental Game binary: built-in defaults, an
//! optional `mental-game.toml`, then `MG_`-prefixed environment variables
//! (e.g. `MG_SERVER__PORT=9000`). `.env` files are honored for local runs.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigsError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Connection URL for the document store backing database.
    pub database_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscordSettings {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub discord: DiscordSettings,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigsError> {
        dotenvy::dotenv().ok();
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("store.database_url", "sqlite:mental_game.db")?
            .set_default("discord.client_id", "")?
            .set_default("discord.client_secret", "")?
            .set_default(
                "discord.redirect_uri",
                "http://127.0.0.1:8080/auth/callback",
            )?
            .add_source(File::with_name("mental-game").required(false))
            .add_source(Environment::with_prefix("MG").separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_a_local_run() {
        let settings = Settings::load().expect("defaults load");
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.store.database_url, "sqlite:mental_game.db");
        assert!(settings.discord.redirect_uri.contains("/auth/callback"));
    }
}
