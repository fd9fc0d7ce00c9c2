use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    pub url: SecretString,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_connections: u32,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Defaults, then `trivia.toml` if present, then `TRIVIA_*` variables
/// (`TRIVIA_DATABASE__URL`, `TRIVIA_SERVER__PORT`, ...).
pub fn get_configuration() -> Result<Settings, ConfigError> {
    dotenv::dotenv().ok();
    build_settings(
        Environment::with_prefix("TRIVIA")
            .prefix_separator("_")
            .separator("__"),
    )
}

fn build_settings(environment: Environment) -> Result<Settings, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("database.url", "sqlite:trivia.db")?
        .set_default("database.max_connections", 5)?
        .add_source(File::with_name("trivia").required(false))
        .add_source(environment)
        .build()?
        .try_deserialize()
}
