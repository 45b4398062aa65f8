use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server_url: String,
    pub password: Option<String>,
    pub log_level: String,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            // Default settings
            .set_default("server_url", "http://127.0.0.1:8080")?
            .set_default("log_level", "info")?
            // Config file (optional)
            .add_source(File::with_name("config").required(false))
            // Environment variables (e.g. MEDOWN_PASSWORD=secret)
            .add_source(Environment::with_prefix("MEDOWN"));

        builder.build()?.try_deserialize()
    }
}
