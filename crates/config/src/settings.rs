use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub provider: ProviderSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    /// Externally reachable base URL, used to build provider callback URLs.
    pub public_base_url: String,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

/// External real-time session provider (Twilio-style video REST API).
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub account_sid: String,
    pub auth_token: String,
    /// Path appended to `app.public_base_url` for room status callbacks.
    pub room_callback_path: String,
    /// Upper bound on any provider round trip. Provider errors are retryable
    /// by the caller, so a stuck request must become an error, not a hang.
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::default().separator("__").prefix("AULA"))
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 3000)?
            .set_default("app.public_base_url", "http://localhost:3000")?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "aula")?
            .set_default("provider.base_url", "https://video.twilio.com")?
            .set_default("provider.account_sid", "")?
            .set_default("provider.auth_token", "")?
            .set_default("provider.room_callback_path", "/classroom/webhook/roomCallback")?
            .set_default("provider.request_timeout_secs", 10)?
            .build()?;

        config.try_deserialize()
    }
}
