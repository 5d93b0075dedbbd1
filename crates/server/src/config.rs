use config::ConfigError;
use serde::Deserialize;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub platform: PlatformSettings,
    pub security: SecuritySettings,
    pub summary: SummarySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Deserialize, Clone)]
pub struct PlatformSettings {
    pub api_url: String,
    pub token: String,
    pub webhook_secret: String,
    pub request_timeout_secs: u64,
    // 用于补全 permalink，例如 "https://www.reddit.com"
    pub public_base_url: String,
}

#[derive(Deserialize, Clone)]
pub struct SecuritySettings {
    pub admin_token: String,
}

#[derive(Deserialize, Clone)]
pub struct SummarySettings {
    pub poll_interval_secs: u64,
}

pub const DEFAULT_WEBHOOK_SECRET: &str = "webhook_secret_change_me";
pub const DEFAULT_ADMIN_TOKEN: &str = "admin_secret_123";

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_origins", "*")?
            .set_default("database.url", "sqlite://data/pinner.db")?
            .set_default("platform.api_url", "http://127.0.0.1:8080/api")?
            .set_default("platform.token", "")?
            .set_default("platform.webhook_secret", DEFAULT_WEBHOOK_SECRET)?
            .set_default("platform.request_timeout_secs", 10)?
            .set_default("platform.public_base_url", "https://www.reddit.com")?
            .set_default("security.admin_token", DEFAULT_ADMIN_TOKEN)?
            .set_default("summary.poll_interval_secs", 3)?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name(&format!("config.{}", run_mode)).required(false))
            // PINNER_SERVER__PORT=8080 -> server.port
            .add_source(
                config::Environment::with_prefix("PINNER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        s.try_deserialize()
    }
}
