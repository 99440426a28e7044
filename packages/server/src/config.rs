use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub use common::config::{CatalogConfig, ProgressConfig};

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens. Default: 7.
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

fn default_token_ttl_days() -> i64 {
    7
}

/// Submission limits.
#[derive(Debug, Deserialize, Clone)]
pub struct SubmissionConfig {
    /// Submissions allowed per user per minute. 0 disables the limit. Default: 10.
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,
    /// Maximum source size in bytes. Default: 65536.
    #[serde(default = "default_max_code_bytes")]
    pub max_code_bytes: usize,
}

fn default_rate_limit_per_minute() -> u32 {
    10
}
fn default_max_code_bytes() -> usize {
    64 * 1024
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            rate_limit_per_minute: default_rate_limit_per_minute(),
            max_code_bytes: default_max_code_bytes(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("CODELADDER_CONFIG").unwrap_or_else(|_| "config/config".to_string());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_days", 7)?
            .set_default("submission.rate_limit_per_minute", 10)?
            .set_default("submission.max_code_bytes", 64 * 1024)?
            .set_default("progress.write_policy", "always")?
            // Load from config/config.toml
            .add_source(File::with_name(&config_path).required(false))
            // Override from environment (e.g., CODELADDER__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("CODELADDER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
