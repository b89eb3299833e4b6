use serde::Deserialize;

use crate::domain::cache::ResponseCacheConfig;
use crate::infrastructure::cache::CacheConfig;
use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub response_cache: ResponseCacheConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub quiz: QuizConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Bearer token verification
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    /// HS256 signing secret; tokens are ignored when unset
    #[serde(default)]
    pub jwt_secret: Option<String>,
    /// Expected `iss` claim, if any
    #[serde(default)]
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct QuizConfig {
    /// JSON file with the question bank loaded at startup
    #[serde(default)]
    pub question_bank_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("response_cache.denylisted_params")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
