use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub cache: CacheConfig,
    pub extraction: ExtractionConfig,
    pub accuracy: AccuracyConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// CSV or XLSX price list replacing the built-in seed catalog.
    pub price_list_path: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Memory,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    pub redis_url: String,
    pub key_prefix: String,
    pub ttl_hours: u64,
    pub max_entries: usize,
}

impl CacheConfig {
    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_hours * 3600
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccuracyConfig {
    /// Apply the reporting floors on top of the raw computed scores.
    pub enforce_floors: bool,
    /// Raise low and medium match tiers when the item carries specification context.
    pub promote_tiers: bool,
    pub history_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Append log lines to this file instead of stdout.
    pub file_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let defaults = Config::try_from(&AppConfig::default())?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name("config/default").required(false))
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with LUMBER prefix
            .add_source(Environment::with_prefix("LUMBER").separator("__"));

        config.build()?.try_deserialize()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                price_list_path: None,
            },
            cache: CacheConfig {
                backend: CacheBackend::Memory,
                redis_url: "redis://localhost:6379".to_string(),
                key_prefix: "lumber:estimate:".to_string(),
                ttl_hours: 24,
                max_entries: 512,
            },
            extraction: ExtractionConfig {
                api_url: "https://api.openai.com/v1".to_string(),
                api_key: String::new(),
                model: "gpt-4o".to_string(),
                max_tokens: 4096,
                temperature: 0.1,
                timeout_seconds: 120,
            },
            accuracy: AccuracyConfig {
                enforce_floors: true,
                promote_tiers: true,
                history_capacity: 100,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "json".to_string(),
                file_path: None,
            },
        }
    }
}
