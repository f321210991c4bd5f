use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::template::Template;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub shopify: ShopifyConfig,
    #[serde(default)]
    pub wylto: WyltoConfig,
    #[serde(default)]
    pub otel: OtelConfig,
    /// Extra message templates registered next to the built-in ones
    #[serde(default)]
    pub templates: Vec<Template>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyConfig {
    /// App secret used to sign webhook bodies
    pub api_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WyltoConfig {
    #[serde(default = "default_wylto_base_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_wylto_timeout")]
    pub timeout_seconds: u64,
    /// Extra attempts after the first failed forward
    #[serde(default = "default_wylto_max_retries")]
    pub max_retries: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OtelConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_otel_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_wylto_base_url() -> String {
    "https://api.wylto.com".to_string()
}

fn default_wylto_timeout() -> u64 {
    10
}

fn default_wylto_max_retries() -> u32 {
    2
}

fn default_otel_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "wylto-shopify-relay".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8081)?
            .set_default("wylto.base_url", default_wylto_base_url())?
            .set_default("wylto.timeout_seconds", 10)?
            .set_default("wylto.max_retries", 2)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SERVER__PORT, SHOPIFY__API_SECRET, WYLTO__API_KEY, ...
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.shopify.api_secret.is_empty() {
            return Err(ConfigError::Message(
                "shopify.api_secret must not be empty".to_string(),
            ));
        }
        if self.wylto.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "wylto.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl WyltoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for WyltoConfig {
    fn default() -> Self {
        Self {
            base_url: default_wylto_base_url(),
            api_key: None,
            timeout_seconds: default_wylto_timeout(),
            max_retries: default_wylto_max_retries(),
        }
    }
}

impl Default for OtelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_otel_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8081);

        let wylto = WyltoConfig::default();
        assert_eq!(wylto.timeout(), Duration::from_secs(10));
        assert_eq!(wylto.max_retries, 2);
        assert!(wylto.api_key.is_none());
    }

    #[test]
    fn test_deserialize_with_templates() {
        let settings: Settings = Config::builder()
            .add_source(config::File::from_str(
                r#"
                [shopify]
                api_secret = "shh"

                [[templates]]
                key = "BACK_IN_STOCK"
                body = "{{productTitle}} is back!"
                required_fields = ["productTitle"]
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.shopify.api_secret, "shh");
        assert_eq!(settings.templates.len(), 1);
        assert_eq!(settings.templates[0].key, "BACK_IN_STOCK");
        assert_eq!(settings.server_addr(), "0.0.0.0:8081");
        assert!(settings.check().is_ok());
    }

    #[test]
    fn test_check_rejects_empty_secret() {
        let settings = Settings {
            server: ServerConfig::default(),
            api: ApiConfig::default(),
            shopify: ShopifyConfig {
                api_secret: String::new(),
            },
            wylto: WyltoConfig::default(),
            otel: OtelConfig::default(),
            templates: Vec::new(),
        };
        assert!(settings.check().is_err());
    }
}
