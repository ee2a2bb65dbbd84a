use std::collections::BTreeMap;

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

/// Covid-19 on Wikidata, used when an announcement has no category of its own.
pub const DEFAULT_CATEGORY_URL: &str = "https://www.wikidata.org/wiki/Q81068910";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub uploads: UploadsConfig,
    #[serde(default)]
    pub schema: SchemaConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadsConfig {
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SchemaConfig {
    pub default_category_url: String,
    /// Static properties merged into every JSON-LD payload, e.g. `spatialCoverage`.
    #[serde(default)]
    pub extra_properties: BTreeMap<String, serde_json::Value>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            default_category_url: DEFAULT_CATEGORY_URL.to_string(),
            extra_properties: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.url", "sqlite://announcements.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("uploads.dir", "uploads")?
            .set_default("schema.default_category_url", DEFAULT_CATEGORY_URL)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with ANNOUNCE__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("ANNOUNCE").separator("__"))

            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://announcements.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            uploads: UploadsConfig {
                dir: "uploads".to_string(),
            },
            schema: SchemaConfig::default(),
        }
    }
}
