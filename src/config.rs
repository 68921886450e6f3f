//! Application configuration loaded from environment variables.

use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::store::StoreBackend;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Shared secret required by the toggle endpoint.
    pub api_key: String,

    /// Public base URL advertised in the OpenAPI document.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Serve Swagger UI and the OpenAPI document.
    #[serde(default = "default_true")]
    pub docs_enabled: bool,

    // === Status Store ===
    /// Persistence backend: memory, file or mongo.
    #[serde(default)]
    pub store_backend: StoreBackend,

    /// Path of the status file (file backend).
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,

    /// Starting value (memory backend).
    #[serde(default)]
    pub initial_status: bool,

    /// Connection string (mongo backend).
    #[serde(default)]
    pub mongodb_uri: Option<String>,

    /// Database name (mongo backend).
    #[serde(default = "default_mongodb_database")]
    pub mongodb_database: String,

    /// Collection name (mongo backend).
    #[serde(default = "default_mongodb_collection")]
    pub mongodb_collection: String,
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_status_file() -> PathBuf {
    PathBuf::from("appStatus.json")
}

fn default_mongodb_database() -> String {
    "killswitch".to_string()
}

fn default_mongodb_collection() -> String {
    "appstatus".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Ok(envy::from_env()?)
    }

    /// Load configuration from explicit `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(vars)?)
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(AppError::InvalidConfig("API_KEY must not be empty".to_string()));
        }

        if self.store_backend == StoreBackend::Mongo
            && self.mongodb_uri.as_deref().map_or(true, str::is_empty)
        {
            return Err(AppError::InvalidConfig(
                "MONGODB_URI is required when STORE_BACKEND=mongo".to_string(),
            ));
        }

        if let Some(base_url) = &self.base_url {
            Url::parse(base_url).map_err(|e| {
                AppError::InvalidConfig(format!("BASE_URL is not a valid URL: {}", e))
            })?;
        }

        Ok(())
    }

    /// Base URL for documentation, falling back to localhost on the listen port.
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_values_are_sensible() {
        let config = Config::from_vars(vars(&[("API_KEY", "admin")])).unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.store_backend, StoreBackend::File);
        assert_eq!(config.status_file, PathBuf::from("appStatus.json"));
        assert!(!config.initial_status);
        assert!(config.docs_enabled);
        assert_eq!(config.mongodb_database, "killswitch");
        assert_eq!(config.mongodb_collection, "appstatus");
        assert_eq!(config.base_url(), "http://localhost:5000");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn api_key_is_required() {
        let result = Config::from_vars(vars(&[("PORT", "3000")]));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn validate_rejects_empty_api_key() {
        let config = Config::from_vars(vars(&[("API_KEY", "")])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_requires_uri_for_mongo() {
        let config =
            Config::from_vars(vars(&[("API_KEY", "admin"), ("STORE_BACKEND", "mongo")])).unwrap();
        assert!(config.validate().is_err());

        let config = Config::from_vars(vars(&[
            ("API_KEY", "admin"),
            ("STORE_BACKEND", "mongo"),
            ("MONGODB_URI", "mongodb://localhost:27017"),
        ]))
        .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_malformed_base_url() {
        let config =
            Config::from_vars(vars(&[("API_KEY", "admin"), ("BASE_URL", "not a url")])).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_base_url_wins() {
        let config = Config::from_vars(vars(&[
            ("API_KEY", "admin"),
            ("BASE_URL", "https://switch.example.com"),
        ]))
        .unwrap();
        assert_eq!(config.base_url(), "https://switch.example.com");
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let result = Config::from_vars(vars(&[("API_KEY", "admin"), ("STORE_BACKEND", "redis")]));
        assert!(result.is_err());
    }
}
