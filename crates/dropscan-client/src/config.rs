//! Client configuration types.

use dropscan_core::{Result, ScanError};

use crate::{CatalogClient, CatalogClientBuilder};

/// Environment variable holding the catalog store base URL
pub const ENV_STORE_URL: &str = "DROPSCAN_STORE_URL";

/// Environment variable holding the catalog store access key
pub const ENV_STORE_KEY: &str = "DROPSCAN_STORE_KEY";

/// Connection parameters for the catalog store
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the store, without a trailing slash
    pub url: String,

    /// Access key sent with every request
    pub api_key: String,
}

impl CatalogConfig {
    /// Create a configuration from explicit parameters
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Load the configuration from the environment.
    ///
    /// Reads [`ENV_STORE_URL`] and [`ENV_STORE_KEY`]. A missing or empty
    /// variable is a fatal configuration error: the pipeline cannot run
    /// without its store.
    pub fn from_env() -> Result<Self> {
        let url = require_env(ENV_STORE_URL)?;
        let api_key = require_env(ENV_STORE_KEY)?;
        Ok(Self { url, api_key })
    }

    /// Build a client from this configuration
    #[must_use]
    pub fn client(&self) -> CatalogClient {
        self.builder().build()
    }

    /// Start a builder from this configuration for further customization
    #[must_use]
    pub fn builder(&self) -> CatalogClientBuilder {
        CatalogClient::builder(&self.url, &self.api_key)
    }
}

fn require_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ScanError::Config(format!("{name} is not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment access is process-global, so both cases run in one test.
    #[test]
    fn test_from_env() {
        std::env::remove_var(ENV_STORE_URL);
        std::env::remove_var(ENV_STORE_KEY);
        let err = CatalogConfig::from_env().unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
        assert!(err.to_string().contains(ENV_STORE_URL));

        std::env::set_var(ENV_STORE_URL, "http://127.0.0.1:54321");
        std::env::set_var(ENV_STORE_KEY, "service-key");
        let config = CatalogConfig::from_env().unwrap();
        assert_eq!(config.url, "http://127.0.0.1:54321");
        assert_eq!(config.api_key, "service-key");

        std::env::remove_var(ENV_STORE_URL);
        std::env::remove_var(ENV_STORE_KEY);
    }
}
