//! Record Store Config

use clap::Args;

use crate::{
    config::ConfigError,
    storage::RestObjectStorageConfig,
    store::RestStoreConfig,
};

/// Record store settings.
#[derive(Debug, Clone, Args)]
pub struct StoreConfig {
    /// Hosted backend base URL; orders are kept in memory when unset
    #[arg(long, env = "STORE_URL")]
    pub store_url: Option<String>,

    /// Backend API key
    #[arg(long, env = "STORE_API_KEY", hide_env_values = true)]
    pub store_api_key: Option<String>,
}

/// Where records are persisted.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// Process-local tables, lost on exit.
    InMemory,

    /// A hosted REST backend serving both records and objects.
    Rest {
        records: RestStoreConfig,
        objects: RestObjectStorageConfig,
    },
}

impl StoreConfig {
    /// Resolve the configured backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingStoreApiKey`] when a URL is given without a key.
    pub fn backend(&self) -> Result<StoreBackend, ConfigError> {
        let Some(url) = self.store_url.as_deref().filter(|url| !url.trim().is_empty()) else {
            return Ok(StoreBackend::InMemory);
        };

        let api_key = self
            .store_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingStoreApiKey)?;

        Ok(StoreBackend::Rest {
            records: RestStoreConfig {
                url: url.to_string(),
                api_key: api_key.clone(),
            },
            objects: RestObjectStorageConfig {
                url: url.to_string(),
                api_key,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn missing_url_selects_memory() -> TestResult {
        let config = StoreConfig {
            store_url: None,
            store_api_key: Some("key".to_string()),
        };

        assert!(matches!(config.backend()?, StoreBackend::InMemory));

        Ok(())
    }

    #[test]
    fn url_without_key_is_rejected() {
        let config = StoreConfig {
            store_url: Some("https://shop.example.co".to_string()),
            store_api_key: Some("  ".to_string()),
        };

        assert!(matches!(
            config.backend(),
            Err(ConfigError::MissingStoreApiKey)
        ));
    }

    #[test]
    fn url_and_key_select_rest() -> TestResult {
        let config = StoreConfig {
            store_url: Some("https://shop.example.co".to_string()),
            store_api_key: Some("secret".to_string()),
        };

        let StoreBackend::Rest { records, objects } = config.backend()? else {
            return Err("expected a REST backend".into());
        };

        assert_eq!(records.url, "https://shop.example.co");
        assert_eq!(objects.api_key, "secret");

        Ok(())
    }
}
