//! Application configuration
//!
//! Every setting can come from a flag, the environment or a `.env` file.

use clap::Args;
use thiserror::Error;

pub mod cart;
pub mod checkout;
pub mod logging;
pub mod store;

pub use cart::CartConfig;
pub use checkout::CheckoutConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use store::{StoreBackend, StoreConfig};

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A record store URL was given without an API key.
    #[error("STORE_URL is set but STORE_API_KEY is missing")]
    MissingStoreApiKey,
}

/// All application settings.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Record store and object storage settings.
    #[command(flatten)]
    pub store: StoreConfig,

    /// Checkout settings.
    #[command(flatten)]
    pub checkout: CheckoutConfig,

    /// Local cart persistence.
    #[command(flatten)]
    pub cart: CartConfig,
}
