use std::sync::Arc;

use cadence_app::{
    config::{AppConfig, StoreBackend},
    context::AppContext,
    identity::{IdentityProvider, StaticIdentityProvider},
};
use clap::{Parser, Subcommand};
use tracing::warn;

mod cart;
mod checkout;
mod quote;

#[derive(Debug, Parser)]
#[command(name = "cadence", about = "Cadence storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage the persisted cart
    Cart(cart::CartCommand),

    /// Show the cart with shipping and tax
    Quote(quote::QuoteArgs),

    /// Place an order for the cart
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    /// Parse arguments after loading `.env` (ignored if missing).
    pub(crate) fn load() -> Self {
        _ = dotenvy::dotenv();

        Self::parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        let Self { config, command } = self;

        match command {
            Commands::Cart(command) => cart::run(command, &config).await,
            Commands::Quote(args) => quote::run(&args, &config),
            Commands::Checkout(args) => checkout::run(args, &config).await,
        }
    }
}

fn context(config: &AppConfig) -> Result<AppContext, String> {
    let backend = config.store.backend().map_err(|error| error.to_string())?;

    if matches!(backend, StoreBackend::InMemory) {
        warn!("STORE_URL is not set; records are kept in memory for this run only");
    }

    let identity: Arc<dyn IdentityProvider> = match config.checkout.user_email.as_deref() {
        Some(email) => Arc::new(StaticIdentityProvider::signed_in(email)),
        None => Arc::new(StaticIdentityProvider::guest()),
    };

    Ok(AppContext::from_backend(backend, identity))
}
