//! Cart Config

use std::path::PathBuf;

use cadence::cart::{CartError, CartStore, FileStorage};
use clap::Args;

/// Local cart persistence settings.
#[derive(Debug, Clone, Args)]
pub struct CartConfig {
    /// Directory the cart is persisted in
    #[arg(long, env = "CART_DIR", default_value = ".cadence")]
    pub cart_dir: PathBuf,
}

impl CartConfig {
    /// Open the persisted cart.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] when the directory cannot be created or the
    /// stored cart cannot be read.
    pub fn open(&self) -> Result<CartStore<FileStorage>, CartError> {
        let storage = FileStorage::open(&self.cart_dir)?;

        CartStore::load(storage)
    }
}

#[cfg(test)]
mod tests {
    use cadence::cart::CartLineItem;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn open_reloads_persisted_cart() -> TestResult {
        let dir = tempfile::tempdir()?;
        let config = CartConfig {
            cart_dir: dir.path().join("cart"),
        };

        config.open()?.add_to_cart(CartLineItem {
            id: 4,
            name: "Maracas".to_string(),
            description: String::new(),
            stock: 3,
            image: String::new(),
            selling_price: Decimal::new(1200, 2),
            quantity: 1,
        })?;

        let reopened = config.open()?;

        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.total(), Decimal::new(1200, 2));

        Ok(())
    }
}
