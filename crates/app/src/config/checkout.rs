//! Checkout Config

use cadence::pricing::TaxRate;
use clap::Args;

use crate::checkout::CheckoutSettings;

/// Checkout settings.
#[derive(Debug, Clone, Args)]
pub struct CheckoutConfig {
    /// Sales tax as a fraction of the subtotal
    #[arg(long, env = "TAX_RATE", default_value = "0.15")]
    pub tax_rate: TaxRate,

    /// Shop WhatsApp number orders are handed off to
    #[arg(long, env = "WHATSAPP_NUMBER")]
    pub whatsapp_number: Option<String>,

    /// Order numbers to try before giving up on collisions
    #[arg(long, env = "ORDER_NUMBER_ATTEMPTS", default_value_t = 3_u32)]
    pub order_number_attempts: u32,

    /// Email of the signed-in customer; guest checkout when unset
    #[arg(long, env = "CADENCE_USER_EMAIL")]
    pub user_email: Option<String>,
}

impl CheckoutConfig {
    #[must_use]
    pub fn settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            tax_rate: self.tax_rate,
            whatsapp_number: self.whatsapp_number.clone(),
            order_number_attempts: self.order_number_attempts,
        }
    }
}
