use std::io;

use cadence::{pricing::{Quote, ShippingOption}, receipt::Receipt};
use cadence_app::config::AppConfig;
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Shipping option (standard, express, pickup)
    #[arg(long, default_value = "standard")]
    shipping: ShippingOption,
}

pub(crate) fn run(args: &QuoteArgs, config: &AppConfig) -> Result<(), String> {
    let cart = config
        .cart
        .open()
        .map_err(|error| format!("failed to open cart: {error}"))?;

    let quote = Quote::calculate(cart.total(), args.shipping, config.checkout.tax_rate);

    Receipt::new(cart.items(), quote, args.shipping)
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to write quote: {error}"))
}
