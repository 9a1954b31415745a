//! Order summary text and the WhatsApp deep link that carries it.

use cadence::{
    cart::CartLineItem,
    checkout::ValidCheckout,
    pricing::{PricingError, Quote, display_amount},
};
use reqwest::Url;
use tracing::warn;

use crate::checkout::OrderNumber;

/// Human-readable summary of a placed order.
///
/// # Errors
///
/// Returns a [`PricingError`] if an amount cannot be formatted.
pub fn compose(
    order_number: &OrderNumber,
    checkout: &ValidCheckout,
    items: &[CartLineItem],
    quote: &Quote,
) -> Result<String, PricingError> {
    let quote = quote.rounded();

    let mut lines = vec![
        format!("Hello! I'd like to confirm my order {order_number}."),
        String::new(),
        format!("Customer: {}", checkout.customer_name),
        format!("Email: {}", checkout.customer_email),
        format!("Phone: {}", checkout.customer_phone),
        format!("Shipping address: {}", checkout.shipping_address),
    ];

    if let Some(billing) = checkout
        .billing_address
        .as_deref()
        .filter(|billing| *billing != checkout.shipping_address)
    {
        lines.push(format!("Billing address: {billing}"));
    }

    lines.push(String::new());
    lines.push("Items:".to_string());

    for item in items {
        lines.push(format!(
            "- {} x {} ({} each): {}",
            item.quantity,
            item.name,
            display_amount(item.selling_price)?,
            display_amount(item.line_total())?
        ));
    }

    lines.push(String::new());
    lines.push(format!("Subtotal: {}", display_amount(quote.subtotal)?));
    lines.push(format!(
        "Shipping ({}): {}",
        checkout.shipping_option.label(),
        display_amount(quote.shipping)?
    ));
    lines.push(format!("Tax: {}", display_amount(quote.tax)?));
    lines.push(format!("Total: {}", display_amount(quote.total)?));
    lines.push(format!("Payment method: {}", checkout.payment_method.label()));

    if let Some(notes) = &checkout.notes {
        lines.push(format!("Notes: {notes}"));
    }

    Ok(lines.join("\n"))
}

/// `https://wa.me/<number>?text=<summary>` for the shop's WhatsApp number.
///
/// Non-digits in `number` are dropped. Returns `None` when no digits remain.
#[must_use]
pub fn whatsapp_url(number: &str, text: &str) -> Option<Url> {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();

    if digits.is_empty() {
        warn!(number, "whatsapp number has no digits; skipping hand-off link");

        return None;
    }

    Url::parse_with_params(&format!("https://wa.me/{digits}"), &[("text", text)])
        .inspect_err(|error| warn!(%error, "failed to build whatsapp link"))
        .ok()
}
