use std::{io, sync::Arc};

use cadence::{
    checkout::{CheckoutFormData, PaymentMethod},
    pricing::{ShippingOption, display_amount},
    receipt::Receipt,
};
use cadence_app::{
    checkout::{CheckoutError, CheckoutRequest, LogHandoff},
    config::AppConfig,
};
use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    name: Option<String>,

    /// Customer email
    #[arg(long)]
    email: Option<String>,

    /// Customer phone
    #[arg(long)]
    phone: Option<String>,

    /// Delivery address
    #[arg(long)]
    shipping_address: Option<String>,

    /// Billing address; defaults to the delivery address
    #[arg(long)]
    billing_address: Option<String>,

    /// Payment method (bank_transfer, cash_on_delivery, credit_card, whatsapp_order)
    #[arg(long, default_value = "whatsapp_order")]
    payment_method: PaymentMethod,

    /// Shipping option (standard, express, pickup)
    #[arg(long, default_value = "standard")]
    shipping: ShippingOption,

    /// Notes for the shop
    #[arg(long)]
    notes: Option<String>,

    /// Accept the terms and conditions
    #[arg(long)]
    agree_terms: bool,
}

pub(crate) async fn run(args: CheckoutArgs, config: &AppConfig) -> Result<(), String> {
    let mut cart = config
        .cart
        .open()
        .map_err(|error| format!("failed to open cart: {error}"))?;

    let context = super::context(config)?;
    let customer = context
        .customer_identity()
        .await
        .map_err(|error| format!("failed to look up customer: {error}"))?;

    let mut form = customer
        .as_ref()
        .map_or_else(CheckoutFormData::new, CheckoutFormData::for_identity);

    if customer.is_none() {
        form.customer_name = args.name.unwrap_or_default();
        form.customer_email = args.email.unwrap_or_default();
        form.customer_phone = args.phone.unwrap_or_default();
    }

    form.shipping_address = args.shipping_address.unwrap_or_default();
    form.same_as_shipping = args.billing_address.is_none();
    form.billing_address = args.billing_address;
    form.payment_method = args.payment_method;
    form.shipping_option = args.shipping;
    form.notes = args.notes;

    let request = CheckoutRequest::from_form(&form, args.agree_terms).with_identity(customer);
    let checkout = context.checkout(Arc::new(LogHandoff), config.checkout.settings());

    let items = cart.items().to_vec();

    let confirmation = match checkout.submit(&mut cart, &request).await {
        Ok(confirmation) => confirmation,
        Err(error) => return Err(describe(&error)),
    };

    Receipt::new(&items, confirmation.quote, form.shipping_option)
        .write_to(io::stdout().lock())
        .map_err(|error| format!("failed to write receipt: {error}"))?;

    println!("order_id: {}", confirmation.order_id);
    println!("order_number: {}", confirmation.order_number);
    println!(
        "total: {}",
        display_amount(confirmation.quote.rounded().total).map_err(|error| error.to_string())?
    );
    if let Some(url) = confirmation.whatsapp_url {
        println!("whatsapp: {url}");
    }

    Ok(())
}

fn describe(error: &CheckoutError) -> String {
    let mut lines = vec![error.user_message().to_string()];

    if let CheckoutError::Incomplete(errors) = error {
        lines.extend(
            errors
                .iter()
                .map(|(field, message)| format!("  {field}: {message}")),
        );
    }

    lines.join("\n")
}
