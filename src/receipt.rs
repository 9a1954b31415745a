//! Receipt
//!
//! Renders a cart and its quote as a console table.

use std::io;

use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::CartLineItem,
    pricing::{PricingError, Quote, ShippingOption, display_amount},
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// An amount could not be formatted.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO(#[from] io::Error),
}

/// A cart snapshot with its quote, ready for display.
#[derive(Debug, Clone, Copy)]
pub struct Receipt<'a> {
    items: &'a [CartLineItem],
    quote: Quote,
    shipping: ShippingOption,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt for the given line items.
    #[must_use]
    pub fn new(items: &'a [CartLineItem], quote: Quote, shipping: ShippingOption) -> Self {
        Self {
            items,
            quote,
            shipping,
        }
    }

    /// Writes the receipt table and summary.
    ///
    /// # Errors
    ///
    /// Returns an error if an amount cannot be formatted or the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        if self.items.is_empty() {
            writeln!(out, "Your cart is empty.")?;

            return Ok(());
        }

        let mut builder = Builder::default();

        builder.push_record(["#", "Item", "Qty", "Unit Price", "Line Total"]);

        for item in self.items {
            builder.push_record([
                item.id.to_string(),
                item.name.clone(),
                item.quantity.to_string(),
                display_amount(item.selling_price)?,
                display_amount(item.line_total())?,
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(
            1,
            HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
        );

        table.with(theme);
        table.modify(Columns::new(2..5), Alignment::right());
        table.modify(Rows::first(), Alignment::center());

        writeln!(out, "\n{table}")?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let quote = self.quote.rounded();

        writeln!(out, "Subtotal: {}", display_amount(quote.subtotal)?)?;
        writeln!(
            out,
            "Shipping ({}): {}",
            self.shipping.label(),
            display_amount(quote.shipping)?
        )?;
        writeln!(out, "Tax: {}", display_amount(quote.tax)?)?;
        writeln!(out, "Total: {}", display_amount(quote.total)?)?;

        Ok(())
    }
}
