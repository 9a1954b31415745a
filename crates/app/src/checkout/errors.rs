//! Checkout errors.

use cadence::checkout::FieldErrors;
use thiserror::Error;

use crate::{domain::orders::OrdersError, store::RecordId};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("a submission is already in progress")]
    InProgress,

    #[error("checkout form has {} invalid field(s)", .0.len())]
    Incomplete(FieldErrors),

    #[error("terms and conditions were not accepted")]
    TermsNotAccepted,

    #[error("cart is empty")]
    EmptyCart,

    #[error("cart line for product {product_id} has quantity {quantity} outside 1..={stock}")]
    InvalidCart {
        product_id: RecordId,
        quantity: u32,
        stock: u32,
    },

    #[error("no free order number after {attempts} attempt(s)")]
    OrderNumberExhausted { attempts: u32 },

    #[error("failed to create order")]
    OrderFailed(#[source] OrdersError),

    #[error("{failed} of {total} order item(s) failed to save")]
    ItemsFailed {
        failed: usize,
        total: usize,
        rolled_back: bool,
    },
}

impl CheckoutError {
    /// Message to show the customer.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InProgress => "Your order is already being placed. Please wait.",
            Self::Incomplete(_) => "Please complete all required fields.",
            Self::TermsNotAccepted => "Please accept the terms and conditions to continue.",
            Self::EmptyCart => "Your cart is empty.",
            Self::InvalidCart { .. } => {
                "Some items in your cart exceed the available stock. Please review your cart."
            }
            Self::OrderNumberExhausted { .. } | Self::OrderFailed(_) => {
                "We could not place your order. Please try again."
            }
            Self::ItemsFailed {
                rolled_back: true, ..
            } => "We could not save every item in your order, so it was cancelled. Your cart is unchanged; please try again.",
            Self::ItemsFailed {
                rolled_back: false,
                ..
            } => "Your order was only partly saved. Please contact us before trying again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use cadence::checkout::Field;

    use super::*;

    #[test]
    fn incomplete_counts_fields() {
        let mut errors = FieldErrors::new();

        errors.insert(Field::CustomerName, "Name is required".to_string());
        errors.insert(Field::CustomerPhone, "Phone is required".to_string());

        let error = CheckoutError::Incomplete(errors);

        assert_eq!(error.to_string(), "checkout form has 2 invalid field(s)");
        assert_eq!(error.user_message(), "Please complete all required fields.");
    }

    #[test]
    fn item_failures_distinguish_rollback() {
        let rolled_back = CheckoutError::ItemsFailed {
            failed: 1,
            total: 3,
            rolled_back: true,
        };
        let partial = CheckoutError::ItemsFailed {
            failed: 1,
            total: 3,
            rolled_back: false,
        };

        assert_eq!(rolled_back.to_string(), "1 of 3 order item(s) failed to save");
        assert_ne!(rolled_back.user_message(), partial.user_message());
    }

    #[test]
    fn invalid_cart_names_the_line() {
        let error = CheckoutError::InvalidCart {
            product_id: 4,
            quantity: 0,
            stock: 2,
        };

        assert_eq!(
            error.to_string(),
            "cart line for product 4 has quantity 0 outside 1..=2"
        );
    }
}
