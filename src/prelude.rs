//! Cadence prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{
        CART_STORAGE_KEY, CartError, CartLineItem, CartStore, FileStorage, KeyValueStorage,
        MemoryStorage, ProductId, StorageError,
    },
    checkout::{
        CheckoutFormData, CheckoutValidator, CustomerIdentity, Field, FieldErrors, PaymentMethod,
        Schema, ValidCheckout,
    },
    pricing::{PricingError, Quote, ShippingOption, TaxRate, display_amount, round_cents},
    receipt::{Receipt, ReceiptError},
};
