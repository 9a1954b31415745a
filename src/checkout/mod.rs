//! Checkout
//!
//! Checkout form state and the validator that gates order submission.

pub mod form;
pub mod schema;
pub mod validator;

pub use form::{CheckoutFormData, CustomerIdentity, PaymentMethod, UnknownPaymentMethod};
pub use schema::{Field, Schema, UnknownField};
pub use validator::{CheckoutValidator, FieldErrors, ValidCheckout};
