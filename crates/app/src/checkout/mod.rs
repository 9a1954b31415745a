//! Order Submission
//!
//! Turns a validated checkout form and the current cart into persisted
//! order rows, then hands the order summary off to WhatsApp.

pub mod errors;
pub mod handoff;
pub mod order_number;
pub mod service;
pub mod summary;

pub use errors::CheckoutError;
pub use handoff::{Handoff, HandoffError, LogHandoff};
pub use order_number::OrderNumber;
pub use service::{CheckoutRequest, CheckoutService, CheckoutSettings, OrderConfirmation};
