//! Cadence
//!
//! Cadence is the storefront core for a small instrument shop: a persisted
//! client cart, exact-decimal pricing and the checkout validator that gates
//! order submission.

pub mod cart;
pub mod checkout;
pub mod prelude;
pub mod pricing;
pub mod receipt;
