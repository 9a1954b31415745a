//! Orders

pub mod errors;
pub mod records;
pub mod service;

pub use errors::OrdersError;
pub use service::*;
