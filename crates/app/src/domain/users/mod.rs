//! Users

pub mod errors;
pub mod records;
pub mod service;

pub use errors::UsersError;
pub use service::*;
