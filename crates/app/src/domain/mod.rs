//! Cadence Domain Concerns

pub mod catalog;
pub mod orders;
pub mod users;
