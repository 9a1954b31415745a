//! Cadence application layer: record store, domain services and order submission.

pub mod checkout;
pub mod config;
pub mod context;
pub mod domain;
pub mod identity;
pub mod observability;
pub mod storage;
pub mod store;
