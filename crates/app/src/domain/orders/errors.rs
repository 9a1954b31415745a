//! Orders service errors.

use thiserror::Error;

use crate::store::{StoreError, Table};

#[derive(Debug, Error)]
pub enum OrdersError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("order item not found")]
    ItemNotFound,

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for OrdersError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict {
                table: Table::Orders,
                ..
            } => Self::AlreadyExists,
            StoreError::NotFound {
                table: Table::Orders,
                ..
            } => Self::NotFound,
            StoreError::NotFound {
                table: Table::OrderItems,
                ..
            } => Self::ItemNotFound,
            other => Self::Store(other),
        }
    }
}
