//! Catalog service errors.

use thiserror::Error;

use crate::{
    storage::ObjectStorageError,
    store::{RecordId, StoreError, Table},
};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("product not found")]
    ProductNotFound,

    #[error("category not found")]
    CategoryNotFound,

    #[error("product {0} is out of stock")]
    OutOfStock(RecordId),

    #[error("invalid image name {0:?}")]
    InvalidImageName(String),

    #[error("image upload failed")]
    ImageUpload(#[source] ObjectStorageError),

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for CatalogError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound {
                table: Table::Products,
                ..
            } => Self::ProductNotFound,
            StoreError::NotFound {
                table: Table::Categories,
                ..
            } => Self::CategoryNotFound,
            other => Self::Store(other),
        }
    }
}
