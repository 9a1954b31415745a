//! Users service errors.

use thiserror::Error;

use crate::store::{StoreError, Table};

#[derive(Debug, Error)]
pub enum UsersError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("storage error")]
    Store(#[source] StoreError),
}

impl From<StoreError> for UsersError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Conflict {
                table: Table::Users,
                ..
            } => Self::AlreadyExists,
            StoreError::NotFound {
                table: Table::Users,
                ..
            } => Self::NotFound,
            other => Self::Store(other),
        }
    }
}
