//! Record store errors.

use thiserror::Error;

use crate::store::{RecordId, Table};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{table} record {id} not found")]
    NotFound { table: Table, id: RecordId },

    #[error("{table} record conflicts with an existing row: {detail}")]
    Conflict { table: Table, detail: String },

    #[error("invalid {table} record: {reason}")]
    InvalidRecord { table: Table, reason: String },

    #[error("{table} row does not match its record shape")]
    Malformed {
        table: Table,
        #[source]
        source: serde_json::Error,
    },

    #[error("record store unavailable")]
    Unavailable(#[from] reqwest::Error),

    #[error("unexpected response from record store: {0}")]
    UnexpectedResponse(String),
}
