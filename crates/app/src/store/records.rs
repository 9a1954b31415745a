//! Typed Records
//!
//! Rows cross the [`RecordStore`] boundary as JSON; these helpers
//! (de)serialize them into per-table record types so shape errors surface
//! where the row enters the application.

use std::ops::Deref;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::store::{Filter, RecordStore, StoreError, Table};

/// Row identifier assigned by the store.
pub type RecordId = i64;

/// A record type bound to the table it is stored in.
pub trait TableRecord: Serialize + DeserializeOwned + Send + Sync {
    /// Table rows of this type live in.
    const TABLE: Table;
}

/// A record as stored: its assigned id plus its columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stored<R> {
    pub id: RecordId,

    #[serde(flatten)]
    pub record: R,
}

impl<R> Stored<R> {
    #[must_use]
    pub fn new(id: RecordId, record: R) -> Self {
        Self { id, record }
    }

    #[must_use]
    pub fn into_record(self) -> R {
        self.record
    }
}

impl<R> Deref for Stored<R> {
    type Target = R;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

/// Fetch every row of `R`'s table matching `filter`.
///
/// # Errors
///
/// Returns a [`StoreError`] when the store fails or a row does not decode.
pub async fn fetch_all<R: TableRecord>(
    store: &dyn RecordStore,
    filter: &Filter,
) -> Result<Vec<Stored<R>>, StoreError> {
    store
        .select(R::TABLE, filter)
        .await?
        .into_iter()
        .map(decode::<R>)
        .collect()
}

/// Fetch the row with `id`.
///
/// # Errors
///
/// Returns [`StoreError::NotFound`] when no such row exists.
pub async fn fetch_one<R: TableRecord>(
    store: &dyn RecordStore,
    id: RecordId,
) -> Result<Stored<R>, StoreError> {
    fetch_all::<R>(store, &Filter::eq("id", id))
        .await?
        .into_iter()
        .next()
        .ok_or(StoreError::NotFound { table: R::TABLE, id })
}

/// Insert `record` and return it with its assigned id.
///
/// # Errors
///
/// Returns a [`StoreError`] when the store rejects the row.
pub async fn create<R: TableRecord>(
    store: &dyn RecordStore,
    record: &R,
) -> Result<Stored<R>, StoreError> {
    let row = store.insert(R::TABLE, encode(record)?).await?;

    decode(row)
}

/// Apply a partial update to the row with `id`.
///
/// # Errors
///
/// Returns a [`StoreError`] when the row is missing or the patch is rejected.
pub async fn patch<R: TableRecord>(
    store: &dyn RecordStore,
    id: RecordId,
    patch: Value,
) -> Result<Stored<R>, StoreError> {
    let row = store.update(R::TABLE, id, patch).await?;

    decode(row)
}

/// Delete the row with `id`.
///
/// # Errors
///
/// Returns a [`StoreError`] when the row is missing or the store fails.
pub async fn remove<R: TableRecord>(store: &dyn RecordStore, id: RecordId) -> Result<(), StoreError> {
    store.delete(R::TABLE, id).await
}

/// Serialise a record to the row shape the store expects.
///
/// # Errors
///
/// Returns [`StoreError::Malformed`] if the record cannot be serialised.
pub fn encode<R: TableRecord>(record: &R) -> Result<Value, StoreError> {
    serde_json::to_value(record).map_err(|source| StoreError::Malformed {
        table: R::TABLE,
        source,
    })
}

/// Decode a stored row.
///
/// # Errors
///
/// Returns [`StoreError::Malformed`] if the row does not match `R`.
pub fn decode<R: TableRecord>(row: Value) -> Result<Stored<R>, StoreError> {
    serde_json::from_value(row).map_err(|source| StoreError::Malformed {
        table: R::TABLE,
        source,
    })
}
