//! Record Store
//!
//! The generic table store the storefront persists through: rows are JSON
//! objects keyed by an integer `id` the store assigns on insert.

use std::fmt;

use async_trait::async_trait;
use mockall::automock;
use serde_json::Value;

pub mod errors;
pub mod memory;
pub mod records;
pub mod rest;

pub use errors::StoreError;
pub use memory::InMemoryRecordStore;
pub use records::{RecordId, Stored, TableRecord};
pub use rest::{RestRecordStore, RestStoreConfig};

/// Tables the storefront reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    /// Product categories.
    Categories,
    /// Catalog products.
    Products,
    /// Product vendors.
    Vendors,
    /// Customer orders.
    Orders,
    /// Order line items.
    OrderItems,
    /// Application users.
    Users,
}

impl Table {
    /// Table name as the backend knows it.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Products => "products",
            Self::Vendors => "vendors",
            Self::Orders => "orders",
            Self::OrderItems => "order_items",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sort direction for [`Filter::order_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Row selection: column equality conditions plus an optional ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
    order: Option<(String, Direction)>,
}

impl Filter {
    /// Match every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Match rows whose `column` equals `value`.
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::all().and_eq(column, value)
    }

    /// Add another equality condition.
    #[must_use]
    pub fn and_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((column.into(), value.into()));
        self
    }

    /// Sort the selected rows by `column`.
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order = Some((column.into(), direction));
        self
    }

    /// Equality conditions, in the order they were added.
    #[must_use]
    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    /// Requested ordering, if any.
    #[must_use]
    pub fn order(&self) -> Option<(&str, Direction)> {
        self.order
            .as_ref()
            .map(|(column, direction)| (column.as_str(), *direction))
    }

    /// Whether `row` satisfies every condition.
    #[must_use]
    pub fn matches(&self, row: &Value) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| row.get(column) == Some(value))
    }
}

#[automock]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Rows of `table` matching `filter`.
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, StoreError>;

    /// Insert a row and return it as stored, including its assigned `id`.
    async fn insert(&self, table: Table, record: Value) -> Result<Value, StoreError>;

    /// Merge `patch` into the row with `id` and return the updated row.
    async fn update(&self, table: Table, id: RecordId, patch: Value) -> Result<Value, StoreError>;

    /// Delete the row with `id`.
    async fn delete(&self, table: Table, id: RecordId) -> Result<(), StoreError>;
}
