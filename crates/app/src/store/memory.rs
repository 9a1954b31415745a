//! In-memory record store.

use std::{cmp::Ordering, collections::BTreeMap};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::store::{Direction, Filter, RecordId, RecordStore, StoreError, Table};

type Row = Map<String, Value>;

#[derive(Debug, Default)]
struct TableState {
    rows: BTreeMap<RecordId, Row>,
    last_id: RecordId,
}

/// A [`RecordStore`] held in process memory.
///
/// Ids are assigned from a per-table counter starting at 1. Columns
/// registered with [`InMemoryRecordStore::with_unique`] reject duplicate
/// values with [`StoreError::Conflict`].
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    tables: RwLock<FxHashMap<Table, TableState>>,
    unique: FxHashMap<Table, Vec<String>>,
}

impl InMemoryRecordStore {
    /// An empty store enforcing the storefront's unique columns
    /// (`orders.order_number`, `users.email`).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
            .with_unique(Table::Orders, "order_number")
            .with_unique(Table::Users, "email")
    }

    /// Enforce uniqueness of `column` within `table`.
    #[must_use]
    pub fn with_unique(mut self, table: Table, column: impl Into<String>) -> Self {
        self.unique.entry(table).or_default().push(column.into());
        self
    }

    fn check_unique(
        &self,
        table: Table,
        state: &TableState,
        row: &Row,
        skip: Option<RecordId>,
    ) -> Result<(), StoreError> {
        let Some(columns) = self.unique.get(&table) else {
            return Ok(());
        };

        for column in columns {
            let Some(value) = row.get(column).filter(|value| !value.is_null()) else {
                continue;
            };

            let taken = state
                .rows
                .iter()
                .any(|(id, existing)| Some(*id) != skip && existing.get(column) == Some(value));

            if taken {
                return Err(StoreError::Conflict {
                    table,
                    detail: format!("{column} {value} already exists"),
                });
            }
        }

        Ok(())
    }
}

fn into_row(table: Table, value: Value) -> Result<Row, StoreError> {
    match value {
        Value::Object(row) => Ok(row),
        other => Err(StoreError::InvalidRecord {
            table,
            reason: format!("expected an object, got {other}"),
        }),
    }
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.read().await;

        let mut rows: Vec<Value> = tables
            .get(&table)
            .map(|state| {
                state
                    .rows
                    .values()
                    .map(|row| Value::Object(row.clone()))
                    .filter(|row| filter.matches(row))
                    .collect()
            })
            .unwrap_or_default();

        if let Some((column, direction)) = filter.order() {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(column), b.get(column));

                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        Ok(rows)
    }

    async fn insert(&self, table: Table, record: Value) -> Result<Value, StoreError> {
        let mut row = into_row(table, record)?;
        let mut tables = self.tables.write().await;
        let state = tables.entry(table).or_default();

        self.check_unique(table, state, &row, None)?;

        state.last_id += 1;

        let id = state.last_id;

        row.insert("id".to_string(), Value::from(id));
        state.rows.insert(id, row.clone());

        Ok(Value::Object(row))
    }

    async fn update(&self, table: Table, id: RecordId, patch: Value) -> Result<Value, StoreError> {
        let patch = into_row(table, patch)?;
        let mut tables = self.tables.write().await;
        let state = tables.entry(table).or_default();

        let mut row = state
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { table, id })?;

        for (column, value) in patch {
            if column != "id" {
                row.insert(column, value);
            }
        }

        self.check_unique(table, state, &row, Some(id))?;

        state.rows.insert(id, row.clone());

        Ok(Value::Object(row))
    }

    async fn delete(&self, table: Table, id: RecordId) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;

        tables
            .get_mut(&table)
            .and_then(|state| state.rows.remove(&id))
            .map(|_| ())
            .ok_or(StoreError::NotFound { table, id })
    }
}
