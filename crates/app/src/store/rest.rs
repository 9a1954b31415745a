//! REST record store client.
//!
//! Speaks the PostgREST dialect used by hosted Postgres backends: rows live
//! under `/rest/v1/<table>`, filters are `column=eq.<value>` query pairs and
//! writes ask for the affected rows back with `Prefer: return=representation`.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::store::{Direction, Filter, RecordId, RecordStore, StoreError, Table};

const RETURN_REPRESENTATION: &str = "return=representation";

/// Connection settings for a REST record store.
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Backend base URL, e.g. `"https://project.example.co"`.
    pub url: String,

    /// API key sent as both `apikey` and bearer token.
    pub api_key: String,
}

/// HTTP client for a PostgREST-style record store.
#[derive(Debug, Clone)]
pub struct RestRecordStore {
    config: RestStoreConfig,
    http: Client,
}

impl RestRecordStore {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: RestStoreConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{table}", self.config.url.trim_end_matches('/'))
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }
}

/// Query pairs for a filter, in PostgREST syntax.
#[must_use]
pub fn query_pairs(filter: &Filter) -> Vec<(String, String)> {
    let mut pairs = vec![("select".to_string(), "*".to_string())];

    pairs.extend(
        filter
            .conditions()
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{}", literal(value)))),
    );

    if let Some((column, direction)) = filter.order() {
        let direction = match direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };

        pairs.push(("order".to_string(), format!("{column}.{direction}")));
    }

    pairs
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn id_pair(id: RecordId) -> [(&'static str, String); 1] {
    [("id", format!("eq.{id}"))]
}

async fn error_for(table: Table, response: Response) -> StoreError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    match status {
        StatusCode::CONFLICT => StoreError::Conflict {
            table,
            detail: text,
        },
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => StoreError::InvalidRecord {
            table,
            reason: text,
        },
        _ => StoreError::UnexpectedResponse(format!(
            "{table} request failed with status {status}: {text}"
        )),
    }
}

async fn rows(table: Table, response: Response) -> Result<Vec<Value>, StoreError> {
    if !response.status().is_success() {
        return Err(error_for(table, response).await);
    }

    match response.json::<Value>().await? {
        Value::Array(rows) => Ok(rows),
        other => Err(StoreError::UnexpectedResponse(format!(
            "expected an array of {table} rows, got {other}"
        ))),
    }
}

fn single(table: Table, id: RecordId, rows: Vec<Value>) -> Result<Value, StoreError> {
    rows.into_iter()
        .next()
        .ok_or(StoreError::NotFound { table, id })
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        debug!(%table, ?filter, "selecting rows");

        let response = self
            .authorised(self.http.get(self.table_url(table)))
            .query(&query_pairs(filter))
            .send()
            .await?;

        rows(table, response).await
    }

    async fn insert(&self, table: Table, record: Value) -> Result<Value, StoreError> {
        let response = self
            .authorised(self.http.post(self.table_url(table)))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&record)
            .send()
            .await?;

        rows(table, response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::UnexpectedResponse(format!("insert into {table} returned no row")))
    }

    async fn update(&self, table: Table, id: RecordId, patch: Value) -> Result<Value, StoreError> {
        let response = self
            .authorised(self.http.patch(self.table_url(table)))
            .query(&id_pair(id))
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&patch)
            .send()
            .await?;

        single(table, id, rows(table, response).await?)
    }

    async fn delete(&self, table: Table, id: RecordId) -> Result<(), StoreError> {
        let response = self
            .authorised(self.http.delete(self.table_url(table)))
            .query(&id_pair(id))
            .header("Prefer", RETURN_REPRESENTATION)
            .send()
            .await?;

        single(table, id, rows(table, response).await?).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_render_filters_and_order() {
        let filter = Filter::eq("category_id", 3)
            .and_eq("name", "Cajón")
            .order_by("created_at", Direction::Descending);

        assert_eq!(
            query_pairs(&filter),
            vec![
                ("select".to_string(), "*".to_string()),
                ("category_id".to_string(), "eq.3".to_string()),
                ("name".to_string(), "eq.Cajón".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn table_url_joins_base_and_table() {
        let store = RestRecordStore::new(RestStoreConfig {
            url: "https://shop.example.co/".to_string(),
            api_key: "key".to_string(),
        });

        assert_eq!(
            store.table_url(Table::OrderItems),
            "https://shop.example.co/rest/v1/order_items"
        );
    }

    #[test]
    fn empty_write_result_is_not_found() {
        let result = single(Table::Orders, 5, Vec::new());

        assert!(
            matches!(result, Err(StoreError::NotFound { id: 5, .. })),
            "expected NotFound, got {result:?}"
        );
    }
}
