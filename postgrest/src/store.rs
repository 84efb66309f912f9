//! `PostgrestRecordStore` implementation.

use crate::PostgrestConfig;
use algorithm_hub_core::record_store::StoreFuture;
use algorithm_hub_core::{Record, RecordFilter, RecordStore, StorageError};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

/// Record store backed by a `PostgREST` endpoint.
#[derive(Clone, Debug)]
pub struct PostgrestRecordStore {
    client: Client,
    config: PostgrestConfig,
}

impl PostgrestRecordStore {
    /// Build a store with its own HTTP client.
    ///
    /// # Errors
    ///
    /// [`StorageError::Connection`] if the HTTP client cannot be constructed.
    pub fn new(config: PostgrestConfig) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/rest/v1/{table}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .bearer_auth(self.config.bearer_key())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<Record>, StorageError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(transport_error)?;
        rows(response).await
    }

    async fn select(
        &self,
        table: &str,
        conditions: &[(String, Value)],
        limit: Option<usize>,
    ) -> Result<Vec<Record>, StorageError> {
        let mut query = vec![("select".to_string(), "*".to_string())];
        query.extend(
            conditions
                .iter()
                .map(|(column, value)| (column.clone(), format!("eq.{}", literal(value)))),
        );
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }

        tracing::debug!(table, ?limit, "PostgREST select");
        self.send(self.client.get(self.table_url(table)).query(&query))
            .await
    }
}

/// Render a filter value the way `PostgREST` expects in `eq.` operators.
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn transport_error(err: reqwest::Error) -> StorageError {
    if err.is_timeout() {
        StorageError::Connection(format!("request timed out: {err}"))
    } else {
        StorageError::Connection(err.to_string())
    }
}

async fn rows(response: Response) -> Result<Vec<Record>, StorageError> {
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(StorageError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.bytes().await.map_err(transport_error)?;
    if body.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_slice(&body).map_err(|e| StorageError::Serialization(e.to_string()))
}

impl RecordStore for PostgrestRecordStore {
    fn create<'a>(&'a self, table: &'a str, fields: Record) -> StoreFuture<'a, Record> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.table_url(table))
                .header("Prefer", "return=representation")
                .json(&fields);
            let created = self.send(request).await?;
            Ok(created.into_iter().next().unwrap_or_default())
        })
    }

    fn update<'a>(
        &'a self,
        table: &'a str,
        id: &'a str,
        fields: Record,
    ) -> StoreFuture<'a, Record> {
        Box::pin(async move {
            let request = self
                .client
                .patch(self.table_url(table))
                .query(&[("id", format!("eq.{id}"))])
                .header("Prefer", "return=representation")
                .json(&fields);
            self.send(request)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| StorageError::NotFound {
                    table: table.to_string(),
                    id: id.to_string(),
                })
        })
    }

    fn list<'a>(
        &'a self,
        table: &'a str,
        filter: &'a RecordFilter,
        limit: Option<usize>,
    ) -> StoreFuture<'a, Vec<Record>> {
        Box::pin(async move { self.select(table, filter.conditions(), limit).await })
    }

    fn get<'a>(&'a self, table: &'a str, id: &'a str) -> StoreFuture<'a, Option<Record>> {
        Box::pin(async move {
            let conditions = [("id".to_string(), Value::String(id.to_string()))];
            let found = self.select(table, &conditions, Some(1)).await?;
            Ok(found.into_iter().next())
        })
    }
}
