//! Supabase (PostgREST) table adapter.

use super::{EqFilter, RowStore, SelectQuery, StoreError};
use crate::config::StoreConfig;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::Value;
use service_core::observability::outbound_headers;

pub struct SupabaseStore {
    base_url: String,
    api_key: Secret<String>,
    client: Client,
}

impl SupabaseStore {
    pub fn new(config: &StoreConfig, client: Client) -> Result<Self, StoreError> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() || config.key.expose_secret().is_empty() {
            return Err(StoreError::NotConfigured(
                "SUPABASE_URL and SUPABASE_KEY must be set".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            api_key: config.key.clone(),
            client,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorized(&self, builder: RequestBuilder, request_id: Option<&str>) -> RequestBuilder {
        builder
            .headers(outbound_headers(request_id))
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(self.api_key.expose_secret())
    }
}

/// PostgREST `column=eq.value` query pairs.
fn filter_params(filters: &[EqFilter]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|f| (f.column.clone(), format!("eq.{}", f.value)))
        .collect()
}

fn select_params(query: &SelectQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    params.extend(filter_params(&query.filters));
    if let Some(order) = &query.order_by {
        let direction = if order.descending { "desc" } else { "asc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }
    params
}

async fn read_rows(response: Response) -> Result<Vec<Value>, StoreError> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(StoreError::Rejected {
            status: status.as_u16(),
            message: rejection_message(&text),
        });
    }

    response
        .json::<Vec<Value>>()
        .await
        .map_err(|e| StoreError::InvalidResponse(e.to_string()))
}

/// PostgREST errors carry a `message`; anything else is passed through as-is.
fn rejection_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct PostgrestError {
        message: String,
    }

    serde_json::from_str::<PostgrestError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string())
}

#[async_trait]
impl RowStore for SupabaseStore {
    async fn insert(
        &self,
        table: &str,
        row: &Value,
        request_id: Option<&str>,
    ) -> Result<Value, StoreError> {
        let response = self
            .authorized(self.client.post(self.table_url(table)), request_id)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        read_rows(response).await.map(Value::Array)
    }

    async fn select(
        &self,
        table: &str,
        query: &SelectQuery,
        request_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        let response = self
            .authorized(self.client.get(self.table_url(table)), request_id)
            .query(&select_params(query))
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        read_rows(response).await
    }

    async fn delete(
        &self,
        table: &str,
        filters: &[EqFilter],
        request_id: Option<&str>,
    ) -> Result<Vec<Value>, StoreError> {
        // PostgREST deletes every row when no filter is given.
        if filters.is_empty() {
            return Err(StoreError::InvalidResponse(
                "refusing unfiltered delete".to_string(),
            ));
        }

        let response = self
            .authorized(self.client.delete(self.table_url(table)), request_id)
            .header("Prefer", "return=representation")
            .query(&filter_params(filters))
            .send()
            .await
            .map_err(|e| StoreError::NetworkError(e.to_string()))?;

        read_rows(response).await
    }

    fn name(&self) -> &'static str {
        "supabase"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_params_use_postgrest_syntax() {
        let query = SelectQuery::default()
            .filter_eq("user_id", "u-1")
            .order_desc("date");
        assert_eq!(
            select_params(&query),
            vec![
                ("select".to_string(), "*".to_string()),
                ("user_id".to_string(), "eq.u-1".to_string()),
                ("order".to_string(), "date.desc".to_string()),
            ]
        );
    }

    #[test]
    fn rejection_prefers_postgrest_message() {
        assert_eq!(
            rejection_message(r#"{"code":"23502","message":"null value in column \"amount\""}"#),
            "null value in column \"amount\""
        );
        assert_eq!(rejection_message("gateway exploded"), "gateway exploded");
    }

    #[test]
    fn missing_credentials_are_rejected() {
        let config = StoreConfig {
            backend: crate::config::StoreBackend::Supabase,
            url: String::new(),
            key: Secret::new(String::new()),
        };
        assert!(matches!(
            SupabaseStore::new(&config, Client::new()),
            Err(StoreError::NotConfigured(_))
        ));
    }
}
