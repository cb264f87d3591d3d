use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};

use super::constants;
use super::models::{FieldMap, field_map_from_descriptors};
use crate::error::ImportError;

/// CRM operations the batch driver depends on.
///
/// Split out as a trait so the driver can run against an in-memory fake in
/// tests; `UspacyClient` is the only production implementation.
#[async_trait]
pub trait CrmApi {
    /// Fetch field definitions for an entity type, keyed by field ID
    async fn fetch_fields(&self, entity: &str) -> Result<FieldMap>;

    /// Search entities matching one field/value pair (first page only)
    async fn search_entities(
        &self,
        entity: &str,
        search_field: &str,
        search_value: &str,
    ) -> Result<Vec<Value>>;

    /// Apply a partial update to a single entity
    async fn patch_entity(
        &self,
        entity: &str,
        entity_id: &str,
        payload: &Map<String, Value>,
    ) -> Result<()>;
}

/// Uspacy incoming-webhook API client.
///
/// Holds the shared HTTP session for the whole run: auth and content-type
/// headers are set once as client defaults and ride along on every request.
pub struct UspacyClient {
    api_base: String,
    http_client: reqwest::Client,
}

impl UspacyClient {
    pub fn new(base_url: &str, webhook_header: &str, webhook_token: &str) -> Result<Self> {
        let header_name = HeaderName::from_bytes(webhook_header.as_bytes())
            .with_context(|| format!("invalid webhook header name '{}'", webhook_header))?;
        let mut token_value = HeaderValue::from_str(webhook_token)
            .context("webhook token is not a valid header value")?;
        token_value.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(header_name, token_value);
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(constants::REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(constants::CONNECT_TIMEOUT_SECS))
            .user_agent("uspacy-import/1.0")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_base: constants::webhook_base(base_url, webhook_token),
            http_client,
        })
    }
}

#[async_trait]
impl CrmApi for UspacyClient {
    async fn fetch_fields(&self, entity: &str) -> Result<FieldMap> {
        let url = constants::fields_endpoint(&self.api_base, entity);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .context("field metadata request failed")?;
        let response = check_status("field metadata fetch", response).await?;

        let data: Value = response
            .json()
            .await
            .context("field metadata response is not valid JSON")?;
        let descriptors = data
            .as_array()
            .ok_or_else(|| anyhow!("expected a list of field descriptors, got: {}", data))?;

        Ok(field_map_from_descriptors(descriptors))
    }

    async fn search_entities(
        &self,
        entity: &str,
        search_field: &str,
        search_value: &str,
    ) -> Result<Vec<Value>> {
        let url = constants::entity_endpoint(&self.api_base, entity);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("boolean_operator", constants::SEARCH_BOOLEAN_OPERATOR),
                ("page", constants::SEARCH_PAGE),
                ("list", constants::SEARCH_PAGE_SIZE),
                (search_field, search_value),
            ])
            .send()
            .await
            .context("entity search request failed")?;
        let response = check_status("entity search", response).await?;

        let data: Value = response
            .json()
            .await
            .context("entity search response is not valid JSON")?;

        // Either a bare array or an object with the records under "data"
        Ok(match data {
            Value::Array(records) => records,
            Value::Object(mut object) => match object.remove("data") {
                Some(Value::Array(records)) => records,
                _ => Vec::new(),
            },
            _ => Vec::new(),
        })
    }

    async fn patch_entity(
        &self,
        entity: &str,
        entity_id: &str,
        payload: &Map<String, Value>,
    ) -> Result<()> {
        let url = constants::entity_record_endpoint(&self.api_base, entity, entity_id);
        let response = self
            .http_client
            .patch(&url)
            .json(payload)
            .send()
            .await
            .context("entity update request failed")?;
        check_status("entity update", response).await?;
        Ok(())
    }
}

/// Turn a non-success response into `ImportError::Remote` with the body text
async fn check_status(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ImportError::Remote {
        operation,
        status,
        body,
    }
    .into())
}
