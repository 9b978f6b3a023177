//! REST implementation of MembershipDatabase

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use rolesync_common::NotionConfig;
use rolesync_core::{
    DatabasePage, DomainError, MembershipDatabase, PageBatch, PageId, PropertyItem, RepoResult,
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use super::models::{PropertyItemResponse, QueryRequest};
use crate::error::{map_status_error, map_transport_error};

const SERVICE: &str = "notion";

/// Membership database client
#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    base_url: String,
}

impl NotionClient {
    /// Create a client from configuration
    pub fn new(config: &NotionConfig) -> RepoResult<Self> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|e| DomainError::InternalError(format!("invalid database token: {e}")))?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "Notion-Version",
            HeaderValue::from_str(&config.version)
                .map_err(|e| DomainError::InternalError(format!("invalid API version: {e}")))?,
        );

        let http = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(map_transport_error)?;

        Ok(Self::with_client(http, &config.api_base_url))
    }

    /// Create a client around an existing reqwest client
    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T, F>(&self, request: RequestBuilder, not_found: F) -> RepoResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> DomainError,
    {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(map_transport_error);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "Database request failed");
        Err(map_status_error(SERVICE, status, &body, not_found))
    }
}

#[async_trait]
impl MembershipDatabase for NotionClient {
    #[instrument(skip(self))]
    async fn query_database(
        &self,
        database_id: &str,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> RepoResult<PageBatch> {
        let request = self
            .http
            .post(self.url(&format!("/databases/{database_id}/query")))
            .json(&QueryRequest {
                start_cursor,
                page_size,
            });

        self.send(request, || DomainError::DatabaseNotFound(database_id.to_string()))
            .await
    }

    #[instrument(skip(self))]
    async fn retrieve_page(&self, page_id: &PageId) -> RepoResult<DatabasePage> {
        let request = self.http.get(self.url(&format!("/pages/{page_id}")));

        self.send(request, || DomainError::PageNotFound(page_id.clone()))
            .await
    }

    #[instrument(skip(self))]
    async fn retrieve_property_item(
        &self,
        page_id: &PageId,
        property_id: &str,
    ) -> RepoResult<Vec<PropertyItem>> {
        let request = self
            .http
            .get(self.url(&format!("/pages/{page_id}/properties/{property_id}")));

        let response: PropertyItemResponse = self
            .send(request, || DomainError::PropertyNotFound {
                page_id: page_id.clone(),
                property_id: property_id.to_string(),
            })
            .await?;

        Ok(response.into_items())
    }
}
