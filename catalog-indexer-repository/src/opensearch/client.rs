//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesExistsParts, IndicesRefreshParts},
    IndexParts, OpenSearch, SearchParts,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_config::get_index_settings;
use crate::opensearch::queries::{build_raw_query, build_structured_query};
use crate::response::decode_search_response;
use crate::types::IndexRequest;
use catalog_indexer_shared::{DocumentKind, SearchPage, SearchResultEnvelope};

/// OpenSearch client implementation.
///
/// Provides document writes and the structured query path using OpenSearch
/// (or a compatible Elasticsearch endpoint) as the backend.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200").await?;
/// let page = SearchPage::default();
/// let result = client.search(DocumentKind::Catalog, &["usb".to_string()], page).await?;
/// println!("{} hits", result.total);
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
    url: String,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client for the specified URL.
    ///
    /// No request is sent; use [`SearchIndexProvider::health_check`] to verify
    /// the cluster is reachable.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchIndexError)` - If the URL or transport setup is invalid
    pub async fn new(url: &str) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// The URL this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn execute_search(
        &self,
        kind: DocumentKind,
        body: Value,
    ) -> Result<SearchResultEnvelope, SearchIndexError> {
        let index = kind.index_name();

        let response = self
            .client
            .search(SearchParts::Index(&[index]))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let response = check_status(response, SearchIndexError::QueryError).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        let envelope = decode_search_response(kind, body)?;
        debug!(
            index = %index,
            total = envelope.total,
            returned = envelope.hits.len(),
            took_ms = envelope.took,
            "Search completed"
        );
        Ok(envelope)
    }
}

/// Turn a non-success response into an error carrying the response body.
async fn check_status(
    response: Response,
    make_error: fn(String) -> SearchIndexError,
) -> Result<Response, SearchIndexError> {
    let status = response.status_code();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    error!(status = %status, body = %error_body, "OpenSearch request failed");
    Err(make_error(format!(
        "Request failed with status {}: {}",
        status, error_body
    )))
}

#[async_trait]
impl SearchIndexProvider for OpenSearchClient {
    /// Index a single document, replacing any document with the same ID.
    #[instrument(skip(self, request), fields(doc_id = %request.document_id))]
    async fn index_document(
        &self,
        index: &str,
        request: &IndexRequest,
    ) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .index(IndexParts::IndexId(index, &request.document_id))
            .body(&request.body)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        check_status(response, SearchIndexError::IndexError).await?;

        debug!(index = %index, "Document indexed");
        Ok(())
    }

    /// Create the kind's index with its mappings unless it already exists.
    async fn ensure_index(&self, kind: DocumentKind) -> Result<(), SearchIndexError> {
        let index = kind.index_name();

        let exists = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        if exists.status_code().is_success() {
            debug!(index = %index, "Index already exists");
            return Ok(());
        }

        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(get_index_settings(kind))
            .send()
            .await
            .map_err(|e| SearchIndexError::index_creation(e.to_string()))?;

        let status = response.status_code();
        if status.is_success() {
            info!(index = %index, "Created index");
            return Ok(());
        }

        // Another writer may have created it between the two calls.
        let error_body = response.text().await.unwrap_or_default();
        if error_body.contains("resource_already_exists_exception") {
            return Ok(());
        }

        error!(status = %status, body = %error_body, "Index creation failed");
        Err(SearchIndexError::index_creation(format!(
            "Creating index {} failed with status {}: {}",
            index, status, error_body
        )))
    }

    #[instrument(skip(self, terms), fields(term_count = terms.len()))]
    async fn search(
        &self,
        kind: DocumentKind,
        terms: &[String],
        page: SearchPage,
    ) -> Result<SearchResultEnvelope, SearchIndexError> {
        let body = build_structured_query(kind, terms, page);
        self.execute_search(kind, body).await
    }

    #[instrument(skip(self, query))]
    async fn raw_query(
        &self,
        kind: DocumentKind,
        query: &str,
        page: SearchPage,
    ) -> Result<SearchResultEnvelope, SearchIndexError> {
        let parsed: Value = serde_json::from_str(query)
            .map_err(|e| SearchIndexError::validation(format!("Invalid raw query: {}", e)))?;

        let body = build_raw_query(kind, parsed, page);
        self.execute_search(kind, body).await
    }

    async fn refresh(&self, index: &str) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .refresh(IndicesRefreshParts::Index(&[index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        check_status(response, SearchIndexError::IndexError).await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Ok(response.status_code().is_success())
    }
}
