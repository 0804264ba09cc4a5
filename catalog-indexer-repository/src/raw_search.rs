//! Raw HTTP query path.
//!
//! Queries the backend's REST `_search` endpoint with query-string
//! parameters and decodes the JSON body directly, without going through the
//! OpenSearch client. It stays usable when no structured client exists.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

use crate::errors::SearchIndexError;
use crate::response::decode_search_response;
use crate::types::TYPE_TAG_FIELD;
use catalog_indexer_shared::{DocumentKind, SearchPage, SearchResultEnvelope};

/// Timeout applied to every raw query request.
pub const DEFAULT_RAW_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for the raw query path.
#[derive(Debug, Clone)]
pub struct RawSearchClient {
    http: reqwest::Client,
    base_url: String,
}

impl RawSearchClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Backend URL (e.g., "http://localhost:9200")
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SearchIndexError> {
        Url::parse(base_url).map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The `_search` endpoint of the kind's index.
    pub fn search_url(&self, kind: DocumentKind) -> String {
        format!("{}/{}/_search", self.base_url, kind.index_name())
    }

    /// Run a free-text query string against the kind's index.
    ///
    /// # Arguments
    ///
    /// * `kind` - Document kind; selects the index and the decoder
    /// * `q` - Query-string syntax (e.g., "usb apple"); empty matches everything
    /// * `page` - Offset/limit window
    ///
    /// # Returns
    ///
    /// * `Ok(SearchResultEnvelope)` - Decoded hits, possibly none
    /// * `Err(SearchIndexError)` - If the request fails or the body is not a search response
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        kind: DocumentKind,
        q: &str,
        page: SearchPage,
    ) -> Result<SearchResultEnvelope, SearchIndexError> {
        let url = self.search_url(kind);
        let params = build_query_params(kind, q, page);

        let response = self.http.get(&url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %error_body, "Raw search request failed");
            return Err(SearchIndexError::query(format!(
                "Raw search failed with status {}: {}",
                status, error_body
            )));
        }

        let body: Value = response.json().await?;
        let envelope = decode_search_response(kind, body)?;

        debug!(
            url = %url,
            total = envelope.total,
            returned = envelope.hits.len(),
            "Raw search completed"
        );
        Ok(envelope)
    }
}

/// Query-string parameters for a raw search.
///
/// Kinds sharing an index get their type tag prepended to `q` so a raw
/// search only sees its own kind.
pub fn build_query_params(
    kind: DocumentKind,
    q: &str,
    page: SearchPage,
) -> Vec<(&'static str, String)> {
    let q = q.trim();
    let q = if kind.shares_index() {
        let tag = format!("{}:{}", TYPE_TAG_FIELD, kind.type_tag());
        if q.is_empty() {
            tag
        } else {
            format!("{} AND ({})", tag, q)
        }
    } else {
        q.to_string()
    };

    let mut params = vec![
        ("size", page.size.to_string()),
        ("from", page.from.to_string()),
        ("sort", "id:asc".to_string()),
        ("track_scores", "true".to_string()),
    ];
    if !q.is_empty() {
        params.push(("q", q));
    }
    params
}
