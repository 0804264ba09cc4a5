//! Search index provider trait definition.
//!
//! This module defines the abstract interface for search index operations,
//! allowing for different backend implementations (OpenSearch, Elasticsearch, etc.).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use crate::types::IndexRequest;
use catalog_indexer_shared::{DocumentKind, SearchPage, SearchResultEnvelope};

/// Abstracts the underlying search index implementation (OpenSearch, Elasticsearch, etc.).
///
/// Implementations are injected into the loader and the query client to enable
/// dependency injection and easy testing with mock implementations.
///
/// All methods return `Result<T, SearchIndexError>` for consistent error handling across
/// different backend implementations.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// Write a single document into `index`.
    ///
    /// A document with the same ID is replaced.
    ///
    /// # Arguments
    ///
    /// * `index` - Target index name
    /// * `request` - Serialized document and its ID
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the document was indexed successfully
    /// * `Err(SearchIndexError)` - If indexing fails
    async fn index_document(&self, index: &str, request: &IndexRequest)
        -> Result<(), SearchIndexError>;

    /// Ensure the index for `kind` exists with proper mappings.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index exists or was created successfully
    /// * `Err(SearchIndexError)` - If index creation fails
    async fn ensure_index(&self, kind: DocumentKind) -> Result<(), SearchIndexError>;

    /// Run the structured query: every term becomes a phrase-prefix
    /// multi-field clause that must match, results sorted by identity.
    ///
    /// # Arguments
    ///
    /// * `kind` - Document kind; selects the index, the fields and the decoder
    /// * `terms` - Query terms; empty means all documents of the kind
    /// * `page` - Offset/limit window
    async fn search(
        &self,
        kind: DocumentKind,
        terms: &[String],
        page: SearchPage,
    ) -> Result<SearchResultEnvelope, SearchIndexError>;

    /// Run a literal JSON query (the body of `"query"`) through the client,
    /// with the same sorting and paging as [`SearchIndexProvider::search`].
    async fn raw_query(
        &self,
        kind: DocumentKind,
        query: &str,
        page: SearchPage,
    ) -> Result<SearchResultEnvelope, SearchIndexError>;

    /// Make recent writes to `index` visible to searches.
    async fn refresh(&self, index: &str) -> Result<(), SearchIndexError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search engine answered the health probe
    /// * `Ok(false)` - If it answered with a failure status
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
