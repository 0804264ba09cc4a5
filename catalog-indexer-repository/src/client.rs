//! Search index client implementation.
//!
//! This module provides the query-side client. Application code uses it to
//! run structured and raw queries; it validates requests before handing them
//! to the provider.

use std::sync::Arc;

use crate::config::SearchIndexConfig;
use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use catalog_indexer_shared::{DocumentKind, SearchPage, SearchResultEnvelope};

/// The main client for querying the search index.
pub struct SearchIndexClient {
    provider: Arc<dyn SearchIndexProvider>,
    config: SearchIndexConfig,
}

impl SearchIndexClient {
    /// Create a new SearchIndexClient with default configuration.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SearchIndexConfig::default(),
        }
    }

    /// Create a new SearchIndexClient with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: SearchIndexConfig) -> Self {
        Self { provider, config }
    }

    /// Check the page against the configured limit.
    fn validate_page(&self, page: SearchPage) -> Result<(), SearchIndexError> {
        if page.size == 0 {
            return Err(SearchIndexError::validation("Page size must be positive"));
        }
        if let Some(max) = self.config.max_page_size {
            if page.size > max {
                return Err(SearchIndexError::validation(format!(
                    "Page size {} exceeds maximum {}",
                    page.size, max
                )));
            }
        }
        Ok(())
    }

    /// Query the search index with the structured path.
    /// Input: document kind, query terms (all must match), page
    /// Output: hits ordered by ascending identity
    pub async fn query(
        &self,
        kind: DocumentKind,
        terms: &[String],
        page: SearchPage,
    ) -> Result<SearchResultEnvelope, SearchIndexError> {
        self.validate_page(page)?;

        let terms: Vec<String> = terms
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        self.provider.search(kind, &terms, page).await
    }

    /// Query the search index with a literal JSON query.
    /// Input: document kind, JSON query (e.g. `{"match_all":{}}`), page
    /// Output: hits ordered by ascending identity
    pub async fn raw_query(
        &self,
        kind: DocumentKind,
        query: &str,
        page: SearchPage,
    ) -> Result<SearchResultEnvelope, SearchIndexError> {
        self.validate_page(page)?;

        if query.trim().is_empty() {
            return Err(SearchIndexError::validation("Raw query is empty"));
        }

        self.provider.raw_query(kind, query, page).await
    }
}
