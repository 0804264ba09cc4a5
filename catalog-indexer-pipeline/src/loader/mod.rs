//! Loader module for the catalog indexer pipeline.
//!
//! Loads processed documents into the search index.

use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::errors::PipelineError;
use crate::processor::DocumentBatch;
use catalog_indexer_repository::{
    BatchOperationSummary, IndexRequest, Indexable, SearchIndexProvider,
};
use catalog_indexer_shared::DocumentKind;

/// Loader that indexes documents into the search engine.
///
/// Documents are written one at a time. A failed write is logged and
/// recorded in the summary; the remaining documents are still attempted.
pub struct SearchLoader {
    client: Arc<dyn SearchIndexProvider>,
}

impl SearchLoader {
    /// Create a new search loader with the given client.
    pub fn new(client: Arc<dyn SearchIndexProvider>) -> Self {
        Self { client }
    }

    /// Write every document of `batch` to the index of its kind.
    pub async fn load(&self, batch: &DocumentBatch) -> BatchOperationSummary {
        let kind = batch.kind();
        let (index, type_tag) = (kind.index_name(), kind.type_tag());

        match batch {
            DocumentBatch::Catalog(docs) => self.index_batch(docs, index, type_tag).await,
            DocumentBatch::Design(_, docs) => self.index_batch(docs, index, type_tag).await,
            DocumentBatch::News(docs) => self.index_batch(docs, index, type_tag).await,
        }
    }

    /// Write `documents` to `index`, stamping each with `type_tag`.
    #[instrument(skip(self, documents), fields(document_count = documents.len()))]
    pub async fn index_batch<D: Indexable + Sync>(
        &self,
        documents: &[D],
        index: &str,
        type_tag: &str,
    ) -> BatchOperationSummary {
        let mut summary = BatchOperationSummary::empty();

        for doc in documents {
            let document_id = doc.document_id();

            let outcome = match IndexRequest::from_document(doc, type_tag) {
                Ok(request) => self.client.index_document(index, &request).await,
                Err(e) => Err(e),
            };

            if let Err(e) = &outcome {
                error!(
                    document_id = %document_id,
                    error = %e,
                    "Failed to index document"
                );
            }

            summary.record(document_id, outcome);
        }

        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Indexed batch"
        );
        summary
    }

    /// Ensure the index for `kind` exists with its mapping.
    pub async fn ensure_index(&self, kind: DocumentKind) -> Result<(), PipelineError> {
        self.client
            .ensure_index(kind)
            .await
            .map_err(|e| PipelineError::LoaderError(e.to_string()))
    }

    /// Make writes to the index of `kind` visible to searches.
    pub async fn refresh(&self, kind: DocumentKind) -> Result<(), PipelineError> {
        self.client
            .refresh(kind.index_name())
            .await
            .map_err(|e| PipelineError::LoaderError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_indexer_repository::SearchIndexError;
    use catalog_indexer_shared::{
        CatalogDocument, DesignDocument, DesignKind, SearchPage, SearchResultEnvelope,
    };
    use std::collections::HashSet;
    use tokio::sync::Mutex;

    /// Mock search client that fails writes for selected document IDs.
    struct MockSearchClient {
        fail_ids: HashSet<String>,
        writes: Mutex<Vec<(String, IndexRequest)>>,
    }

    impl MockSearchClient {
        fn new() -> Self {
            Self::failing(&[])
        }

        fn failing(ids: &[&str]) -> Self {
            Self {
                fail_ids: ids.iter().map(|id| id.to_string()).collect(),
                writes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SearchIndexProvider for MockSearchClient {
        async fn index_document(
            &self,
            index: &str,
            request: &IndexRequest,
        ) -> Result<(), SearchIndexError> {
            self.writes
                .lock()
                .await
                .push((index.to_string(), request.clone()));
            if self.fail_ids.contains(&request.document_id) {
                return Err(SearchIndexError::index("mapping conflict"));
            }
            Ok(())
        }

        async fn ensure_index(&self, _kind: DocumentKind) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn search(
            &self,
            _kind: DocumentKind,
            _terms: &[String],
            _page: SearchPage,
        ) -> Result<SearchResultEnvelope, SearchIndexError> {
            Ok(SearchResultEnvelope::empty())
        }

        async fn raw_query(
            &self,
            _kind: DocumentKind,
            _query: &str,
            _page: SearchPage,
        ) -> Result<SearchResultEnvelope, SearchIndexError> {
            Ok(SearchResultEnvelope::empty())
        }

        async fn refresh(&self, _index: &str) -> Result<(), SearchIndexError> {
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }
    }

    fn catalog(id: i64) -> CatalogDocument {
        CatalogDocument {
            id,
            source: "mouser".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_failed_write_does_not_stop_batch() {
        let client = Arc::new(MockSearchClient::failing(&["mouser_2"]));
        let loader = SearchLoader::new(client.clone());

        let docs = vec![catalog(1), catalog(2), catalog(3)];
        let summary = loader.index_batch(&docs, "product", "product").await;

        assert_eq!(summary.total, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let writes = client.writes.lock().await;
        let ids: Vec<&str> = writes.iter().map(|(_, r)| r.document_id.as_str()).collect();
        assert_eq!(ids, vec!["mouser_1", "mouser_2", "mouser_3"]);

        let failed: Vec<&str> = summary.failures().map(|r| r.document_id.as_str()).collect();
        assert_eq!(failed, vec!["mouser_2"]);
    }

    #[tokio::test]
    async fn test_load_routes_by_kind() {
        let client = Arc::new(MockSearchClient::new());
        let loader = SearchLoader::new(client.clone());

        let batch = DocumentBatch::Design(
            DesignKind::Application,
            vec![DesignDocument::new(9, DesignKind::Application)],
        );
        let summary = loader.load(&batch).await;
        assert_eq!(summary.succeeded, 1);

        let writes = client.writes.lock().await;
        let (index, request) = &writes[0];
        assert_eq!(index, "mfs");
        assert_eq!(request.document_id, "app_9");
        assert_eq!(request.body["doc_type"], "app");
        assert_eq!(request.body["total_count"], 1);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let client = Arc::new(MockSearchClient::new());
        let loader = SearchLoader::new(client.clone());

        let summary = loader.load(&DocumentBatch::News(Vec::new())).await;
        assert_eq!(summary.total, 0);
        assert!(client.writes.lock().await.is_empty());
    }
}
