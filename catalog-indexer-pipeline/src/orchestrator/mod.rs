//! Orchestrator module for the catalog indexer pipeline.
//!
//! Coordinates the extractor, processor, and loader components.

use std::fmt;
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::errors::PipelineError;
use crate::extractor::SourceExtractor;
use crate::loader::SearchLoader;
use crate::processor::{DocumentBatch, DocumentProcessor};
use catalog_indexer_repository::BatchOperationSummary;
use catalog_indexer_shared::{DesignKind, DocumentKind};

/// Outcome of syncing one document kind.
#[derive(Debug, Clone)]
pub struct KindReport {
    pub kind: DocumentKind,
    /// Rows read from the source.
    pub extracted: usize,
    pub summary: BatchOperationSummary,
    /// Set when the kind failed before or during loading.
    pub error: Option<String>,
}

impl KindReport {
    fn failed(kind: DocumentKind, error: &PipelineError) -> Self {
        Self {
            kind,
            extracted: 0,
            summary: BatchOperationSummary::empty(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none() && self.summary.failed == 0
    }
}

impl fmt::Display for KindReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: extracted={} indexed={} failed={}",
            self.kind, self.extracted, self.summary.succeeded, self.summary.failed
        )?;
        if let Some(error) = &self.error {
            write!(f, " error={}", error)?;
        }
        Ok(())
    }
}

/// Outcome of a sync run, one report per requested kind.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    pub kinds: Vec<KindReport>,
}

impl SyncReport {
    pub fn total_indexed(&self) -> usize {
        self.kinds.iter().map(|k| k.summary.succeeded).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.kinds.iter().map(|k| k.summary.failed).sum()
    }

    /// Kinds that failed as a whole.
    pub fn failed_kinds(&self) -> Vec<DocumentKind> {
        self.kinds
            .iter()
            .filter(|k| k.error.is_some())
            .map(|k| k.kind)
            .collect()
    }

    pub fn report(&self, kind: DocumentKind) -> Option<&KindReport> {
        self.kinds.iter().find(|k| k.kind == kind)
    }
}

/// Orchestrator that coordinates the pipeline components.
///
/// Kinds run one after another. An error in one kind is logged and recorded
/// in its report; the remaining kinds still run.
pub struct Orchestrator {
    extractor: Arc<dyn SourceExtractor>,
    processor: DocumentProcessor,
    loader: SearchLoader,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        extractor: Arc<dyn SourceExtractor>,
        processor: DocumentProcessor,
        loader: SearchLoader,
    ) -> Self {
        Self {
            extractor,
            processor,
            loader,
        }
    }

    /// Sync every kind in `kinds`, in order.
    #[instrument(skip(self))]
    pub async fn run(&self, kinds: &[DocumentKind]) -> SyncReport {
        info!("Starting catalog indexer sync");

        let mut report = SyncReport::default();
        for &kind in kinds {
            let kind_report = match self.sync_kind(kind).await {
                Ok((extracted, summary)) => KindReport {
                    kind,
                    extracted,
                    summary,
                    error: None,
                },
                Err(e) => {
                    error!(kind = %kind, error = %e, "Failed to sync kind");
                    KindReport::failed(kind, &e)
                }
            };
            info!(report = %kind_report, "Kind finished");
            report.kinds.push(kind_report);
        }

        info!(
            indexed = report.total_indexed(),
            failed = report.total_failed(),
            "Sync complete"
        );
        report
    }

    /// Refresh the indices written by `kinds` so their documents are
    /// searchable. Each index is refreshed once.
    pub async fn refresh(&self, kinds: &[DocumentKind]) -> Result<(), PipelineError> {
        let mut refreshed: Vec<&str> = Vec::new();
        for &kind in kinds {
            let index = kind.index_name();
            if refreshed.contains(&index) {
                continue;
            }
            self.loader.refresh(kind).await?;
            info!(index = index, "Refreshed index");
            refreshed.push(index);
        }
        Ok(())
    }

    /// Extract, map and load one kind.
    async fn sync_kind(
        &self,
        kind: DocumentKind,
    ) -> Result<(usize, BatchOperationSummary), PipelineError> {
        let batch = self.extract(kind).await?;
        let extracted = batch.len();

        self.loader.ensure_index(kind).await?;

        if batch.is_empty() {
            return Ok((0, BatchOperationSummary::empty()));
        }

        let summary = self.loader.load(&batch).await;
        Ok((extracted, summary))
    }

    async fn extract(&self, kind: DocumentKind) -> Result<DocumentBatch, PipelineError> {
        let batch = match kind {
            DocumentKind::Catalog => {
                let rows = self.extractor.catalog_rows().await?;
                self.processor.process_catalog(rows)
            }
            DocumentKind::Design => {
                let rows = self.extractor.design_rows(DesignKind::Design).await?;
                self.processor.process_designs(DesignKind::Design, rows)
            }
            DocumentKind::Application => {
                let rows = self.extractor.design_rows(DesignKind::Application).await?;
                self.processor
                    .process_designs(DesignKind::Application, rows)
            }
            DocumentKind::News => {
                let rows = self.extractor.news_rows().await?;
                self.processor.process_news(rows)
            }
        };
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{CatalogRow, DesignRow, NewsRow};
    use async_trait::async_trait;
    use catalog_indexer_repository::{IndexRequest, SearchIndexError, SearchIndexProvider};
    use catalog_indexer_shared::{SearchPage, SearchResultEnvelope};
    use tokio::sync::Mutex;

    /// Mock extractor; the catalog query can be made to fail.
    struct MockExtractor {
        fail_catalog: bool,
    }

    #[async_trait]
    impl SourceExtractor for MockExtractor {
        async fn catalog_rows(&self) -> Result<Vec<CatalogRow>, PipelineError> {
            if self.fail_catalog {
                return Err(PipelineError::database("relation \"fm_product_rs\" does not exist"));
            }
            Ok(vec![
                CatalogRow {
                    id: 1,
                    source: "rs".to_string(),
                    ..Default::default()
                },
                CatalogRow {
                    id: 2,
                    source: "rs".to_string(),
                    ..Default::default()
                },
            ])
        }

        async fn design_rows(&self, _kind: DesignKind) -> Result<Vec<DesignRow>, PipelineError> {
            Ok(vec![DesignRow {
                id: 10,
                ..Default::default()
            }])
        }

        async fn news_rows(&self) -> Result<Vec<NewsRow>, PipelineError> {
            Ok(Vec::new())
        }
    }

    /// Mock search client recording writes, ensured and refreshed indices.
    struct MockSearchClient {
        writes: Mutex<Vec<(String, String)>>,
        ensured: Mutex<Vec<DocumentKind>>,
        refreshed: Mutex<Vec<String>>,
    }

    impl MockSearchClient {
        fn new() -> Self {
            Self {
                writes: Mutex::new(Vec::new()),
                ensured: Mutex::new(Vec::new()),
                refreshed: Mutex::new(Vec::new()),
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
                .push((index.to_string(), request.document_id.clone()));
            Ok(())
        }

        async fn ensure_index(&self, kind: DocumentKind) -> Result<(), SearchIndexError> {
            self.ensured.lock().await.push(kind);
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

        async fn refresh(&self, index: &str) -> Result<(), SearchIndexError> {
            self.refreshed.lock().await.push(index.to_string());
            Ok(())
        }

        async fn health_check(&self) -> Result<bool, SearchIndexError> {
            Ok(true)
        }
    }

    fn orchestrator(fail_catalog: bool, client: Arc<MockSearchClient>) -> Orchestrator {
        Orchestrator::new(
            Arc::new(MockExtractor { fail_catalog }),
            DocumentProcessor::new(),
            SearchLoader::new(client),
        )
    }

    #[tokio::test]
    async fn test_run_all_kinds() {
        let client = Arc::new(MockSearchClient::new());
        let report = orchestrator(false, client.clone())
            .run(&DocumentKind::ALL)
            .await;

        assert_eq!(report.kinds.len(), 4);
        assert_eq!(report.total_indexed(), 4);
        assert!(report.failed_kinds().is_empty());

        let writes = client.writes.lock().await;
        let ids: Vec<&str> = writes.iter().map(|(_, id)| id.as_str()).collect();
        assert_eq!(ids, vec!["rs_1", "rs_2", "design_10", "app_10"]);
        assert_eq!(writes[2].0, "mfs");

        let news = report.report(DocumentKind::News).unwrap();
        assert_eq!(news.extracted, 0);
        assert!(news.is_success());
    }

    #[tokio::test]
    async fn test_failed_kind_does_not_block_later_kinds() {
        let client = Arc::new(MockSearchClient::new());
        let report = orchestrator(true, client.clone())
            .run(&[DocumentKind::Catalog, DocumentKind::Design])
            .await;

        assert_eq!(report.failed_kinds(), vec![DocumentKind::Catalog]);

        let catalog = report.report(DocumentKind::Catalog).unwrap();
        assert_eq!(catalog.extracted, 0);
        assert_eq!(catalog.summary.total, 0);
        assert!(catalog.error.as_deref().unwrap().contains("fm_product_rs"));

        let design = report.report(DocumentKind::Design).unwrap();
        assert_eq!(design.extracted, 1);
        assert_eq!(design.summary.succeeded, 1);

        // The failed kind never reached the index.
        assert_eq!(*client.ensured.lock().await, vec![DocumentKind::Design]);
    }

    #[tokio::test]
    async fn test_refresh_each_index_once() {
        let client = Arc::new(MockSearchClient::new());
        orchestrator(false, client.clone())
            .refresh(&DocumentKind::ALL)
            .await
            .unwrap();

        assert_eq!(
            *client.refreshed.lock().await,
            vec!["product".to_string(), "mfs".to_string(), "news".to_string()]
        );
    }

    #[test]
    fn test_kind_report_display() {
        let report = KindReport::failed(DocumentKind::News, &PipelineError::database("timeout"));
        assert_eq!(
            report.to_string(),
            "news: extracted=0 indexed=0 failed=0 error=Database error: timeout"
        );
    }
}
