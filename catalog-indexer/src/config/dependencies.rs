//! Dependency initialization and wiring for the catalog indexer.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use super::settings::ProfileConfig;
use crate::IndexingError;
use catalog_indexer_pipeline::{
    ConnectionProvider, DocumentProcessor, Orchestrator, SearchLoader, SourceKind, SqlExtractor,
};
use catalog_indexer_repository::{
    connect_search_backend, OpenSearchClient, RawSearchClient, SearchIndexClient,
};
use catalog_indexer_shared::DocumentKind;

/// Container for the dependencies of a sync run.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
    /// Source pools, closed once the run is over.
    pub connections: Arc<ConnectionProvider>,
}

impl Dependencies {
    /// Open the sources needed for `kinds` and connect to the search backend.
    ///
    /// An unreachable relational source is returned as an error. The search
    /// backend is retried until it answers.
    pub async fn new(profile: &ProfileConfig, kinds: &[DocumentKind]) -> Result<Self, IndexingError> {
        let backend = profile.search_backend();

        info!(
            opensearch_url = %backend.url,
            kinds = ?kinds,
            "Initializing dependencies"
        );

        // Open the relational sources up front
        let connections = Arc::new(ConnectionProvider::new(profile.sources()));
        let sources: HashSet<SourceKind> =
            kinds.iter().map(|k| SourceKind::for_document(*k)).collect();
        for source in SourceKind::ALL {
            if sources.contains(&source) {
                connections.acquire(source).await?;
            }
        }

        info!("Relational sources connected");

        let search_client = connect_search_backend(&backend.url, backend.retry_delay()).await;

        info!("OpenSearch connection verified");

        let extractor = SqlExtractor::with_config(connections.clone(), profile.extractor())?;
        let processor = DocumentProcessor::new();
        let loader = SearchLoader::new(Arc::new(search_client));

        let orchestrator = Orchestrator::new(Arc::new(extractor), processor, loader);

        Ok(Self {
            orchestrator,
            connections,
        })
    }
}

/// Query client over the structured path, connected with retry.
pub async fn structured_search_client(profile: &ProfileConfig) -> SearchIndexClient {
    let backend = profile.search_backend();
    let client: OpenSearchClient = connect_search_backend(&backend.url, backend.retry_delay()).await;
    SearchIndexClient::new(Arc::new(client))
}

/// Client for the raw HTTP path. Needs no structured client.
pub fn raw_search_client(profile: &ProfileConfig) -> Result<RawSearchClient, IndexingError> {
    let backend = profile.search_backend();
    Ok(RawSearchClient::new(&backend.url, backend.raw_timeout())?)
}
