//! sqlx implementation of the source extractor.

use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use tracing::{debug, instrument};

use super::rows::{CatalogRow, DesignRow, NewsRow};
use super::sql::{build_catalog_sql, build_design_sql, ExtractorConfig, NEWS_SQL};
use super::SourceExtractor;
use crate::connection::{ConnectionProvider, SourceKind};
use crate::errors::PipelineError;
use catalog_indexer_shared::DesignKind;

/// Reads rows from the relational sources through the shared pools.
pub struct SqlExtractor {
    connections: Arc<ConnectionProvider>,
    config: ExtractorConfig,
}

impl SqlExtractor {
    pub fn new(connections: Arc<ConnectionProvider>) -> Self {
        Self {
            connections,
            config: ExtractorConfig::default(),
        }
    }

    pub fn with_config(
        connections: Arc<ConnectionProvider>,
        config: ExtractorConfig,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            connections,
            config,
        })
    }
}

#[async_trait]
impl SourceExtractor for SqlExtractor {
    #[instrument(skip(self))]
    async fn catalog_rows(&self) -> Result<Vec<CatalogRow>, PipelineError> {
        let sql = build_catalog_sql(&self.config)?;
        let pool = self.connections.postgres(SourceKind::Catalog).await?;

        let mut stream = sqlx::query_as::<_, CatalogRow>(&sql)
            .bind(self.config.page_size)
            .bind(self.config.offset)
            .fetch(&pool);

        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await? {
            rows.push(row);
        }

        debug!(row_count = rows.len(), "Extracted catalog rows");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn design_rows(&self, kind: DesignKind) -> Result<Vec<DesignRow>, PipelineError> {
        let sql = build_design_sql(kind);
        let pool = self.connections.postgres(SourceKind::Design).await?;

        let mut stream = sqlx::query_as::<_, DesignRow>(&sql)
            .bind(self.config.page_size)
            .bind(self.config.offset)
            .fetch(&pool);

        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await? {
            rows.push(row);
        }

        debug!(row_count = rows.len(), "Extracted design rows");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn news_rows(&self) -> Result<Vec<NewsRow>, PipelineError> {
        let pool = self.connections.mysql(SourceKind::News).await?;

        let mut stream = sqlx::query_as::<_, NewsRow>(NEWS_SQL)
            .bind(self.config.page_size)
            .bind(self.config.offset)
            .fetch(&pool);

        let mut rows = Vec::new();
        while let Some(row) = stream.try_next().await? {
            rows.push(row);
        }

        debug!(row_count = rows.len(), "Extracted news rows");
        Ok(rows)
    }
}
