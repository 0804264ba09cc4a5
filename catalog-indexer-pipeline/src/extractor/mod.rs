//! Extractor module for the catalog indexer pipeline.
//!
//! Reads source rows from the relational databases.

mod rows;
mod sql;
mod sql_extractor;

use async_trait::async_trait;

use crate::errors::PipelineError;
use catalog_indexer_shared::DesignKind;

pub use rows::{CatalogRow, DesignRow, NewsRow};
pub use sql::{
    build_catalog_sql, build_design_sql, validate_identifier, ExtractorConfig, SupplierTable,
    DEFAULT_PAGE_SIZE, DEFAULT_SUPPLIERS, NEWS_SQL,
};
pub use sql_extractor::SqlExtractor;

/// Source of rows for each document kind.
#[async_trait]
pub trait SourceExtractor: Send + Sync {
    /// Catalog rows from every supplier table.
    async fn catalog_rows(&self) -> Result<Vec<CatalogRow>, PipelineError>;

    /// Design or application rows.
    async fn design_rows(&self, kind: DesignKind) -> Result<Vec<DesignRow>, PipelineError>;

    /// News articles with their content.
    async fn news_rows(&self) -> Result<Vec<NewsRow>, PipelineError>;
}
