//! Error types for the catalog indexer pipeline.

use catalog_indexer_repository::SearchIndexError;
use thiserror::Error;

/// Errors that can occur in the catalog indexer pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error opening or using a relational source.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error from the source extractor.
    #[error("Extractor error: {0}")]
    ExtractorError(String),

    /// Error from the loader component.
    #[error("Loader error: {0}")]
    LoaderError(String),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchIndexError),

    /// Invalid pipeline configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PipelineError {
    /// Create a database error.
    pub fn database(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Create an extractor error.
    pub fn extractor(msg: impl Into<String>) -> Self {
        Self::ExtractorError(msg.into())
    }

    /// Create a loader error.
    pub fn loader(msg: impl Into<String>) -> Self {
        Self::LoaderError(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

impl From<sqlx::Error> for PipelineError {
    fn from(err: sqlx::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}
