//! # Catalog Indexer
//!
//! Main library for the electronic component catalog search indexer.
//!
//! This crate provides the configuration, logging setup and dependency
//! wiring used by the `catalog-indexer` binary.

pub mod config;
pub mod logging;

pub use config::{AppConfig, AppEnv, Dependencies, ProfileConfig};

use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    PipelineError(#[from] catalog_indexer_pipeline::PipelineError),

    /// Search error.
    #[error("Search error: {0}")]
    SearchError(#[from] catalog_indexer_repository::SearchIndexError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
