//! # Catalog Indexer Repository
//!
//! This crate provides traits and implementations for interacting with the
//! search engine: document writes, the structured query path over the
//! OpenSearch client, the raw HTTP query path, and the retrying connection
//! to the backend.

pub mod client;
pub mod config;
pub mod connect;
pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod raw_search;
pub mod response;
pub mod types;

pub use client::SearchIndexClient;
pub use config::{SearchBackendConfig, SearchIndexConfig};
pub use connect::{connect_search_backend, connect_verified, retry_forever};
pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::OpenSearchClient;
pub use raw_search::RawSearchClient;
pub use types::{BatchOperationResult, BatchOperationSummary, IndexRequest, Indexable};
