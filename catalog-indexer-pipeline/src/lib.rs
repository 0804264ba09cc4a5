//! # Catalog Indexer Pipeline
//!
//! This crate provides the pipeline components for reading catalog, design
//! and news records from the relational sources and indexing them into
//! OpenSearch.
//!
//! ## Architecture
//!
//! The pipeline follows the Extractor-Processor-Loader pattern:
//!
//! 1. **Connection**: Opens the source pools on first use
//! 2. **Extractor**: Runs one query per document kind
//! 3. **Processor**: Maps rows into search documents
//! 4. **Loader**: Writes documents into the search index
//! 5. **Orchestrator**: Runs the kinds in order and reports each outcome

pub mod connection;
pub mod errors;
pub mod extractor;
pub mod loader;
pub mod orchestrator;
pub mod processor;

pub use connection::{ConnectionProvider, DatabaseConfig, SourceConfigs, SourceKind};
pub use errors::PipelineError;
pub use extractor::{ExtractorConfig, SourceExtractor, SqlExtractor, SupplierTable};
pub use loader::SearchLoader;
pub use orchestrator::{KindReport, Orchestrator, SyncReport};
pub use processor::{DocumentBatch, DocumentProcessor};
