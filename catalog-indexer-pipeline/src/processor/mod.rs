//! Processor module for the catalog indexer pipeline.
//!
//! Transforms source rows into search documents.

mod document_processor;

pub use document_processor::{parse_inventory, DocumentBatch, DocumentProcessor};
