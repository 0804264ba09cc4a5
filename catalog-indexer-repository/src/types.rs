//! Request and response types for search index operations.

use serde::Serialize;
use serde_json::Value;

use crate::errors::SearchIndexError;
use catalog_indexer_shared::{CatalogDocument, DesignDocument, NewsDocument};

/// Field carrying the type tag in every indexed document.
pub const TYPE_TAG_FIELD: &str = "doc_type";

/// A document that can be written to the search index.
pub trait Indexable: Serialize {
    /// Deterministic backend document ID.
    fn document_id(&self) -> String;
}

impl Indexable for CatalogDocument {
    fn document_id(&self) -> String {
        CatalogDocument::document_id(self)
    }
}

impl Indexable for DesignDocument {
    fn document_id(&self) -> String {
        DesignDocument::document_id(self)
    }
}

impl Indexable for NewsDocument {
    fn document_id(&self) -> String {
        NewsDocument::document_id(self)
    }
}

/// A serialized document ready for a single index write.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRequest {
    /// Backend document ID.
    pub document_id: String,
    /// JSON body, including the type tag.
    pub body: Value,
}

impl IndexRequest {
    /// Serialize `document` and stamp it with `type_tag`.
    pub fn from_document<D: Indexable>(
        document: &D,
        type_tag: &str,
    ) -> Result<Self, SearchIndexError> {
        let mut body = serde_json::to_value(document)
            .map_err(|e| SearchIndexError::serialization(e.to_string()))?;

        match body.as_object_mut() {
            Some(fields) => {
                fields.insert(TYPE_TAG_FIELD.to_string(), Value::from(type_tag));
            }
            None => {
                return Err(SearchIndexError::serialization(
                    "Document did not serialize to a JSON object",
                ))
            }
        }

        Ok(Self {
            document_id: document.document_id(),
            body,
        })
    }
}

/// Result of a batch operation for a single item.
///
/// This struct represents the outcome of a single write within a batch. It
/// indicates whether the write succeeded and includes error details if it failed.
#[derive(Debug, Clone)]
pub struct BatchOperationResult {
    /// Backend document ID.
    pub document_id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error if the operation failed.
    pub error: Option<SearchIndexError>,
}

/// Summary of a batch operation containing aggregate statistics and individual results.
///
/// Batches are not atomic: a summary with both successes and failures is an
/// ordinary outcome, and callers decide what to do with the failed items.
#[derive(Debug, Clone, Default)]
pub struct BatchOperationSummary {
    /// Total number of items attempted.
    pub total: usize,
    /// Number of successful operations.
    pub succeeded: usize,
    /// Number of failed operations.
    pub failed: usize,
    /// Individual results for each item, in batch order.
    pub results: Vec<BatchOperationResult>,
}

impl BatchOperationSummary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Record the outcome of one item.
    pub fn record(&mut self, document_id: String, outcome: Result<(), SearchIndexError>) {
        self.total += 1;
        match outcome {
            Ok(()) => {
                self.succeeded += 1;
                self.results.push(BatchOperationResult {
                    document_id,
                    success: true,
                    error: None,
                });
            }
            Err(e) => {
                self.failed += 1;
                self.results.push(BatchOperationResult {
                    document_id,
                    success: false,
                    error: Some(e),
                });
            }
        }
    }

    /// Results of the items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BatchOperationResult> {
        self.results.iter().filter(|r| !r.success)
    }
}
