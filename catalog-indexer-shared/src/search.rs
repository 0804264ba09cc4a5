//! Search request and response types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::{CatalogDocument, DesignDocument, NewsDocument};
use crate::kind::DocumentKind;

/// Number of hits returned when no page size is given.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// An offset/limit window over a sorted result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPage {
    pub from: usize,
    pub size: usize,
}

impl SearchPage {
    pub fn new(from: usize, size: usize) -> Self {
        Self { from, size }
    }

    /// The window immediately following this one.
    pub fn next(&self) -> Self {
        Self {
            from: self.from + self.size,
            size: self.size,
        }
    }
}

impl Default for SearchPage {
    fn default() -> Self {
        Self {
            from: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A decoded `_source` payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchDocument {
    Catalog(CatalogDocument),
    Design(DesignDocument),
    News(NewsDocument),
}

impl SearchDocument {
    /// Decode a hit's `_source` with the decoder for `kind`.
    pub fn from_source(kind: DocumentKind, source: Value) -> Result<Self, serde_json::Error> {
        match kind {
            DocumentKind::Catalog => serde_json::from_value(source).map(SearchDocument::Catalog),
            DocumentKind::Design | DocumentKind::Application => {
                serde_json::from_value(source).map(SearchDocument::Design)
            }
            DocumentKind::News => serde_json::from_value(source).map(SearchDocument::News),
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            SearchDocument::Catalog(doc) => doc.id,
            SearchDocument::Design(doc) => doc.id,
            SearchDocument::News(doc) => doc.id,
        }
    }

    /// Short label for listings: part number, design name or headline.
    pub fn title(&self) -> &str {
        match self {
            SearchDocument::Catalog(doc) => &doc.pn,
            SearchDocument::Design(doc) => &doc.name,
            SearchDocument::News(doc) => &doc.main_title,
        }
    }

    pub fn as_catalog(&self) -> Option<&CatalogDocument> {
        match self {
            SearchDocument::Catalog(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_design(&self) -> Option<&DesignDocument> {
        match self {
            SearchDocument::Design(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_news(&self) -> Option<&NewsDocument> {
        match self {
            SearchDocument::News(doc) => Some(doc),
            _ => None,
        }
    }
}

/// Shard-level outcome reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardStats {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub successful: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub failed: u32,
}

/// One scored hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub index: String,
    /// Backend document ID.
    pub id: String,
    pub score: f64,
    pub document: SearchDocument,
}

/// Search response with typed hits, in backend order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResultEnvelope {
    /// Time the backend spent on the query, in milliseconds.
    pub took: u64,
    pub timed_out: bool,
    pub shards: ShardStats,
    /// Total number of matching documents, not just the returned window.
    pub total: u64,
    pub max_score: Option<f64>,
    pub hits: Vec<SearchHit>,
    /// Hits dropped because their payload could not be decoded.
    pub skipped_hits: usize,
}

impl SearchResultEnvelope {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Identities of the returned documents, in hit order.
    pub fn ids(&self) -> Vec<i64> {
        self.hits.iter().map(|hit| hit.document.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_page() {
        let page = SearchPage::default();
        assert_eq!(page, SearchPage::new(0, 10));
        assert_eq!(page.next(), SearchPage::new(10, 10));
    }

    #[test]
    fn test_decode_by_kind() {
        let source = json!({
            "id": 9,
            "name": "Buck converter",
            "kind": "design",
            "total_count": 2
        });

        let doc = SearchDocument::from_source(DocumentKind::Design, source).unwrap();
        assert_eq!(doc.id(), 9);
        assert_eq!(doc.as_design().unwrap().name, "Buck converter");
        assert_eq!(doc.title(), "Buck converter");
        assert!(doc.as_catalog().is_none());
    }

    #[test]
    fn test_decode_missing_identity_fails() {
        let source = json!({ "pn": "NE555" });
        assert!(SearchDocument::from_source(DocumentKind::Catalog, source).is_err());
    }

    #[test]
    fn test_empty_envelope() {
        let envelope = SearchResultEnvelope::empty();
        assert!(envelope.is_empty());
        assert_eq!(envelope.total, 0);
        assert!(envelope.ids().is_empty());
    }
}
