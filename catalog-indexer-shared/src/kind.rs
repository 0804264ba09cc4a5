//! Document kinds and how they are routed to indices.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Index holding catalog documents.
pub const CATALOG_INDEX: &str = "product";

/// Index shared by design and application documents.
pub const DESIGN_INDEX: &str = "mfs";

/// Index holding news documents.
pub const NEWS_INDEX: &str = "news";

const CATALOG_FIELDS: &[&str] = &["pn", "supplier_pn", "mfs", "supplier", "description", "param"];
const DESIGN_FIELDS: &[&str] = &["name", "mfs", "category", "pn", "desc", "features"];
const NEWS_FIELDS: &[&str] = &["main_title", "content", "article_content"];

/// The kind of a document. Determines mapping rules, the target index and
/// the type tag written alongside each document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Catalog,
    Design,
    Application,
    News,
}

/// Returned when a string does not name a document kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown document kind: {0}")]
pub struct ParseKindError(pub String);

impl DocumentKind {
    /// Every kind, in the order a full sync processes them.
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Catalog,
        DocumentKind::Design,
        DocumentKind::Application,
        DocumentKind::News,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Catalog => "catalog",
            DocumentKind::Design => "design",
            DocumentKind::Application => "application",
            DocumentKind::News => "news",
        }
    }

    /// Name of the index the kind is written to.
    pub fn index_name(&self) -> &'static str {
        match self {
            DocumentKind::Catalog => CATALOG_INDEX,
            DocumentKind::Design | DocumentKind::Application => DESIGN_INDEX,
            DocumentKind::News => NEWS_INDEX,
        }
    }

    /// Type tag stored in the `doc_type` field of every indexed document.
    ///
    /// Design and application documents share the `mfs` index and are told
    /// apart by this tag.
    pub fn type_tag(&self) -> &'static str {
        match self {
            DocumentKind::Catalog => "product",
            DocumentKind::Design => "design",
            DocumentKind::Application => "app",
            DocumentKind::News => "news",
        }
    }

    /// The fixed total-count marker carried by the kind's documents.
    /// Catalog documents carry none.
    pub fn total_count(&self) -> Option<i64> {
        match self {
            DocumentKind::Catalog => None,
            DocumentKind::Application => Some(1),
            DocumentKind::Design => Some(2),
            DocumentKind::News => Some(3),
        }
    }

    /// Fields matched by the structured query path.
    pub fn search_fields(&self) -> &'static [&'static str] {
        match self {
            DocumentKind::Catalog => CATALOG_FIELDS,
            DocumentKind::Design | DocumentKind::Application => DESIGN_FIELDS,
            DocumentKind::News => NEWS_FIELDS,
        }
    }

    /// Whether the kind shares its index with another kind and therefore
    /// needs a `doc_type` filter when searched.
    pub fn shares_index(&self) -> bool {
        matches!(self, DocumentKind::Design | DocumentKind::Application)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catalog" | "product" => Ok(DocumentKind::Catalog),
            "design" => Ok(DocumentKind::Design),
            "application" | "app" => Ok(DocumentKind::Application),
            "news" => Ok(DocumentKind::News),
            _ => Err(ParseKindError(s.to_string())),
        }
    }
}
