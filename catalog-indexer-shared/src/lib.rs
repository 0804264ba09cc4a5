//! # Catalog Indexer Shared
//!
//! Document shapes and search data structures shared by the repository,
//! the pipeline and the binary.
//!
//! Three document shapes are indexed:
//!
//! - [`CatalogDocument`]: supplier catalog parts, index `product`
//! - [`DesignDocument`]: reference designs and applications, index `mfs`
//! - [`NewsDocument`]: news articles, index `news`

mod document;
mod kind;
mod search;

pub use document::{display_date, CatalogDocument, DesignDocument, DesignKind, NewsDocument};
pub use kind::{DocumentKind, ParseKindError};
pub use search::{
    SearchDocument, SearchHit, SearchPage, SearchResultEnvelope, ShardStats, DEFAULT_PAGE_SIZE,
};
