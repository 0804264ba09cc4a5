//! Document processor implementation.
//!
//! Transforms source rows into the documents written to the search index.

use tracing::{debug, instrument};

use crate::extractor::{CatalogRow, DesignRow, NewsRow};
use catalog_indexer_shared::{
    CatalogDocument, DesignDocument, DesignKind, DocumentKind, NewsDocument,
};

/// Documents of one kind, ready for loading.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBatch {
    Catalog(Vec<CatalogDocument>),
    Design(DesignKind, Vec<DesignDocument>),
    News(Vec<NewsDocument>),
}

impl DocumentBatch {
    pub fn kind(&self) -> DocumentKind {
        match self {
            DocumentBatch::Catalog(_) => DocumentKind::Catalog,
            DocumentBatch::Design(kind, _) => kind.document_kind(),
            DocumentBatch::News(_) => DocumentKind::News,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            DocumentBatch::Catalog(docs) => docs.len(),
            DocumentBatch::Design(_, docs) => docs.len(),
            DocumentBatch::News(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Processor that maps rows to documents.
///
/// Mapping never fails: NULL text becomes an empty string and unparseable
/// inventory becomes zero.
#[derive(Debug, Default)]
pub struct DocumentProcessor {}

impl DocumentProcessor {
    pub fn new() -> Self {
        Self {}
    }

    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    pub fn process_catalog(&self, rows: Vec<CatalogRow>) -> DocumentBatch {
        let docs: Vec<CatalogDocument> = rows.into_iter().map(|r| self.map_catalog(r)).collect();
        debug!(document_count = docs.len(), "Processed catalog rows");
        DocumentBatch::Catalog(docs)
    }

    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    pub fn process_designs(&self, kind: DesignKind, rows: Vec<DesignRow>) -> DocumentBatch {
        let docs: Vec<DesignDocument> = rows
            .into_iter()
            .map(|r| self.map_design(r, kind))
            .collect();
        debug!(document_count = docs.len(), "Processed design rows");
        DocumentBatch::Design(kind, docs)
    }

    #[instrument(skip(self, rows), fields(row_count = rows.len()))]
    pub fn process_news(&self, rows: Vec<NewsRow>) -> DocumentBatch {
        let docs: Vec<NewsDocument> = rows.into_iter().map(|r| self.map_news(r)).collect();
        debug!(document_count = docs.len(), "Processed news rows");
        DocumentBatch::News(docs)
    }

    pub fn map_catalog(&self, row: CatalogRow) -> CatalogDocument {
        CatalogDocument {
            id: row.id,
            pn: text(row.pn),
            supplier_pn: text(row.supplier_pn),
            mfs: text(row.mfs),
            catalog: text(row.catalog),
            description: text(row.description),
            param: text(row.param),
            supplier: text(row.supplier),
            inventory: parse_inventory(row.inventory.as_deref()),
            currency: text(row.currency),
            official_price: text(row.official_price),
            source: row.source,
        }
    }

    pub fn map_design(&self, row: DesignRow, kind: DesignKind) -> DesignDocument {
        let mut doc = DesignDocument::new(row.id, kind);
        doc.name = text(row.name);
        doc.mfs = text(row.mfs);
        doc.category = text(row.category);
        doc.pn = text(row.pn);
        doc.desc = text(row.desc);
        doc.features = text(row.features);
        doc.logo = text(row.logo);
        doc.url = text(row.url);
        doc.product = text(row.product);
        doc
    }

    pub fn map_news(&self, row: NewsRow) -> NewsDocument {
        let create_time = row.create_time.unwrap_or_default().and_utc();

        let mut doc = NewsDocument::new(row.id, create_time);
        doc.picture = text(row.picture);
        doc.main_title = text(row.main_title);
        doc.content = text(row.content);
        doc.article_content = text(row.article_content);
        doc.article_web = text(row.article_web);
        if let Some(time_string) = row.time_string.filter(|s| !s.is_empty()) {
            doc.time_string = time_string;
        }
        doc
    }
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_default()
}

/// Parse inventory text such as `" 1,200 "` or `"1200.00"`. Anything
/// else, including a non-zero fraction, is 0.
pub fn parse_inventory(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else {
        return 0;
    };

    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let whole = match cleaned.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => "",
        None => cleaned.as_str(),
    };

    match whole.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            if !cleaned.is_empty() {
                debug!(inventory = %raw, "Unparseable inventory, using 0");
            }
            0
        }
    }
}
