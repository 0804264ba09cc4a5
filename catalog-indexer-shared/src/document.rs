//! Document shapes written to and read back from the search index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::kind::DocumentKind;

/// A supplier catalog part.
///
/// Built from the union of the supplier tables; `source` records which
/// supplier table the row came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Row identity in the supplier table.
    pub id: i64,
    /// Manufacturer part number.
    #[serde(default)]
    pub pn: String,
    /// Supplier part number.
    #[serde(default)]
    pub supplier_pn: String,
    /// Manufacturer, standardized when a canonical name is known.
    #[serde(default)]
    pub mfs: String,
    /// Category/catalog code.
    #[serde(default)]
    pub catalog: String,
    #[serde(default)]
    pub description: String,
    /// Free-text parameters.
    #[serde(default)]
    pub param: String,
    /// Supplier display name.
    #[serde(default)]
    pub supplier: String,
    /// Inventory quantity. String-encoded in the source tables.
    #[serde(default)]
    pub inventory: i64,
    #[serde(default)]
    pub currency: String,
    /// Price as published by the supplier.
    #[serde(default, alias = "offical_price")]
    pub official_price: String,
    /// Provenance tag naming the supplier table.
    #[serde(default)]
    pub source: String,
}

impl CatalogDocument {
    /// Index document ID. Row identities are only unique within one
    /// supplier table, so the provenance tag is part of the ID.
    pub fn document_id(&self) -> String {
        format!("{}_{}", self.source, self.id)
    }
}

/// Distinguishes design records from application records. Both share
/// [`DesignDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignKind {
    Design,
    Application,
}

impl DesignKind {
    pub fn document_kind(&self) -> DocumentKind {
        match self {
            DesignKind::Design => DocumentKind::Design,
            DesignKind::Application => DocumentKind::Application,
        }
    }

    /// Total-count marker: 1 for applications, 2 for designs.
    pub fn total_count(&self) -> i64 {
        match self {
            DesignKind::Application => 1,
            DesignKind::Design => 2,
        }
    }
}

/// A reference design or application note.
///
/// Stored documents written before the `kind` field existed carry only the
/// total-count marker or the `doc_type` tag; the kind is recovered from
/// whichever is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredDesignDocument")]
pub struct DesignDocument {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mfs: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub pn: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub url: String,
    /// Associated product reference.
    #[serde(default)]
    pub product: String,
    kind: DesignKind,
    total_count: i64,
}

impl DesignDocument {
    /// Create an empty document of the given kind. The kind and its
    /// total-count marker are fixed here and cannot change afterwards.
    pub fn new(id: i64, kind: DesignKind) -> Self {
        Self {
            id,
            name: String::new(),
            mfs: String::new(),
            category: String::new(),
            pn: String::new(),
            desc: String::new(),
            features: String::new(),
            logo: String::new(),
            url: String::new(),
            product: String::new(),
            kind,
            total_count: kind.total_count(),
        }
    }

    pub fn kind(&self) -> DesignKind {
        self.kind
    }

    pub fn total_count(&self) -> i64 {
        self.total_count
    }

    pub fn document_id(&self) -> String {
        format!("{}_{}", self.kind.document_kind().type_tag(), self.id)
    }
}

#[derive(Deserialize)]
struct StoredDesignDocument {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mfs: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    pn: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    features: String,
    #[serde(default)]
    logo: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    product: String,
    #[serde(default)]
    kind: Option<DesignKind>,
    #[serde(default)]
    total_count: Option<i64>,
    #[serde(default)]
    doc_type: Option<String>,
}

impl StoredDesignDocument {
    fn resolve_kind(&self) -> Result<DesignKind, String> {
        if let Some(kind) = self.kind {
            return Ok(kind);
        }
        match self.total_count {
            Some(1) => return Ok(DesignKind::Application),
            Some(2) => return Ok(DesignKind::Design),
            _ => {}
        }
        match self.doc_type.as_deref() {
            Some(tag) if tag == DocumentKind::Design.type_tag() => Ok(DesignKind::Design),
            Some(tag) if tag == DocumentKind::Application.type_tag() => {
                Ok(DesignKind::Application)
            }
            _ => Err(format!(
                "design document {} has no kind, total_count or doc_type",
                self.id
            )),
        }
    }
}

impl TryFrom<StoredDesignDocument> for DesignDocument {
    type Error = String;

    fn try_from(stored: StoredDesignDocument) -> Result<Self, Self::Error> {
        let kind = stored.resolve_kind()?;
        let mut doc = DesignDocument::new(stored.id, kind);
        doc.name = stored.name;
        doc.mfs = stored.mfs;
        doc.category = stored.category;
        doc.pn = stored.pn;
        doc.desc = stored.desc;
        doc.features = stored.features;
        doc.logo = stored.logo;
        doc.url = stored.url;
        doc.product = stored.product;
        Ok(doc)
    }
}

/// A news article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsDocument {
    pub id: i64,
    #[serde(default)]
    pub picture: String,
    #[serde(default)]
    pub main_title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub article_content: String,
    #[serde(default)]
    pub article_web: String,
    pub create_time: DateTime<Utc>,
    /// `create_time` formatted for display (`YYYY/MM/DD`).
    #[serde(default)]
    pub time_string: String,
    total_count: i64,
}

impl NewsDocument {
    pub const TOTAL_COUNT: i64 = 3;

    pub fn new(id: i64, create_time: DateTime<Utc>) -> Self {
        Self {
            id,
            picture: String::new(),
            main_title: String::new(),
            content: String::new(),
            article_content: String::new(),
            article_web: String::new(),
            create_time,
            time_string: display_date(&create_time),
            total_count: Self::TOTAL_COUNT,
        }
    }

    pub fn total_count(&self) -> i64 {
        self.total_count
    }

    pub fn document_id(&self) -> String {
        self.id.to_string()
    }
}

/// Format a timestamp the way news listings display it.
pub fn display_date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y/%m/%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_design_markers_fixed_by_kind() {
        let design = DesignDocument::new(7, DesignKind::Design);
        let app = DesignDocument::new(7, DesignKind::Application);

        assert_eq!(design.total_count(), 2);
        assert_eq!(app.total_count(), 1);
        assert_eq!(design.document_id(), "design_7");
        assert_eq!(app.document_id(), "app_7");
    }

    #[test]
    fn test_news_document_defaults() {
        let ts = Utc.with_ymd_and_hms(2019, 3, 8, 14, 30, 0).unwrap();
        let doc = NewsDocument::new(42, ts);

        assert_eq!(doc.total_count(), 3);
        assert_eq!(doc.time_string, "2019/03/08");
        assert_eq!(doc.document_id(), "42");
        assert!(doc.picture.is_empty());
    }

    #[test]
    fn test_catalog_accepts_legacy_price_key() {
        let doc: CatalogDocument = serde_json::from_value(json!({
            "id": 3,
            "pn": "LM358",
            "inventory": 1200,
            "offical_price": "0.35"
        }))
        .unwrap();

        assert_eq!(doc.official_price, "0.35");
        assert_eq!(doc.inventory, 1200);
        assert!(doc.supplier.is_empty());
    }

    #[test]
    fn test_design_kind_recovered_without_kind_field() {
        let design: DesignDocument = serde_json::from_value(json!({
            "id": 5,
            "name": "Buck",
            "total_count": 2
        }))
        .unwrap();
        assert_eq!(design.kind(), DesignKind::Design);

        let app: DesignDocument = serde_json::from_value(json!({
            "id": 6,
            "doc_type": "app"
        }))
        .unwrap();
        assert_eq!(app.kind(), DesignKind::Application);
        assert_eq!(app.total_count(), 1);

        let unknown = serde_json::from_value::<DesignDocument>(json!({ "id": 7, "name": "?" }));
        assert!(unknown.is_err());
    }

    #[test]
    fn test_design_serializes_kind_and_marker() {
        let mut doc = DesignDocument::new(1, DesignKind::Application);
        doc.name = "USB charger".to_string();

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["kind"], "application");
        assert_eq!(value["total_count"], 1);
        assert_eq!(value["features"], "");
    }
}
