//! Typed rows returned by the source queries.
//!
//! Every text column is optional; the processor turns NULL into an empty
//! string.

use chrono::NaiveDateTime;
use sqlx::FromRow;

/// One supplier product with its price, inventory and supplier name.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct CatalogRow {
    pub id: i64,
    pub pn: Option<String>,
    pub supplier_pn: Option<String>,
    /// Standardized manufacturer name, or the raw one when no mapping exists.
    pub mfs: Option<String>,
    pub catalog: Option<String>,
    pub description: Option<String>,
    pub param: Option<String>,
    pub supplier: Option<String>,
    /// Raw inventory text, e.g. `" 1,200 "`.
    pub inventory: Option<String>,
    pub currency: Option<String>,
    pub official_price: Option<String>,
    /// Provenance tag of the supplier table the row came from.
    pub source: String,
}

/// One manufacturer design or application.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct DesignRow {
    pub id: i64,
    pub name: Option<String>,
    pub mfs: Option<String>,
    pub category: Option<String>,
    pub pn: Option<String>,
    pub desc: Option<String>,
    pub features: Option<String>,
    pub logo: Option<String>,
    pub url: Option<String>,
    pub product: Option<String>,
}

/// One news article joined with its content.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct NewsRow {
    pub id: i64,
    pub picture: Option<String>,
    pub main_title: Option<String>,
    pub content: Option<String>,
    pub article_content: Option<String>,
    pub article_web: Option<String>,
    pub create_time: Option<NaiveDateTime>,
    pub time_string: Option<String>,
}
