//! SQL builders for the source queries.
//!
//! Table names come from configuration, so every identifier is validated
//! before it is interpolated into a statement.

use serde::Deserialize;

use crate::errors::PipelineError;
use catalog_indexer_shared::DesignKind;

/// Default number of rows extracted per kind.
pub const DEFAULT_PAGE_SIZE: i64 = 200;

/// Suppliers whose product tables make up the catalog by default.
pub const DEFAULT_SUPPLIERS: [&str; 7] = [
    "digikey", "mouser", "arrow", "avnet", "future", "element14", "rs",
];

/// Only ASCII letters, digits and `_` are accepted.
pub fn validate_identifier(value: &str, field_name: &str) -> Result<(), PipelineError> {
    if value.trim().is_empty() {
        return Err(PipelineError::config(format!(
            "{} must not be empty",
            field_name
        )));
    }

    let valid = value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');

    if !valid {
        return Err(PipelineError::config(format!(
            "{} may only contain letters, digits and underscores: {}",
            field_name, value
        )));
    }

    Ok(())
}

/// One supplier's product table and its price/inventory table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SupplierTable {
    /// Provenance tag stored on every document from this table.
    pub source: String,
    pub product_table: String,
    pub price_table: String,
}

impl SupplierTable {
    /// `fm_product_<name>` with prices in `fm_product_<name>_price`.
    pub fn named(name: &str) -> Self {
        Self {
            source: name.to_string(),
            product_table: format!("fm_product_{}", name),
            price_table: format!("fm_product_{}_price", name),
        }
    }
}

/// Extraction settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub supplier_tables: Vec<SupplierTable>,
    /// Table mapping raw manufacturer names to standard ones.
    pub mfs_standard_table: String,
    /// Table of suppliers with their active flag.
    pub supplier_table: String,
    pub page_size: i64,
    pub offset: i64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            supplier_tables: DEFAULT_SUPPLIERS
                .iter()
                .map(|name| SupplierTable::named(name))
                .collect(),
            mfs_standard_table: "fm_mfs_standard".to_string(),
            supplier_table: "fm_supplier".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.supplier_tables.is_empty() {
            return Err(PipelineError::config("No supplier tables configured"));
        }
        if self.page_size <= 0 {
            return Err(PipelineError::config("page_size must be positive"));
        }
        if self.offset < 0 {
            return Err(PipelineError::config("offset must not be negative"));
        }

        validate_identifier(&self.mfs_standard_table, "mfs_standard_table")?;
        validate_identifier(&self.supplier_table, "supplier_table")?;
        for table in &self.supplier_tables {
            validate_identifier(&table.source, "source")?;
            validate_identifier(&table.product_table, "product_table")?;
            validate_identifier(&table.price_table, "price_table")?;
        }
        Ok(())
    }
}

fn catalog_arm(table: &SupplierTable, config: &ExtractorConfig) -> String {
    format!(
        "SELECT CAST(p.id AS BIGINT) AS id, p.pn, p.supplier_pn, \
         COALESCE(NULLIF(m.standard_name, ''), p.mfs) AS mfs, p.\"catalog\", \
         p.description, p.param, s.name AS supplier, \
         CAST(pr.inventory AS TEXT) AS inventory, pr.currency, \
         CAST(pr.offical_price AS TEXT) AS official_price, \
         '{source}' AS source \
         FROM {product} p \
         LEFT JOIN {price} pr ON pr.product_id = p.id \
         LEFT JOIN {standard} m ON m.raw_name = p.mfs \
         INNER JOIN {supplier} s ON s.id = p.supplier_id AND s.is_active \
         WHERE NOT p.is_deleted",
        source = table.source,
        product = table.product_table,
        price = table.price_table,
        standard = config.mfs_standard_table,
        supplier = config.supplier_table,
    )
}

/// Catalog query over every configured supplier table.
/// Binds: `$1` page size, `$2` offset.
pub fn build_catalog_sql(config: &ExtractorConfig) -> Result<String, PipelineError> {
    config.validate()?;

    let arms: Vec<String> = config
        .supplier_tables
        .iter()
        .map(|table| catalog_arm(table, config))
        .collect();

    Ok(format!(
        "SELECT id, pn, supplier_pn, mfs, \"catalog\", description, param, supplier, \
         inventory, currency, official_price, source \
         FROM ({}) AS catalog_rows \
         ORDER BY id, source \
         LIMIT $1 OFFSET $2",
        arms.join(" UNION ")
    ))
}

/// Design or application query.
/// Binds: `$1` page size, `$2` offset.
pub fn build_design_sql(kind: DesignKind) -> String {
    let (table, product_table, pn) = match kind {
        DesignKind::Design => (
            "spider_mfs_design",
            "spider_mfs_design_product",
            "COALESCE(d.product_name, '')",
        ),
        DesignKind::Application => (
            "spider_mfs_application",
            "spider_mfs_application_product",
            "''",
        ),
    };

    format!(
        "SELECT CAST(d.id AS BIGINT) AS id, COALESCE(d.name, '') AS name, \
         COALESCE(d.mfs, '') AS mfs, COALESCE(d.category, '') AS category, \
         {pn} AS pn, COALESCE(d.\"desc\", '') AS \"desc\", \
         COALESCE(d.features, '') AS features, '' AS logo, '' AS url, \
         COALESCE(dp.product, '') AS product \
         FROM {table} d \
         LEFT JOIN {product_table} dp ON dp.id = d.id \
         ORDER BY d.id \
         LIMIT $1 OFFSET $2"
    )
}

/// News query (MySQL).
/// Binds: page size, offset.
pub const NEWS_SQL: &str = "SELECT CAST(a.id AS SIGNED) AS id, '' AS picture, a.main_title, \
     c.content, '' AS article_content, '' AS article_web, a.create_time, \
     DATE_FORMAT(a.create_time, '%Y/%m/%d') AS time_string \
     FROM news_article a \
     INNER JOIN news_article_content c ON c.article_id = a.id \
     ORDER BY a.id \
     LIMIT ? OFFSET ?";
