//! Profile-based configuration loaded from a TOML file.
//!
//! ```toml
//! [dev]
//! elastic = "http://localhost:9200"
//!
//! [dev.catalog_db]
//! host = "localhost"
//! port = 5432
//! user = "indexer"
//! password = "secret"
//! dbname = "catalog"
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::IndexingError;
use catalog_indexer_pipeline::extractor::{DEFAULT_PAGE_SIZE, DEFAULT_SUPPLIERS};
use catalog_indexer_pipeline::{DatabaseConfig, ExtractorConfig, SourceConfigs, SupplierTable};
use catalog_indexer_repository::config::DEFAULT_SEARCH_URL;
use catalog_indexer_repository::SearchBackendConfig;

/// Deployment environment, selected with `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Dev,
    Prod,
}

impl AppEnv {
    /// Resolve the value of `APP_ENV`; unset means `Dev`.
    pub fn resolve(value: Option<&str>) -> Result<Self, IndexingError> {
        match value {
            None => Ok(AppEnv::Dev),
            Some(name) => name.parse(),
        }
    }
}

impl FromStr for AppEnv {
    type Err = IndexingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Dev" | "dev" => Ok(AppEnv::Dev),
            "Prod" | "prod" => Ok(AppEnv::Prod),
            other => Err(IndexingError::config(format!(
                "Unknown APP_ENV '{}', expected Dev or Prod",
                other
            ))),
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEnv::Dev => f.write_str("dev"),
            AppEnv::Prod => f.write_str("prod"),
        }
    }
}

/// Settings for one environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    pub catalog_db: DatabaseConfig,
    pub design_db: DatabaseConfig,
    pub news_db: DatabaseConfig,
    /// Search backend base URL.
    #[serde(default = "default_elastic")]
    pub elastic: String,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_raw_timeout_secs")]
    pub raw_timeout_secs: u64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default = "default_supplier_tables")]
    pub supplier_tables: Vec<SupplierTable>,
    /// Raw-to-standard manufacturer name table.
    #[serde(default = "default_mfs_standard_table")]
    pub mfs_standard_table: String,
    /// Supplier table holding the active flag.
    #[serde(default = "default_supplier_table")]
    pub supplier_table: String,
}

fn default_elastic() -> String {
    DEFAULT_SEARCH_URL.to_string()
}

fn default_retry_delay_secs() -> u64 {
    SearchBackendConfig::default().retry_delay_secs
}

fn default_raw_timeout_secs() -> u64 {
    SearchBackendConfig::default().raw_timeout_secs
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_supplier_tables() -> Vec<SupplierTable> {
    DEFAULT_SUPPLIERS
        .iter()
        .map(|name| SupplierTable::named(name))
        .collect()
}

fn default_mfs_standard_table() -> String {
    ExtractorConfig::default().mfs_standard_table
}

fn default_supplier_table() -> String {
    ExtractorConfig::default().supplier_table
}

impl ProfileConfig {
    pub fn sources(&self) -> SourceConfigs {
        SourceConfigs {
            catalog: self.catalog_db.clone(),
            design: self.design_db.clone(),
            news: self.news_db.clone(),
        }
    }

    pub fn search_backend(&self) -> SearchBackendConfig {
        SearchBackendConfig {
            url: self.elastic.clone(),
            retry_delay_secs: self.retry_delay_secs,
            raw_timeout_secs: self.raw_timeout_secs,
        }
    }

    pub fn extractor(&self) -> ExtractorConfig {
        ExtractorConfig {
            supplier_tables: self.supplier_tables.clone(),
            mfs_standard_table: self.mfs_standard_table.clone(),
            supplier_table: self.supplier_table.clone(),
            page_size: self.page_size,
            ..Default::default()
        }
    }

    /// Apply the `OPENSEARCH_URL` override, if set.
    pub fn with_search_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.elastic = url;
        }
        self
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub dev: Option<ProfileConfig>,
    pub prod: Option<ProfileConfig>,
}

impl AppConfig {
    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self, IndexingError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IndexingError::config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        content.parse()
    }

    /// The profile for `env`. A missing profile is a configuration error.
    pub fn profile(&self, env: AppEnv) -> Result<ProfileConfig, IndexingError> {
        let profile = match env {
            AppEnv::Dev => &self.dev,
            AppEnv::Prod => &self.prod,
        };
        profile
            .clone()
            .ok_or_else(|| IndexingError::config(format!("No [{}] profile in config", env)))
    }
}

impl FromStr for AppConfig {
    type Err = IndexingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: AppConfig = toml::from_str(s)
            .map_err(|e| IndexingError::config(format!("Failed to parse config file: {}", e)))?;

        for profile in [&config.dev, &config.prod].into_iter().flatten() {
            profile.extractor().validate()?;
            if profile.retry_delay_secs == 0 {
                return Err(IndexingError::config("retry_delay_secs must be > 0"));
            }
            if profile.raw_timeout_secs == 0 {
                return Err(IndexingError::config("raw_timeout_secs must be > 0"));
            }
        }

        Ok(config)
    }
}
