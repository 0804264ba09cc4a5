//! Lazily opened connection pools, one per relational source.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use sqlx::mysql::MySqlPool;
use sqlx::postgres::PgPool;
use sqlx::{MySql, Postgres};
use tokio::sync::OnceCell;
use tracing::{info, instrument};

use super::config::DatabaseConfig;
use crate::errors::PipelineError;
use catalog_indexer_shared::DocumentKind;

/// SQL dialect spoken by a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    MySql,
}

/// The relational sources the indexer reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Supplier product tables.
    Catalog,
    /// Manufacturer designs and applications.
    Design,
    /// News articles.
    News,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Catalog, SourceKind::Design, SourceKind::News];

    /// The source a document kind is extracted from.
    pub fn for_document(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::Catalog => SourceKind::Catalog,
            DocumentKind::Design | DocumentKind::Application => SourceKind::Design,
            DocumentKind::News => SourceKind::News,
        }
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            SourceKind::Catalog | SourceKind::Design => Dialect::Postgres,
            SourceKind::News => Dialect::MySql,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Catalog => "catalog",
            SourceKind::Design => "design",
            SourceKind::News => "news",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An open pool for one source.
#[derive(Debug, Clone)]
pub enum ConnectionHandle {
    Postgres(PgPool),
    MySql(MySqlPool),
}

impl ConnectionHandle {
    pub fn dialect(&self) -> Dialect {
        match self {
            ConnectionHandle::Postgres(_) => Dialect::Postgres,
            ConnectionHandle::MySql(_) => Dialect::MySql,
        }
    }

    pub fn into_postgres(self) -> Result<PgPool, PipelineError> {
        match self {
            ConnectionHandle::Postgres(pool) => Ok(pool),
            ConnectionHandle::MySql(_) => Err(PipelineError::database(
                "Expected a Postgres pool, found MySQL",
            )),
        }
    }

    pub fn into_mysql(self) -> Result<MySqlPool, PipelineError> {
        match self {
            ConnectionHandle::MySql(pool) => Ok(pool),
            ConnectionHandle::Postgres(_) => Err(PipelineError::database(
                "Expected a MySQL pool, found Postgres",
            )),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            ConnectionHandle::Postgres(pool) => pool.is_closed(),
            ConnectionHandle::MySql(pool) => pool.is_closed(),
        }
    }

    async fn close(&self) {
        match self {
            ConnectionHandle::Postgres(pool) => pool.close().await,
            ConnectionHandle::MySql(pool) => pool.close().await,
        }
    }
}

/// Settings for every source the provider can open.
#[derive(Debug, Clone)]
pub struct SourceConfigs {
    pub catalog: DatabaseConfig,
    pub design: DatabaseConfig,
    pub news: DatabaseConfig,
}

/// Hands out shared pools for the relational sources.
///
/// Each pool is opened at most once, on first use, even when several tasks
/// ask for it concurrently. Open failures are returned to the caller and are
/// not retried; a later call tries again.
pub struct ConnectionProvider {
    configs: SourceConfigs,
    catalog: OnceCell<ConnectionHandle>,
    design: OnceCell<ConnectionHandle>,
    news: OnceCell<ConnectionHandle>,
    opened: AtomicUsize,
}

impl ConnectionProvider {
    pub fn new(configs: SourceConfigs) -> Self {
        Self {
            configs,
            catalog: OnceCell::new(),
            design: OnceCell::new(),
            news: OnceCell::new(),
            opened: AtomicUsize::new(0),
        }
    }

    pub fn config(&self, source: SourceKind) -> &DatabaseConfig {
        match source {
            SourceKind::Catalog => &self.configs.catalog,
            SourceKind::Design => &self.configs.design,
            SourceKind::News => &self.configs.news,
        }
    }

    fn cell(&self, source: SourceKind) -> &OnceCell<ConnectionHandle> {
        match source {
            SourceKind::Catalog => &self.catalog,
            SourceKind::Design => &self.design,
            SourceKind::News => &self.news,
        }
    }

    /// Get the pool for `source`, opening it on first use.
    pub async fn acquire(&self, source: SourceKind) -> Result<ConnectionHandle, PipelineError> {
        let handle = self
            .cell(source)
            .get_or_try_init(|| self.open(source))
            .await?;
        Ok(handle.clone())
    }

    pub async fn postgres(&self, source: SourceKind) -> Result<PgPool, PipelineError> {
        self.acquire(source).await?.into_postgres()
    }

    pub async fn mysql(&self, source: SourceKind) -> Result<MySqlPool, PipelineError> {
        self.acquire(source).await?.into_mysql()
    }

    /// Number of pools opened so far.
    pub fn opened_pools(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    #[instrument(skip(self))]
    async fn open(&self, source: SourceKind) -> Result<ConnectionHandle, PipelineError> {
        let config = self.config(source);

        let handle = match source.dialect() {
            Dialect::Postgres => {
                let options = config.pool_options::<Postgres>();
                let pool = if config.lazy {
                    options.connect_lazy_with(config.pg_options())
                } else {
                    options.connect_with(config.pg_options()).await.map_err(|e| {
                        PipelineError::database(format!("Failed to connect to {}: {}", source, e))
                    })?
                };
                ConnectionHandle::Postgres(pool)
            }
            Dialect::MySql => {
                let options = config.pool_options::<MySql>();
                let pool = if config.lazy {
                    options.connect_lazy_with(config.mysql_options())
                } else {
                    options.connect_with(config.mysql_options()).await.map_err(|e| {
                        PipelineError::database(format!("Failed to connect to {}: {}", source, e))
                    })?
                };
                ConnectionHandle::MySql(pool)
            }
        };

        self.opened.fetch_add(1, Ordering::SeqCst);
        info!(
            endpoint = %config.endpoint(),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            idle_timeout_secs = config.idle_timeout_secs,
            "Opened connection pool"
        );
        Ok(handle)
    }

    /// Close every pool that has been opened. Safe to call more than once.
    pub async fn close(&self) {
        for source in SourceKind::ALL {
            if let Some(handle) = self.cell(source).get() {
                if !handle.is_closed() {
                    handle.close().await;
                    info!(source = %source, "Closed connection pool");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn lazy_config(port: u16, dbname: &str) -> DatabaseConfig {
        let mut config = DatabaseConfig::new("127.0.0.1", port, "indexer", "secret", dbname);
        config.lazy = true;
        config
    }

    fn lazy_provider() -> ConnectionProvider {
        ConnectionProvider::new(SourceConfigs {
            catalog: lazy_config(5432, "catalog"),
            design: lazy_config(5432, "design"),
            news: lazy_config(3306, "news"),
        })
    }

    #[test]
    fn test_source_dialects() {
        assert_eq!(SourceKind::Catalog.dialect(), Dialect::Postgres);
        assert_eq!(SourceKind::Design.dialect(), Dialect::Postgres);
        assert_eq!(SourceKind::News.dialect(), Dialect::MySql);
        assert_eq!(
            SourceKind::for_document(DocumentKind::Application),
            SourceKind::Design
        );
    }

    #[tokio::test]
    async fn test_pool_opened_once() {
        let provider = lazy_provider();

        let first = provider.acquire(SourceKind::Catalog).await.unwrap();
        let second = provider.acquire(SourceKind::Catalog).await.unwrap();

        assert_eq!(first.dialect(), Dialect::Postgres);
        assert_eq!(second.dialect(), Dialect::Postgres);
        assert_eq!(provider.opened_pools(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_acquire_opens_once() {
        let provider = Arc::new(lazy_provider());

        let mut handles = Vec::new();
        for _ in 0..8 {
            let provider = provider.clone();
            handles.push(tokio::spawn(async move {
                provider.acquire(SourceKind::News).await.map(|h| h.dialect())
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), Dialect::MySql);
        }

        assert_eq!(provider.opened_pools(), 1);
    }

    #[tokio::test]
    async fn test_wrong_dialect_is_an_error() {
        let provider = lazy_provider();
        let result = provider.mysql(SourceKind::Catalog).await;
        assert!(matches!(result, Err(PipelineError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let provider = lazy_provider();

        // Nothing opened yet.
        provider.close().await;

        let handle = provider.acquire(SourceKind::Design).await.unwrap();
        provider.close().await;
        provider.close().await;

        assert!(handle.is_closed());
    }
}
