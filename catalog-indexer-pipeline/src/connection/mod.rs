//! Connection module for the catalog indexer pipeline.
//!
//! Opens and shares the relational source pools.

mod config;
mod provider;

pub use config::{
    DatabaseConfig, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS, DEFAULT_MIN_CONNECTIONS,
};
pub use provider::{ConnectionHandle, ConnectionProvider, Dialect, SourceConfigs, SourceKind};
