//! Configuration and dependency wiring.

mod dependencies;
mod settings;

pub use dependencies::{raw_search_client, structured_search_client, Dependencies};
pub use settings::{AppConfig, AppEnv, ProfileConfig};
