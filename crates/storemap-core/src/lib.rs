//! Shared domain types and configuration for the store locator.

mod app_config;
mod config;
mod error;
mod geo;
mod stores;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::ConfigError;
pub use geo::{GeoCoordinate, ViewportRect};
pub use stores::{ResolvedStore, StoreRecord};
