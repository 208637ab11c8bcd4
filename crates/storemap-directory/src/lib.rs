//! The store directory: the public store list, normalized, geocoded, and
//! filtered for presentation.

pub mod client;
pub mod directory;
pub mod error;
pub mod filter;
pub mod normalize;

pub use client::DataSourceClient;
pub use directory::{DirectorySnapshot, StoreDirectory};
pub use error::DirectoryError;
pub use filter::{category_options, StoreFilter};
pub use normalize::{extract_record, normalize_items, NameOrder};
