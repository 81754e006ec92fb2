//! Photo records, the catalog provider and CDN URLs

mod cache;
mod cdn;
mod models;
mod provider;

pub use cache::{CachePolicy, Freshness, Lookup, TtlCache};
pub use cdn::{FormatHint, ImageUrlBuilder, Quality, Transform};
pub use models::{PhotoCatalog, PhotoRecord, PLACEHOLDER_MIME};
pub use provider::CatalogProvider;
