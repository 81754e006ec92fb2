//! Remote media-management API
//!
//! `MediaApi` is the seam between the catalog provider and the network; the
//! provider only ever sees an injected `Arc<dyn MediaApi>`.

mod client;

pub use client::MediaClient;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// One image resource as reported by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaResource {
    pub public_id: String,
    pub format: String,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

/// Read-only access to the remote media collection
#[async_trait::async_trait]
pub trait MediaApi: Send + Sync {
    /// Search resources, ordered by public id descending
    async fn search(&self, expression: &str, max_results: u32) -> Result<Vec<MediaResource>>;

    /// Look up a single resource; `Error::PhotoNotFound` when it does not exist
    async fn resource(&self, public_id: &str) -> Result<MediaResource>;

    /// Download a delivery URL
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes>;
}
