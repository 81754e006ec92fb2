use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::media::MediaResource;
use crate::Result;

/// MIME type of the blurred placeholder rendition
pub const PLACEHOLDER_MIME: &str = "image/webp";

/// One displayable photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRecord {
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub storage_ref: String,
    pub format: String,
    /// Base64 of a tiny blurred rendition, painted while the real image loads
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl PhotoRecord {
    /// Build a record from an API resource, without a placeholder
    pub fn from_resource(resource: &MediaResource) -> Self {
        Self {
            id: resource.public_id.clone(),
            width: resource.width,
            height: resource.height,
            storage_ref: resource.public_id.clone(),
            format: resource.format.clone(),
            placeholder: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: Option<String>) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Width divided by height (1.0 for degenerate dimensions)
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    pub fn has_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }

    /// Decode the placeholder payload
    pub fn placeholder_bytes(&self) -> Option<Result<Vec<u8>>> {
        self.placeholder
            .as_ref()
            .map(|data| STANDARD.decode(data).map_err(Into::into))
    }

    /// Placeholder as a `data:` URL
    pub fn placeholder_data_url(&self) -> Option<String> {
        self.placeholder
            .as_ref()
            .map(|data| format!("data:{};base64,{}", PLACEHOLDER_MIME, data))
    }
}

/// Ordered photo list for one session; ids are unique
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoCatalog {
    photos: Vec<PhotoRecord>,
}

impl PhotoCatalog {
    /// Build a catalog, keeping the first record for each id
    pub fn new(records: Vec<PhotoRecord>) -> Self {
        let mut seen = HashSet::with_capacity(records.len());
        let mut photos = Vec::with_capacity(records.len());

        for record in records {
            if seen.insert(record.id.clone()) {
                photos.push(record);
            } else {
                tracing::warn!("Dropping duplicate photo id '{}' from catalog", record.id);
            }
        }

        Self { photos }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.photos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PhotoRecord> {
        self.photos.get(index)
    }

    /// Position of the photo with this id (linear search)
    pub fn position(&self, id: &str) -> Option<usize> {
        self.photos.iter().position(|p| p.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&PhotoRecord> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PhotoRecord> {
        self.photos.iter()
    }

    pub fn ids(&self) -> Vec<String> {
        self.photos.iter().map(|p| p.id.clone()).collect()
    }

    pub fn as_slice(&self) -> &[PhotoRecord] {
        &self.photos
    }
}

impl<'a> IntoIterator for &'a PhotoCatalog {
    type Item = &'a PhotoRecord;
    type IntoIter = std::slice::Iter<'a, PhotoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.photos.iter()
    }
}

#[cfg(test)]
pub(crate) fn sample_record(id: &str) -> PhotoRecord {
    PhotoRecord {
        id: id.to_string(),
        width: 3000,
        height: 2000,
        storage_ref: id.to_string(),
        format: "jpg".to_string(),
        placeholder: None,
    }
}
