//! Decoded image cache for CDN renditions
//!
//! Downloads run as spawned tasks and report back over a channel; the event
//! loop applies the results and hands any waiting carousel tickets back to
//! the app.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use image::DynamicImage;
use photowall_core::media::MediaApi;
use photowall_core::nav::LoadTicket;
use photowall_core::photo::PhotoRecord;
use tokio::sync::mpsc;

use crate::event::ImageLoadResult;

/// Decoded images are shrunk to fit this box; terminals never need more
const MAX_DECODED_DIM: u32 = 640;
const DEFAULT_CAPACITY: usize = 160;

/// Load state for one URL
#[derive(Debug, Clone)]
pub enum ImageState {
    Loading,
    Loaded(Arc<DynamicImage>),
    Failed(String),
}

pub struct ImageCache {
    images: HashMap<String, ImageState>,
    /// Loaded URLs, least recently inserted first
    order: VecDeque<String>,
    capacity: usize,
    /// Carousel tickets waiting on a URL
    waiting: HashMap<String, Vec<LoadTicket>>,
    /// URLs marked loading that still need a download task
    queued: Vec<String>,
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ImageCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            images: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
            waiting: HashMap::new(),
            queued: Vec::new(),
        }
    }

    pub fn state(&self, url: &str) -> Option<&ImageState> {
        self.images.get(url)
    }

    pub fn get(&self, url: &str) -> Option<&Arc<DynamicImage>> {
        match self.images.get(url) {
            Some(ImageState::Loaded(image)) => Some(image),
            _ => None,
        }
    }

    pub fn is_ready(&self, url: &str) -> bool {
        matches!(self.images.get(url), Some(ImageState::Loaded(_)))
    }

    pub fn is_loading(&self, url: &str) -> bool {
        matches!(self.images.get(url), Some(ImageState::Loading))
    }

    pub fn is_failed(&self, url: &str) -> bool {
        matches!(self.images.get(url), Some(ImageState::Failed(_)))
    }

    /// Ask for a URL. Unknown URLs are marked loading and queued for download.
    pub fn request(&mut self, url: &str) {
        if !self.images.contains_key(url) {
            self.images.insert(url.to_string(), ImageState::Loading);
            self.queued.push(url.to_string());
        }
    }

    /// Register a ticket to be returned when `url` settles
    pub fn wait_for(&mut self, url: &str, ticket: LoadTicket) {
        self.waiting.entry(url.to_string()).or_default().push(ticket);
        self.request(url);
    }

    /// Drain the URLs that need a download task
    pub fn take_queued(&mut self) -> Vec<String> {
        std::mem::take(&mut self.queued)
    }

    /// Store a finished load and return the tickets that were waiting on it
    pub fn complete(&mut self, result: ImageLoadResult) -> Vec<LoadTicket> {
        let ImageLoadResult { url, result } = result;
        match result {
            Ok(image) => {
                self.images.insert(url.clone(), ImageState::Loaded(image));
                self.order.push_back(url.clone());
                self.evict();
            }
            Err(error) => {
                tracing::warn!("Image {} failed: {}", url, error);
                self.images.insert(url.clone(), ImageState::Failed(error));
            }
        }
        self.waiting.remove(&url).unwrap_or_default()
    }

    fn evict(&mut self) {
        while self.order.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if !self.waiting.contains_key(&oldest) {
                self.images.remove(&oldest);
            }
        }
    }

    /// Forget failures so they are retried on the next request
    pub fn clear_failures(&mut self) {
        self.images
            .retain(|_, state| !matches!(state, ImageState::Failed(_)));
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Spawn a download-and-decode task for `url`
pub fn spawn_image_load(
    api: Arc<dyn MediaApi>,
    url: String,
    tx: mpsc::UnboundedSender<ImageLoadResult>,
) {
    tokio::spawn(async move {
        let result = match api.fetch_bytes(&url).await {
            Ok(bytes) => tokio::task::spawn_blocking(move || decode_image(&bytes))
                .await
                .unwrap_or_else(|e| Err(format!("Decode task failed: {}", e))),
            Err(e) => Err(e.to_string()),
        };
        let _ = tx.send(ImageLoadResult {
            url,
            result: result.map(Arc::new),
        });
    });
}

/// Decode image bytes, sniffing the format when the guess fails
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, String> {
    if bytes.is_empty() {
        return Err("Empty data".to_string());
    }

    let image = match image::load_from_memory(bytes) {
        Ok(image) => image,
        Err(_) => {
            let format = sniff_format(bytes).ok_or_else(|| format!("Unknown format ({}B)", bytes.len()))?;
            image::load_from_memory_with_format(bytes, format)
                .map_err(|e| format!("{:?}: {}", format, e))?
        }
    };

    if image.width() > MAX_DECODED_DIM || image.height() > MAX_DECODED_DIM {
        Ok(image.thumbnail(MAX_DECODED_DIM, MAX_DECODED_DIM))
    } else {
        Ok(image)
    }
}

fn sniff_format(bytes: &[u8]) -> Option<image::ImageFormat> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some(image::ImageFormat::Png)
    } else if bytes.starts_with(b"\xff\xd8\xff") {
        Some(image::ImageFormat::Jpeg)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(image::ImageFormat::Gif)
    } else if bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP" {
        Some(image::ImageFormat::WebP)
    } else {
        None
    }
}

/// Decode the inline placeholder of every photo that has one
pub fn decode_placeholders<'a>(
    photos: impl IntoIterator<Item = &'a PhotoRecord>,
) -> HashMap<String, Arc<DynamicImage>> {
    photos
        .into_iter()
        .filter_map(|photo| {
            let bytes = match photo.placeholder_bytes()? {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!("Bad placeholder for {}: {}", photo.id, e);
                    return None;
                }
            };
            match decode_image(&bytes) {
                Ok(image) => Some((photo.id.clone(), Arc::new(image))),
                Err(e) => {
                    tracing::debug!("Undecodable placeholder for {}: {}", photo.id, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(w, h, Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn loaded(url: &str) -> ImageLoadResult {
        ImageLoadResult {
            url: url.to_string(),
            result: Ok(Arc::new(DynamicImage::new_rgb8(2, 2))),
        }
    }

    #[test]
    fn test_request_queues_once() {
        let mut cache = ImageCache::default();
        cache.request("a");
        cache.request("a");
        assert!(cache.is_loading("a"));
        assert_eq!(cache.take_queued(), vec!["a".to_string()]);
        assert!(cache.take_queued().is_empty());
    }

    #[test]
    fn test_complete_returns_waiting_tickets() {
        let mut cache = ImageCache::default();
        let catalog = std::sync::Arc::new(photowall_core::photo::PhotoCatalog::new(vec![
            PhotoRecord {
                id: "x".to_string(),
                width: 1,
                height: 1,
                storage_ref: "x".to_string(),
                format: "jpg".to_string(),
                placeholder: None,
            },
        ]));
        let carousel = photowall_core::nav::Carousel::open(catalog, "x").unwrap();

        cache.wait_for("a", carousel.load_ticket());
        assert_eq!(cache.complete(loaded("a")), vec![carousel.load_ticket()]);
        assert!(cache.is_ready("a"));
        assert!(cache.complete(loaded("a")).is_empty());
    }

    #[test]
    fn test_failure_is_recorded_and_clearable() {
        let mut cache = ImageCache::default();
        cache.request("bad");
        cache.complete(ImageLoadResult {
            url: "bad".to_string(),
            result: Err("HTTP 404".to_string()),
        });
        assert!(cache.is_failed("bad"));

        cache.clear_failures();
        assert!(cache.state("bad").is_none());
    }

    #[test]
    fn test_eviction_keeps_capacity() {
        let mut cache = ImageCache::with_capacity(2);
        for url in ["a", "b", "c"] {
            cache.request(url);
            cache.complete(loaded(url));
        }
        assert!(cache.state("a").is_none());
        assert!(cache.is_ready("b"));
        assert!(cache.is_ready("c"));
    }

    #[test]
    fn test_decode_and_downscale() {
        let image = decode_image(&png_bytes(1280, 640)).unwrap();
        assert_eq!((image.width(), image.height()), (640, 320));

        let small = decode_image(&png_bytes(4, 3)).unwrap();
        assert_eq!((small.width(), small.height()), (4, 3));

        assert!(decode_image(&[]).is_err());
        assert!(decode_image(b"definitely not an image").is_err());
    }

    #[test]
    fn test_decode_placeholders_skips_bad_data() {
        use base64::Engine;
        let good = PhotoRecord {
            id: "good".to_string(),
            width: 4,
            height: 3,
            storage_ref: "good".to_string(),
            format: "png".to_string(),
            placeholder: Some(base64::engine::general_purpose::STANDARD.encode(png_bytes(4, 3))),
        };
        let bad = PhotoRecord {
            id: "bad".to_string(),
            placeholder: Some("%%%".to_string()),
            ..good.clone()
        };
        let none = PhotoRecord {
            id: "none".to_string(),
            placeholder: None,
            ..good.clone()
        };

        let decoded = decode_placeholders([&good, &bad, &none]);
        assert_eq!(decoded.len(), 1);
        assert!(decoded.contains_key("good"));
    }
}
