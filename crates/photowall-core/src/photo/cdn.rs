//! CDN URL templating: `{cdn-base}/{transform}/{storage_ref}.{format}`

use url::Url;

use super::PhotoRecord;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Auto,
    Level(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    Auto,
    Fixed(&'static str),
}

/// Delivery transformation, rendered as comma separated parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transform {
    pub scale: bool,
    pub width: Option<u32>,
    pub blur: Option<u32>,
    pub quality: Option<Quality>,
    pub format: Option<FormatHint>,
}

impl Transform {
    /// Scaled to `width` with automatic quality and format
    pub const fn scaled(width: u32) -> Self {
        Self {
            scale: true,
            width: Some(width),
            blur: None,
            quality: Some(Quality::Auto),
            format: Some(FormatHint::Auto),
        }
    }

    /// Gallery wall card
    pub const CARD: Self = Self::scaled(400);
    /// Instant-paint card background
    pub const CARD_LOW: Self = Self {
        scale: true,
        width: Some(50),
        blur: None,
        quality: Some(Quality::Level(10)),
        format: Some(FormatHint::Auto),
    };
    /// Carousel thumbnail strip
    pub const THUMBNAIL: Self = Self::scaled(200);
    /// Carousel main image
    pub const MAIN: Self = Self::scaled(1280);
    /// "Open full size" target
    pub const FULL: Self = Self::scaled(1920);
    /// Share-card image
    pub const SOCIAL: Self = Self {
        scale: true,
        width: Some(720),
        blur: None,
        quality: None,
        format: None,
    };
    /// Blurred placeholder source
    pub const PLACEHOLDER: Self = Self {
        scale: false,
        width: Some(40),
        blur: Some(400),
        quality: Some(Quality::Auto),
        format: Some(FormatHint::Fixed("webp")),
    };

    pub fn params(&self) -> String {
        let mut parts = Vec::with_capacity(5);
        if self.scale {
            parts.push("c_scale".to_string());
        }
        if let Some(width) = self.width {
            parts.push(format!("w_{}", width));
        }
        if let Some(strength) = self.blur {
            parts.push(format!("e_blur:{}", strength));
        }
        match self.quality {
            Some(Quality::Auto) => parts.push("q_auto".to_string()),
            Some(Quality::Level(level)) => parts.push(format!("q_{}", level)),
            None => {}
        }
        match self.format {
            Some(FormatHint::Auto) => parts.push("f_auto".to_string()),
            Some(FormatHint::Fixed(fmt)) => parts.push(format!("f_{}", fmt)),
            None => {}
        }
        parts.join(",")
    }
}

/// Builds delivery URLs for one cloud
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    base: String,
}

impl ImageUrlBuilder {
    pub fn new(delivery_base: &str, cloud_name: &str) -> Result<Self> {
        let delivery_base = delivery_base.trim_end_matches('/');
        let base = format!("{}/{}/image/upload", delivery_base, cloud_name.trim_matches('/'));
        Url::parse(&base)?;
        Ok(Self { base })
    }

    /// The `{cdn-base}` part
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url_for(&self, storage_ref: &str, format: &str, transform: &Transform) -> String {
        let params = transform.params();
        if params.is_empty() {
            format!("{}/{}.{}", self.base, storage_ref, format)
        } else {
            format!("{}/{}/{}.{}", self.base, params, storage_ref, format)
        }
    }

    pub fn url(&self, photo: &PhotoRecord, transform: &Transform) -> String {
        self.url_for(&photo.storage_ref, &photo.format, transform)
    }
}
