use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::photo::CachePolicy;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub keymap: KeymapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (logs live here)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Media API account and delivery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Cloud name used in both API and delivery URLs
    #[serde(default)]
    pub cloud_name: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Folder whose images make up the gallery
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Maximum number of photos requested from the search endpoint
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Admin API base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Image delivery (CDN) base URL
    #[serde(default = "default_delivery_base")]
    pub delivery_base: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Concurrent placeholder downloads while building the catalog
    #[serde(default = "default_placeholder_concurrency")]
    pub placeholder_concurrency: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: None,
            api_secret: None,
            folder: default_folder(),
            max_results: default_max_results(),
            api_base: default_api_base(),
            delivery_base: default_delivery_base(),
            request_timeout_secs: default_timeout(),
            placeholder_concurrency: default_placeholder_concurrency(),
        }
    }
}

/// Catalog cache windows, all in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long the UI reuses its snapshot before asking the provider again
    #[serde(default = "default_stale")]
    pub stale_secs: u64,
    /// Age after which a cached value is served but refreshed in the background
    #[serde(default = "default_revalidate")]
    pub revalidate_secs: u64,
    /// Age after which a cached value is discarded and refetched
    #[serde(default = "default_expire")]
    pub expire_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_secs: default_stale(),
            revalidate_secs: default_revalidate(),
            expire_secs: default_expire(),
        }
    }
}

impl CacheConfig {
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            stale: Duration::from_secs(self.stale_secs),
            revalidate: Duration::from_secs(self.revalidate_secs),
            expire: Duration::from_secs(self.expire_secs),
        }
    }
}

/// Site identity shown on the intro card and in `show` metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_title")]
    pub title: String,
    #[serde(default = "default_site_description")]
    pub description: String,
    /// Public base URL used for share links
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub links: Vec<SiteLink>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_site_title(),
            description: default_site_description(),
            base_url: default_base_url(),
            links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Download and paint photo previews
    #[serde(default = "default_true")]
    pub image_preview: bool,
    /// Logical pixels per terminal column
    #[serde(default = "default_cell_width_px")]
    pub cell_width_px: f64,
    /// Horizontal drag distance (logical pixels) that counts as a swipe
    #[serde(default = "default_swipe_threshold")]
    pub swipe_threshold_px: f64,
    /// Number of card rows on the gallery wall
    #[serde(default = "default_wall_rows")]
    pub wall_rows: u16,
    /// Gallery card width in columns
    #[serde(default = "default_card_width")]
    pub card_width: u16,
    /// Carousel thumbnail width in columns
    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u16,
    #[serde(default)]
    pub scroll: ScrollSettings,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            image_preview: default_true(),
            cell_width_px: default_cell_width_px(),
            swipe_threshold_px: default_swipe_threshold(),
            wall_rows: default_wall_rows(),
            card_width: default_card_width(),
            thumbnail_width: default_thumbnail_width(),
            scroll: ScrollSettings::default(),
        }
    }
}

/// Easing curve for tweened scrolling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    None,
    Linear,
    #[default]
    Cubic,
    Quintic,
    EaseOut,
}

/// Inertial scroll parameters for one container
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Velocity multiplier applied once per frame, in (0, 1)
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Scale from wheel delta to velocity
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,
    /// Velocity magnitude below which the animation stops
    #[serde(default = "default_min_velocity")]
    pub min_velocity: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            friction: default_friction(),
            sensitivity: default_sensitivity(),
            min_velocity: default_min_velocity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollSettings {
    /// Frame rate of scroll animations
    #[serde(default = "default_animation_fps")]
    pub animation_fps: u32,
    /// Logical pixels reported per wheel notch
    #[serde(default = "default_wheel_delta")]
    pub wheel_delta_px: f64,
    /// Duration of the thumbnail centering tween (0 = jump)
    #[serde(default = "default_center_duration")]
    pub center_duration_ms: u64,
    #[serde(default)]
    pub easing: EasingType,
    #[serde(default = "default_gallery_scroll")]
    pub gallery: ScrollConfig,
    #[serde(default = "default_thumbnail_scroll")]
    pub thumbnails: ScrollConfig,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            animation_fps: default_animation_fps(),
            wheel_delta_px: default_wheel_delta(),
            center_duration_ms: default_center_duration(),
            easing: EasingType::default(),
            gallery: default_gallery_scroll(),
            thumbnails: default_thumbnail_scroll(),
        }
    }
}

/// Keymap configuration using Vim-style notation
/// Format: "j", "<C-j>" (Ctrl+j), "G" (Shift+g), "<CR>", "<Esc>", "<Space>", "gg"
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeymapConfig {
    #[serde(default = "default_key_quit")]
    pub quit: String,

    // Gallery wall
    #[serde(default = "default_key_move_left")]
    pub move_left: String,
    #[serde(default = "default_key_move_right")]
    pub move_right: String,
    #[serde(default = "default_key_move_up")]
    pub move_up: String,
    #[serde(default = "default_key_move_down")]
    pub move_down: String,
    #[serde(default = "default_key_jump_to_start")]
    pub jump_to_start: String,
    #[serde(default = "default_key_jump_to_end")]
    pub jump_to_end: String,
    #[serde(default = "default_key_open_photo")]
    pub open_photo: String,
    #[serde(default = "default_key_refresh")]
    pub refresh: String,

    // Carousel
    #[serde(default = "default_key_next_photo")]
    pub next_photo: String,
    #[serde(default = "default_key_prev_photo")]
    pub prev_photo: String,
    #[serde(default = "default_key_close")]
    pub close: String,
    /// Open the full-size rendition in the system browser
    #[serde(default = "default_key_open_full_size")]
    pub open_full_size: String,
}

impl Default for KeymapConfig {
    fn default() -> Self {
        Self {
            quit: default_key_quit(),
            move_left: default_key_move_left(),
            move_right: default_key_move_right(),
            move_up: default_key_move_up(),
            move_down: default_key_move_down(),
            jump_to_start: default_key_jump_to_start(),
            jump_to_end: default_key_jump_to_end(),
            open_photo: default_key_open_photo(),
            refresh: default_key_refresh(),
            next_photo: default_key_next_photo(),
            prev_photo: default_key_prev_photo(),
            close: default_key_close(),
            open_full_size: default_key_open_full_size(),
        }
    }
}

fn default_key_quit() -> String { "q".to_string() }
fn default_key_move_left() -> String { "h".to_string() }
fn default_key_move_right() -> String { "l".to_string() }
fn default_key_move_up() -> String { "k".to_string() }
fn default_key_move_down() -> String { "j".to_string() }
fn default_key_jump_to_start() -> String { "gg".to_string() }
fn default_key_jump_to_end() -> String { "G".to_string() }
fn default_key_open_photo() -> String { "<CR>".to_string() }
fn default_key_refresh() -> String { "r".to_string() }
fn default_key_next_photo() -> String { "l".to_string() }
fn default_key_prev_photo() -> String { "h".to_string() }
fn default_key_close() -> String { "<Esc>".to_string() }
fn default_key_open_full_size() -> String { "o".to_string() }

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("photowall")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_folder() -> String {
    "gallery".to_string()
}

fn default_max_results() -> u32 {
    400
}

fn default_api_base() -> String {
    "https://api.cloudinary.com".to_string()
}

fn default_delivery_base() -> String {
    "https://res.cloudinary.com".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_placeholder_concurrency() -> usize {
    16
}

fn default_stale() -> u64 {
    3600
}

fn default_revalidate() -> u64 {
    900
}

fn default_expire() -> u64 {
    86400
}

fn default_site_title() -> String {
    "photos".to_string()
}

fn default_site_description() -> String {
    "a collection of favorite memories.".to_string()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_tick_rate() -> u64 {
    100
}

fn default_cell_width_px() -> f64 {
    8.0
}

fn default_swipe_threshold() -> f64 {
    50.0
}

fn default_wall_rows() -> u16 {
    4
}

fn default_card_width() -> u16 {
    28
}

fn default_thumbnail_width() -> u16 {
    12
}

fn default_animation_fps() -> u32 {
    60
}

fn default_wheel_delta() -> f64 {
    100.0
}

fn default_center_duration() -> u64 {
    300
}

fn default_friction() -> f64 {
    0.92
}

fn default_sensitivity() -> f64 {
    0.8
}

fn default_min_velocity() -> f64 {
    0.1
}

fn default_gallery_scroll() -> ScrollConfig {
    ScrollConfig {
        friction: 0.92,
        sensitivity: 0.055,
        min_velocity: 0.1,
    }
}

fn default_thumbnail_scroll() -> ScrollConfig {
    ScrollConfig {
        friction: 0.92,
        sensitivity: 1.0,
        min_velocity: 0.1,
    }
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file (or defaults) and apply environment overrides
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)?
        } else {
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Override media credentials from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(cloud_name) = lookup("CLOUDINARY_CLOUD_NAME") {
            self.media.cloud_name = cloud_name;
        }
        if let Some(api_key) = lookup("CLOUDINARY_API_KEY") {
            self.media.api_key = Some(api_key);
        }
        if let Some(api_secret) = lookup("CLOUDINARY_API_SECRET") {
            self.media.api_secret = Some(api_secret);
        }
        if let Some(folder) = lookup("CLOUDINARY_FOLDER") {
            self.media.folder = folder;
        }
    }

    /// Reject settings that cannot work together
    pub fn validate(&self) -> crate::Result<()> {
        if self.cache.revalidate_secs > self.cache.expire_secs {
            return Err(crate::Error::Config(format!(
                "cache.revalidate_secs ({}) must not exceed cache.expire_secs ({})",
                self.cache.revalidate_secs, self.cache.expire_secs
            )));
        }
        if self.ui.cell_width_px <= 0.0 {
            return Err(crate::Error::Config(
                "ui.cell_width_px must be positive".to_string(),
            ));
        }
        if self.ui.wall_rows == 0 {
            return Err(crate::Error::Config("ui.wall_rows must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(&config_path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/photowall/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("photowall")
            .join("config.toml")
    }

    /// Get the log file path used while the TUI owns the terminal
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("photowall.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.media.max_results, 400);
        assert_eq!(config.cache.stale_secs, 3600);
        assert_eq!(config.cache.revalidate_secs, 900);
        assert_eq!(config.cache.expire_secs, 86400);
        assert_eq!(config.ui.swipe_threshold_px, 50.0);
        assert_eq!(config.ui.scroll.gallery.sensitivity, 0.055);
        assert_eq!(config.ui.scroll.thumbnails.sensitivity, 1.0);
        assert_eq!(config.keymap.close, "<Esc>");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [media]
            cloud_name = "demo"
            folder = "trips"

            [ui.scroll.gallery]
            friction = 0.9
            "#,
        )
        .unwrap();

        assert_eq!(config.media.cloud_name, "demo");
        assert_eq!(config.media.folder, "trips");
        assert_eq!(config.media.api_base, "https://api.cloudinary.com");
        assert_eq!(config.ui.scroll.gallery.friction, 0.9);
        assert_eq!(config.ui.scroll.gallery.min_velocity, 0.1);
        assert_eq!(config.ui.scroll.easing, EasingType::Cubic);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AppConfig::from_toml("[media\ncloud_name = 1").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "CLOUDINARY_CLOUD_NAME" => Some("env-cloud".to_string()),
            "CLOUDINARY_API_SECRET" => Some("s3cret".to_string()),
            _ => None,
        });

        assert_eq!(config.media.cloud_name, "env-cloud");
        assert_eq!(config.media.api_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.media.api_key, None);
        assert_eq!(config.media.folder, "gallery");
    }

    #[test]
    fn test_validate_cache_windows() {
        let mut config = AppConfig::default();
        config.cache.revalidate_secs = 100;
        config.cache.expire_secs = 50;
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_cache_policy_durations() {
        let policy = CacheConfig::default().policy();
        assert_eq!(policy.revalidate, Duration::from_secs(900));
        assert_eq!(policy.expire, Duration::from_secs(86400));
    }
}
