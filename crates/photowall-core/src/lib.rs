pub mod config;
pub mod error;
pub mod media;
pub mod nav;
pub mod photo;

pub use config::{AppConfig, EasingType, ScrollConfig};
pub use error::{Error, Result};
