mod carousel;
mod gallery_wall;
pub mod halfblocks;
mod not_found;
mod status_bar;
mod thumbnail_strip;

pub use carousel::CarouselWidget;
pub use gallery_wall::GalleryWallWidget;
pub use not_found::NotFoundWidget;
pub use status_bar::StatusBarWidget;
pub use thumbnail_strip::ThumbnailStripWidget;
