use anyhow::{bail, Result};

use photowall_core::config::SiteConfig;
use photowall_core::photo::{CatalogProvider, ImageUrlBuilder, PhotoRecord, Transform};
use photowall_core::nav::Route;
use photowall_core::AppConfig;

/// Link-preview metadata for a photo page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMetadata {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: String,
    pub image_width: u32,
}

impl ShareMetadata {
    pub fn for_photo(site: &SiteConfig, urls: &ImageUrlBuilder, photo: &PhotoRecord) -> Self {
        let base = site.base_url.trim_end_matches('/');
        let route = Route::Photo(photo.id.clone());
        Self {
            title: site.title.clone(),
            description: site.description.clone(),
            url: format!("{}{}", base, route.path()),
            image: urls.url(photo, &Transform::SOCIAL),
            image_width: Transform::SOCIAL.width.unwrap_or_default(),
        }
    }
}

pub async fn run(config: &AppConfig, id: &str) -> Result<()> {
    let provider = CatalogProvider::from_config(config)?;
    let Some(photo) = provider.get_photo_by_id(id).await else {
        bail!("Photo not found: {}", id);
    };
    let urls = provider.urls();

    println!("{}", photo.id);
    println!("  Size:   {}x{}", photo.width, photo.height);
    println!("  Format: {}", photo.format);
    println!("  Aspect: {:.2}:1", photo.aspect_ratio());
    match photo.placeholder_data_url() {
        Some(data_url) => println!("  Placeholder: {}", data_url),
        None => println!("  Placeholder: none"),
    }

    println!("\nImages:");
    let renditions = [
        ("card", Transform::CARD),
        ("thumbnail", Transform::THUMBNAIL),
        ("main", Transform::MAIN),
        ("full", Transform::FULL),
        ("blurred", Transform::PLACEHOLDER),
    ];
    for (label, transform) in renditions {
        println!("  {:<10} {}", label, urls.url(&photo, &transform));
    }

    let share = ShareMetadata::for_photo(&config.site, urls, &photo);
    println!("\nShare metadata:");
    println!("  Title:       {}", share.title);
    println!("  Description: {}", share.description);
    println!("  URL:         {}", share.url);
    println!("  Image:       {} ({}px)", share.image, share.image_width);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_metadata() {
        let site = SiteConfig {
            base_url: "https://photos.example.com/".to_string(),
            ..Default::default()
        };
        let urls = ImageUrlBuilder::new("https://res.cloudinary.com", "demo").unwrap();
        let photo = PhotoRecord {
            id: "trips/lake".to_string(),
            width: 4000,
            height: 3000,
            storage_ref: "trips/lake".to_string(),
            format: "jpg".to_string(),
            placeholder: None,
        };

        let share = ShareMetadata::for_photo(&site, &urls, &photo);
        assert_eq!(share.url, "https://photos.example.com/p/trips/lake");
        assert_eq!(
            share.image,
            "https://res.cloudinary.com/demo/image/upload/c_scale,w_720/trips/lake.jpg"
        );
        assert_eq!(share.image_width, 720);
        assert_eq!(share.title, "photos");
    }
}
