use anyhow::Result;

use photowall_core::photo::CatalogProvider;
use photowall_core::AppConfig;

pub async fn run(config: &AppConfig, json: bool) -> Result<()> {
    let provider = CatalogProvider::from_config(config)?;
    let catalog = provider.list_photos().await;

    if json {
        println!("{}", serde_json::to_string_pretty(catalog.as_slice())?);
        return Ok(());
    }

    if catalog.is_empty() {
        println!("No photos found in folder '{}'.", config.media.folder);
        println!("\nCheck the media credentials, e.g.:");
        println!("  CLOUDINARY_CLOUD_NAME=<cloud> CLOUDINARY_API_KEY=<key> CLOUDINARY_API_SECRET=<secret> photowall list");
        return Ok(());
    }

    println!("Photos ({}):\n", catalog.len());

    for photo in catalog.iter() {
        let placeholder = if photo.has_placeholder() {
            ""
        } else {
            " [no placeholder]"
        };
        println!(
            "  {} - {}x{} {}{}",
            photo.id, photo.width, photo.height, photo.format, placeholder
        );
    }

    Ok(())
}
