use anyhow::Result;

use photowall_core::photo::CatalogProvider;
use photowall_core::AppConfig;

pub async fn run(config: &AppConfig) -> Result<()> {
    let provider = CatalogProvider::from_config(config)?;
    for id in provider.photo_ids().await {
        println!("{}", id);
    }
    Ok(())
}
