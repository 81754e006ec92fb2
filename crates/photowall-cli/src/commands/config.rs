use anyhow::Result;

use photowall_core::AppConfig;

pub fn run(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path();

    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            AppConfig::default().save()?;
            println!("Wrote default config: {}", path.display());
        }
        return Ok(());
    }

    println!("Config file: {}", path.display());
    println!("Log file:    {}", config.log_path().display());
    if !path.exists() {
        println!("\nNo config file yet; run `photowall config --init` to create one.");
    }
    Ok(())
}
