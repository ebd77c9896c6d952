use anyhow::Result;
use std::path::Path;
use ytdoc_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("ytdoc configuration\n");
    println!("{}", toml::to_string_pretty(&config.redacted())?);

    // Show config file locations
    println!("Config sources (later entries win):");
    println!("  1. Built-in defaults");
    if let Some(p) = Config::default_config_path() {
        println!("  2. {}", p.display());
    }
    if let Some(p) = config_path {
        println!("  3. {} (specified)", p.display());
    }
    println!("  4. Environment variables (USE_PROXY, PROXY_*, YTA_*, HTTP(S)_PROXY, YOUTUBE_API_KEY)");
    println!("  5. Environment variables (YTDOC_*, nested with __)");

    Ok(())
}
