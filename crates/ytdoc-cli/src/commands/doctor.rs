use anyhow::Result;
use std::path::Path;
use ytdoc_core::config::Config;
use ytdoc_core::proxy::{configured_tier, resolve_proxy};
use ytdoc_providers::{MetadataProvider, WatchPageProvider, YtDlpProvider};

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    let timeout = config.socket_timeout();

    println!("ytdoc dependency check\n");

    let mut all_ok = true;

    // Metadata providers, in fallback order
    print!("yt-dlp:        ");
    let yt_dlp = YtDlpProvider::new(config.yt_dlp_path().ok(), timeout);
    if yt_dlp.is_available() {
        match yt_dlp.version() {
            Some(version) => println!("OK ({})", version),
            None => {
                println!("FOUND but failed to get version");
                all_ok = false;
            }
        }
    } else {
        println!("NOT FOUND");
        println!("           Install with: pip install yt-dlp");
        println!("           Metadata falls back to the watch page");
        all_ok = false;
    }

    print!("watch page:    ");
    if WatchPageProvider::new(timeout).is_available() {
        println!("OK (HTTP)");
    } else {
        println!("UNAVAILABLE");
        all_ok = false;
    }

    println!("transcripts:   OK (timed text, HTTP)");

    print!("proxy:         ");
    match configured_tier(&config.proxy) {
        Some(tier) => {
            let proxy = resolve_proxy(&config.proxy);
            if proxy.is_direct() {
                println!("{} tier configured but invalid, using direct connection", tier);
                all_ok = false;
            } else {
                println!("{} ({})", tier, proxy);
            }
        }
        None => println!("direct connection"),
    }

    print!("API key:       ");
    if config.api_key().is_some() {
        println!("configured");
    } else {
        println!("not set");
        println!("           Comments need YOUTUBE_API_KEY");
    }

    println!();
    if all_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing or misconfigured. See above.");
    }

    Ok(())
}
