//! Metadata provider chain with progressive fallback

use crate::config::Config;
use std::sync::Arc;
use tracing::{debug, info, warn};
use ytdoc_providers::{
    MetadataProvider, MetadataRequest, ProxyConfig, VideoMetadata, WatchPageProvider,
    YtDlpProvider,
};

/// Ordered list of metadata providers.
///
/// Availability is decided once, when the chain is built. Unavailable
/// providers are dropped with a warning and never counted as failures.
pub struct MetadataChain {
    providers: Vec<Arc<dyn MetadataProvider>>,
}

impl MetadataChain {
    pub fn new(providers: Vec<Arc<dyn MetadataProvider>>) -> Self {
        let mut available = Vec::with_capacity(providers.len());
        for provider in providers {
            if provider.is_available() {
                debug!("Metadata provider available: {}", provider.name());
                available.push(provider);
            } else {
                warn!("Metadata provider not available: {}", provider.name());
            }
        }

        if available.is_empty() {
            warn!("No video metadata extraction providers available");
        }

        Self {
            providers: available,
        }
    }

    /// yt-dlp first, then the watch page
    pub fn from_config(config: &Config) -> Self {
        let timeout = config.socket_timeout();
        let yt_dlp = YtDlpProvider::new(config.yt_dlp_path().ok(), timeout);

        Self::new(vec![
            Arc::new(yt_dlp),
            Arc::new(WatchPageProvider::new(timeout)),
        ])
    }

    /// Names of the providers that will be tried, in order
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Try each provider once; never fails
    pub fn extract(&self, video_id: &str, url: &str, proxy: &ProxyConfig) -> VideoMetadata {
        let request = MetadataRequest {
            video_id,
            url,
            proxy,
        };
        let mut attempts = Vec::new();

        for provider in &self.providers {
            match provider.fetch(&request) {
                Ok(metadata) => {
                    info!("Extracted metadata with {}", provider.name());
                    return metadata;
                }
                Err(e) => {
                    warn!("{} extraction failed: {}", provider.name(), e);
                    attempts.push(format!("{}: {}", provider.name(), e));
                }
            }
        }

        warn!(
            "All metadata extraction methods failed. Attempts: {:?}",
            attempts
        );
        VideoMetadata::minimal(video_id, url)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use ytdoc_providers::ProviderError;

    pub(crate) struct FakeProvider {
        pub name: &'static str,
        pub available: bool,
        pub title: Option<&'static str>,
        pub calls: AtomicUsize,
    }

    impl FakeProvider {
        pub fn ok(name: &'static str, title: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                available: true,
                title: Some(title),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn failing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                available: true,
                title: None,
                calls: AtomicUsize::new(0),
            })
        }

        pub fn missing(name: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                available: false,
                title: Some("never"),
                calls: AtomicUsize::new(0),
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl MetadataProvider for FakeProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        fn fetch(&self, request: &MetadataRequest<'_>) -> Result<VideoMetadata, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.title {
                Some(title) => {
                    let mut meta = VideoMetadata::minimal(request.video_id, request.url);
                    meta.title = title.to_string();
                    Ok(meta)
                }
                None => Err(ProviderError::VideoUnavailable(request.url.to_string())),
            }
        }
    }

    const ID: &str = "dQw4w9WgXcQ";
    const URL: &str = "https://youtu.be/dQw4w9WgXcQ";

    #[test]
    fn test_first_success_wins() {
        let first = FakeProvider::ok("a", "from a");
        let second = FakeProvider::ok("b", "from b");
        let chain = MetadataChain::new(vec![first.clone(), second.clone()]);

        let meta = chain.extract(ID, URL, &ProxyConfig::None);
        assert_eq!(meta.title, "from a");
        assert_eq!(second.calls(), 0);
    }

    #[test]
    fn test_falls_back_after_failure() {
        let first = FakeProvider::failing("a");
        let second = FakeProvider::ok("b", "from b");
        let chain = MetadataChain::new(vec![first.clone(), second.clone()]);

        let meta = chain.extract(ID, URL, &ProxyConfig::None);
        assert_eq!(meta.title, "from b");
        assert_eq!(first.calls(), 1);
        assert_eq!(second.calls(), 1);
    }

    #[test]
    fn test_unavailable_provider_is_skipped() {
        let missing = FakeProvider::missing("a");
        let second = FakeProvider::ok("b", "from b");
        let chain = MetadataChain::new(vec![missing.clone(), second]);

        assert_eq!(chain.provider_names(), vec!["b"]);
        assert_eq!(chain.extract(ID, URL, &ProxyConfig::None).title, "from b");
        assert_eq!(missing.calls(), 0);
    }

    #[test]
    fn test_exhaustion_yields_minimal_record() {
        let chain = MetadataChain::new(vec![
            FakeProvider::failing("a"),
            FakeProvider::missing("b"),
        ]);
        assert_eq!(
            chain.extract(ID, URL, &ProxyConfig::None),
            VideoMetadata::minimal(ID, URL)
        );

        let empty = MetadataChain::new(Vec::new());
        assert_eq!(
            empty.extract(ID, URL, &ProxyConfig::None),
            VideoMetadata::minimal(ID, URL)
        );
    }
}
