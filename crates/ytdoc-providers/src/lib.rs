//! Provider bridges for ytdoc
//!
//! This crate wraps the external collaborators the extraction core relies on:
//! - yt-dlp: feature-rich metadata extraction through the CLI binary
//! - Watch page: lightweight metadata extraction over plain HTTP
//! - Timed text: caption track enumeration and transcript download
//!
//! Every call here is blocking. Callers are expected to run them on a
//! blocking-capable thread.

mod error;
mod player;
mod proxy;
mod timedtext;
mod transcript;
mod video;
mod watch_page;
mod ytdlp;

pub use error::ProviderError;
pub use proxy::{mask_url, validate_proxy_url, ProxyConfig, ROTATING_PROXY_HOST, ROTATING_PROXY_PORT};
pub use timedtext::YouTubeTranscriptApi;
pub use transcript::{FetchedTranscript, TranscriptApi, TranscriptSegment, TranscriptTrack};
pub use video::{
    default_thumbnail_url, parse_compact_date, parse_iso_date, watch_url, VideoMetadata,
    DESCRIPTION_UNAVAILABLE, UNKNOWN_CHANNEL, UNKNOWN_TITLE,
};
pub use watch_page::WatchPageProvider;
pub use ytdlp::YtDlpProvider;

/// Desktop browser User-Agent sent by every provider
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Inputs shared by every metadata provider call
#[derive(Debug, Clone, Copy)]
pub struct MetadataRequest<'a> {
    pub video_id: &'a str,
    pub url: &'a str,
    pub proxy: &'a ProxyConfig,
}

/// A source of video metadata
pub trait MetadataProvider: Send + Sync {
    /// Name of the provider (for logging)
    fn name(&self) -> &'static str;

    /// Whether the provider can run in this environment
    fn is_available(&self) -> bool;

    /// Fetch metadata for one video
    fn fetch(&self, request: &MetadataRequest<'_>) -> Result<VideoMetadata, ProviderError>;
}
