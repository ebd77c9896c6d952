//! ytdoc-core: provider fallback and transcript selection for YouTube videos

pub mod comments;
pub mod config;
pub mod error;
pub mod metadata;
pub mod processor;
pub mod proxy;
pub mod transcript;
pub mod video_id;

pub use config::Config;
pub use error::{ConfigError, Result, ValidationError, YtDocError};
pub use processor::{ExtractionResult, VideoQuery, YoutubeProcessor};
pub use video_id::parse_video_id;
pub use ytdoc_providers::{ProxyConfig, VideoMetadata};
