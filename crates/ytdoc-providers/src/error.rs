//! Error types for the provider bridges

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} is not installed")]
    NotInstalled(&'static str),

    #[error("yt-dlp failed with exit code {code:?}: {stderr}")]
    YtDlpFailed { code: Option<i32>, stderr: String },

    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    #[error("Request blocked by YouTube: {0}")]
    Blocked(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("No transcript found for video {video_id} in languages {languages:?}")]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Invalid proxy configuration: {0}")]
    InvalidProxy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(err.to_string())
    }
}
