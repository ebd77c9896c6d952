//! Video metadata record returned by every metadata provider

use crate::ProviderError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_CHANNEL: &str = "Unknown Channel";
pub const DESCRIPTION_UNAVAILABLE: &str = "Description not available";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
    /// Length in seconds
    pub duration: u64,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    pub channel: String,
    pub channel_id: Option<String>,
    pub upload_date: Option<NaiveDate>,
    pub url: String,
    pub video_id: String,
    pub thumbnail_url: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// Language of the transcript that was actually used, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_transcript_language: Option<String>,
}

impl VideoMetadata {
    /// Placeholder record used when no provider could describe the video
    pub fn minimal(video_id: &str, url: &str) -> Self {
        Self {
            title: format!("Video {}", video_id),
            description: DESCRIPTION_UNAVAILABLE.to_string(),
            duration: 0,
            view_count: None,
            like_count: None,
            channel: UNKNOWN_CHANNEL.to_string(),
            channel_id: None,
            upload_date: None,
            url: url.to_string(),
            video_id: video_id.to_string(),
            thumbnail_url: default_thumbnail_url(video_id),
            categories: Vec::new(),
            tags: Vec::new(),
            detected_transcript_language: None,
        }
    }
}

/// Canonical watch URL for an id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Thumbnail address that exists for every public video id
pub fn default_thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}

/// Parse the compact `YYYYMMDD` form used by yt-dlp
pub fn parse_compact_date(date: &str) -> Result<NaiveDate, ProviderError> {
    let date = date.trim();
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_date(date));
    }

    NaiveDate::parse_from_str(date, "%Y%m%d").map_err(|_| invalid_date(date))
}

/// Parse `YYYY-MM-DD`, ignoring any time part that follows
pub fn parse_iso_date(date: &str) -> Result<NaiveDate, ProviderError> {
    let day_part = date.trim().get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(day_part, "%Y-%m-%d").map_err(|_| invalid_date(date))
}

fn invalid_date(date: &str) -> ProviderError {
    ProviderError::Parse(format!("invalid upload date '{}'", date))
}
