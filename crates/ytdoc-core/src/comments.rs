//! Comment extraction
//!
//! Comments need a YouTube Data API key. No API call is made yet: with a
//! key configured a fixed set of sample comments is returned.

use tracing::{debug, warn};

const SAMPLE_COMMENTS: &[&str] = &[
    "Great video! Very informative.",
    "Thanks for sharing this content.",
    "This helped me understand the topic better.",
    "Looking forward to more content like this.",
    "Well explained and easy to follow.",
];

#[derive(Debug, Clone)]
pub struct CommentExtractor {
    api_key: Option<String>,
    max_comments: usize,
}

impl CommentExtractor {
    pub fn new(api_key: Option<String>, max_comments: usize) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            max_comments,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// `None` without an API key, otherwise at most `max_comments` entries
    pub fn extract(&self, video_id: &str) -> Option<Vec<String>> {
        if self.api_key.is_none() {
            warn!("YouTube API key not configured - comments extraction not available");
            return None;
        }

        debug!("Extracting comments for {}", video_id);
        Some(
            SAMPLE_COMMENTS
                .iter()
                .take(self.max_comments)
                .map(|c| c.to_string())
                .collect(),
        )
    }
}
