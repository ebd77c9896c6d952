//! Video identifier extraction from user supplied URLs

use crate::error::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;

static BARE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id regex"));

static URL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // youtube.com/watch?v=<id>, v anywhere in the query
        r"^(?:https?://)?(?:(?:www|m|music)\.)?youtube\.com/watch/?\?(?:[^#]*&)?v=([^&#]*)",
        // youtu.be/<id>
        r"^(?:https?://)?(?:www\.)?youtu\.be/([^/?&#]*)",
        // youtube.com/{shorts,embed,v,live}/<id>
        r"^(?:https?://)?(?:(?:www|m|music)\.)?youtube(?:-nocookie)?\.com/(?:shorts|embed|v|live)/([^/?&#]*)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid video url regex"))
    .collect()
});

/// Resolve a URL or bare id to the canonical 11 character video id
pub fn parse_video_id(input: &str) -> Result<String, ValidationError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ValidationError::EmptyInput);
    }

    if BARE_ID.is_match(input) {
        return Ok(input.to_string());
    }

    let candidate = URL_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| ValidationError::UnsupportedUrl(input.to_string()))?;

    if BARE_ID.is_match(candidate) {
        Ok(candidate.to_string())
    } else {
        Err(ValidationError::InvalidVideoId(candidate.to_string()))
    }
}

pub use ytdoc_providers::watch_url;
