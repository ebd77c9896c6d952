//! Watch page download and embedded player response parsing

use crate::{ProviderError, ProxyConfig, USER_AGENT};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerResponse {
    #[serde(default)]
    pub playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    pub video_details: Option<VideoDetails>,
    #[serde(default)]
    pub microformat: Option<Microformat>,
    #[serde(default)]
    pub captions: Option<Captions>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlayabilityStatus {
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoDetails {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub length_seconds: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<ThumbnailList>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ThumbnailList {
    #[serde(default)]
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Thumbnail {
    pub url: String,
    #[serde(default)]
    pub width: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Microformat {
    #[serde(default)]
    pub player_microformat_renderer: Option<PlayerMicroformat>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerMicroformat {
    #[serde(default)]
    pub publish_date: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Captions {
    #[serde(default)]
    pub player_captions_tracklist_renderer: Option<CaptionTracklist>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptionTracklist {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    #[serde(default)]
    pub name: Option<CaptionName>,
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CaptionName {
    #[serde(default)]
    pub simple_text: Option<String>,
    #[serde(default)]
    pub runs: Vec<CaptionNameRun>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CaptionNameRun {
    pub text: String,
}

impl CaptionName {
    pub fn text(&self) -> Option<String> {
        if let Some(ref simple) = self.simple_text {
            return Some(simple.clone());
        }
        if self.runs.is_empty() {
            return None;
        }
        Some(self.runs.iter().map(|r| r.text.as_str()).collect())
    }
}

impl PlayerResponse {
    /// Fail unless the video is playable
    pub fn ensure_playable(&self, video_id: &str) -> Result<(), ProviderError> {
        match self.playability_status {
            Some(ref status) if status.status == "OK" => Ok(()),
            Some(ref status) if status.status == "LOGIN_REQUIRED" => {
                Err(ProviderError::Blocked(status.reason.clone().unwrap_or_else(|| {
                    format!("login required for {}", video_id)
                })))
            }
            Some(ref status) => Err(ProviderError::VideoUnavailable(
                status
                    .reason
                    .clone()
                    .unwrap_or_else(|| format!("{} ({})", video_id, status.status)),
            )),
            None => Err(ProviderError::Parse(
                "player response has no playability status".to_string(),
            )),
        }
    }

    pub fn caption_tracks(&self) -> Option<&[CaptionTrack]> {
        self.captions
            .as_ref()?
            .player_captions_tracklist_renderer
            .as_ref()
            .map(|list| list.caption_tracks.as_slice())
    }
}

impl VideoDetails {
    /// Widest thumbnail on offer
    pub fn best_thumbnail(&self) -> Option<String> {
        self.thumbnail
            .as_ref()?
            .thumbnails
            .iter()
            .max_by_key(|t| t.width)
            .map(|t| t.url.clone())
    }
}

/// HTTP client routed through `proxy`, built fresh for each extraction
pub(crate) fn build_client(proxy: &ProxyConfig, timeout: Duration) -> Result<Client, ProviderError> {
    let builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .gzip(true);
    Ok(proxy.apply(builder)?.build()?)
}

/// Download the watch page and pull out the player response
pub(crate) fn fetch_player_response(
    client: &Client,
    video_id: &str,
) -> Result<PlayerResponse, ProviderError> {
    debug!("Fetching watch page for {}", video_id);

    let html = client
        .get(WATCH_URL)
        .query(&[("v", video_id), ("hl", "en")])
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()?
        .error_for_status()?
        .text()?;

    if html.contains("action=\"https://consent.youtube.com/s\"") {
        return Err(ProviderError::Blocked("consent page served".to_string()));
    }
    if html.contains("class=\"g-recaptcha\"") {
        return Err(ProviderError::Blocked("captcha page served".to_string()));
    }

    parse_player_response(&html)
}

pub(crate) fn parse_player_response(html: &str) -> Result<PlayerResponse, ProviderError> {
    let json = extract_json_object(html, PLAYER_RESPONSE_MARKER).ok_or_else(|| {
        ProviderError::Parse("watch page carries no player response".to_string())
    })?;
    Ok(serde_json::from_str(json)?)
}

/// Slice the balanced `{...}` object that follows the first `marker`
fn extract_json_object<'a>(text: &'a str, marker: &str) -> Option<&'a str> {
    let after_marker = text.find(marker)? + marker.len();
    let start = after_marker + text[after_marker..].find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
