//! Transcript service backed by the watch page caption tracks and the timedtext endpoint

use crate::player::{build_client, fetch_player_response, CaptionName};
use crate::transcript::{TranscriptApi, TranscriptSegment, TranscriptTrack};
use crate::{ProviderError, ProxyConfig};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct YouTubeTranscriptApi {
    client: Client,
}

/// `fmt=json3` timedtext document
#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

impl YouTubeTranscriptApi {
    pub fn new(proxy: &ProxyConfig, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(proxy, timeout)?,
        })
    }
}

impl TranscriptApi for YouTubeTranscriptApi {
    fn list(&self, video_id: &str) -> Result<Vec<TranscriptTrack>, ProviderError> {
        let player = fetch_player_response(&self.client, video_id)?;
        player.ensure_playable(video_id)?;

        let tracks = player
            .caption_tracks()
            .ok_or_else(|| ProviderError::TranscriptsDisabled(video_id.to_string()))?;

        Ok(tracks
            .iter()
            .map(|track| {
                let language = track
                    .name
                    .as_ref()
                    .and_then(CaptionName::text)
                    .unwrap_or_else(|| track.language_code.clone());
                TranscriptTrack::new(
                    track.language_code.clone(),
                    language,
                    track.kind.as_deref() == Some("asr"),
                    track.base_url.clone(),
                )
            })
            .collect())
    }

    fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>, ProviderError> {
        debug!(
            "Fetching {} transcript ({})",
            track.language_code,
            if track.is_generated { "auto-generated" } else { "manual" }
        );

        let body = self
            .client
            .get(json3_url(track.source_url()))
            .send()?
            .error_for_status()?
            .text()?;

        parse_json3(&body)
    }
}

fn json3_url(base_url: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}fmt=json3", base_url, separator)
}

fn parse_json3(body: &str) -> Result<Vec<TranscriptSegment>, ProviderError> {
    if body.trim().is_empty() {
        return Err(ProviderError::Parse("empty timedtext response".to_string()));
    }

    let doc: TimedText = serde_json::from_str(body)?;

    Ok(doc
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            (!text.is_empty()).then(|| TranscriptSegment {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect())
}
