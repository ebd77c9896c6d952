//! Lightweight metadata provider that reads the watch page directly

use crate::player::{build_client, fetch_player_response, PlayerResponse};
use crate::video::{default_thumbnail_url, parse_iso_date, UNKNOWN_CHANNEL, UNKNOWN_TITLE};
use crate::{MetadataProvider, MetadataRequest, ProviderError, VideoMetadata};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct WatchPageProvider {
    timeout: Duration,
}

impl WatchPageProvider {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl MetadataProvider for WatchPageProvider {
    fn name(&self) -> &'static str {
        "watch-page"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn fetch(&self, request: &MetadataRequest<'_>) -> Result<VideoMetadata, ProviderError> {
        info!("Fetching metadata from watch page: {}", request.video_id);

        let client = build_client(request.proxy, self.timeout)?;
        let player = fetch_player_response(&client, request.video_id)?;
        player.ensure_playable(request.video_id)?;

        to_metadata(player, request)
    }
}

fn to_metadata(
    player: PlayerResponse,
    request: &MetadataRequest<'_>,
) -> Result<VideoMetadata, ProviderError> {
    let details = player
        .video_details
        .ok_or_else(|| ProviderError::Parse("player response has no videoDetails".to_string()))?;
    let microformat = player
        .microformat
        .and_then(|m| m.player_microformat_renderer);

    let upload_date = microformat
        .as_ref()
        .and_then(|m| m.publish_date.as_deref().or(m.upload_date.as_deref()))
        .map(parse_iso_date)
        .transpose()?;

    let categories = microformat
        .as_ref()
        .and_then(|m| m.category.clone())
        .into_iter()
        .collect();

    let thumbnail_url = details
        .best_thumbnail()
        .unwrap_or_else(|| default_thumbnail_url(request.video_id));

    let video_id = details
        .video_id
        .clone()
        .unwrap_or_else(|| request.video_id.to_string());

    debug!("Watch page resolved: {:?} ({})", details.title, video_id);

    Ok(VideoMetadata {
        title: details
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        description: details.short_description.unwrap_or_default(),
        duration: details
            .length_seconds
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        view_count: details.view_count.and_then(|s| s.parse().ok()),
        like_count: None,
        channel: details
            .author
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
        channel_id: details.channel_id,
        upload_date,
        url: request.url.to_string(),
        video_id,
        thumbnail_url,
        categories,
        tags: details.keywords,
        detected_transcript_language: None,
    })
}
