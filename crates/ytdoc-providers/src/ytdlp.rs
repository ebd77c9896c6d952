//! Metadata provider backed by the yt-dlp binary

use crate::video::{
    default_thumbnail_url, parse_compact_date, watch_url, UNKNOWN_CHANNEL, UNKNOWN_TITLE,
};
use crate::{MetadataProvider, MetadataRequest, ProviderError, VideoMetadata, USER_AGENT};
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct YtDlpProvider {
    yt_dlp_path: Option<PathBuf>,
    socket_timeout: Duration,
}

/// Subset of `yt-dlp --dump-json` output
#[derive(Debug, Clone, Deserialize)]
struct YtDlpInfo {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    view_count: Option<u64>,
    #[serde(default)]
    like_count: Option<u64>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    uploader_id: Option<String>,
    #[serde(default)]
    upload_date: Option<String>,
    #[serde(default)]
    thumbnail: Option<String>,
    #[serde(default)]
    categories: Option<Vec<String>>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

impl YtDlpProvider {
    /// `yt_dlp_path` of `None` marks the provider as not installed
    pub fn new(yt_dlp_path: Option<PathBuf>, socket_timeout: Duration) -> Self {
        Self {
            yt_dlp_path,
            socket_timeout,
        }
    }

    /// Version string reported by the binary
    pub fn version(&self) -> Option<String> {
        let path = self.yt_dlp_path.as_ref()?;
        let output = Command::new(path).arg("--version").output().ok()?;
        output
            .status
            .success()
            .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn build_command(&self, path: &PathBuf, request: &MetadataRequest<'_>) -> Command {
        let mut cmd = Command::new(path);
        cmd.args([
            "--dump-json",
            "--skip-download",
            "--no-playlist",
            "--no-warnings",
            "--quiet",
        ]);
        cmd.arg("--socket-timeout")
            .arg(self.socket_timeout.as_secs().to_string());
        cmd.arg("--user-agent").arg(USER_AGENT);

        if let Some(proxy) = request.proxy.preferred_url() {
            cmd.arg("--proxy").arg(proxy);
        }

        // Ids may start with '-'
        cmd.arg("--").arg(watch_url(request.video_id));
        cmd
    }
}

impl MetadataProvider for YtDlpProvider {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    fn is_available(&self) -> bool {
        self.yt_dlp_path.is_some()
    }

    fn fetch(&self, request: &MetadataRequest<'_>) -> Result<VideoMetadata, ProviderError> {
        let path = self
            .yt_dlp_path
            .as_ref()
            .ok_or(ProviderError::NotInstalled("yt-dlp"))?;

        info!("Fetching metadata with yt-dlp: {}", request.url);
        if !request.proxy.is_direct() {
            debug!("yt-dlp routed through {}", request.proxy);
        }

        let output = self.build_command(path, request).output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(classify_failure(output.status.code(), &stderr, request.url));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_info(&stdout, request)
    }
}

fn classify_failure(code: Option<i32>, stderr: &str, url: &str) -> ProviderError {
    if stderr.contains("Video unavailable") || stderr.contains("Private video") {
        return ProviderError::VideoUnavailable(url.to_string());
    }
    if stderr.contains("Sign in to confirm") || stderr.contains("HTTP Error 429") {
        return ProviderError::Blocked(stderr.trim().to_string());
    }
    ProviderError::YtDlpFailed {
        code,
        stderr: stderr.trim().to_string(),
    }
}

fn parse_info(json: &str, request: &MetadataRequest<'_>) -> Result<VideoMetadata, ProviderError> {
    let info: YtDlpInfo = serde_json::from_str(json.trim())?;

    let upload_date = match info.upload_date.as_deref() {
        Some(raw) => Some(parse_compact_date(raw)?),
        None => None,
    };

    let title = info.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string());
    debug!("yt-dlp resolved: {} ({})", title, request.video_id);

    if info.thumbnail.is_none() {
        warn!("yt-dlp returned no thumbnail for {}", request.video_id);
    }

    Ok(VideoMetadata {
        title,
        description: info.description.unwrap_or_default(),
        duration: info.duration.map(|d| d.max(0.0).round() as u64).unwrap_or(0),
        view_count: info.view_count,
        like_count: info.like_count,
        channel: info.uploader.unwrap_or_else(|| UNKNOWN_CHANNEL.to_string()),
        channel_id: info.uploader_id,
        upload_date,
        url: request.url.to_string(),
        video_id: request.video_id.to_string(),
        thumbnail_url: info
            .thumbnail
            .unwrap_or_else(|| default_thumbnail_url(request.video_id)),
        categories: info.categories.unwrap_or_default(),
        tags: info.tags.unwrap_or_default(),
        detected_transcript_language: None,
    })
}
