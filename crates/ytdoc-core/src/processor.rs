//! Request orchestration: metadata, transcript and comments for one video

use crate::comments::CommentExtractor;
use crate::config::Config;
use crate::error::{Result, ValidationError};
use crate::metadata::MetadataChain;
use crate::proxy::{configured_tier, resolve_proxy};
use crate::transcript::{TranscriptExtractor, TranscriptResult};
use crate::video_id::parse_video_id;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;
use ytdoc_providers::VideoMetadata;

/// One extraction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoQuery {
    pub url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_max_transcript_length")]
    pub max_transcript_length: i64,
    #[serde(default)]
    pub include_comments: bool,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_max_transcript_length() -> i64 {
    10_000
}

impl VideoQuery {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            language: default_language(),
            max_transcript_length: default_max_transcript_length(),
            include_comments: false,
        }
    }

    pub fn extract_video_id(&self) -> std::result::Result<String, ValidationError> {
        parse_video_id(&self.url)
    }
}

/// Everything extracted for one video
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub metadata: VideoMetadata,
    pub transcript: Option<String>,
    pub comments: Option<Vec<String>>,
}

pub struct YoutubeProcessor {
    metadata: Arc<MetadataChain>,
    transcripts: Arc<TranscriptExtractor>,
    comments: CommentExtractor,
    config: Config,
}

impl YoutubeProcessor {
    /// Processor wired to the real providers
    pub fn new(config: Config) -> Self {
        let metadata = MetadataChain::from_config(&config);
        let transcripts = TranscriptExtractor::youtube(config.socket_timeout());
        Self::with_components(config, metadata, transcripts)
    }

    pub fn with_components(
        config: Config,
        metadata: MetadataChain,
        transcripts: TranscriptExtractor,
    ) -> Self {
        let comments = CommentExtractor::new(
            config.youtube.api_key.clone(),
            config.extract.max_comments,
        );

        let processor = Self {
            metadata: Arc::new(metadata),
            transcripts: Arc::new(transcripts),
            comments,
            config,
        };
        processor.log_status();
        processor
    }

    fn log_status(&self) {
        let providers = self.metadata.provider_names();
        if providers.is_empty() {
            warn!("No metadata providers available, results will be minimal");
        } else {
            info!("Metadata providers: {}", providers.join(", "));
        }

        match configured_tier(&self.config.proxy) {
            Some(tier) => info!(
                "Proxy configuration: {} ({})",
                tier,
                resolve_proxy(&self.config.proxy)
            ),
            None => info!("Proxy configuration: direct connection"),
        }

        if self.comments.has_api_key() {
            info!("YouTube API key: configured");
        } else {
            debug!("YouTube API key: not set, comments disabled");
        }
    }

    /// Extract everything requested for one video.
    ///
    /// Only an unusable video reference is an error; provider failures
    /// degrade to minimal metadata, no transcript or no comments.
    pub async fn process_video(&self, query: &VideoQuery) -> Result<ExtractionResult> {
        let span = info_span!("process_video", request_id = %Uuid::new_v4());
        self.run(query).instrument(span).await
    }

    async fn run(&self, query: &VideoQuery) -> Result<ExtractionResult> {
        let start_time = Instant::now();
        let video_id = query.extract_video_id()?;
        info!("Processing video: {}", video_id);

        // Built fresh per request
        let proxy = resolve_proxy(&self.config.proxy);

        let metadata_task = {
            let chain = Arc::clone(&self.metadata);
            let video_id = video_id.clone();
            let url = query.url.clone();
            let proxy = proxy.clone();
            let span = Span::current();
            tokio::task::spawn_blocking(move || {
                let _guard = span.enter();
                chain.extract(&video_id, &url, &proxy)
            })
        };

        let transcript_task = {
            let extractor = Arc::clone(&self.transcripts);
            let video_id = video_id.clone();
            let language = query.language.clone();
            let max_length = query.max_transcript_length;
            let span = Span::current();
            tokio::task::spawn_blocking(move || {
                let _guard = span.enter();
                extractor.extract(&video_id, &language, max_length, &proxy)
            })
        };

        let comments_task = async {
            if query.include_comments {
                self.comments.extract(&video_id)
            } else {
                None
            }
        };

        let (metadata, transcript, comments) =
            tokio::join!(metadata_task, transcript_task, comments_task);

        let mut metadata = metadata.unwrap_or_else(|e| {
            error!("Metadata task failed: {}", e);
            VideoMetadata::minimal(&video_id, &query.url)
        });

        let transcript = transcript.unwrap_or_else(|e| {
            error!("Transcript task failed: {}", e);
            None
        });

        let transcript = transcript.map(|TranscriptResult { text, language }| {
            metadata.detected_transcript_language = Some(language);
            text
        });

        info!(
            "Finished {} in {:.1}s (transcript: {}, comments: {})",
            video_id,
            start_time.elapsed().as_secs_f32(),
            transcript.is_some(),
            comments.as_ref().map_or(0, Vec::len)
        );

        Ok(ExtractionResult {
            metadata,
            transcript,
            comments,
        })
    }
}
