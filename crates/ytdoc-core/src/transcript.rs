//! Transcript selection, formatting and truncation

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use ytdoc_providers::{
    ProviderError, ProxyConfig, TranscriptApi, TranscriptSegment, TranscriptTrack,
    YouTubeTranscriptApi,
};

/// Appended after a transcript cut at the length limit; not counted in it
pub const TRUNCATION_MARKER: &str = "\n[Transcript truncated...]";

/// Builds a transcript service client for one extraction
pub type TranscriptApiFactory =
    Arc<dyn Fn(&ProxyConfig) -> Result<Box<dyn TranscriptApi>, ProviderError> + Send + Sync>;

/// Formatted transcript and the language of the track it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptResult {
    pub text: String,
    pub language: String,
}

pub struct TranscriptExtractor {
    factory: TranscriptApiFactory,
}

impl TranscriptExtractor {
    pub fn new(factory: TranscriptApiFactory) -> Self {
        Self { factory }
    }

    /// Watch page caption tracks with the given request timeout
    pub fn youtube(timeout: Duration) -> Self {
        Self::new(Arc::new(move |proxy: &ProxyConfig| {
            YouTubeTranscriptApi::new(proxy, timeout)
                .map(|api| Box::new(api) as Box<dyn TranscriptApi>)
        }))
    }

    /// Direct fetch in the preferred language, then enumerate-and-select.
    /// `None` when the video has no usable transcript.
    pub fn extract(
        &self,
        video_id: &str,
        preferred_language: &str,
        max_length: i64,
        proxy: &ProxyConfig,
    ) -> Option<TranscriptResult> {
        debug!(
            "Extracting transcript for {} (language: {})",
            video_id, preferred_language
        );

        let api = match (self.factory)(proxy) {
            Ok(api) => api,
            Err(e) => {
                error!("Transcript extraction failed: {}", e);
                return None;
            }
        };

        let result = match fetch_direct(api.as_ref(), video_id, preferred_language) {
            Ok(result) => Some(result),
            Err(e) => {
                debug!("Direct extraction failed: {}", e);
                fetch_with_fallback(api.as_ref(), video_id, preferred_language)
            }
        };

        match result {
            Some(TranscriptResult { text, language }) => {
                let text = truncate_transcript(text, max_length);
                info!("Transcript extracted: {} chars in '{}'", text.chars().count(), language);
                Some(TranscriptResult { text, language })
            }
            None => {
                warn!("No transcript available for this video");
                None
            }
        }
    }
}

fn fetch_direct(
    api: &dyn TranscriptApi,
    video_id: &str,
    preferred_language: &str,
) -> Result<TranscriptResult, ProviderError> {
    let fetched = api.fetch(video_id, &[preferred_language])?;
    debug!(
        "Direct fetch returned {} transcript in: {}",
        if fetched.is_generated { "auto-generated" } else { "manually created" },
        fetched.language_code
    );
    Ok(TranscriptResult {
        text: format_transcript(&fetched.segments),
        language: preferred_language.to_string(),
    })
}

fn fetch_with_fallback(
    api: &dyn TranscriptApi,
    video_id: &str,
    preferred_language: &str,
) -> Option<TranscriptResult> {
    let tracks = match api.list(video_id) {
        Ok(tracks) => tracks,
        Err(e) => {
            warn!("Fallback transcript extraction failed: {}", e);
            return None;
        }
    };

    let available: Vec<&str> = tracks.iter().map(|t| t.language_code.as_str()).collect();
    debug!("Available transcript languages: {:?}", available);

    let Some(track) = select_track(&tracks, preferred_language) else {
        warn!("No transcript found for language {}", preferred_language);
        return None;
    };

    match api.fetch_track(track) {
        Ok(segments) => Some(TranscriptResult {
            text: format_transcript(&segments),
            language: track.language_code.clone(),
        }),
        Err(e) => {
            warn!("Fallback transcript extraction failed: {}", e);
            None
        }
    }
}

/// Pick the best track:
/// 1. manual in the preferred language
/// 2. auto-generated in the preferred language
/// 3. first manual in any language
/// 4. first auto-generated in any language
pub fn select_track<'a>(
    tracks: &'a [TranscriptTrack],
    preferred_language: &str,
) -> Option<&'a TranscriptTrack> {
    let preferred = |t: &&TranscriptTrack| t.language_code == preferred_language;

    let selected = tracks
        .iter()
        .filter(preferred)
        .find(|t| t.is_manual())
        .or_else(|| tracks.iter().filter(preferred).find(|t| t.is_generated))
        .or_else(|| tracks.iter().find(|t| t.is_manual()))
        .or_else(|| tracks.iter().find(|t| t.is_generated));

    if let Some(track) = selected {
        debug!(
            "Selected {} transcript in: {} ({})",
            if track.is_generated { "auto-generated" } else { "manually created" },
            track.language_code,
            track.language
        );
    }
    selected
}

/// One line per segment
pub fn format_transcript(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cut to `max_length` characters and append the marker; no-op when
/// `max_length <= 0` or the text already fits
pub fn truncate_transcript(text: String, max_length: i64) -> String {
    let Ok(limit) = usize::try_from(max_length) else {
        return text;
    };
    if limit == 0 {
        return text;
    }

    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use ytdoc_providers::FetchedTranscript;

    fn manual(lang: &str) -> TranscriptTrack {
        TranscriptTrack::new(lang, lang, false, format!("{}-manual", lang))
    }

    fn auto(lang: &str) -> TranscriptTrack {
        TranscriptTrack::new(lang, lang, true, format!("{}-auto", lang))
    }

    /// Serves `tracks`; each fetched track yields its source url as text
    pub(crate) struct FakeTranscriptApi {
        pub tracks: Option<Vec<TranscriptTrack>>,
        pub direct_fails: bool,
        pub calls: Arc<AtomicUsize>,
    }

    impl TranscriptApi for FakeTranscriptApi {
        fn list(&self, video_id: &str) -> Result<Vec<TranscriptTrack>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.tracks
                .clone()
                .ok_or_else(|| ProviderError::TranscriptsDisabled(video_id.to_string()))
        }

        fn fetch_track(
            &self,
            track: &TranscriptTrack,
        ) -> Result<Vec<TranscriptSegment>, ProviderError> {
            Ok(vec![TranscriptSegment {
                text: track.source_url().to_string(),
                start: 0.0,
                duration: 1.0,
            }])
        }

        fn fetch(
            &self,
            video_id: &str,
            languages: &[&str],
        ) -> Result<FetchedTranscript, ProviderError> {
            if self.direct_fails {
                return Err(ProviderError::NoTranscriptFound {
                    video_id: video_id.to_string(),
                    languages: languages.iter().map(|l| l.to_string()).collect(),
                });
            }
            let tracks = self.list(video_id)?;
            let track = tracks
                .iter()
                .find(|t| languages.contains(&t.language_code.as_str()))
                .ok_or_else(|| ProviderError::NoTranscriptFound {
                    video_id: video_id.to_string(),
                    languages: vec![],
                })?;
            Ok(FetchedTranscript {
                language_code: track.language_code.clone(),
                is_generated: track.is_generated,
                segments: self.fetch_track(track)?,
            })
        }
    }

    pub(crate) fn extractor_with(
        tracks: Option<Vec<TranscriptTrack>>,
        direct_fails: bool,
    ) -> (TranscriptExtractor, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let extractor = TranscriptExtractor::new(Arc::new(move |_proxy: &ProxyConfig| {
            Ok(Box::new(FakeTranscriptApi {
                tracks: tracks.clone(),
                direct_fails,
                calls: Arc::clone(&counter),
            }) as Box<dyn TranscriptApi>)
        }));
        (extractor, calls)
    }

    #[test]
    fn test_select_manual_preferred_over_auto_preferred() {
        let tracks = vec![auto("en"), manual("en"), manual("fr")];
        assert_eq!(select_track(&tracks, "en"), Some(&tracks[1]));
    }

    #[test]
    fn test_select_auto_preferred_over_manual_other_language() {
        let tracks = vec![manual("fr"), auto("en")];
        assert_eq!(select_track(&tracks, "en"), Some(&tracks[1]));
    }

    #[test]
    fn test_select_first_manual_any_language() {
        let tracks = vec![manual("fr"), auto("de")];
        assert_eq!(select_track(&tracks, "en"), Some(&tracks[0]));

        let tracks = vec![auto("de"), manual("ja"), manual("fr")];
        assert_eq!(select_track(&tracks, "en"), Some(&tracks[1]));
    }

    #[test]
    fn test_select_first_auto_any_language() {
        let tracks = vec![auto("de")];
        assert_eq!(select_track(&tracks, "en"), Some(&tracks[0]));
        assert_eq!(select_track(&[], "en"), None);
    }

    #[test]
    fn test_truncation_appends_marker() {
        let text = "abcdefghij".to_string();
        let truncated = truncate_transcript(text.clone(), 4);
        assert_eq!(truncated, format!("abcd{}", TRUNCATION_MARKER));
        assert_eq!(
            truncated.chars().count(),
            4 + TRUNCATION_MARKER.chars().count()
        );
        assert!(truncated.starts_with(&text[..4]));
    }

    #[test]
    fn test_truncation_counts_characters() {
        let truncated = truncate_transcript("héllo wörld".to_string(), 5);
        assert_eq!(truncated, format!("héllo{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncation_noop() {
        assert_eq!(truncate_transcript("abcd".into(), 4), "abcd");
        assert_eq!(truncate_transcript("abcd".into(), 100), "abcd");
        assert_eq!(truncate_transcript("abcd".into(), 0), "abcd");
        assert_eq!(truncate_transcript("abcd".into(), -5), "abcd");
    }

    #[test]
    fn test_format_transcript_joins_lines() {
        let segments = vec![
            TranscriptSegment { text: "one".into(), start: 0.0, duration: 1.0 },
            TranscriptSegment { text: "two".into(), start: 1.0, duration: 1.0 },
        ];
        assert_eq!(format_transcript(&segments), "one\ntwo");
        assert_eq!(format_transcript(&[]), "");
    }

    #[test]
    fn test_direct_phase_reports_preferred_language() {
        let (extractor, _) = extractor_with(Some(vec![auto("en"), manual("fr")]), false);
        let result = extractor.extract("vid", "en", 0, &ProxyConfig::None).unwrap();
        assert_eq!(result.language, "en");
        assert_eq!(result.text, "en-auto");
    }

    #[test]
    fn test_fallback_phase_reports_track_language() {
        let (extractor, _) = extractor_with(Some(vec![auto("de"), manual("fr")]), true);
        let result = extractor.extract("vid", "en", 0, &ProxyConfig::None).unwrap();
        assert_eq!(result.language, "fr");
        assert_eq!(result.text, "fr-manual");
    }

    #[test]
    fn test_fallback_result_is_truncated() {
        let (extractor, _) = extractor_with(Some(vec![manual("fr")]), true);
        let result = extractor.extract("vid", "en", 3, &ProxyConfig::None).unwrap();
        assert_eq!(result.text, format!("fr-{}", TRUNCATION_MARKER));
    }

    #[test]
    fn test_no_tracks_is_none() {
        let (extractor, _) = extractor_with(Some(vec![]), true);
        assert_eq!(extractor.extract("vid", "en", 0, &ProxyConfig::None), None);
    }

    #[test]
    fn test_disabled_transcripts_is_none() {
        let (extractor, calls) = extractor_with(None, false);
        assert_eq!(extractor.extract("vid", "en", 0, &ProxyConfig::None), None);
        // direct fetch lists once, fallback lists again
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_client_construction_failure_is_none() {
        let extractor = TranscriptExtractor::new(Arc::new(|_proxy: &ProxyConfig| {
            Err(ProviderError::InvalidProxy("bad".into()))
        }));
        assert_eq!(extractor.extract("vid", "en", 0, &ProxyConfig::None), None);
    }
}
