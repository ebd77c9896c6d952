//! Transcript tracks and the transcript service interface

use crate::ProviderError;
use serde::Serialize;

/// One selectable transcript option for a video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptTrack {
    /// ISO 639-1 code, e.g. `en`
    pub language_code: String,
    /// Human readable language name
    pub language: String,
    /// Auto-generated (speech recognition) rather than manually created
    pub is_generated: bool,
    source_url: String,
}

impl TranscriptTrack {
    pub fn new(
        language_code: impl Into<String>,
        language: impl Into<String>,
        is_generated: bool,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            language_code: language_code.into(),
            language: language.into(),
            is_generated,
            source_url: source_url.into(),
        }
    }

    /// Where the timed text is fetched from; nothing is downloaded until asked
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn is_manual(&self) -> bool {
        !self.is_generated
    }
}

/// A single timed caption line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSegment {
    pub text: String,
    /// Offset from the start of the video in seconds
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone)]
pub struct FetchedTranscript {
    pub language_code: String,
    pub is_generated: bool,
    pub segments: Vec<TranscriptSegment>,
}

/// Blocking access to a transcript service.
///
/// Implementations are built per extraction with the resolved proxy.
pub trait TranscriptApi: Send + Sync {
    /// Enumerate every available track, in service order
    fn list(&self, video_id: &str) -> Result<Vec<TranscriptTrack>, ProviderError>;

    /// Download the timed segments of one track
    fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>, ProviderError>;

    /// Fetch the first track matching `languages` in order, manual before generated
    fn fetch(
        &self,
        video_id: &str,
        languages: &[&str],
    ) -> Result<FetchedTranscript, ProviderError> {
        let tracks = self.list(video_id)?;

        let track = languages
            .iter()
            .find_map(|lang| {
                tracks
                    .iter()
                    .find(|t| t.is_manual() && t.language_code == *lang)
                    .or_else(|| {
                        tracks
                            .iter()
                            .find(|t| t.is_generated && t.language_code == *lang)
                    })
            })
            .ok_or_else(|| ProviderError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.iter().map(|l| l.to_string()).collect(),
            })?;

        Ok(FetchedTranscript {
            language_code: track.language_code.clone(),
            is_generated: track.is_generated,
            segments: self.fetch_track(track)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticApi(Vec<TranscriptTrack>);

    impl TranscriptApi for StaticApi {
        fn list(&self, _video_id: &str) -> Result<Vec<TranscriptTrack>, ProviderError> {
            Ok(self.0.clone())
        }

        fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptSegment>, ProviderError> {
            Ok(vec![TranscriptSegment {
                text: track.source_url().to_string(),
                start: 0.0,
                duration: 1.0,
            }])
        }
    }

    #[test]
    fn test_fetch_prefers_manual_track() {
        let api = StaticApi(vec![
            TranscriptTrack::new("en", "English (auto-generated)", true, "en-auto"),
            TranscriptTrack::new("en", "English", false, "en-manual"),
        ]);
        let fetched = api.fetch("vid", &["en"]).unwrap();
        assert_eq!(fetched.language_code, "en");
        assert!(!fetched.is_generated);
        assert_eq!(fetched.segments[0].text, "en-manual");
    }

    #[test]
    fn test_fetch_falls_back_to_generated_track() {
        let api = StaticApi(vec![TranscriptTrack::new("en", "English", true, "en-auto")]);
        let fetched = api.fetch("vid", &["en"]).unwrap();
        assert!(fetched.is_generated);
    }

    #[test]
    fn test_fetch_missing_language() {
        let api = StaticApi(vec![TranscriptTrack::new("de", "German", false, "de")]);
        assert!(matches!(
            api.fetch("vid", &["en"]),
            Err(ProviderError::NoTranscriptFound { .. })
        ));
    }
}
