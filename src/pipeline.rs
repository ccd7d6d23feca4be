//! Transcript resolution: captions first, local transcription as fallback.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::audio::AudioArtifact;
use crate::error::{Error, Result};
use crate::video::VideoReference;

/// Where a transcript came from. Carried for diagnostics and logging only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TranscriptOrigin {
    Caption,
    Transcribed,
}

/// Plain transcript text plus its origin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub origin: TranscriptOrigin,
}

impl Transcript {
    pub fn new(text: impl Into<String>, origin: TranscriptOrigin) -> Self {
        Self {
            text: text.into(),
            origin,
        }
    }

    /// Whitespace-only text counts as absent, not as a degenerate success.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Existing caption transcripts for a video.
///
/// Absence is a normal outcome here, not an error: any failure mode
/// (no captions, network trouble, unknown video) collapses into `None` so the
/// fallback decision is an ordinary branch.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Option<Transcript>;
}

/// Materializes an audio file for a video id.
#[async_trait]
pub trait MediaDownloader: Send + Sync {
    async fn acquire(&self, video_id: &str) -> Result<AudioArtifact>;
}

/// Converts an audio artifact into transcript text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, artifact: &AudioArtifact) -> Result<Transcript>;
}

/// Orchestrates caption fetch, audio download, transcription and cleanup.
///
/// Captions are strictly preferred: they are free and instantaneous, so the
/// audio path never runs when a usable caption transcript exists.
pub struct TranscriptPipeline {
    captions: Arc<dyn CaptionSource>,
    downloader: Arc<dyn MediaDownloader>,
    transcriber: Arc<dyn Transcriber>,
}

impl TranscriptPipeline {
    pub fn new(
        captions: Arc<dyn CaptionSource>,
        downloader: Arc<dyn MediaDownloader>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        Self {
            captions,
            downloader,
            transcriber,
        }
    }

    /// Resolve a transcript for the video, or fail with
    /// [`Error::NoTranscript`] once both paths are exhausted.
    pub async fn resolve(&self, video: &VideoReference) -> Result<Transcript> {
        if let Some(transcript) = self.captions.fetch(&video.id).await {
            if !transcript.is_blank() {
                info!(
                    "Resolved transcript for {} from captions ({} chars)",
                    video.id,
                    transcript.text.len()
                );
                return Ok(transcript);
            }
            debug!("Caption transcript for {} is blank, falling back", video.id);
        }

        let artifact = self.downloader.acquire(&video.id).await?;
        let transcribed = self.transcriber.transcribe(&artifact).await;

        // The artifact is spent regardless of how transcription went; delete
        // exactly once before inspecting the result.
        artifact.discard().await;

        let transcript = transcribed?;
        if transcript.is_blank() {
            return Err(Error::NoTranscript(video.id.clone()));
        }

        info!(
            "Resolved transcript for {} from audio ({} chars)",
            video.id,
            transcript.text.len()
        );
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FakeCaptions {
        transcript: Option<Transcript>,
        calls: AtomicUsize,
    }

    impl FakeCaptions {
        fn returning(text: Option<&str>) -> Self {
            Self {
                transcript: text.map(|t| Transcript::new(t, TranscriptOrigin::Caption)),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CaptionSource for FakeCaptions {
        async fn fetch(&self, _video_id: &str) -> Option<Transcript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.transcript.clone()
        }
    }

    struct FakeDownloader {
        dir: TempDir,
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeDownloader {
        fn new() -> Self {
            Self {
                dir: TempDir::new().unwrap(),
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        fn artifact_path(&self, video_id: &str) -> std::path::PathBuf {
            self.dir.path().join(format!("{}.m4a", video_id))
        }
    }

    #[async_trait]
    impl MediaDownloader for FakeDownloader {
        async fn acquire(&self, video_id: &str) -> Result<AudioArtifact> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(Error::Acquisition(anyhow::anyhow!("download refused")));
            }
            let path = self.artifact_path(video_id);
            tokio::fs::write(&path, b"fake audio").await.unwrap();
            Ok(AudioArtifact {
                path,
                video_id: video_id.to_string(),
            })
        }
    }

    struct FakeTranscriber {
        text: Option<String>,
        calls: AtomicUsize,
    }

    impl FakeTranscriber {
        fn returning(text: &str) -> Self {
            Self {
                text: Some(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                text: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Transcriber for FakeTranscriber {
        async fn transcribe(&self, _artifact: &AudioArtifact) -> Result<Transcript> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.text {
                Some(text) => Ok(Transcript::new(text.clone(), TranscriptOrigin::Transcribed)),
                None => Err(Error::Internal(anyhow::anyhow!("whisper exploded"))),
            }
        }
    }

    fn video() -> VideoReference {
        VideoReference::parse("https://youtu.be/abc123").unwrap()
    }

    fn pipeline(
        captions: Arc<FakeCaptions>,
        downloader: Arc<FakeDownloader>,
        transcriber: Arc<FakeTranscriber>,
    ) -> TranscriptPipeline {
        TranscriptPipeline::new(captions, downloader, transcriber)
    }

    #[tokio::test]
    async fn test_caption_hit_skips_audio_path_entirely() {
        let captions = Arc::new(FakeCaptions::returning(Some("caption text")));
        let downloader = Arc::new(FakeDownloader::new());
        let transcriber = Arc::new(FakeTranscriber::returning("unused"));

        let result = pipeline(captions.clone(), downloader.clone(), transcriber.clone())
            .resolve(&video())
            .await
            .unwrap();

        assert_eq!(result.text, "caption text");
        assert_eq!(result.origin, TranscriptOrigin::Caption);
        assert_eq!(downloader.calls.load(Ordering::SeqCst), 0);
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_captions_fall_back_to_transcription() {
        let captions = Arc::new(FakeCaptions::returning(None));
        let downloader = Arc::new(FakeDownloader::new());
        let transcriber = Arc::new(FakeTranscriber::returning("spoken words"));

        let result = pipeline(captions, downloader.clone(), transcriber.clone())
            .resolve(&video())
            .await
            .unwrap();

        assert_eq!(result.text, "spoken words");
        assert_eq!(result.origin, TranscriptOrigin::Transcribed);
        assert_eq!(downloader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_artifact_removed_after_successful_transcription() {
        let captions = Arc::new(FakeCaptions::returning(None));
        let downloader = Arc::new(FakeDownloader::new());
        let transcriber = Arc::new(FakeTranscriber::returning("spoken words"));
        let artifact_path = downloader.artifact_path("abc123");

        pipeline(captions, downloader.clone(), transcriber)
            .resolve(&video())
            .await
            .unwrap();

        assert!(!artifact_path.exists());
    }

    #[tokio::test]
    async fn test_artifact_removed_even_when_transcription_fails() {
        let captions = Arc::new(FakeCaptions::returning(None));
        let downloader = Arc::new(FakeDownloader::new());
        let transcriber = Arc::new(FakeTranscriber::failing());
        let artifact_path = downloader.artifact_path("abc123");

        let result = pipeline(captions, downloader.clone(), transcriber)
            .resolve(&video())
            .await;

        assert!(result.is_err());
        assert!(!artifact_path.exists());
    }

    #[tokio::test]
    async fn test_blank_caption_is_not_a_success() {
        let captions = Arc::new(FakeCaptions::returning(Some("   \n\t ")));
        let downloader = Arc::new(FakeDownloader::new());
        let transcriber = Arc::new(FakeTranscriber::returning("from audio"));

        let result = pipeline(captions, downloader.clone(), transcriber)
            .resolve(&video())
            .await
            .unwrap();

        assert_eq!(result.origin, TranscriptOrigin::Transcribed);
        assert_eq!(downloader.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_both_paths_blank_is_no_transcript() {
        let captions = Arc::new(FakeCaptions::returning(Some("  ")));
        let downloader = Arc::new(FakeDownloader::new());
        let transcriber = Arc::new(FakeTranscriber::returning("   \n"));

        let result = pipeline(captions, downloader, transcriber)
            .resolve(&video())
            .await;

        assert!(matches!(result, Err(Error::NoTranscript(id)) if id == "abc123"));
    }

    #[tokio::test]
    async fn test_download_failure_propagates() {
        let captions = Arc::new(FakeCaptions::returning(None));
        let downloader = Arc::new(FakeDownloader::failing());
        let transcriber = Arc::new(FakeTranscriber::returning("unused"));

        let result = pipeline(captions, downloader, transcriber.clone())
            .resolve(&video())
            .await;

        assert!(matches!(result, Err(Error::Acquisition(_))));
        assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
    }
}
