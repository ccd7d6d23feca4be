use async_trait::async_trait;
use axum::response::IntoResponse;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use postgen::{
    AudioArtifact, CaptionSource, Config, Error, GenerationBackend, MediaDownloader, PostGenerator,
    ResponseSegmenter, Transcriber, Transcript, TranscriptOrigin, TranscriptPipeline,
    VideoReference,
};

struct StaticCaptions(Option<&'static str>);

#[async_trait]
impl CaptionSource for StaticCaptions {
    async fn fetch(&self, _video_id: &str) -> Option<Transcript> {
        self.0
            .map(|text| Transcript::new(text, TranscriptOrigin::Caption))
    }
}

struct CountingDownloader {
    dir: tempfile::TempDir,
    calls: AtomicUsize,
}

impl CountingDownloader {
    fn new() -> Self {
        Self {
            dir: tempfile::TempDir::new().unwrap(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MediaDownloader for CountingDownloader {
    async fn acquire(&self, video_id: &str) -> postgen::Result<AudioArtifact> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let path = self.dir.path().join(format!("{}.m4a", video_id));
        tokio::fs::write(&path, b"audio").await.unwrap();
        Ok(AudioArtifact {
            path,
            video_id: video_id.to_string(),
        })
    }
}

struct StaticTranscriber(&'static str);

#[async_trait]
impl Transcriber for StaticTranscriber {
    async fn transcribe(&self, _artifact: &AudioArtifact) -> postgen::Result<Transcript> {
        Ok(Transcript::new(self.0, TranscriptOrigin::Transcribed))
    }
}

struct StaticBackend(&'static str);

#[async_trait]
impl GenerationBackend for StaticBackend {
    async fn generate(&self, _prompt: &str) -> postgen::Result<String> {
        Ok(self.0.to_string())
    }
}

#[test]
fn test_video_id_extraction_scenarios() {
    let watch = VideoReference::parse("https://www.youtube.com/watch?v=abc123&t=10s").unwrap();
    assert_eq!(watch.id, "abc123");

    let short = VideoReference::parse("https://youtu.be/abc123?si=xyz").unwrap();
    assert_eq!(short.id, "abc123");

    assert!(VideoReference::parse("https://www.dailymotion.com/video/x123").is_err());
}

#[tokio::test]
async fn test_caption_transcript_prevents_any_download() {
    let downloader = Arc::new(CountingDownloader::new());
    let pipeline = TranscriptPipeline::new(
        Arc::new(StaticCaptions(Some("already captioned"))),
        downloader.clone(),
        Arc::new(StaticTranscriber("unused")),
    );

    let video = VideoReference::parse("https://youtu.be/abc123").unwrap();
    let transcript = pipeline.resolve(&video).await.unwrap();

    assert_eq!(transcript.origin, TranscriptOrigin::Caption);
    assert_eq!(downloader.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_audio_fallback_cleans_up_artifact() {
    let downloader = Arc::new(CountingDownloader::new());
    let pipeline = TranscriptPipeline::new(
        Arc::new(StaticCaptions(None)),
        downloader.clone(),
        Arc::new(StaticTranscriber("spoken content")),
    );

    let video = VideoReference::parse("https://youtu.be/abc123").unwrap();
    let transcript = pipeline.resolve(&video).await.unwrap();

    assert_eq!(transcript.text, "spoken content");
    assert_eq!(downloader.calls.load(Ordering::SeqCst), 1);
    assert!(!downloader.dir.path().join("abc123.m4a").exists());
}

#[tokio::test]
async fn test_whitespace_everywhere_is_no_transcript() {
    let pipeline = TranscriptPipeline::new(
        Arc::new(StaticCaptions(Some("  \n "))),
        Arc::new(CountingDownloader::new()),
        Arc::new(StaticTranscriber("\t  ")),
    );

    let video = VideoReference::parse("https://youtu.be/abc123").unwrap();
    let result = pipeline.resolve(&video).await;

    assert!(matches!(result, Err(Error::NoTranscript(_))));
}

#[tokio::test]
async fn test_full_generation_flow_over_public_api() {
    let pipeline = TranscriptPipeline::new(
        Arc::new(StaticCaptions(Some("a talk about rust"))),
        Arc::new(CountingDownloader::new()),
        Arc::new(StaticTranscriber("unused")),
    );
    let generator = PostGenerator::new(Arc::new(StaticBackend(
        "**LinkedIn Post**\nHello LI\n**Instagram Post**\nHello IG\n**Twitter Post**\nHello TW",
    )));

    let video = VideoReference::parse("https://www.youtube.com/watch?v=abc123").unwrap();
    let transcript = pipeline.resolve(&video).await.unwrap();
    let bundle = generator.generate_posts(&transcript).await.unwrap();

    assert_eq!(bundle.linkedin, "Hello LI");
    assert_eq!(bundle.instagram, "Hello IG");
    assert_eq!(bundle.twitter, "Hello TW");
}

#[test]
fn test_segmenter_round_trip_scenarios() {
    let segmenter = ResponseSegmenter::new();

    let bundle = segmenter.segment(
        "**LinkedIn Post**\nHello LI\n**Instagram Post**\nHello IG\n**Twitter Post**\nHello TW",
    );
    assert_eq!(bundle.linkedin, "Hello LI");
    assert_eq!(bundle.instagram, "Hello IG");
    assert_eq!(bundle.twitter, "Hello TW");

    let partial = segmenter.segment("**Twitter Post**\nOnly this");
    assert_eq!(partial.linkedin, "");
    assert_eq!(partial.instagram, "");
    assert_eq!(partial.twitter, "Only this");
}

#[test]
fn test_error_statuses_at_the_http_boundary() {
    let bad_request = Error::NoTranscript("abc123".to_string()).into_response();
    assert_eq!(bad_request.status(), axum::http::StatusCode::BAD_REQUEST);

    let invalid = Error::InvalidUrl("nope".to_string()).into_response();
    assert_eq!(invalid.status(), axum::http::StatusCode::BAD_REQUEST);

    let bad_gateway = Error::GenerationBackend(anyhow::anyhow!("HTTP 500")).into_response();
    assert_eq!(bad_gateway.status(), axum::http::StatusCode::BAD_GATEWAY);
}

#[test]
fn test_config_requires_generation_backend() {
    let unset = Config::default();
    assert!(unset.validate().is_err());

    let mut set = Config::default();
    set.generation.base_url = "http://localhost:11434".to_string();
    set.generation.model = "llama3".to_string();
    assert!(set.validate().is_ok());
}
