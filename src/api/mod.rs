//! HTTP API for the post generator.

use anyhow::Result;
use std::sync::Arc;

use crate::audio::AudioAcquirer;
use crate::captions::CaptionFetcher;
use crate::config::Config;
use crate::llm::OllamaClient;
use crate::pipeline::TranscriptPipeline;
use crate::posts::PostGenerator;
use crate::transcription::WhisperTranscriber;

pub mod handlers;
pub mod models;
pub mod server;

/// Shared application state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TranscriptPipeline>,
    pub generator: Arc<PostGenerator>,
}

impl AppState {
    /// Wire the production collaborators. The whisper engine initializes
    /// here, once, so an unusable host fails at startup rather than on the
    /// first captionless request.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let captions = Arc::new(CaptionFetcher::new(config.captions.clone())?);
        let downloader = Arc::new(AudioAcquirer::new(config.audio.clone()));
        let transcriber = Arc::new(WhisperTranscriber::initialize(config.transcription.clone()).await?);

        let pipeline = Arc::new(TranscriptPipeline::new(captions, downloader, transcriber));
        let backend = Arc::new(OllamaClient::new(config.generation.clone())?);
        let generator = Arc::new(PostGenerator::new(backend));

        Ok(Self {
            pipeline,
            generator,
        })
    }
}

/// API server wrapper owning the listen port and shared state.
pub struct ApiServer {
    state: AppState,
    port: u16,
}

impl ApiServer {
    pub fn new(state: AppState, port: u16) -> Self {
        Self { state, port }
    }

    /// Serve until the process is stopped.
    pub async fn start(self) -> Result<()> {
        server::start_http_server(self.state, self.port).await
    }
}
