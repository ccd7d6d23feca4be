/// postgen
///
/// Turns a YouTube video into ready-to-publish social media posts: resolves a
/// transcript (captions first, local whisper transcription as fallback),
/// prompts a text-generation backend once and splits the response into
/// LinkedIn, Instagram and Twitter post bodies.

pub mod api;
pub mod audio;
pub mod captions;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod posts;
pub mod transcription;
pub mod video;

// Re-export main types for easy access
pub use crate::api::{ApiServer, AppState};
pub use crate::audio::{AudioAcquirer, AudioArtifact};
pub use crate::captions::CaptionFetcher;
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::llm::{GenerationBackend, OllamaClient};
pub use crate::pipeline::{
    CaptionSource, MediaDownloader, Transcriber, Transcript, TranscriptOrigin, TranscriptPipeline,
};
pub use crate::posts::{Platform, PostBundle, PostGenerator, ResponseSegmenter};
pub use crate::transcription::WhisperTranscriber;
pub use crate::video::VideoReference;
