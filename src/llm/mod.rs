//! Text generation backend.

pub mod ollama;

pub use ollama::OllamaClient;

use async_trait::async_trait;

use crate::error::Result;

/// A text-generation capability: one prompt in, one raw text blob out.
///
/// Transport failures and non-success statuses surface as
/// [`crate::error::Error::GenerationBackend`]; no retries happen at this
/// layer.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}
