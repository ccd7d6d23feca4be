//! Ollama generation client.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::Error;
use super::GenerationBackend;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for an Ollama-compatible `/api/generate` endpoint.
pub struct OllamaClient {
    config: GenerationConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(config: GenerationConfig) -> Result<Self> {
        // Generation is slow and synchronous; the whole call gets one
        // bounded timeout and no retries.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl GenerationBackend for OllamaClient {
    async fn generate(&self, prompt: &str) -> crate::error::Result<String> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        debug!(
            "Sending generation request to {} (model {}, prompt {} chars)",
            self.endpoint(),
            self.config.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::GenerationBackend(anyhow!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::GenerationBackend(anyhow!(
                "backend returned {}: {}",
                status,
                body.trim()
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::GenerationBackend(anyhow!("invalid response body: {}", e)))?;

        debug!("Generation response received ({} chars)", generated.response.len());
        Ok(generated.response)
    }
}
