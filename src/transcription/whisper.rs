//! Local speech transcription via a whisper subprocess backend.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::audio::AudioArtifact;
use crate::config::TranscriptionConfig;
use crate::error::Error;
use crate::pipeline::{Transcriber, Transcript, TranscriptOrigin};

/// Which whisper implementation was found on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
enum WhisperBackend {
    /// whisper.cpp family (whisper-cli or whisper-cpp)
    Cpp { command: &'static str },
    /// Python OpenAI whisper
    Python,
}

/// Shared transcription engine.
///
/// Initialized once at process start and shared across requests behind an
/// `Arc`; backend and model resolution happen at initialization so a missing
/// installation fails the process early instead of the first request. Runs
/// are serialized through an internal lock: the engine is sized for
/// low-resource hosts and stacking whisper processes defeats that.
pub struct WhisperTranscriber {
    config: TranscriptionConfig,
    backend: WhisperBackend,
    model_path: Option<PathBuf>,
    run_lock: Mutex<()>,
}

impl WhisperTranscriber {
    /// Resolve a whisper backend and model reference. Called once at startup.
    pub async fn initialize(config: TranscriptionConfig) -> Result<Self> {
        let backend = Self::detect_backend().await?;
        let model_path = match backend {
            WhisperBackend::Cpp { .. } => Self::resolve_model_path(&config),
            WhisperBackend::Python => None,
        };

        info!(
            "Whisper engine ready: {:?}, model {} ({})",
            backend,
            config.model,
            model_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "backend default location".to_string()),
        );

        Ok(Self {
            config,
            backend,
            model_path,
            run_lock: Mutex::new(()),
        })
    }

    async fn detect_backend() -> Result<WhisperBackend> {
        let cpp_commands = ["whisper-cli", "whisper-cpp"];

        for command in cpp_commands {
            if Self::check_command_available(command).await {
                debug!("Found whisper backend: {}", command);
                return Ok(WhisperBackend::Cpp { command });
            }
        }

        if Self::check_command_available("whisper").await {
            debug!("Found whisper backend: whisper (Python)");
            return Ok(WhisperBackend::Python);
        }

        Err(anyhow!(
            "No whisper backend found. Install whisper.cpp (whisper-cli) or openai-whisper"
        ))
    }

    async fn check_command_available(command: &str) -> bool {
        Command::new(command)
            .arg("--help")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    /// Explicit model path wins; otherwise probe the conventional ggml
    /// location relative to the working directory.
    fn resolve_model_path(config: &TranscriptionConfig) -> Option<PathBuf> {
        if let Some(path) = &config.model_path {
            if path.exists() {
                return Some(path.clone());
            }
            warn!(
                "Configured model path {} does not exist, probing defaults",
                path.display()
            );
        }

        let conventional = PathBuf::from(format!("models/ggml-{}.bin", config.model));
        if conventional.exists() {
            return Some(conventional);
        }

        None
    }

    fn build_command(&self, audio_path: &Path, output_dir: &Path) -> Command {
        match &self.backend {
            WhisperBackend::Cpp { command } => {
                let mut cmd = Command::new(command);
                cmd.arg("-f")
                    .arg(audio_path)
                    .arg("-oj")
                    .arg("-of")
                    .arg(output_dir.join("transcript"))
                    .arg("-t")
                    .arg(self.config.threads.to_string())
                    .arg("-l")
                    .arg(&self.config.language);

                if let Some(model_path) = &self.model_path {
                    cmd.arg("-m").arg(model_path);
                }

                cmd
            }
            WhisperBackend::Python => {
                let mut cmd = Command::new("whisper");
                cmd.arg(audio_path)
                    .arg("--model")
                    .arg(&self.config.model)
                    .arg("--output_dir")
                    .arg(output_dir)
                    .arg("--output_format")
                    .arg("json")
                    .arg("--language")
                    .arg(&self.config.language)
                    .arg("--fp16")
                    .arg("False")
                    .arg("--verbose")
                    .arg("False");

                cmd
            }
        }
    }

    async fn run_backend(&self, audio_path: &Path, output_dir: &Path) -> Result<String> {
        let mut cmd = self.build_command(audio_path, output_dir);
        debug!("Running whisper command: {:?}", cmd);

        let output = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_seconds),
            cmd.output(),
        )
        .await
        .map_err(|_| {
            anyhow!(
                "whisper timed out after {} seconds on {}",
                self.config.timeout_seconds,
                audio_path.display()
            )
        })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "whisper exited with {}: {}",
                output.status,
                stderr.trim()
            ));
        }

        let json_path = find_json_output(output_dir).await?;
        let json = tokio::fs::read_to_string(&json_path).await?;
        let parsed: WhisperOutput = serde_json::from_str(&json)
            .map_err(|e| anyhow!("failed to parse whisper JSON output: {}", e))?;

        Ok(parsed.into_text())
    }
}

#[async_trait::async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, artifact: &AudioArtifact) -> crate::error::Result<Transcript> {
        // One transcription at a time, process-wide.
        let _guard = self.run_lock.lock().await;

        let workspace = tempfile::TempDir::new()
            .map_err(|e| Error::Internal(anyhow!("cannot create whisper workspace: {}", e)))?;

        info!(
            "Transcribing {} (model {}, language {})",
            artifact.path.display(),
            self.config.model,
            self.config.language
        );
        let started = std::time::Instant::now();

        let text = self
            .run_backend(&artifact.path, workspace.path())
            .await
            .map_err(Error::Internal)?;

        info!(
            "Transcribed {} in {:.1}s ({} chars)",
            artifact.video_id,
            started.elapsed().as_secs_f64(),
            text.len()
        );

        Ok(Transcript::new(text, TranscriptOrigin::Transcribed))
    }
}

async fn find_json_output(dir: &Path) -> Result<PathBuf> {
    let mut entries = tokio::fs::read_dir(dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map_or(false, |ext| ext == "json") {
            return Ok(path);
        }
    }

    Err(anyhow!("no whisper JSON output in {}", dir.display()))
}

/// Whisper JSON output. whisper.cpp emits a `transcription` array; the
/// Python implementation emits `segments` plus a flat `text` field.
#[derive(Debug, Deserialize)]
struct WhisperOutput {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    segments: Vec<WhisperSegment>,
    #[serde(default)]
    transcription: Vec<CppSegment>,
}

#[derive(Debug, Deserialize)]
struct WhisperSegment {
    text: String,
}

#[derive(Debug, Deserialize)]
struct CppSegment {
    text: String,
}

impl WhisperOutput {
    /// Join per-segment text with single spaces, in emitted (chronological)
    /// order. The flat `text` field is only a fallback for outputs without
    /// segments.
    fn into_text(self) -> String {
        let segments: Vec<String> = if !self.transcription.is_empty() {
            self.transcription.into_iter().map(|s| s.text).collect()
        } else if !self.segments.is_empty() {
            self.segments.into_iter().map(|s| s.text).collect()
        } else {
            return self.text.unwrap_or_default().trim().to_string();
        };

        segments
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
