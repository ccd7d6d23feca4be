use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the post generator service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Caption transcript retrieval settings
    pub captions: CaptionConfig,

    /// Audio download and caching settings
    pub audio: AudioConfig,

    /// Local transcription settings
    pub transcription: TranscriptionConfig,

    /// Generation backend settings
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the API listens on
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    /// Caption languages to try, in preference order
    pub languages: Vec<String>,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory holding one cached audio file per video id
    pub cache_dir: PathBuf,

    /// Concurrent fragment downloads passed to yt-dlp
    pub concurrent_fragments: usize,

    /// Download timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Whisper model name (tiny keeps the footprint small)
    pub model: String,

    /// Optional explicit path to a ggml model file for whisper.cpp backends
    pub model_path: Option<PathBuf>,

    /// Fixed language hint, no auto-detection
    pub language: String,

    /// Transcription timeout in seconds
    pub timeout_seconds: u64,

    /// Threads handed to the whisper backend
    pub threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Base URL of the Ollama-compatible backend, e.g. http://localhost:11434
    pub base_url: String,

    /// Model identifier to generate with
    pub model: String,

    /// Request timeout in seconds; generation is slow and synchronous
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { port: 8000 }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            languages: vec!["pt".to_string(), "en".to_string()],
            timeout_seconds: 15,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("downloads"),
            concurrent_fragments: 4.min(num_cpus::get()),
            timeout_seconds: 300,
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: "tiny".to_string(),
            model_path: None,
            language: "pt".to_string(),
            timeout_seconds: 600,
            threads: 4.min(num_cpus::get()),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            model: String::new(),
            timeout_seconds: 120,
        }
    }
}

impl Config {
    /// Load configuration: optional TOML file first, then environment
    /// overrides on top.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::from_default_locations(),
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path, e))?;
        let config = toml::from_str(&config_str)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path, e))?;
        tracing::info!("Loaded configuration from: {}", path);
        Ok(config)
    }

    fn from_default_locations() -> Self {
        let config_paths = ["postgen.toml", "config/postgen.toml"];

        for path in &config_paths {
            if let Ok(config_str) = std::fs::read_to_string(path) {
                match toml::from_str(&config_str) {
                    Ok(config) => {
                        tracing::info!("Loaded configuration from: {}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config file {}: {}", path, e);
                    }
                }
            }
        }

        Self::default()
    }

    /// Environment variables win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("OLLAMA_BASE_URL") {
            self.generation.base_url = base_url;
        }

        if let Ok(model) = std::env::var("OLLAMA_MODEL") {
            self.generation.model = model;
        }

        if let Ok(port) = std::env::var("POSTGEN_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }

        if let Ok(cache_dir) = std::env::var("POSTGEN_CACHE_DIR") {
            self.audio.cache_dir = PathBuf::from(cache_dir);
        }

        if let Ok(model) = std::env::var("POSTGEN_WHISPER_MODEL") {
            self.transcription.model = model;
        }

        if let Ok(languages) = std::env::var("POSTGEN_CAPTION_LANGUAGES") {
            let languages: Vec<String> = languages
                .split(',')
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty())
                .collect();
            if !languages.is_empty() {
                self.captions.languages = languages;
            }
        }
    }

    /// Validate configuration. The generation backend settings have no usable
    /// defaults; the process must not come up without them.
    pub fn validate(&self) -> Result<()> {
        if self.generation.base_url.is_empty() {
            return Err(anyhow!(
                "generation backend base URL is not set (generation.base_url or OLLAMA_BASE_URL)"
            ));
        }

        if self.generation.model.is_empty() {
            return Err(anyhow!(
                "generation model is not set (generation.model or OLLAMA_MODEL)"
            ));
        }

        if self.captions.languages.is_empty() {
            return Err(anyhow!("caption language preference list is empty"));
        }

        if self.audio.concurrent_fragments == 0 {
            return Err(anyhow!("concurrent_fragments must be greater than 0"));
        }

        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "postgen configuration:\n\
            - Port: {}\n\
            - Caption languages: {}\n\
            - Audio cache: {}\n\
            - Whisper model: {} (language: {})\n\
            - Generation backend: {} (model: {})",
            self.server.port,
            self.captions.languages.join(", "),
            self.audio.cache_dir.display(),
            self.transcription.model,
            self.transcription.language,
            self.generation.base_url,
            self.generation.model,
        )
    }
}
