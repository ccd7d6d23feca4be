//! Audio acquisition via yt-dlp.

use anyhow::anyhow;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AudioConfig;
use crate::error::{Error, Result};
use crate::pipeline::MediaDownloader;

/// A locally materialized audio file for one video.
///
/// The acquirer owns the file until it is handed to the transcriber; the
/// pipeline destroys it afterwards via [`AudioArtifact::discard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub path: PathBuf,
    pub video_id: String,
}

impl AudioArtifact {
    /// Delete the underlying file, best effort. The artifact is a disposable
    /// cache entry; a failed delete is logged and swallowed so it can never
    /// mask the transcription outcome.
    pub async fn discard(self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!("Removed audio artifact: {}", self.path.display()),
            Err(e) => warn!(
                "Failed to remove audio artifact {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Downloads best-available audio for a video through yt-dlp.
#[derive(Debug, Clone)]
pub struct AudioAcquirer {
    config: AudioConfig,
    yt_dlp: String,
}

impl AudioAcquirer {
    pub fn new(config: AudioConfig) -> Self {
        Self {
            config,
            yt_dlp: "yt-dlp".to_string(),
        }
    }

    /// Deterministic artifact path for a video id. One cache entry per id;
    /// the directory persists across requests, the files do not.
    pub fn artifact_path(&self, video_id: &str) -> PathBuf {
        self.config.cache_dir.join(format!("{}.m4a", video_id))
    }

    async fn download(&self, video_id: &str, target: &Path) -> anyhow::Result<()> {
        let url = format!("https://www.youtube.com/watch?v={}", video_id);

        info!("Downloading audio for {} -> {}", video_id, target.display());

        let fragments = self.config.concurrent_fragments.to_string();
        let mut cmd = tokio::process::Command::new(&self.yt_dlp);
        cmd.arg("--format")
            .arg("bestaudio[ext=m4a]/bestaudio")
            .arg("--output")
            .arg(target)
            .arg("--no-playlist")
            .arg("--quiet")
            .arg("--concurrent-fragments")
            .arg(&fragments)
            .arg(&url);

        let output = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_seconds),
            cmd.output(),
        )
        .await
        .map_err(|_| {
            anyhow!(
                "yt-dlp timed out after {} seconds for {}",
                self.config.timeout_seconds,
                video_id
            )
        })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!(
                "yt-dlp exited with {} for {}: {}",
                output.status,
                video_id,
                stderr.trim()
            ));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl MediaDownloader for AudioAcquirer {
    /// Materialize the audio file for a video id, reusing the cache entry
    /// when one already exists.
    ///
    /// Concurrent first-time requests for the same id race on the cache file;
    /// last writer wins and both end up with a usable artifact. No lock is
    /// taken.
    async fn acquire(&self, video_id: &str) -> Result<AudioArtifact> {
        let path = self.artifact_path(video_id);

        if path.exists() {
            info!("Reusing cached audio for {}: {}", video_id, path.display());
            return Ok(AudioArtifact {
                path,
                video_id: video_id.to_string(),
            });
        }

        tokio::fs::create_dir_all(&self.config.cache_dir)
            .await
            .map_err(|e| Error::Acquisition(anyhow!("cannot create cache directory: {}", e)))?;

        self.download(video_id, &path)
            .await
            .map_err(Error::Acquisition)?;

        info!("Audio downloaded for {}", video_id);

        Ok(AudioArtifact {
            path,
            video_id: video_id.to_string(),
        })
    }
}
