//! Video URL parsing.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A parsed video reference: the original URL plus the canonical video id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoReference {
    /// The URL as supplied by the caller.
    pub url: String,
    /// The canonical video id extracted from it.
    pub id: String,
}

impl VideoReference {
    /// Parse a YouTube URL into a reference.
    ///
    /// Two shapes are recognized, in order: the long form (`watch?v=<id>`,
    /// id runs until the next `&`) and the short link (`youtu.be/<id>`, id
    /// runs until the next `?`). Anything else is rejected. The id itself is
    /// not validated; an id that does not exist upstream simply resolves to
    /// "no captions, no download".
    pub fn parse(url: &str) -> Result<Self> {
        let id = extract_video_id(url).ok_or_else(|| Error::InvalidUrl(url.to_string()))?;

        Ok(Self {
            url: url.to_string(),
            id,
        })
    }

    /// Canonical watch URL for this video, used when a collaborator needs a
    /// full URL rather than the bare id.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

fn extract_video_id(url: &str) -> Option<String> {
    if let Some((_, rest)) = url.split_once("watch?v=") {
        let id = rest.split('&').next().unwrap_or(rest);
        return non_empty(id);
    }

    if let Some((_, rest)) = url.split_once("youtu.be/") {
        let id = rest.split('?').next().unwrap_or(rest);
        return non_empty(id);
    }

    None
}

fn non_empty(id: &str) -> Option<String> {
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
