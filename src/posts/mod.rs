//! Post generation: prompt composition, backend call, response segmentation.

pub mod segmenter;

pub use segmenter::ResponseSegmenter;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::Result;
use crate::llm::GenerationBackend;
use crate::pipeline::Transcript;

/// The three target platforms, fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    LinkedIn,
    Instagram,
    Twitter,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::LinkedIn, Platform::Instagram, Platform::Twitter];

    /// Label as it appears in the section markers of the generated response.
    pub fn label(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Instagram => "Instagram",
            Platform::Twitter => "Twitter",
        }
    }
}

/// One generated post body per platform.
///
/// All three keys are always present; an empty string means the backend did
/// not produce that section, which is not an error of the bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostBundle {
    pub linkedin: String,
    pub instagram: String,
    pub twitter: String,
}

const PROMPT_TEMPLATE: &str = r#"You are a digital marketing and copywriting specialist who tailors content to each social network. From the video transcript below, write one post per network, in the same language as the transcript. Introduce each post with its exact marker line as shown.

**LinkedIn Post**
- Professional and inspiring.
- Short, easy-to-read paragraphs.
- Motivational or educational tone that reinforces authority on the topic.
- Up to 3 relevant hashtags, no more.
- No emojis or informal language.

**Instagram Post**
- Relaxed and engaging.
- Strategic emojis to reinforce emotion or context.
- Short, direct sentences built on storytelling or curiosity.
- 5 to 10 relevant hashtags for reach.
- Creative calls to action such as questions or invitations to comment.

**Twitter Post**
- Direct, punchy and concise (at most 280 characters).
- A clear, catchy message that drives immediate engagement.
- At most 3 strategic hashtags.
- Abbreviations or informal language are fine if the message stays clear.

Transcript:
{transcript}"#;

/// Composes the generation prompt, calls the backend once and segments the
/// single response into the three post bodies.
pub struct PostGenerator {
    backend: Arc<dyn GenerationBackend>,
    segmenter: ResponseSegmenter,
}

impl PostGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self {
            backend,
            segmenter: ResponseSegmenter::new(),
        }
    }

    /// The fixed template with the transcript interpolated once at the end.
    pub fn compose_prompt(transcript: &str) -> String {
        PROMPT_TEMPLATE.replace("{transcript}", transcript)
    }

    pub async fn generate_posts(&self, transcript: &Transcript) -> Result<PostBundle> {
        let prompt = Self::compose_prompt(&transcript.text);
        let raw = self.backend.generate(&prompt).await?;

        let bundle = self.segmenter.segment(&raw);
        info!(
            "Generated posts (linkedin: {} chars, instagram: {} chars, twitter: {} chars)",
            bundle.linkedin.len(),
            bundle.instagram.len(),
            bundle.twitter.len()
        );

        Ok(bundle)
    }
}
