//! Request handlers.

use tracing::info;

use super::models::HealthResponse;
use super::AppState;
use crate::error::Result;
use crate::posts::PostBundle;
use crate::video::VideoReference;

/// The one real operation: URL in, three post bodies out.
///
/// Stages run strictly in sequence; the first failing stage decides the
/// response status via the error taxonomy.
pub async fn generate_post(state: &AppState, url: &str) -> Result<PostBundle> {
    let video = VideoReference::parse(url)?;
    info!("Generating posts for video {}", video.id);

    let transcript = state.pipeline.resolve(&video).await?;
    state.generator.generate_posts(&transcript).await
}

pub fn health_check() -> HealthResponse {
    HealthResponse::ok()
}
