//! Error taxonomy for the post-generation pipeline.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that reach the request boundary.
///
/// Caption-fetch failures and artifact cleanup failures are absorbed inside
/// the pipeline and never show up here.
#[derive(Debug, Error)]
pub enum Error {
    /// The URL matched none of the recognized YouTube shapes.
    #[error("invalid YouTube URL: {0}")]
    InvalidUrl(String),

    /// Both the caption and the transcription path came up empty.
    #[error("no transcript available for video {0}")]
    NoTranscript(String),

    /// Audio download failed.
    #[error("audio acquisition failed: {0}")]
    Acquisition(#[source] anyhow::Error),

    /// The generation backend could not be reached or returned an error.
    #[error("generation backend failure: {0}")]
    GenerationBackend(#[source] anyhow::Error),

    /// Unexpected failure in a local stage, e.g. the transcription engine.
    #[error("internal error: {0}")]
    Internal(#[source] anyhow::Error),
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidUrl(_) | Error::NoTranscript(_) => StatusCode::BAD_REQUEST,
            Error::Acquisition(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::GenerationBackend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
