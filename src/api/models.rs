//! API data models

use serde::{Deserialize, Serialize};

/// Body of `POST /generate_post`.
#[derive(Debug, Serialize, Deserialize)]
pub struct GeneratePostRequest {
    pub url: String,
}

/// Liveness payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            service: "postgen".to_string(),
        }
    }
}
