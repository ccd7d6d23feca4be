//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, Method},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use super::models::GeneratePostRequest;
use super::{handlers, AppState};
use crate::error::Error;
use crate::posts::PostBundle;

/// Configure and start the HTTP server.
pub async fn start_http_server(state: AppState, port: u16) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        // Health check endpoints (both paths for compatibility)
        .route("/health", get(health_handler))
        .route("/api/health", get(health_handler))
        // The single real operation
        .route("/generate_post", post(generate_post_handler))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("API server listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(handlers::health_check())
}

async fn generate_post_handler(
    State(state): State<AppState>,
    Json(request): Json<GeneratePostRequest>,
) -> std::result::Result<Json<PostBundle>, Error> {
    let bundle = handlers::generate_post(&state, &request.url).await?;
    Ok(Json(bundle))
}
