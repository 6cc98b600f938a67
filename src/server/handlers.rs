use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use super::error::ApiError;
use super::AppState;
use crate::downloader::models::{DownloadRequest, InfoRequest};
use crate::downloader::tools::ToolInfo;

/// `POST /info`: the tool's metadata document, as produced
pub async fn info_handler(
    State(state): State<AppState>,
    body: Result<Json<InfoRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Json(req) = body?;
    tracing::info!(url = %req.url, "info request");

    let info = state.backend.fetch_info(&req.url).await?;
    Ok(Json(info))
}

/// `POST /download`: the tool's stdout, streamed
pub async fn download_handler(
    State(state): State<AppState>,
    body: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = body?;
    let options = req.options();
    tracing::info!(
        url = %req.url,
        kind = ?options.kind,
        quality = %options.quality,
        "download request"
    );

    let stream = state.backend.download(&req.url, &options).await?;

    // Headers go out here; a later tool failure can only abort the connection.
    let response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, options.kind.content_type())],
        Body::from_stream(stream),
    )
        .into_response();
    Ok(response)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub backend: &'static str,
    pub tool: ToolInfo,
}

/// `GET /health`: what was found at startup
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: if state.tool.is_available { "ok" } else { "degraded" },
        backend: state.backend.name(),
        tool: state.tool.as_ref().clone(),
    })
}
