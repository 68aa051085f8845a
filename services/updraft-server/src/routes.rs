//! Request handlers

use crate::error::ApiError;
use crate::state::AppState;
use asset_index::stale_assets_from_json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use policy_engine::{PlatformPolicy, StatusV1, StatusV2};
use serde_json::Value;
use std::io::ErrorKind;
use tracing::{error, instrument};
use updraft_core::endpoints::ASSET_VERSION_HEADER;
use updraft_core::UpdraftError;

fn parse_json<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::bad_request("invalid_json", e.to_string()))
}

#[instrument(skip(state))]
pub async fn status_v1(
    State(state): State<AppState>,
    Path((platform, version)): Path<(String, String)>,
) -> Result<Json<StatusV1>, ApiError> {
    Ok(Json(state.engine.status_v1(&platform, &version)?))
}

#[instrument(skip(state))]
pub async fn status_v2(
    State(state): State<AppState>,
    Path((platform, version)): Path<(String, String)>,
) -> Result<Json<StatusV2>, ApiError> {
    Ok(Json(state.engine.status_v2(&platform, &version)?))
}

/// Body: `[{"id": .., "version": ..}, ..]`; answers with the stale ids.
#[instrument(skip(state, body), fields(bytes = body.len()))]
pub async fn check_assets_updates(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<String>>, ApiError> {
    let items: Vec<Value> = parse_json(&body)?;
    Ok(Json(stale_assets_from_json(&state.assets, &items)))
}

#[instrument(skip(state))]
pub async fn get_asset(
    State(state): State<AppState>,
    Path(asset_id): Path<String>,
) -> Result<Response, ApiError> {
    let not_found = || UpdraftError::AssetNotFound {
        asset_id: asset_id.clone(),
    };
    let (path, entry) = state.assets.resolve(&asset_id).ok_or_else(not_found)?;

    let content = match tokio::fs::read(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(not_found().into()),
        Err(e) => return Err(UpdraftError::io(path, e).into()),
    };
    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok((
        [
            (CONTENT_TYPE, mime.to_string()),
            (
                HeaderName::from_static(ASSET_VERSION_HEADER),
                entry.content_version.clone(),
            ),
        ],
        content,
    )
        .into_response())
}

#[instrument(skip(state))]
pub async fn get_config(
    State(state): State<AppState>,
    Path(platform): Path<String>,
) -> Result<Json<PlatformPolicy>, ApiError> {
    Ok(Json(state.engine.config(&platform)?))
}

#[instrument(skip(state, body))]
pub async fn post_config(
    State(state): State<AppState>,
    Path(platform): Path<String>,
    body: Bytes,
) -> Result<Json<PlatformPolicy>, ApiError> {
    let payload: Value = parse_json(&body)?;
    let engine = state.engine.clone();
    let policy = tokio::task::spawn_blocking(move || engine.update_config(&platform, payload))
        .await
        .map_err(|e| {
            error!("Config update task failed: {}", e);
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "config update did not complete",
            )
        })??;
    Ok(Json(policy))
}

pub async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "not_found", "Not Found")
}
