//! Route handlers.
//!
//! Each handler validates its input, hands filesystem work to the module
//! that owns it, and converts failures into [`ApiError`]. Anything that
//! touches the disk runs on the blocking pool.

use super::AppState;
use super::error::ApiError;
use super::headers::cached_response;
use super::page::{APP_JS, render_index};
use crate::annotation;
use crate::imaging::create_thumbnail;
use crate::paths;
use crate::scan::{self, ImageEntry};
use crate::starred::{StarredImage, StarredStore};
use crate::tags::{self, BatchReport, DEFAULT_TAG_LIMIT, Position, TagCount};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, header};
use axum::response::{Html, IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::ErrorKind;
use std::sync::Arc;

const MISSING_PARAMETERS: &str = "Missing required parameters";

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub folder_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveAnnotationRequest {
    pub txt_path: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteImageRequest {
    pub image_path: Option<String>,
    pub txt_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleStarRequest {
    pub image_data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct TagStatsRequest {
    pub annotations: Option<Vec<String>>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRemoveTagRequest {
    pub txt_paths: Option<Vec<String>>,
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchAddTagRequest {
    pub txt_paths: Option<Vec<String>>,
    pub tag: Option<String>,
    #[serde(default)]
    pub position: Position,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: BatchReport,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct ToggleStarResponse {
    pub success: bool,
    pub is_starred: bool,
}

/// A path parameter counts as missing when absent, `null`, or empty.
fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(message.to_string()))
}

/// Run filesystem work off the async executor.
async fn blocking<T, E, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await?.map_err(Into::into)
}

pub async fn index() -> Html<String> {
    Html(render_index().into_string())
}

pub async fn app_script() -> Response {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        APP_JS,
    )
        .into_response()
}

pub async fn scan_folders(
    State(state): State<AppState>,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<Vec<ImageEntry>>, ApiError> {
    let Json(request) = payload?;
    let folder = required(request.folder_path, "No folder path provided")?;
    let root = paths::resolve_request_path(&folder, &state.cwd);

    let config = Arc::clone(&state.config);
    let report = blocking(move || scan::scan(&root, &config)).await?;

    tracing::info!(
        folder = %folder,
        images = report.entries.len(),
        skipped = report.skipped.len(),
        "scanned folder"
    );
    Ok(Json(report.entries))
}

pub async fn thumbnail(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    request_headers: HeaderMap,
) -> Result<Response, ApiError> {
    let source = paths::resolve_request_path(&raw, &state.cwd);
    if !source.is_file() {
        return Err(ApiError::ImageNotFound);
    }

    let backend = Arc::clone(&state.backend);
    let thumbnail_config = state.config.thumbnail_config();
    let thumb =
        blocking(move || create_thumbnail(backend.as_ref(), &source, &thumbnail_config)).await?;

    tracing::debug!(path = %raw, width = thumb.width, height = thumb.height, "thumbnail");
    Ok(cached_response(
        &request_headers,
        thumb.jpeg,
        "image/jpeg",
        state.config.cache.max_age,
    ))
}

pub async fn image(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    request_headers: HeaderMap,
) -> Result<Response, ApiError> {
    let source = paths::resolve_request_path(&raw, &state.cwd);
    if !source.is_file() {
        return Err(ApiError::ImageNotFound);
    }

    let bytes = match tokio::fs::read(&source).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Err(ApiError::ImageNotFound),
        Err(err) => return Err(err.into()),
    };

    Ok(cached_response(
        &request_headers,
        bytes,
        paths::mime_type(&source),
        state.config.cache.max_age,
    ))
}

pub async fn save_annotation(
    State(state): State<AppState>,
    payload: Result<Json<SaveAnnotationRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(request) = payload?;
    let txt_path = required(request.txt_path, MISSING_PARAMETERS)?;
    let content = request
        .content
        .ok_or_else(|| ApiError::Validation(MISSING_PARAMETERS.to_string()))?;

    let target = paths::resolve_request_path(&txt_path, &state.cwd);
    blocking(move || annotation::write_annotation(&target, &content)).await?;

    tracing::info!(txt_path = %txt_path, "saved annotation");
    Ok(Json(SuccessResponse { success: true }))
}

/// Remove a file, treating "already gone" as success.
async fn remove_if_present(path: &std::path::Path) -> std::io::Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

pub async fn delete_image(
    State(state): State<AppState>,
    payload: Result<Json<DeleteImageRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let Json(request) = payload?;
    let image_path = required(request.image_path, MISSING_PARAMETERS)?;
    let txt_path = required(request.txt_path, MISSING_PARAMETERS)?;

    let image_removed =
        remove_if_present(&paths::resolve_request_path(&image_path, &state.cwd)).await?;
    let txt_removed =
        remove_if_present(&paths::resolve_request_path(&txt_path, &state.cwd)).await?;

    let starred: Arc<StarredStore> = Arc::clone(&state.starred);
    let key = image_path.clone();
    blocking(move || starred.remove(&key)).await?;

    tracing::info!(
        image_path = %image_path,
        image_removed,
        txt_removed,
        "deleted image"
    );
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn toggle_star(
    State(state): State<AppState>,
    payload: Result<Json<ToggleStarRequest>, JsonRejection>,
) -> Result<Json<ToggleStarResponse>, ApiError> {
    let Json(request) = payload?;
    let image_data = match request.image_data {
        None | Some(Value::Null) => return Err(ApiError::Validation(MISSING_PARAMETERS.into())),
        Some(value) => StarredImage::try_from(value)?,
    };

    let starred = Arc::clone(&state.starred);
    let is_starred = blocking(move || starred.toggle(image_data)).await?;

    Ok(Json(ToggleStarResponse {
        success: true,
        is_starred,
    }))
}

pub async fn get_starred_images(
    State(state): State<AppState>,
) -> Result<Json<Vec<StarredImage>>, ApiError> {
    let starred = Arc::clone(&state.starred);
    let list = blocking(move || starred.list()).await?;
    Ok(Json(list))
}

pub async fn tag_stats(
    payload: Result<Json<TagStatsRequest>, JsonRejection>,
) -> Result<Json<Vec<TagCount>>, ApiError> {
    let Json(request) = payload?;
    let annotations = request
        .annotations
        .ok_or_else(|| ApiError::Validation(MISSING_PARAMETERS.to_string()))?;
    let limit = request.limit.unwrap_or(DEFAULT_TAG_LIMIT);

    Ok(Json(tags::tag_counts(
        annotations.iter().map(String::as_str),
        limit,
    )))
}

/// A tag counts as missing when absent, `null`, or blank.
fn required_tag(tag: Option<String>) -> Result<String, ApiError> {
    tag.map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("No tag provided".to_string()))
}

/// Apply `edit` to every sidecar on the blocking pool.
async fn batch_edit<F>(
    state: &AppState,
    txt_paths: Vec<String>,
    edit: F,
) -> Result<BatchReport, ApiError>
where
    F: Fn(&str) -> String + Send + 'static,
{
    let policy = state.config.files.decode_errors;
    let cwd = Arc::clone(&state.cwd);
    let report = tokio::task::spawn_blocking(move || {
        tags::apply_to_files(
            &txt_paths,
            policy,
            |raw| paths::resolve_request_path(raw, &cwd),
            edit,
        )
    })
    .await?;
    Ok(report)
}

pub async fn batch_remove_tag(
    State(state): State<AppState>,
    payload: Result<Json<BatchRemoveTagRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(request) = payload?;
    let txt_paths = request
        .txt_paths
        .ok_or_else(|| ApiError::Validation(MISSING_PARAMETERS.to_string()))?;
    let tag = required_tag(request.tag)?;

    let removed = tag.clone();
    let report = batch_edit(&state, txt_paths, move |current| {
        tags::remove_tag(current, &removed)
    })
    .await?;

    tracing::info!(
        tag = %tag,
        updated = report.updated.len(),
        failed = report.failed.len(),
        "removed tag"
    );
    Ok(Json(BatchResponse {
        success: report.failed.is_empty(),
        report,
    }))
}

pub async fn batch_add_tag(
    State(state): State<AppState>,
    payload: Result<Json<BatchAddTagRequest>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(request) = payload?;
    let txt_paths = request
        .txt_paths
        .ok_or_else(|| ApiError::Validation(MISSING_PARAMETERS.to_string()))?;
    let tag = required_tag(request.tag)?;
    let position = request.position;

    let added = tag.clone();
    let report = batch_edit(&state, txt_paths, move |current| {
        tags::add_tag(current, &added, position)
    })
    .await?;

    tracing::info!(
        tag = %tag,
        ?position,
        updated = report.updated.len(),
        failed = report.failed.len(),
        "added tag"
    );
    Ok(Json(BatchResponse {
        success: report.failed.is_empty(),
        report,
    }))
}
