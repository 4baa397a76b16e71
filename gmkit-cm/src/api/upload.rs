//! Content upload and reindex API handlers
//!
//! The upload endpoint owns the admission checks the pipeline itself does
//! not re-validate: the pack must exist, the content type must be
//! allow-listed, the payload must be non-empty and under the batch
//! ceiling. Response-status policy: full success serializes the
//! UploadResult with 200, any validation failure serializes the same body
//! with 422 so callers can inspect `validation_errors` per item.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::UploadPayload,
    services::UploadError,
    AppState,
};

/// Largest accepted batch; bigger uploads should be split by the client
pub const MAX_UPLOAD_RECORDS: usize = 1000;

/// POST /packs/{pack_id}/reindex response
#[derive(Debug, Serialize)]
pub struct ReindexResponse {
    pub pack_id: Uuid,
    /// Records indexed per content type
    pub indexed: HashMap<String, usize>,
}

/// POST /packs/{pack_id}/content/{content_type}
///
/// Body is one record or an array of records. Returns 200 on full success,
/// 422 on partial or total validation failure, with the same body shape.
pub async fn upload_content(
    State(state): State<AppState>,
    Path((pack_id, content_type)): Path<(Uuid, String)>,
    Json(payload): Json<UploadPayload>,
) -> ApiResult<Response> {
    // Admission checks, in order: pack, content type, payload shape
    crate::db::packs::get_pack(&state.db, pack_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Content pack not found: {pack_id}")))?;

    if !state.registry.is_supported(&content_type) {
        return Err(ApiError::BadRequest(format!(
            "Unsupported content type '{}'. Supported types: {}",
            content_type,
            state.registry.supported_types().join(", ")
        )));
    }

    if payload.is_empty() {
        return Err(ApiError::BadRequest(
            "Upload payload must contain at least one record".to_string(),
        ));
    }
    if payload.len() > MAX_UPLOAD_RECORDS {
        return Err(ApiError::BadRequest(format!(
            "Upload of {} records exceeds the limit of {MAX_UPLOAD_RECORDS}",
            payload.len()
        )));
    }

    let result = state
        .upload_orchestrator()
        .upload(pack_id, &content_type, payload)
        .await
        .map_err(|e| match e {
            // Unreachable after the is_supported check, kept as a client error
            UploadError::UnknownContentType(err) => ApiError::BadRequest(err.to_string()),
            UploadError::Persistence(err) => ApiError::from(err),
        })?;

    let status = if result.is_fully_successful() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    Ok((status, Json(result)).into_response())
}

/// POST /packs/{pack_id}/reindex
///
/// Manually rebuild the pack's search index. Unlike the post-upload
/// trigger, a failure here is a hard error: the caller asked for exactly
/// this operation.
pub async fn reindex_pack(
    State(state): State<AppState>,
    Path(pack_id): Path<Uuid>,
) -> ApiResult<Json<ReindexResponse>> {
    crate::db::packs::get_pack(&state.db, pack_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Content pack not found: {pack_id}")))?;

    let indexed = state.indexer.index_pack(pack_id).await?;

    Ok(Json(ReindexResponse { pack_id, indexed }))
}

/// Build upload and reindex routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/packs/:pack_id/content/:content_type", post(upload_content))
        .route("/packs/:pack_id/reindex", post(reindex_pack))
}
