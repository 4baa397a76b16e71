//! Content pack API handlers
//!
//! Pack lifecycle (create, list, fetch, activate/deactivate, delete) plus
//! the supported content-type listing clients consult before uploading.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::ContentPack,
    AppState,
};

/// POST /packs request
#[derive(Debug, Deserialize)]
pub struct CreatePackRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub author: String,
}

fn default_version() -> String {
    "1.0.0".to_string()
}

/// GET /content-types response
#[derive(Debug, Serialize)]
pub struct ContentTypesResponse {
    pub content_types: Vec<String>,
}

/// POST /packs
///
/// Create a new (inactive) content pack. Returns 201 with the pack entity.
pub async fn create_pack(
    State(state): State<AppState>,
    Json(request): Json<CreatePackRequest>,
) -> ApiResult<(StatusCode, Json<ContentPack>)> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Pack name must not be empty".to_string()));
    }

    let pack = ContentPack::new(
        request.name,
        request.description,
        request.version,
        request.author,
    );
    crate::db::packs::create_pack(&state.db, &pack).await?;

    tracing::info!(pack_id = %pack.id, name = %pack.name, "Content pack created");

    Ok((StatusCode::CREATED, Json(pack)))
}

/// GET /packs
pub async fn list_packs(State(state): State<AppState>) -> ApiResult<Json<Vec<ContentPack>>> {
    let packs = crate::db::packs::list_packs(&state.db).await?;
    Ok(Json(packs))
}

/// GET /packs/{pack_id}
pub async fn get_pack(
    State(state): State<AppState>,
    Path(pack_id): Path<Uuid>,
) -> ApiResult<Json<ContentPack>> {
    let pack = crate::db::packs::get_pack(&state.db, pack_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Content pack not found: {pack_id}")))?;
    Ok(Json(pack))
}

/// POST /packs/{pack_id}/activate
pub async fn activate_pack(
    State(state): State<AppState>,
    Path(pack_id): Path<Uuid>,
) -> ApiResult<Json<ContentPack>> {
    set_active(state, pack_id, true).await
}

/// POST /packs/{pack_id}/deactivate
pub async fn deactivate_pack(
    State(state): State<AppState>,
    Path(pack_id): Path<Uuid>,
) -> ApiResult<Json<ContentPack>> {
    set_active(state, pack_id, false).await
}

async fn set_active(state: AppState, pack_id: Uuid, is_active: bool) -> ApiResult<Json<ContentPack>> {
    let updated = crate::db::packs::set_pack_active(&state.db, pack_id, is_active).await?;
    if !updated {
        return Err(ApiError::NotFound(format!("Content pack not found: {pack_id}")));
    }

    tracing::info!(pack_id = %pack_id, is_active, "Content pack active flag updated");

    let pack = crate::db::packs::get_pack(&state.db, pack_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Content pack not found: {pack_id}")))?;
    Ok(Json(pack))
}

/// DELETE /packs/{pack_id}
///
/// Removes the pack, its records, and its search terms.
pub async fn delete_pack(
    State(state): State<AppState>,
    Path(pack_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let deleted = crate::db::packs::delete_pack(&state.db, pack_id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("Content pack not found: {pack_id}")));
    }

    tracing::info!(pack_id = %pack_id, "Content pack deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /content-types
pub async fn list_content_types(State(state): State<AppState>) -> Json<ContentTypesResponse> {
    Json(ContentTypesResponse {
        content_types: state
            .registry
            .supported_types()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

/// Build pack management routes
pub fn pack_routes() -> Router<AppState> {
    Router::new()
        .route("/packs", post(create_pack).get(list_packs))
        .route("/packs/:pack_id", get(get_pack).delete(delete_pack))
        .route("/packs/:pack_id/activate", post(activate_pack))
        .route("/packs/:pack_id/deactivate", post(deactivate_pack))
        .route("/content-types", get(list_content_types))
}
