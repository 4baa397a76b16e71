//! Campaign state and character-template API handlers
//!
//! Campaign state is opaque JSON owned by the client; the server stores
//! and returns it verbatim.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

/// GET /campaigns response
#[derive(Debug, Serialize)]
pub struct CampaignListResponse {
    pub campaigns: Vec<Uuid>,
}

/// GET /templates response
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<String>,
}

/// PUT /campaigns/{campaign_id}/state
pub async fn save_campaign_state(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    state.campaigns.save_campaign(campaign_id, &body)?;
    tracing::info!(campaign_id = %campaign_id, "Campaign state saved");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /campaigns/{campaign_id}/state
pub async fn get_campaign_state(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> ApiResult<Json<Value>> {
    let campaign_state = state
        .campaigns
        .load_campaign(campaign_id)?
        .ok_or_else(|| ApiError::NotFound(format!("Campaign not found: {campaign_id}")))?;
    Ok(Json(campaign_state))
}

/// DELETE /campaigns/{campaign_id}
pub async fn delete_campaign(
    State(state): State<AppState>,
    Path(campaign_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if !state.campaigns.delete_campaign(campaign_id)? {
        return Err(ApiError::NotFound(format!("Campaign not found: {campaign_id}")));
    }
    tracing::info!(campaign_id = %campaign_id, "Campaign deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /campaigns
pub async fn list_campaigns(State(state): State<AppState>) -> ApiResult<Json<CampaignListResponse>> {
    Ok(Json(CampaignListResponse {
        campaigns: state.campaigns.list_campaigns()?,
    }))
}

/// PUT /templates/{name}
pub async fn save_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<StatusCode> {
    state.campaigns.save_template(&name, &body)?;
    tracing::info!(template = %name, "Character template saved");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /templates/{name}
pub async fn get_template(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Value>> {
    let template = state
        .campaigns
        .load_template(&name)?
        .ok_or_else(|| ApiError::NotFound(format!("Character template not found: {name}")))?;
    Ok(Json(template))
}

/// GET /templates
pub async fn list_templates(State(state): State<AppState>) -> ApiResult<Json<TemplateListResponse>> {
    Ok(Json(TemplateListResponse {
        templates: state.campaigns.list_templates()?,
    }))
}

/// Build campaign and template routes
pub fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route("/campaigns", get(list_campaigns))
        .route(
            "/campaigns/:campaign_id/state",
            get(get_campaign_state).put(save_campaign_state),
        )
        .route(
            "/campaigns/:campaign_id",
            axum::routing::delete(delete_campaign),
        )
        .route("/templates", get(list_templates))
        .route("/templates/:name", get(get_template).put(save_template))
}
