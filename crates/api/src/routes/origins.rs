//! Origin Policy Routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ApiError, SharedState};
use origin_policy::{
    OriginDecision, OriginDraft, OriginFilter, OriginPolicy, OriginStats, RuleAction,
};

/// Query parameters for the origin list endpoint
#[derive(Debug, Default, Deserialize)]
pub struct OriginQuery {
    /// Search term over origin and description
    pub search: Option<String>,
    /// Filter by rule action
    #[serde(rename = "type")]
    pub action: Option<RuleAction>,
}

/// Response for the origin list endpoint
#[derive(Debug, Serialize)]
pub struct OriginListResponse {
    pub data: Vec<OriginPolicy>,
    pub count: usize,
    pub stats: OriginStats,
}

/// Toggle result
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: Uuid,
    pub enabled: bool,
}

/// Evaluation request body
#[derive(Debug, Deserialize)]
pub struct EvaluateOriginRequest {
    pub origin: String,
}

/// List origin policies, optionally filtered
pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<OriginQuery>,
) -> Json<OriginListResponse> {
    let state = state.read().await;
    let filter = OriginFilter {
        search: query.search,
        action: query.action,
    };
    let data: Vec<OriginPolicy> = state
        .origin_policies
        .search(&filter)
        .into_iter()
        .cloned()
        .collect();
    Json(OriginListResponse {
        count: data.len(),
        stats: state.origin_policies.stats(),
        data,
    })
}

/// Create an origin policy
pub async fn create(
    State(state): State<SharedState>,
    Json(draft): Json<OriginDraft>,
) -> Result<(StatusCode, Json<OriginPolicy>), ApiError> {
    let mut state = state.write().await;
    let id = state.origin_policies.create(draft, Utc::now())?;
    let policy = state.origin_policies.get(id)?.clone();
    Ok((StatusCode::CREATED, Json(policy)))
}

/// Update an origin policy
pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<OriginDraft>,
) -> Result<Json<OriginPolicy>, ApiError> {
    let mut state = state.write().await;
    state.origin_policies.update(id, draft)?;
    Ok(Json(state.origin_policies.get(id)?.clone()))
}

/// Delete an origin policy
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut state = state.write().await;
    state.origin_policies.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle an origin policy's enabled flag
pub async fn toggle(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let mut state = state.write().await;
    let enabled = state.origin_policies.toggle(id)?;
    Ok(Json(ToggleResponse { id, enabled }))
}

/// Evaluate a request origin
pub async fn evaluate(
    State(state): State<SharedState>,
    Json(request): Json<EvaluateOriginRequest>,
) -> Json<OriginDecision> {
    let mut state = state.write().await;
    let decision = state.origin_policies.evaluate(&request.origin, Utc::now());
    Json(decision)
}
