//! Access Policy Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiError, SharedState};
use access_policy::{
    builtin_templates, AccessDecision, AccessPolicy, AccessRequest, PolicyDraft, PolicyStats,
};

/// Response for the policy list endpoint
#[derive(Debug, Serialize)]
pub struct PolicyListResponse {
    pub data: Vec<AccessPolicy>,
    pub count: usize,
    pub stats: PolicyStats,
}

/// Toggle result
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: Uuid,
    pub enabled: bool,
}

/// List access policies
pub async fn list(State(state): State<SharedState>) -> Json<PolicyListResponse> {
    let state = state.read().await;
    let data = state.access_policies.list().to_vec();
    Json(PolicyListResponse {
        count: data.len(),
        stats: state.access_policies.stats(),
        data,
    })
}

/// Create an access policy
pub async fn create(
    State(state): State<SharedState>,
    Json(draft): Json<PolicyDraft>,
) -> Result<(StatusCode, Json<AccessPolicy>), ApiError> {
    let mut state = state.write().await;
    let id = state.access_policies.create(draft, Utc::now())?;
    let policy = state.access_policies.get(id)?.clone();
    Ok((StatusCode::CREATED, Json(policy)))
}

/// Update an access policy
pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<PolicyDraft>,
) -> Result<Json<AccessPolicy>, ApiError> {
    let mut state = state.write().await;
    state.access_policies.update(id, draft)?;
    Ok(Json(state.access_policies.get(id)?.clone()))
}

/// Delete an access policy
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut state = state.write().await;
    state.access_policies.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle an access policy's enabled flag
pub async fn toggle(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let mut state = state.write().await;
    let enabled = state.access_policies.toggle(id)?;
    Ok(Json(ToggleResponse { id, enabled }))
}

/// Quick-start policy templates
pub async fn templates() -> Json<Vec<PolicyDraft>> {
    Json(builtin_templates())
}

/// Evaluate a proposed file operation
pub async fn evaluate(
    State(state): State<SharedState>,
    Json(request): Json<AccessRequest>,
) -> Json<AccessDecision> {
    let mut state = state.write().await;
    let decision = state.access_policies.evaluate(&request, Utc::now());
    Json(decision)
}
