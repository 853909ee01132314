//! Archival Rule Routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::{ApiError, SharedState};
use archival::{
    builtin_templates, execute_rule, ArchivalOutcome, ArchivalRule, RuleDraft, RuleStats,
};

/// Response for the rule list endpoint
#[derive(Debug, Serialize)]
pub struct RuleListResponse {
    pub data: Vec<ArchivalRule>,
    pub count: usize,
    pub stats: RuleStats,
}

/// Toggle result
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub id: Uuid,
    pub enabled: bool,
}

/// List archival rules
pub async fn list(State(state): State<SharedState>) -> Json<RuleListResponse> {
    let state = state.read().await;
    let rules = state.archival_rules.read().await;
    let data = rules.list().to_vec();
    Json(RuleListResponse {
        count: data.len(),
        stats: rules.stats(),
        data,
    })
}

/// Create an archival rule
pub async fn create(
    State(state): State<SharedState>,
    Json(draft): Json<RuleDraft>,
) -> Result<(StatusCode, Json<ArchivalRule>), ApiError> {
    let state = state.read().await;
    let mut rules = state.archival_rules.write().await;
    let id = rules.create(draft)?;
    let rule = rules.get(id)?.clone();
    Ok((StatusCode::CREATED, Json(rule)))
}

/// Update an archival rule
pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<RuleDraft>,
) -> Result<Json<ArchivalRule>, ApiError> {
    let state = state.read().await;
    let mut rules = state.archival_rules.write().await;
    rules.update(id, draft)?;
    Ok(Json(rules.get(id)?.clone()))
}

/// Delete an archival rule
pub async fn remove(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let state = state.read().await;
    let mut rules = state.archival_rules.write().await;
    rules.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Toggle an archival rule's enabled flag
pub async fn toggle(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let state = state.read().await;
    let mut rules = state.archival_rules.write().await;
    let enabled = rules.toggle(id)?;
    Ok(Json(ToggleResponse { id, enabled }))
}

/// Run an archival rule immediately
pub async fn run(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArchivalOutcome>, ApiError> {
    let state = state.read().await;
    let mut rules = state.archival_rules.write().await;
    let rule = rules.get_mut(id)?;
    let outcome = execute_rule(rule, &state.catalog, Utc::now())?;
    Ok(Json(outcome))
}

/// Quick-start rule templates
pub async fn templates() -> Json<Vec<RuleDraft>> {
    Json(builtin_templates())
}
