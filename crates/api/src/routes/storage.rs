//! Storage Analytics Routes

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::SharedState;
use analytics::{CategoryUsage, StorageSummary, UsagePoint};
use file_catalog::FileRecord;

/// Query parameters for the largest-files endpoint
#[derive(Debug, Deserialize)]
pub struct LargestQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    5
}

/// Query parameters for the trend endpoint
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    pub days: Option<usize>,
}

/// Response for the breakdown endpoint
#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub data: Vec<CategoryUsage>,
    pub count: usize,
}

/// Response for the largest-files endpoint
#[derive(Debug, Serialize)]
pub struct LargestResponse {
    pub data: Vec<FileRecord>,
    pub count: usize,
}

/// Response for the trend endpoint
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub data: Vec<UsagePoint>,
    pub count: usize,
}

/// Storage totals
pub async fn summary(State(state): State<SharedState>) -> Json<StorageSummary> {
    let state = state.read().await;
    let records = state.catalog.list();
    Json(StorageSummary::compute(&records, &state.analytics))
}

/// Usage by file category
pub async fn breakdown(State(state): State<SharedState>) -> Json<BreakdownResponse> {
    let state = state.read().await;
    let records = state.catalog.list();
    let data = analytics::breakdown(&records);
    Json(BreakdownResponse {
        count: data.len(),
        data,
    })
}

/// Largest unarchived files
pub async fn largest(
    State(state): State<SharedState>,
    Query(params): Query<LargestQuery>,
) -> Json<LargestResponse> {
    let state = state.read().await;
    let limit = params.limit.min(100);
    let records = state.catalog.list();
    let data = analytics::largest_files(&records, limit);
    Json(LargestResponse {
        count: data.len(),
        data,
    })
}

/// Daily usage trend
pub async fn trend(
    State(state): State<SharedState>,
    Query(params): Query<TrendQuery>,
) -> Json<TrendResponse> {
    let state = state.read().await;
    let days = params.days.unwrap_or(state.analytics.trend_days).min(365);
    let records = state.catalog.list();
    let data = analytics::usage_trend(&records, days, Utc::now());
    Json(TrendResponse {
        count: data.len(),
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppState;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    fn shared_state() -> SharedState {
        Arc::new(RwLock::new(AppState::with_examples()))
    }

    #[tokio::test]
    async fn test_summary_counts_seeded_files() {
        let Json(summary) = summary(State(shared_state())).await;
        assert_eq!(summary.total_files, 10);
        assert!(summary.used_bytes > 0);
        assert!(summary.usage_percent > 0.0);
    }

    #[tokio::test]
    async fn test_largest_respects_limit() {
        let query = LargestQuery { limit: 3 };
        let Json(response) = largest(State(shared_state()), Query(query)).await;
        assert_eq!(response.count, 3);
        assert_eq!(response.data[0].name, "presentation.mp4");
    }

    #[tokio::test]
    async fn test_trend_defaults_to_config_days() {
        let Json(response) = trend(State(shared_state()), Query(TrendQuery::default())).await;
        assert_eq!(response.count, 7);
    }
}
