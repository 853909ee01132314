//! File Governance API Server
//!
//! REST API for the DropSync dashboard: policy stores, evaluation
//! endpoints, archival rules, and storage analytics.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_governor::GovernorLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod rate_limit;
mod routes;

pub use error::ApiError;
pub use rate_limit::{create_governor_config, RateLimitConfig};

use access_policy::PolicyStore;
use analytics::AnalyticsConfig;
use archival::RuleStore;
use chrono::Utc;
use file_catalog::FileRepository;
use origin_policy::OriginStore;

/// Application state shared across handlers
pub struct AppState {
    /// Access policy store and evaluation engine
    pub access_policies: PolicyStore,
    /// Origin policy store and evaluation engine
    pub origin_policies: OriginStore,
    /// Archival rules, shared with the background scheduler
    pub archival_rules: Arc<RwLock<RuleStore>>,
    /// File catalog
    pub catalog: Arc<FileRepository>,
    /// Analytics configuration
    pub analytics: AnalyticsConfig,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

/// State handle passed to every handler
pub type SharedState = Arc<RwLock<AppState>>;

impl AppState {
    /// Create empty application state
    pub fn new() -> Self {
        Self {
            access_policies: PolicyStore::new(),
            origin_policies: OriginStore::new(),
            archival_rules: Arc::new(RwLock::new(RuleStore::new())),
            catalog: Arc::new(FileRepository::default()),
            analytics: AnalyticsConfig::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Create application state seeded with the demo data set
    pub fn with_examples() -> Self {
        Self {
            access_policies: PolicyStore::with_examples(),
            origin_policies: OriginStore::with_examples(),
            archival_rules: Arc::new(RwLock::new(RuleStore::with_examples())),
            catalog: Arc::new(FileRepository::with_examples(Utc::now())),
            ..Self::new()
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub metrics: StoreMetrics,
}

/// Store counts reported by the health endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreMetrics {
    pub access_policies: usize,
    pub origin_policies: usize,
    pub archival_rules: usize,
    pub files: usize,
}

/// Create the application router
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        // Access policies
        .route(
            "/api/v1/access-policies",
            get(routes::access::list).post(routes::access::create),
        )
        .route(
            "/api/v1/access-policies/templates",
            get(routes::access::templates),
        )
        .route(
            "/api/v1/access-policies/evaluate",
            post(routes::access::evaluate),
        )
        .route(
            "/api/v1/access-policies/:id",
            put(routes::access::update).delete(routes::access::remove),
        )
        .route(
            "/api/v1/access-policies/:id/toggle",
            post(routes::access::toggle),
        )
        // Origin policies
        .route(
            "/api/v1/origin-policies",
            get(routes::origins::list).post(routes::origins::create),
        )
        .route(
            "/api/v1/origin-policies/evaluate",
            post(routes::origins::evaluate),
        )
        .route(
            "/api/v1/origin-policies/:id",
            put(routes::origins::update).delete(routes::origins::remove),
        )
        .route(
            "/api/v1/origin-policies/:id/toggle",
            post(routes::origins::toggle),
        )
        // Archival rules
        .route(
            "/api/v1/archival-rules",
            get(routes::archive::list).post(routes::archive::create),
        )
        .route(
            "/api/v1/archival-rules/templates",
            get(routes::archive::templates),
        )
        .route(
            "/api/v1/archival-rules/:id",
            put(routes::archive::update).delete(routes::archive::remove),
        )
        .route(
            "/api/v1/archival-rules/:id/toggle",
            post(routes::archive::toggle),
        )
        .route("/api/v1/archival-rules/:id/run", post(routes::archive::run))
        // Storage analytics
        .route("/api/v1/storage/summary", get(routes::storage::summary))
        .route("/api/v1/storage/breakdown", get(routes::storage::breakdown))
        .route("/api/v1/storage/largest", get(routes::storage::largest))
        .route("/api/v1/storage/trend", get(routes::storage::trend))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    let state = state.read().await;
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let archival_rules = state.archival_rules.read().await.len();
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        metrics: StoreMetrics {
            access_policies: state.access_policies.len(),
            origin_policies: state.origin_policies.len(),
            archival_rules,
            files: state.catalog.file_count(),
        },
    };

    Json(response)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(addr: &str, state: SharedState) -> anyhow::Result<()> {
    let governor = create_governor_config(&RateLimitConfig::default());
    let app = create_router(state).layer(GovernorLayer { config: governor });

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
