//! DropSync File Governance - Main Entry Point

use api::{init_logging, run_server, AppState};
use archival::{ArchivalScheduler, SchedulerConfig};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    info!("=== DropSync File Governance v{} ===", env!("CARGO_PKG_VERSION"));
    info!("Starting file governance service...");

    let state = AppState::with_examples();
    let rules = state.archival_rules.clone();
    let catalog = state.catalog.clone();
    let shared = Arc::new(RwLock::new(state));

    // Background archival scheduler
    let (outcome_tx, mut outcome_rx) = mpsc::channel(16);
    let mut scheduler = ArchivalScheduler::new(SchedulerConfig::default());
    tokio::spawn(async move {
        scheduler.run(rules, catalog, outcome_tx).await;
    });
    tokio::spawn(async move {
        while let Some(outcome) = outcome_rx.recv().await {
            info!(
                "Scheduled run of rule {} archived {} files ({} bytes)",
                outcome.rule_id, outcome.files_archived, outcome.bytes_archived
            );
        }
    });

    let addr = "0.0.0.0:8080";
    run_server(addr, shared).await
}
