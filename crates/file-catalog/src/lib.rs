//! File Catalog
//!
//! In-memory catalog of managed files with repository pattern.

mod repository;

pub use repository::{CatalogConfig, FileRecord, FileRepository};

use thiserror::Error;

/// Catalog errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog error: {0}")]
    LockError(String),
    #[error("File not found")]
    NotFound,
}
