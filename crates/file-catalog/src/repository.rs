//! Repository Implementation

use crate::CatalogError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// A managed file in the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: Uuid,
    pub name: String,
    /// Folder the file lives in, e.g. "/documents/reports"
    pub path: String,
    pub size_bytes: u64,
    /// Lowercased extension, e.g. "pdf"
    pub file_type: String,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub archived: bool,
}

impl FileRecord {
    /// Create a new unarchived record with a fresh id
    pub fn new(
        name: &str,
        path: &str,
        size_bytes: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let file_type = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            path: path.to_string(),
            size_bytes,
            file_type,
            created_at,
            last_accessed: created_at,
            archived: false,
        }
    }
}

/// Catalog configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Maximum records kept before the oldest are dropped
    pub max_records: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_records: 100_000,
        }
    }
}

/// Repository for file records (in-memory implementation for now)
pub struct FileRepository {
    files: Mutex<Vec<FileRecord>>,
    max_records: usize,
}

impl FileRepository {
    /// Create a new in-memory repository
    pub fn new(config: CatalogConfig) -> Self {
        info!("Creating in-memory file catalog");
        Self {
            files: Mutex::new(Vec::with_capacity(1024)),
            max_records: config.max_records,
        }
    }

    /// Create a new repository with SQLite (placeholder)
    pub async fn with_sqlite(_db_path: &str) -> Result<Self, CatalogError> {
        // In real implementation, we would use sqlx here:
        // let pool = SqlitePool::connect(db_path).await?;
        // Run migrations, setup WAL mode, etc.

        Ok(Self::new(CatalogConfig::default()))
    }

    /// Create a repository seeded with the demo file set
    pub fn with_examples(now: DateTime<Utc>) -> Self {
        let repo = Self::new(CatalogConfig::default());
        for record in example_files(now) {
            // Seeding cannot overflow the default cap
            let _ = repo.insert(record);
        }
        repo
    }

    /// Insert a file record
    pub fn insert(&self, record: FileRecord) -> Result<Uuid, CatalogError> {
        let mut files = self
            .files
            .lock()
            .map_err(|e| CatalogError::LockError(e.to_string()))?;

        // Enforce retention
        while files.len() >= self.max_records {
            files.remove(0);
        }

        let id = record.id;
        files.push(record);
        debug!("Inserted file {}", id);
        Ok(id)
    }

    /// Get a file by id
    pub fn get(&self, id: Uuid) -> Result<FileRecord, CatalogError> {
        let files = self
            .files
            .lock()
            .map_err(|e| CatalogError::LockError(e.to_string()))?;
        files
            .iter()
            .find(|f| f.id == id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    /// All records, archived included
    pub fn list(&self) -> Vec<FileRecord> {
        self.files.lock().map(|f| f.clone()).unwrap_or_default()
    }

    /// Records not yet archived
    pub fn active(&self) -> Vec<FileRecord> {
        self.files
            .lock()
            .map(|f| f.iter().filter(|r| !r.archived).cloned().collect())
            .unwrap_or_default()
    }

    /// Record an access, refreshing `last_accessed`
    pub fn touch(&self, id: Uuid, now: DateTime<Utc>) -> Result<(), CatalogError> {
        let mut files = self
            .files
            .lock()
            .map_err(|e| CatalogError::LockError(e.to_string()))?;
        let record = files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(CatalogError::NotFound)?;
        record.last_accessed = now;
        Ok(())
    }

    /// Mark the given files archived, returning how many changed
    pub fn mark_archived(&self, ids: &[Uuid]) -> Result<usize, CatalogError> {
        let mut files = self
            .files
            .lock()
            .map_err(|e| CatalogError::LockError(e.to_string()))?;

        let mut changed = 0;
        for record in files.iter_mut() {
            if !record.archived && ids.contains(&record.id) {
                record.archived = true;
                changed += 1;
            }
        }
        debug!("Archived {} files", changed);
        Ok(changed)
    }

    /// Total record count, archived included
    pub fn file_count(&self) -> usize {
        self.files.lock().map(|f| f.len()).unwrap_or(0)
    }

    /// Bytes held by unarchived files
    pub fn used_bytes(&self) -> u64 {
        self.files
            .lock()
            .map(|f| {
                f.iter()
                    .filter(|r| !r.archived)
                    .map(|r| r.size_bytes)
                    .sum()
            })
            .unwrap_or(0)
    }

    /// Clear all data (for testing)
    pub fn clear(&self) {
        if let Ok(mut files) = self.files.lock() {
            files.clear();
        }
    }
}

impl Default for FileRepository {
    fn default() -> Self {
        Self::new(CatalogConfig::default())
    }
}

const MB: u64 = 1024 * 1024;

/// Demo file set matching the dashboard sample data
fn example_files(now: DateTime<Utc>) -> Vec<FileRecord> {
    let aged = |days: i64| now - Duration::days(days);
    let mut records = vec![
        FileRecord::new("presentation.mp4", "/media", 145 * MB, aged(40)),
        FileRecord::new("project_backup.zip", "/backups", 98 * MB, aged(200)),
        FileRecord::new("design_files.psd", "/media/design", 87 * MB, aged(120)),
        FileRecord::new("annual_report.pdf", "/documents/reports", 12 * MB, aged(400)),
        FileRecord::new("contract_2023.docx", "/documents/legal", 2 * MB, aged(380)),
        FileRecord::new("team_photo.jpg", "/shared/public", 8 * MB, aged(90)),
        FileRecord::new("onboarding.mp3", "/media/audio", 24 * MB, aged(30)),
        FileRecord::new("budget_q1.xlsx", "/finance", 1 * MB, aged(60)),
        FileRecord::new("session.tmp", "/tmp", 5 * MB, aged(10)),
        FileRecord::new("release_notes.md", "/documents", 64 * 1024, aged(3)),
    ];
    // Stale last-access times for the access-criteria demos
    for record in records.iter_mut() {
        record.last_accessed = record.created_at + Duration::days(1);
    }
    records
}
