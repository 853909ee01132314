//! Usage Aggregation

use file_catalog::FileRecord;
use serde::Serialize;

const GB: u64 = 1024 * 1024 * 1024;

/// Analytics configuration
#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// Provisioned storage capacity in bytes
    pub capacity_bytes: u64,
    /// Days covered by the usage trend
    pub trend_days: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            capacity_bytes: 5 * GB,
            trend_days: 7,
        }
    }
}

/// Broad file category derived from the extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Images,
    Documents,
    Videos,
    Audio,
    Archives,
    Other,
}

impl FileCategory {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "png" | "gif" | "webp" | "svg" | "psd" => Self::Images,
            "pdf" | "doc" | "docx" | "txt" | "md" | "xls" | "xlsx" | "ppt" | "pptx" | "csv" => {
                Self::Documents
            }
            "mp4" | "mov" | "avi" | "mkv" | "webm" => Self::Videos,
            "mp3" | "wav" | "flac" | "ogg" | "m4a" => Self::Audio,
            "zip" | "tar" | "gz" | "rar" | "7z" => Self::Archives,
            _ => Self::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Images => "Images",
            Self::Documents => "Documents",
            Self::Videos => "Videos",
            Self::Audio => "Audio",
            Self::Archives => "Archives",
            Self::Other => "Other",
        }
    }

    const ALL: [FileCategory; 6] = [
        Self::Images,
        Self::Documents,
        Self::Videos,
        Self::Audio,
        Self::Archives,
        Self::Other,
    ];
}

/// Top-level storage numbers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSummary {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub total_files: usize,
    pub usage_percent: f64,
}

impl StorageSummary {
    /// Compute the summary over unarchived files
    pub fn compute(records: &[FileRecord], config: &AnalyticsConfig) -> Self {
        let active: Vec<&FileRecord> = records.iter().filter(|r| !r.archived).collect();
        let used_bytes: u64 = active.iter().map(|r| r.size_bytes).sum();
        let usage_percent = if config.capacity_bytes > 0 {
            (used_bytes as f64 / config.capacity_bytes as f64) * 100.0
        } else {
            0.0
        };
        Self {
            total_bytes: config.capacity_bytes,
            used_bytes,
            available_bytes: config.capacity_bytes.saturating_sub(used_bytes),
            total_files: active.len(),
            usage_percent,
        }
    }
}

/// Usage attributed to one category
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUsage {
    pub category: FileCategory,
    pub label: &'static str,
    pub bytes: u64,
    pub count: usize,
    pub percent_of_used: f64,
}

/// Per-category usage over unarchived files, largest share first
///
/// Empty categories are omitted.
pub fn breakdown(records: &[FileRecord]) -> Vec<CategoryUsage> {
    let active: Vec<&FileRecord> = records.iter().filter(|r| !r.archived).collect();
    let used: u64 = active.iter().map(|r| r.size_bytes).sum();

    let mut result: Vec<CategoryUsage> = FileCategory::ALL
        .iter()
        .filter_map(|&category| {
            let members: Vec<&&FileRecord> = active
                .iter()
                .filter(|r| FileCategory::from_extension(&r.file_type) == category)
                .collect();
            if members.is_empty() {
                return None;
            }
            let bytes: u64 = members.iter().map(|r| r.size_bytes).sum();
            let percent_of_used = if used > 0 {
                (bytes as f64 / used as f64) * 100.0
            } else {
                0.0
            };
            Some(CategoryUsage {
                category,
                label: category.label(),
                bytes,
                count: members.len(),
                percent_of_used,
            })
        })
        .collect();

    result.sort_by(|a, b| b.bytes.cmp(&a.bytes));
    result
}

/// The n largest unarchived files
pub fn largest_files(records: &[FileRecord], n: usize) -> Vec<FileRecord> {
    let mut active: Vec<FileRecord> = records.iter().filter(|r| !r.archived).cloned().collect();
    active.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    active.truncate(n);
    active
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn file(name: &str, size: u64) -> FileRecord {
        FileRecord::new(name, "/", size, Utc::now())
    }

    #[test]
    fn test_category_classification() {
        assert_eq!(FileCategory::from_extension("jpg"), FileCategory::Images);
        assert_eq!(FileCategory::from_extension("PDF"), FileCategory::Documents);
        assert_eq!(FileCategory::from_extension("mp4"), FileCategory::Videos);
        assert_eq!(FileCategory::from_extension("zip"), FileCategory::Archives);
        assert_eq!(FileCategory::from_extension("xyz"), FileCategory::Other);
    }

    #[test]
    fn test_summary_math() {
        let config = AnalyticsConfig {
            capacity_bytes: 1000,
            trend_days: 7,
        };
        let records = vec![file("a.jpg", 250), file("b.pdf", 250)];
        let summary = StorageSummary::compute(&records, &config);
        assert_eq!(summary.used_bytes, 500);
        assert_eq!(summary.available_bytes, 500);
        assert_eq!(summary.total_files, 2);
        assert!((summary.usage_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_summary_skips_archived() {
        let config = AnalyticsConfig::default();
        let mut archived = file("gone.zip", 400);
        archived.archived = true;
        let records = vec![archived, file("kept.zip", 100)];
        let summary = StorageSummary::compute(&records, &config);
        assert_eq!(summary.used_bytes, 100);
        assert_eq!(summary.total_files, 1);
    }

    #[test]
    fn test_breakdown_sorted_by_share() {
        let records = vec![
            file("a.jpg", 100),
            file("b.jpg", 100),
            file("c.mp4", 500),
            file("d.pdf", 50),
        ];
        let breakdown = breakdown(&records);
        assert_eq!(breakdown[0].category, FileCategory::Videos);
        assert_eq!(breakdown[0].count, 1);
        assert_eq!(breakdown[1].category, FileCategory::Images);
        assert_eq!(breakdown[1].bytes, 200);
        let total_percent: f64 = breakdown.iter().map(|c| c.percent_of_used).sum();
        assert!((total_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_largest_files() {
        let records = vec![file("small.bin", 10), file("big.bin", 1000), file("mid.bin", 100)];
        let top = largest_files(&records, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].name, "big.bin");
        assert_eq!(top[1].name, "mid.bin");
    }
}
