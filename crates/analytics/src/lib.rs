//! Storage Analytics
//!
//! Usage summaries, per-category breakdowns, and trend series computed
//! from the file catalog.

mod trend;
mod usage;

pub use trend::{usage_trend, UsagePoint};
pub use usage::{
    breakdown, largest_files, AnalyticsConfig, CategoryUsage, FileCategory, StorageSummary,
};
