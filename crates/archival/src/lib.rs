//! Archival Engine
//!
//! Criteria-based rules for moving old, large, or unused files to the
//! archive, with a schedule-driven async runner.

mod executor;
mod rule;
mod scheduler;
mod store;

pub use executor::{execute_rule, ArchivalOutcome};
pub use rule::{
    builtin_templates, ArchivalRule, Criteria, CriteriaKind, CriteriaUnit, RuleDraft, Schedule,
};
pub use scheduler::{ArchivalScheduler, SchedulerConfig};
pub use store::{RuleStats, RuleStore};

use thiserror::Error;
use uuid::Uuid;

/// Errors from rule validation, store operations, and execution
#[derive(Debug, Error)]
pub enum ArchivalError {
    /// Name missing or blank
    #[error("Rule name is required")]
    NameRequired,

    /// Criteria value/unit combination does not make sense
    #[error("Invalid criteria: {0}")]
    InvalidCriteria(String),

    /// No rule with the given id
    #[error("Archival rule not found: {0}")]
    NotFound(Uuid),

    /// Execution requested for a disabled rule
    #[error("Archival rule {0} is disabled")]
    RuleDisabled(Uuid),

    /// Catalog failure during execution
    #[error("Catalog error: {0}")]
    Catalog(#[from] file_catalog::CatalogError),
}
