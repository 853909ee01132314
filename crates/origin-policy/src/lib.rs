//! Origin Policy Engine
//!
//! Allow/deny rules matched against request origins, by exact URL or
//! regex pattern, with first-match evaluation and default deny.

mod matcher;
mod policy;
mod store;

pub use matcher::CompiledMatcher;
pub use policy::{OriginDraft, OriginPolicy, PatternType, RuleAction};
pub use store::{OriginDecision, OriginFilter, OriginStats, OriginStore};

use thiserror::Error;
use uuid::Uuid;

/// Errors from origin policy validation and store operations
#[derive(Debug, Error)]
pub enum OriginError {
    /// Origin missing or blank
    #[error("Origin is required")]
    OriginRequired,

    /// Description missing or blank
    #[error("Description is required")]
    DescriptionRequired,

    /// Origin does not parse as a URL
    #[error("Invalid origin URL: {0}")]
    InvalidUrl(String),

    /// Origin does not compile as a regex
    #[error("Invalid origin pattern: {0}")]
    InvalidPattern(String),

    /// No policy with the given id
    #[error("Origin policy not found: {0}")]
    NotFound(Uuid),
}
