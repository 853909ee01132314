//! Access Policy Engine
//!
//! Role, group, user, and path scoped file access policies with
//! priority-ordered request-time evaluation.

mod engine;
mod policy;
mod store;

pub use engine::{AccessDecision, AccessRequest, Verdict};
pub use policy::{builtin_templates, AccessPolicy, Permission, PolicyDraft, PolicyKind};
pub use store::{PolicyStats, PolicyStore};

use thiserror::Error;
use uuid::Uuid;

/// Errors from policy validation and store operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// Name missing or blank
    #[error("Policy name is required")]
    NameRequired,

    /// Non-path policy without any target
    #[error("At least one target is required")]
    TargetsRequired,

    /// No policy with the given id
    #[error("Policy not found: {0}")]
    NotFound(Uuid),
}
