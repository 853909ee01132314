//! Origin Policy Records

use crate::OriginError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the origin string is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// Exact match against a literal URL
    Url,
    /// Regex match against the origin string
    Regex,
}

/// Effect of a matching policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Deny,
}

/// An origin allow/deny rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginPolicy {
    pub id: Uuid,
    pub origin: String,
    pub pattern_type: PatternType,
    #[serde(rename = "type")]
    pub action: RuleAction,
    pub description: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub last_used: Option<DateTime<Utc>>,
}

/// Editable fields of an origin policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginDraft {
    pub origin: String,
    #[serde(default = "default_pattern_type")]
    pub pattern_type: PatternType,
    #[serde(rename = "type", default = "default_action")]
    pub action: RuleAction,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_pattern_type() -> PatternType {
    PatternType::Url
}

fn default_action() -> RuleAction {
    RuleAction::Allow
}

fn default_true() -> bool {
    true
}

impl Default for OriginDraft {
    fn default() -> Self {
        Self {
            origin: String::new(),
            pattern_type: PatternType::Url,
            action: RuleAction::Allow,
            description: String::new(),
            enabled: true,
        }
    }
}

impl OriginDraft {
    /// Check required fields and that the origin parses for its type
    ///
    /// URL patterns must parse as URLs, regex patterns must compile.
    pub fn validate(&self) -> Result<(), OriginError> {
        if self.origin.trim().is_empty() {
            return Err(OriginError::OriginRequired);
        }
        if self.description.trim().is_empty() {
            return Err(OriginError::DescriptionRequired);
        }
        match self.pattern_type {
            PatternType::Url => {
                url::Url::parse(&self.origin)
                    .map_err(|e| OriginError::InvalidUrl(e.to_string()))?;
            }
            PatternType::Regex => {
                regex::Regex::new(&self.origin)
                    .map_err(|e| OriginError::InvalidPattern(e.to_string()))?;
            }
        }
        Ok(())
    }

    /// Materialize the draft into a new policy record
    pub fn into_policy(self, now: DateTime<Utc>) -> OriginPolicy {
        OriginPolicy {
            id: Uuid::new_v4(),
            origin: self.origin,
            pattern_type: self.pattern_type,
            action: self.action,
            description: self.description,
            enabled: self.enabled,
            created_at: now,
            last_used: None,
        }
    }
}
