//! Origin Store and Evaluation

use crate::matcher::CompiledMatcher;
use crate::policy::{OriginDraft, OriginPolicy, PatternType, RuleAction};
use crate::OriginError;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// A stored policy with its compiled matcher
#[derive(Debug, Clone)]
struct OriginEntry {
    policy: OriginPolicy,
    matcher: CompiledMatcher,
}

/// Aggregate counts shown on the origin overview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginStats {
    pub total: usize,
    pub allow: usize,
    pub deny: usize,
    pub active: usize,
}

/// List filter: search term over origin/description plus action filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OriginFilter {
    pub search: Option<String>,
    pub action: Option<RuleAction>,
}

/// Outcome of evaluating an origin against the store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginDecision {
    pub allowed: bool,
    /// The policy that decided, absent on default deny
    pub matched_policy: Option<Uuid>,
}

/// In-memory origin policy store
///
/// Entries keep creation order, which is also evaluation order.
#[derive(Debug, Default)]
pub struct OriginStore {
    entries: Vec<OriginEntry>,
}

impl OriginStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demo policy set
    pub fn with_examples() -> Self {
        let mut store = Self::new();
        for (draft, year, month, day) in example_drafts() {
            let created = Utc
                .with_ymd_and_hms(year, month, day, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now);
            // Seed drafts are known-valid
            if let Err(e) = store.create(draft, created) {
                debug!("Skipping seed origin policy: {}", e);
            }
        }
        info!("Seeded {} origin policies", store.entries.len());
        store
    }

    /// Validate, compile, and add a new policy
    pub fn create(&mut self, draft: OriginDraft, now: DateTime<Utc>) -> Result<Uuid, OriginError> {
        draft.validate()?;
        let policy = draft.into_policy(now);
        let matcher = CompiledMatcher::compile(&policy)?;
        let id = policy.id;
        debug!("Created origin policy {} for {}", id, policy.origin);
        self.entries.push(OriginEntry { policy, matcher });
        Ok(id)
    }

    /// Replace the editable fields of an existing policy, recompiling
    pub fn update(&mut self, id: Uuid, draft: OriginDraft) -> Result<(), OriginError> {
        draft.validate()?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.policy.id == id)
            .ok_or(OriginError::NotFound(id))?;

        entry.policy.origin = draft.origin;
        entry.policy.pattern_type = draft.pattern_type;
        entry.policy.action = draft.action;
        entry.policy.description = draft.description;
        entry.policy.enabled = draft.enabled;
        entry.matcher = CompiledMatcher::compile(&entry.policy)?;
        debug!("Updated origin policy {}", id);
        Ok(())
    }

    /// Remove exactly the policy with the given id
    pub fn delete(&mut self, id: Uuid) -> Result<(), OriginError> {
        let before = self.entries.len();
        self.entries.retain(|e| e.policy.id != id);
        if self.entries.len() == before {
            return Err(OriginError::NotFound(id));
        }
        debug!("Deleted origin policy {}", id);
        Ok(())
    }

    /// Flip the enabled flag, returning the new state
    pub fn toggle(&mut self, id: Uuid) -> Result<bool, OriginError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.policy.id == id)
            .ok_or(OriginError::NotFound(id))?;
        entry.policy.enabled = !entry.policy.enabled;
        Ok(entry.policy.enabled)
    }

    pub fn get(&self, id: Uuid) -> Result<&OriginPolicy, OriginError> {
        self.entries
            .iter()
            .find(|e| e.policy.id == id)
            .map(|e| &e.policy)
            .ok_or(OriginError::NotFound(id))
    }

    /// All policies in creation order
    pub fn list(&self) -> Vec<&OriginPolicy> {
        self.entries.iter().map(|e| &e.policy).collect()
    }

    /// Policies matching the search term and action filter
    pub fn search(&self, filter: &OriginFilter) -> Vec<&OriginPolicy> {
        let term = filter
            .search
            .as_deref()
            .unwrap_or("")
            .to_ascii_lowercase();
        self.entries
            .iter()
            .map(|e| &e.policy)
            .filter(|p| {
                let matches_term = term.is_empty()
                    || p.origin.to_ascii_lowercase().contains(&term)
                    || p.description.to_ascii_lowercase().contains(&term);
                let matches_action = filter.action.map(|a| p.action == a).unwrap_or(true);
                matches_term && matches_action
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> OriginStats {
        OriginStats {
            total: self.entries.len(),
            allow: self
                .entries
                .iter()
                .filter(|e| e.policy.action == RuleAction::Allow)
                .count(),
            deny: self
                .entries
                .iter()
                .filter(|e| e.policy.action == RuleAction::Deny)
                .count(),
            active: self.entries.iter().filter(|e| e.policy.enabled).count(),
        }
    }

    /// Decide an origin against the enabled policies
    ///
    /// Policies are tested in creation order; the first match decides and
    /// gets its `last_used` refreshed. No match means deny.
    pub fn evaluate(&mut self, origin: &str, now: DateTime<Utc>) -> OriginDecision {
        for entry in self.entries.iter_mut() {
            if !entry.policy.enabled {
                continue;
            }
            if entry.matcher.is_match(origin) {
                entry.policy.last_used = Some(now);
                let allowed = entry.policy.action == RuleAction::Allow;
                debug!(
                    "Origin {} {} by policy {}",
                    origin,
                    if allowed { "allowed" } else { "denied" },
                    entry.policy.id
                );
                return OriginDecision {
                    allowed,
                    matched_policy: Some(entry.policy.id),
                };
            }
        }
        debug!("Origin {} denied: no matching policy", origin);
        OriginDecision {
            allowed: false,
            matched_policy: None,
        }
    }
}

/// Demo policy set matching the dashboard sample data
fn example_drafts() -> Vec<(OriginDraft, i32, u32, u32)> {
    vec![
        (
            OriginDraft {
                origin: "https://example.com".to_string(),
                pattern_type: PatternType::Url,
                action: RuleAction::Allow,
                description: "Production website access".to_string(),
                enabled: true,
            },
            2024,
            1,
            15,
        ),
        (
            OriginDraft {
                origin: "https://test.malicious-site.com".to_string(),
                pattern_type: PatternType::Url,
                action: RuleAction::Deny,
                description: "Blocked malicious domain".to_string(),
                enabled: true,
            },
            2024,
            1,
            10,
        ),
        (
            OriginDraft {
                origin: r".*\.staging\.example\.com$".to_string(),
                pattern_type: PatternType::Regex,
                action: RuleAction::Allow,
                description: "All staging subdomains".to_string(),
                enabled: false,
            },
            2024,
            1,
            12,
        ),
        (
            OriginDraft {
                origin: r"https://(dev|test)\..*".to_string(),
                pattern_type: PatternType::Regex,
                action: RuleAction::Allow,
                description: "Development and test environments".to_string(),
                enabled: true,
            },
            2024,
            1,
            14,
        ),
    ]
}
