//! Request-Time Evaluation

use crate::policy::{path_covers, AccessPolicy, Permission, PolicyKind};
use crate::store::PolicyStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// A proposed file operation awaiting a decision
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    pub user_id: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    pub path: String,
    pub permission: Permission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Allow,
    Deny,
}

/// Outcome of evaluating a request against the store
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub verdict: Verdict,
    /// The policy that decided, absent on default deny
    pub matched_policy: Option<Uuid>,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }

    fn default_deny() -> Self {
        Self {
            verdict: Verdict::Deny,
            matched_policy: None,
        }
    }
}

/// True when the policy's subject selection covers the requesting actor
fn subject_matches(policy: &AccessPolicy, request: &AccessRequest) -> bool {
    match policy.kind {
        PolicyKind::Role => policy.targets.iter().any(|t| request.roles.contains(t)),
        PolicyKind::Group => policy.targets.iter().any(|t| request.groups.contains(t)),
        PolicyKind::User => policy.targets.iter().any(|t| t == &request.user_id),
        // Path policies ignore targets
        PolicyKind::Path => true,
    }
}

fn path_matches(policy: &AccessPolicy, request: &AccessRequest) -> bool {
    policy.paths.iter().any(|p| path_covers(p, &request.path))
}

impl PolicyStore {
    /// Decide a request against the enabled policies
    ///
    /// Candidates are scanned in ascending priority (0 wins, ties broken by
    /// creation date). The first policy whose kind, targets, and paths cover
    /// the request decides: requested permission in its set means allow,
    /// otherwise deny. No candidate means deny.
    pub fn evaluate(&mut self, request: &AccessRequest, now: DateTime<Utc>) -> AccessDecision {
        let mut candidates: Vec<usize> = self
            .policies_mut()
            .iter()
            .enumerate()
            .filter(|(_, p)| {
                p.enabled
                    && !p.is_expired(now)
                    && subject_matches(p, request)
                    && path_matches(p, request)
            })
            .map(|(i, _)| i)
            .collect();

        let policies = self.policies_mut();
        candidates.sort_by_key(|&i| (policies[i].priority, policies[i].created_date));

        match candidates.first() {
            Some(&i) => {
                let policy = &mut policies[i];
                policy.applied_to += 1;
                let verdict = if policy.permissions.contains(&request.permission) {
                    Verdict::Allow
                } else {
                    Verdict::Deny
                };
                debug!(
                    "Access {:?} for {} on {} by policy {}",
                    verdict, request.user_id, request.path, policy.id
                );
                AccessDecision {
                    verdict,
                    matched_policy: Some(policy.id),
                }
            }
            None => {
                debug!(
                    "Access denied for {} on {}: no matching policy",
                    request.user_id, request.path
                );
                AccessDecision::default_deny()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyDraft;

    fn request(path: &str, permission: Permission) -> AccessRequest {
        AccessRequest {
            user_id: "u-1".to_string(),
            roles: vec!["editor".to_string()],
            groups: vec!["marketing".to_string()],
            path: path.to_string(),
            permission,
        }
    }

    fn role_draft(name: &str, priority: u32, permissions: Vec<Permission>) -> PolicyDraft {
        PolicyDraft {
            name: name.to_string(),
            permissions,
            targets: vec!["editor".to_string()],
            paths: vec!["/content".to_string()],
            priority,
            ..Default::default()
        }
    }

    #[test]
    fn test_default_deny_on_empty_store() {
        let mut store = PolicyStore::new();
        let decision = store.evaluate(&request("/content/post.md", Permission::Read), Utc::now());
        assert_eq!(decision.verdict, Verdict::Deny);
        assert!(decision.matched_policy.is_none());
    }

    #[test]
    fn test_first_match_grants_requested_permission() {
        let mut store = PolicyStore::new();
        let now = Utc::now();
        let id = store
            .create(
                role_draft("Editors", 1, vec![Permission::Read, Permission::Write]),
                now,
            )
            .unwrap();

        let decision = store.evaluate(&request("/content/post.md", Permission::Write), now);
        assert!(decision.is_allowed());
        assert_eq!(decision.matched_policy, Some(id));

        // Matched policy without the requested permission denies
        let decision = store.evaluate(&request("/content/post.md", Permission::Delete), now);
        assert_eq!(decision.verdict, Verdict::Deny);
        assert_eq!(decision.matched_policy, Some(id));
    }

    #[test]
    fn test_priority_zero_wins() {
        let mut store = PolicyStore::new();
        let now = Utc::now();
        store
            .create(role_draft("Broad allow", 2, vec![Permission::Read]), now)
            .unwrap();
        let restrict = store
            .create(role_draft("Restrict", 0, vec![]), now)
            .unwrap();

        let decision = store.evaluate(&request("/content/post.md", Permission::Read), now);
        assert_eq!(decision.verdict, Verdict::Deny);
        assert_eq!(decision.matched_policy, Some(restrict));
    }

    #[test]
    fn test_priority_tie_broken_by_age() {
        let mut store = PolicyStore::new();
        let older = Utc::now() - chrono::Duration::days(1);
        let newer = Utc::now();
        let first = store
            .create(role_draft("Older", 1, vec![Permission::Read]), older)
            .unwrap();
        store
            .create(role_draft("Newer", 1, vec![]), newer)
            .unwrap();

        let decision = store.evaluate(&request("/content/post.md", Permission::Read), newer);
        assert_eq!(decision.matched_policy, Some(first));
        assert_eq!(decision.verdict, Verdict::Allow);
    }

    #[test]
    fn test_disabled_and_expired_policies_skipped() {
        let mut store = PolicyStore::new();
        let now = Utc::now();

        let disabled = store
            .create(role_draft("Disabled", 0, vec![Permission::Read]), now)
            .unwrap();
        store.toggle(disabled).unwrap();

        let mut expired_draft = role_draft("Expired", 0, vec![Permission::Read]);
        expired_draft.expiry = Some(now - chrono::Duration::hours(1));
        store.create(expired_draft, now).unwrap();

        let decision = store.evaluate(&request("/content/post.md", Permission::Read), now);
        assert_eq!(decision.verdict, Verdict::Deny);
        assert!(decision.matched_policy.is_none());
    }

    #[test]
    fn test_path_policy_ignores_targets() {
        let mut store = PolicyStore::new();
        let now = Utc::now();
        let restrict = store
            .create(
                PolicyDraft {
                    name: "Restrict finance".to_string(),
                    kind: PolicyKind::Path,
                    permissions: vec![],
                    targets: vec![],
                    paths: vec!["/finance".to_string()],
                    priority: 0,
                    ..Default::default()
                },
                now,
            )
            .unwrap();

        let decision = store.evaluate(&request("/finance/ledger.xlsx", Permission::Read), now);
        assert_eq!(decision.verdict, Verdict::Deny);
        assert_eq!(decision.matched_policy, Some(restrict));
    }

    #[test]
    fn test_non_matching_path_falls_through() {
        let mut store = PolicyStore::new();
        let now = Utc::now();
        store
            .create(role_draft("Editors", 1, vec![Permission::Read]), now)
            .unwrap();

        let decision = store.evaluate(&request("/elsewhere/file.txt", Permission::Read), now);
        assert_eq!(decision.verdict, Verdict::Deny);
        assert!(decision.matched_policy.is_none());
    }

    #[test]
    fn test_evaluation_bumps_applied_to() {
        let mut store = PolicyStore::new();
        let now = Utc::now();
        let id = store
            .create(role_draft("Editors", 1, vec![Permission::Read]), now)
            .unwrap();

        store.evaluate(&request("/content/a.md", Permission::Read), now);
        store.evaluate(&request("/content/b.md", Permission::Read), now);
        assert_eq!(store.get(id).unwrap().applied_to, 2);
    }

    #[test]
    fn test_example_policies_deny_finance_for_guests() {
        let mut store = PolicyStore::with_examples();
        let now = Utc::now();
        let req = AccessRequest {
            user_id: "guest".to_string(),
            roles: vec![],
            groups: vec![],
            path: "/finance/report.pdf".to_string(),
            permission: Permission::Read,
        };
        let decision = store.evaluate(&req, now);
        assert_eq!(decision.verdict, Verdict::Deny);
        assert!(decision.matched_policy.is_some());
    }
}
