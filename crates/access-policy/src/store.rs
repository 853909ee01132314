//! Policy Store

use crate::policy::{AccessPolicy, Permission, PolicyDraft, PolicyKind};
use crate::PolicyError;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Aggregate counts shown on the policy overview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyStats {
    pub total: usize,
    pub active: usize,
    pub users_covered: u64,
    pub role_policies: usize,
    pub path_restrictions: usize,
}

/// In-memory access policy store
///
/// Records keep insertion order; evaluation applies its own priority
/// ordering.
#[derive(Debug, Default)]
pub struct PolicyStore {
    policies: Vec<AccessPolicy>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demo policy set
    pub fn with_examples() -> Self {
        let mut store = Self::new();
        for policy in example_policies() {
            store.policies.push(policy);
        }
        info!("Seeded {} access policies", store.policies.len());
        store
    }

    /// Validate and add a new policy
    pub fn create(&mut self, draft: PolicyDraft, now: DateTime<Utc>) -> Result<Uuid, PolicyError> {
        draft.validate()?;
        let policy = draft.into_policy(now);
        let id = policy.id;
        debug!("Created access policy {} ({})", policy.name, id);
        self.policies.push(policy);
        Ok(id)
    }

    /// Replace the editable fields of an existing policy
    ///
    /// Id, creation date, and the applied-to counter survive the edit.
    pub fn update(&mut self, id: Uuid, draft: PolicyDraft) -> Result<(), PolicyError> {
        draft.validate()?;
        let policy = self
            .policies
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PolicyError::NotFound(id))?;

        policy.name = draft.name;
        policy.description = draft.description;
        policy.kind = draft.kind;
        policy.permissions = draft.permissions;
        policy.targets = draft.targets;
        policy.paths = draft.paths;
        policy.enabled = draft.enabled;
        policy.priority = draft.priority;
        policy.inherit_parent = draft.inherit_parent;
        policy.expiry = draft.expiry;
        debug!("Updated access policy {}", id);
        Ok(())
    }

    /// Remove exactly the policy with the given id
    pub fn delete(&mut self, id: Uuid) -> Result<(), PolicyError> {
        let before = self.policies.len();
        self.policies.retain(|p| p.id != id);
        if self.policies.len() == before {
            return Err(PolicyError::NotFound(id));
        }
        debug!("Deleted access policy {}", id);
        Ok(())
    }

    /// Flip the enabled flag, returning the new state
    pub fn toggle(&mut self, id: Uuid) -> Result<bool, PolicyError> {
        let policy = self
            .policies
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(PolicyError::NotFound(id))?;
        policy.enabled = !policy.enabled;
        debug!("Policy {} enabled = {}", id, policy.enabled);
        Ok(policy.enabled)
    }

    pub fn get(&self, id: Uuid) -> Result<&AccessPolicy, PolicyError> {
        self.policies
            .iter()
            .find(|p| p.id == id)
            .ok_or(PolicyError::NotFound(id))
    }

    /// All policies in insertion order
    pub fn list(&self) -> &[AccessPolicy] {
        &self.policies
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn stats(&self) -> PolicyStats {
        PolicyStats {
            total: self.policies.len(),
            active: self.policies.iter().filter(|p| p.enabled).count(),
            users_covered: self.policies.iter().map(|p| p.applied_to).sum(),
            role_policies: self
                .policies
                .iter()
                .filter(|p| p.kind == PolicyKind::Role)
                .count(),
            path_restrictions: self
                .policies
                .iter()
                .filter(|p| p.kind == PolicyKind::Path)
                .count(),
        }
    }

    pub(crate) fn policies_mut(&mut self) -> &mut [AccessPolicy] {
        &mut self.policies
    }
}

/// Demo policy set matching the dashboard sample data
fn example_policies() -> Vec<AccessPolicy> {
    let seeded = |draft: PolicyDraft, year: i32, month: u32, day: u32| {
        let created = Utc
            .with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        draft.into_policy(created)
    };

    vec![
        seeded(
            PolicyDraft {
                name: "Admin Full Access".to_string(),
                description: "Full access to all files and folders".to_string(),
                kind: PolicyKind::Role,
                permissions: vec![
                    Permission::Read,
                    Permission::Write,
                    Permission::Delete,
                    Permission::Share,
                    Permission::Manage,
                ],
                targets: vec!["admin".to_string(), "super-admin".to_string()],
                paths: vec!["/".to_string()],
                priority: 1,
                ..Default::default()
            },
            2024,
            1,
            1,
        ),
        seeded(
            PolicyDraft {
                name: "Department Read-Only".to_string(),
                description: "Read-only access to department documents".to_string(),
                kind: PolicyKind::Group,
                permissions: vec![Permission::Read],
                targets: vec![
                    "marketing".to_string(),
                    "sales".to_string(),
                    "hr".to_string(),
                ],
                paths: vec![
                    "/documents/department".to_string(),
                    "/shared/public".to_string(),
                ],
                priority: 2,
                ..Default::default()
            },
            2024,
            1,
            10,
        ),
        seeded(
            PolicyDraft {
                name: "Guest Limited Access".to_string(),
                description: "Limited access to public files only".to_string(),
                kind: PolicyKind::User,
                permissions: vec![Permission::Read],
                targets: vec!["guest".to_string(), "visitor".to_string()],
                paths: vec!["/public".to_string()],
                priority: 3,
                ..Default::default()
            },
            2024,
            1,
            15,
        ),
        seeded(
            PolicyDraft {
                name: "Restricted Financial Data".to_string(),
                description: "Restrict access to financial documents".to_string(),
                kind: PolicyKind::Path,
                permissions: vec![],
                targets: vec!["all".to_string()],
                paths: vec!["/finance".to_string(), "/accounting".to_string()],
                priority: 0,
                ..Default::default()
            },
            2024,
            1,
            20,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> PolicyDraft {
        PolicyDraft {
            name: name.to_string(),
            targets: vec!["admin".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_create_and_get() {
        let mut store = PolicyStore::new();
        let id = store.create(draft("Admins"), Utc::now()).unwrap();
        assert_eq!(store.get(id).unwrap().name, "Admins");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_rejects_invalid_draft() {
        let mut store = PolicyStore::new();
        let invalid = PolicyDraft::default();
        assert!(store.create(invalid, Utc::now()).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut store = PolicyStore::new();
        let a = store.create(draft("A"), Utc::now()).unwrap();
        let b = store.create(draft("B"), Utc::now()).unwrap();

        store.delete(a).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get(b).is_ok());
        assert_eq!(store.delete(a), Err(PolicyError::NotFound(a)));
    }

    #[test]
    fn test_toggle_flips_only_enabled() {
        let mut store = PolicyStore::new();
        let id = store.create(draft("Toggled"), Utc::now()).unwrap();
        let before = store.get(id).unwrap().clone();

        assert!(!store.toggle(id).unwrap());
        let after = store.get(id).unwrap();
        assert!(!after.enabled);
        assert_eq!(after.name, before.name);
        assert_eq!(after.priority, before.priority);
        assert_eq!(after.targets, before.targets);
        assert_eq!(after.created_date, before.created_date);

        assert!(store.toggle(id).unwrap());
    }

    #[test]
    fn test_update_preserves_identity_fields() {
        let mut store = PolicyStore::new();
        let now = Utc::now();
        let id = store.create(draft("Before"), now).unwrap();
        let created = store.get(id).unwrap().created_date;

        let mut edit = draft("After");
        edit.priority = 7;
        store.update(id, edit).unwrap();

        let policy = store.get(id).unwrap();
        assert_eq!(policy.name, "After");
        assert_eq!(policy.priority, 7);
        assert_eq!(policy.created_date, created);
        assert_eq!(policy.applied_to, 0);
    }

    #[test]
    fn test_stats() {
        let store = PolicyStore::with_examples();
        let stats = store.stats();
        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 4);
        assert_eq!(stats.role_policies, 1);
        assert_eq!(stats.path_restrictions, 1);
    }
}
