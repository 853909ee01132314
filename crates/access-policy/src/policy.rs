//! Access Policy Records

use crate::PolicyError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission grantable by a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Read,
    Write,
    Delete,
    Share,
    Manage,
}

/// How a policy selects its subjects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    /// Matches actors holding one of the target roles
    Role,
    /// Matches actors in one of the target groups
    Group,
    /// Matches the target user ids directly
    User,
    /// Matches on path alone; targets are ignored
    Path,
}

/// A file access policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessPolicy {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PolicyKind,
    pub permissions: Vec<Permission>,
    pub targets: Vec<String>,
    /// Path prefixes the policy covers
    pub paths: Vec<String>,
    pub enabled: bool,
    /// 0 is the highest precedence
    pub priority: u32,
    pub inherit_parent: bool,
    pub expiry: Option<DateTime<Utc>>,
    pub created_date: DateTime<Utc>,
    /// Actors the policy has decided for
    pub applied_to: u64,
}

impl AccessPolicy {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.map(|e| e <= now).unwrap_or(false)
    }
}

/// Editable fields of a policy, as submitted by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: PolicyKind,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default = "default_paths")]
    pub paths: Vec<String>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_priority")]
    pub priority: u32,
    #[serde(default = "default_true")]
    pub inherit_parent: bool,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

fn default_paths() -> Vec<String> {
    vec!["/".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_priority() -> u32 {
    1
}

impl Default for PolicyDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            kind: PolicyKind::Role,
            permissions: Vec::new(),
            targets: Vec::new(),
            paths: default_paths(),
            enabled: true,
            priority: default_priority(),
            inherit_parent: true,
            expiry: None,
        }
    }
}

impl PolicyDraft {
    /// Check required fields
    ///
    /// Path policies are valid with an empty target list; every other kind
    /// needs at least one target.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if self.name.trim().is_empty() {
            return Err(PolicyError::NameRequired);
        }
        if self.targets.is_empty() && self.kind != PolicyKind::Path {
            return Err(PolicyError::TargetsRequired);
        }
        Ok(())
    }

    /// Materialize the draft into a new policy record
    pub fn into_policy(self, now: DateTime<Utc>) -> AccessPolicy {
        AccessPolicy {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            kind: self.kind,
            permissions: self.permissions,
            targets: self.targets,
            paths: self.paths,
            enabled: self.enabled,
            priority: self.priority,
            inherit_parent: self.inherit_parent,
            expiry: self.expiry,
            created_date: now,
            applied_to: 0,
        }
    }
}

/// True when `prefix` covers `path` on whole segments
///
/// "/finance" covers "/finance" and "/finance/q1.pdf" but not "/finances".
pub(crate) fn path_covers(prefix: &str, path: &str) -> bool {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        // "/" covers everything
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Quick-start policy templates offered to operators
pub fn builtin_templates() -> Vec<PolicyDraft> {
    vec![
        PolicyDraft {
            name: "Full Admin Access".to_string(),
            description: "Complete access to all files and functions".to_string(),
            kind: PolicyKind::Role,
            permissions: vec![
                Permission::Read,
                Permission::Write,
                Permission::Delete,
                Permission::Share,
                Permission::Manage,
            ],
            targets: vec!["admin".to_string()],
            paths: vec!["/".to_string()],
            priority: 1,
            ..Default::default()
        },
        PolicyDraft {
            name: "Editor Access".to_string(),
            description: "Read and write access to content files".to_string(),
            kind: PolicyKind::Role,
            permissions: vec![Permission::Read, Permission::Write, Permission::Share],
            targets: vec!["editor".to_string()],
            paths: vec!["/content".to_string(), "/media".to_string()],
            priority: 2,
            ..Default::default()
        },
        PolicyDraft {
            name: "Viewer Only".to_string(),
            description: "Read-only access to public files".to_string(),
            kind: PolicyKind::Group,
            permissions: vec![Permission::Read],
            targets: vec!["viewers".to_string()],
            paths: vec!["/public".to_string()],
            priority: 3,
            ..Default::default()
        },
        PolicyDraft {
            name: "Department Restricted".to_string(),
            description: "Block access to sensitive department files".to_string(),
            kind: PolicyKind::Path,
            permissions: vec![],
            targets: vec!["all".to_string()],
            paths: vec!["/confidential".to_string()],
            priority: 0,
            ..Default::default()
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_required() {
        let draft = PolicyDraft {
            name: "  ".to_string(),
            targets: vec!["admin".to_string()],
            ..Default::default()
        };
        assert_eq!(draft.validate(), Err(PolicyError::NameRequired));
    }

    #[test]
    fn test_targets_required_for_role_policy() {
        let draft = PolicyDraft {
            name: "No targets".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.validate(), Err(PolicyError::TargetsRequired));
    }

    #[test]
    fn test_path_policy_allows_empty_targets() {
        let draft = PolicyDraft {
            name: "Restrict finance".to_string(),
            kind: PolicyKind::Path,
            paths: vec!["/finance".to_string()],
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_path_covers_whole_segments() {
        assert!(path_covers("/finance", "/finance"));
        assert!(path_covers("/finance", "/finance/q1.pdf"));
        assert!(path_covers("/finance/", "/finance/q1.pdf"));
        assert!(!path_covers("/finance", "/finances"));
        assert!(path_covers("/", "/anything/at/all"));
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let mut policy = PolicyDraft {
            name: "Temp".to_string(),
            targets: vec!["admin".to_string()],
            ..Default::default()
        }
        .into_policy(now);

        assert!(!policy.is_expired(now));
        policy.expiry = Some(now - chrono::Duration::hours(1));
        assert!(policy.is_expired(now));
    }

    #[test]
    fn test_wire_format_uses_camel_case() {
        let policy = PolicyDraft {
            name: "Wire".to_string(),
            targets: vec!["admin".to_string()],
            ..Default::default()
        }
        .into_policy(Utc::now());

        let json = serde_json::to_value(&policy).unwrap();
        assert_eq!(json["type"], "role");
        assert!(json.get("createdDate").is_some());
        assert!(json.get("appliedTo").is_some());
        assert!(json.get("inheritParent").is_some());
    }

    #[test]
    fn test_builtin_templates_validate() {
        let templates = builtin_templates();
        assert_eq!(templates.len(), 4);
        for template in templates {
            assert!(template.validate().is_ok());
        }
    }
}
