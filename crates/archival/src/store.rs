//! Rule Store

use crate::rule::{ArchivalRule, Criteria, CriteriaKind, CriteriaUnit, RuleDraft, Schedule};
use crate::ArchivalError;
use chrono::{TimeZone, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

/// Aggregate counts shown on the archive overview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleStats {
    pub total: usize,
    pub enabled: usize,
    pub files_archived: u64,
}

/// In-memory archival rule store
#[derive(Debug, Default)]
pub struct RuleStore {
    rules: Vec<ArchivalRule>,
}

impl RuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the demo rule set
    pub fn with_examples() -> Self {
        let mut store = Self::new();
        for rule in example_rules() {
            store.rules.push(rule);
        }
        info!("Seeded {} archival rules", store.rules.len());
        store
    }

    /// Validate and add a new rule
    pub fn create(&mut self, draft: RuleDraft) -> Result<Uuid, ArchivalError> {
        draft.validate()?;
        let rule = draft.into_rule();
        let id = rule.id;
        debug!("Created archival rule {} ({})", rule.name, id);
        self.rules.push(rule);
        Ok(id)
    }

    /// Replace the editable fields of an existing rule
    ///
    /// Run history (`last_run`, `files_archived`) survives the edit.
    pub fn update(&mut self, id: Uuid, draft: RuleDraft) -> Result<(), ArchivalError> {
        draft.validate()?;
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ArchivalError::NotFound(id))?;

        rule.name = draft.name;
        rule.description = draft.description;
        rule.criteria = draft.criteria;
        rule.file_types = draft.file_types;
        rule.schedule = draft.schedule;
        rule.enabled = draft.enabled;
        debug!("Updated archival rule {}", id);
        Ok(())
    }

    /// Remove exactly the rule with the given id
    pub fn delete(&mut self, id: Uuid) -> Result<(), ArchivalError> {
        let before = self.rules.len();
        self.rules.retain(|r| r.id != id);
        if self.rules.len() == before {
            return Err(ArchivalError::NotFound(id));
        }
        debug!("Deleted archival rule {}", id);
        Ok(())
    }

    /// Flip the enabled flag, returning the new state
    pub fn toggle(&mut self, id: Uuid) -> Result<bool, ArchivalError> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ArchivalError::NotFound(id))?;
        rule.enabled = !rule.enabled;
        Ok(rule.enabled)
    }

    pub fn get(&self, id: Uuid) -> Result<&ArchivalRule, ArchivalError> {
        self.rules
            .iter()
            .find(|r| r.id == id)
            .ok_or(ArchivalError::NotFound(id))
    }

    pub fn get_mut(&mut self, id: Uuid) -> Result<&mut ArchivalRule, ArchivalError> {
        self.rules
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(ArchivalError::NotFound(id))
    }

    /// All rules in insertion order
    pub fn list(&self) -> &[ArchivalRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn stats(&self) -> RuleStats {
        RuleStats {
            total: self.rules.len(),
            enabled: self.rules.iter().filter(|r| r.enabled).count(),
            files_archived: self.rules.iter().map(|r| r.files_archived).sum(),
        }
    }
}

/// Demo rule set matching the dashboard sample data
fn example_rules() -> Vec<ArchivalRule> {
    let ts = |year, month, day| {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now)
    };

    let mut old_documents = RuleDraft {
        name: "Old Documents Archive".to_string(),
        description: "Archive documents older than 1 year".to_string(),
        criteria: Criteria {
            kind: CriteriaKind::Age,
            value: 365,
            unit: CriteriaUnit::Days,
        },
        file_types: vec!["pdf".to_string(), "doc".to_string(), "docx".to_string()],
        schedule: Schedule::Weekly,
        ..Default::default()
    }
    .into_rule();
    old_documents.last_run = Some(ts(2024, 1, 15));
    old_documents.files_archived = 145;

    let mut large_files = RuleDraft {
        name: "Large Files Cleanup".to_string(),
        description: "Archive files larger than 100MB".to_string(),
        criteria: Criteria {
            kind: CriteriaKind::Size,
            value: 100,
            unit: CriteriaUnit::Megabytes,
        },
        file_types: vec!["all".to_string()],
        schedule: Schedule::Monthly,
        ..Default::default()
    }
    .into_rule();
    large_files.last_run = Some(ts(2024, 1, 10));
    large_files.files_archived = 23;

    let mut unused_media = RuleDraft {
        name: "Unused Media Files".to_string(),
        description: "Archive media files not accessed in 6 months".to_string(),
        criteria: Criteria {
            kind: CriteriaKind::Access,
            value: 180,
            unit: CriteriaUnit::Days,
        },
        file_types: vec![
            "jpg".to_string(),
            "png".to_string(),
            "mp4".to_string(),
            "mov".to_string(),
        ],
        schedule: Schedule::Monthly,
        ..Default::default()
    }
    .into_rule();
    unused_media.enabled = false;

    vec![old_documents, large_files, unused_media]
}
