//! Rule Execution

use crate::rule::{ArchivalRule, CriteriaKind};
use crate::ArchivalError;
use chrono::{DateTime, Utc};
use file_catalog::{FileRecord, FileRepository};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Result of one rule execution
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivalOutcome {
    pub rule_id: Uuid,
    pub executed_at: DateTime<Utc>,
    pub files_archived: u64,
    pub bytes_archived: u64,
}

/// True when the file meets the rule's criteria
fn criteria_matches(rule: &ArchivalRule, file: &FileRecord, now: DateTime<Utc>) -> bool {
    match rule.criteria.kind {
        CriteriaKind::Age => rule
            .criteria
            .as_duration()
            .map(|d| now - file.created_at >= d)
            .unwrap_or(false),
        CriteriaKind::Access => rule
            .criteria
            .as_duration()
            .map(|d| now - file.last_accessed >= d)
            .unwrap_or(false),
        CriteriaKind::Size => rule
            .criteria
            .as_bytes()
            .map(|b| file.size_bytes > b)
            .unwrap_or(false),
    }
}

/// Run a rule against the catalog, archiving every matching file
///
/// Updates the rule's run history in place. Disabled rules refuse to run.
pub fn execute_rule(
    rule: &mut ArchivalRule,
    catalog: &FileRepository,
    now: DateTime<Utc>,
) -> Result<ArchivalOutcome, ArchivalError> {
    if !rule.enabled {
        return Err(ArchivalError::RuleDisabled(rule.id));
    }

    let matching: Vec<FileRecord> = catalog
        .active()
        .into_iter()
        .filter(|f| rule.applies_to_type(&f.file_type) && criteria_matches(rule, f, now))
        .collect();

    let ids: Vec<Uuid> = matching.iter().map(|f| f.id).collect();
    let archived = catalog.mark_archived(&ids)? as u64;
    let bytes_archived: u64 = matching.iter().map(|f| f.size_bytes).sum();

    rule.last_run = Some(now);
    rule.files_archived += archived;

    info!(
        "Archival rule {} archived {} files ({} bytes)",
        rule.name, archived, bytes_archived
    );

    Ok(ArchivalOutcome {
        rule_id: rule.id,
        executed_at: now,
        files_archived: archived,
        bytes_archived,
    })
}
