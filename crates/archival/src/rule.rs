//! Archival Rule Records

use crate::ArchivalError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a criteria measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CriteriaKind {
    /// Time since the file was created
    Age,
    /// File size threshold
    Size,
    /// Time since the file was last accessed
    Access,
}

/// Unit of the criteria value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CriteriaUnit {
    #[serde(rename = "days")]
    Days,
    #[serde(rename = "KB")]
    Kilobytes,
    #[serde(rename = "MB")]
    Megabytes,
    #[serde(rename = "GB")]
    Gigabytes,
}

/// Selection criteria for a rule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criteria {
    #[serde(rename = "type")]
    pub kind: CriteriaKind,
    pub value: u64,
    pub unit: CriteriaUnit,
}

impl Criteria {
    pub fn validate(&self) -> Result<(), ArchivalError> {
        if self.value == 0 {
            return Err(ArchivalError::InvalidCriteria(
                "criteria value must be positive".to_string(),
            ));
        }
        match (self.kind, self.unit) {
            (CriteriaKind::Age | CriteriaKind::Access, CriteriaUnit::Days) => Ok(()),
            (CriteriaKind::Age | CriteriaKind::Access, _) => Err(ArchivalError::InvalidCriteria(
                "age and access criteria take days".to_string(),
            )),
            (CriteriaKind::Size, CriteriaUnit::Days) => Err(ArchivalError::InvalidCriteria(
                "size criteria take a byte unit".to_string(),
            )),
            (CriteriaKind::Size, _) => Ok(()),
        }
    }

    /// Duration threshold for age/access criteria
    pub fn as_duration(&self) -> Option<Duration> {
        match self.kind {
            CriteriaKind::Age | CriteriaKind::Access => Some(Duration::days(self.value as i64)),
            CriteriaKind::Size => None,
        }
    }

    /// Byte threshold for size criteria
    pub fn as_bytes(&self) -> Option<u64> {
        match self.unit {
            CriteriaUnit::Kilobytes => Some(self.value * 1024),
            CriteriaUnit::Megabytes => Some(self.value * 1024 * 1024),
            CriteriaUnit::Gigabytes => Some(self.value * 1024 * 1024 * 1024),
            CriteriaUnit::Days => None,
        }
    }
}

/// When a rule runs automatically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    /// Only via explicit run requests
    Manual,
    Daily,
    Weekly,
    Monthly,
}

impl Schedule {
    /// Interval between automatic runs, None for manual rules
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Schedule::Manual => None,
            Schedule::Daily => Some(Duration::days(1)),
            Schedule::Weekly => Some(Duration::weeks(1)),
            // Fixed 30-day month
            Schedule::Monthly => Some(Duration::days(30)),
        }
    }

    /// Next automatic run time; never-run rules are due immediately
    pub fn next_run(
        &self,
        last_run: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Option<DateTime<Utc>> {
        let interval = self.interval()?;
        Some(match last_run {
            Some(last) => last + interval,
            None => now,
        })
    }
}

/// An archival rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivalRule {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub criteria: Criteria,
    /// Extensions the rule applies to; `["all"]` matches everything
    pub file_types: Vec<String>,
    pub schedule: Schedule,
    pub enabled: bool,
    pub last_run: Option<DateTime<Utc>>,
    pub files_archived: u64,
}

impl ArchivalRule {
    /// True when the rule's type filter covers the extension
    pub fn applies_to_type(&self, file_type: &str) -> bool {
        self.file_types.iter().any(|t| t == "all")
            || self
                .file_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(file_type))
    }
}

/// Editable fields of a rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub criteria: Criteria,
    #[serde(default = "default_file_types")]
    pub file_types: Vec<String>,
    #[serde(default = "default_schedule")]
    pub schedule: Schedule,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_file_types() -> Vec<String> {
    vec!["all".to_string()]
}

fn default_schedule() -> Schedule {
    Schedule::Weekly
}

fn default_true() -> bool {
    true
}

impl Default for RuleDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            criteria: Criteria {
                kind: CriteriaKind::Age,
                value: 30,
                unit: CriteriaUnit::Days,
            },
            file_types: default_file_types(),
            schedule: Schedule::Weekly,
            enabled: true,
        }
    }
}

impl RuleDraft {
    pub fn validate(&self) -> Result<(), ArchivalError> {
        if self.name.trim().is_empty() {
            return Err(ArchivalError::NameRequired);
        }
        self.criteria.validate()
    }

    /// Materialize the draft into a new rule record
    pub fn into_rule(self) -> ArchivalRule {
        ArchivalRule {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            criteria: self.criteria,
            file_types: self.file_types,
            schedule: self.schedule,
            enabled: self.enabled,
            last_run: None,
            files_archived: 0,
        }
    }
}

/// Quick-start rule templates offered to operators
pub fn builtin_templates() -> Vec<RuleDraft> {
    vec![
        RuleDraft {
            name: "Old Documents".to_string(),
            description: "Archive documents older than 1 year".to_string(),
            criteria: Criteria {
                kind: CriteriaKind::Age,
                value: 365,
                unit: CriteriaUnit::Days,
            },
            file_types: vec!["pdf".to_string(), "doc".to_string(), "docx".to_string()],
            schedule: Schedule::Monthly,
            ..Default::default()
        },
        RuleDraft {
            name: "Large Files".to_string(),
            description: "Archive files larger than 500MB".to_string(),
            criteria: Criteria {
                kind: CriteriaKind::Size,
                value: 500,
                unit: CriteriaUnit::Megabytes,
            },
            file_types: vec!["all".to_string()],
            schedule: Schedule::Weekly,
            ..Default::default()
        },
        RuleDraft {
            name: "Temporary Files".to_string(),
            description: "Archive temp files older than 7 days".to_string(),
            criteria: Criteria {
                kind: CriteriaKind::Age,
                value: 7,
                unit: CriteriaUnit::Days,
            },
            file_types: vec![
                "tmp".to_string(),
                "temp".to_string(),
                "cache".to_string(),
            ],
            schedule: Schedule::Daily,
            ..Default::default()
        },
        RuleDraft {
            name: "Unused Media".to_string(),
            description: "Archive media files not accessed in 3 months".to_string(),
            criteria: Criteria {
                kind: CriteriaKind::Access,
                value: 90,
                unit: CriteriaUnit::Days,
            },
            file_types: vec![
                "jpg".to_string(),
                "png".to_string(),
                "gif".to_string(),
                "mp4".to_string(),
                "avi".to_string(),
            ],
            schedule: Schedule::Monthly,
            ..Default::default()
        },
    ]
}
