//! Schedule-Driven Runner

use crate::executor::{execute_rule, ArchivalOutcome};
use crate::rule::Schedule;
use crate::store::RuleStore;
use chrono::{DateTime, Utc};
use file_catalog::FileRepository;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Configuration for the archival scheduler
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How often the queue is rebuilt from the store to pick up
    /// rule changes (seconds)
    pub refresh_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { refresh_secs: 60 }
    }
}

/// A rule queued for automatic execution
#[derive(Debug, Clone)]
struct ScheduledRule {
    rule_id: Uuid,
    next_run: DateTime<Utc>,
}

impl Eq for ScheduledRule {}

impl PartialEq for ScheduledRule {
    fn eq(&self, other: &Self) -> bool {
        self.next_run == other.next_run && self.rule_id == other.rule_id
    }
}

impl Ord for ScheduledRule {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior (earliest time first)
        other
            .next_run
            .cmp(&self.next_run)
            .then_with(|| other.rule_id.cmp(&self.rule_id))
    }
}

impl PartialOrd for ScheduledRule {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Runs enabled, non-manual rules when their schedule comes due
pub struct ArchivalScheduler {
    /// Scheduled rules in a min-heap by next-run time
    queue: BinaryHeap<ScheduledRule>,
    config: SchedulerConfig,
    running: bool,
}

impl ArchivalScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            queue: BinaryHeap::new(),
            config,
            running: false,
        }
    }

    /// Rebuild the queue from the store's current rules
    fn resync(&mut self, store: &RuleStore, now: DateTime<Utc>) {
        self.queue.clear();
        for rule in store.list() {
            if !rule.enabled {
                continue;
            }
            if let Some(next_run) = rule.schedule.next_run(rule.last_run, now) {
                self.queue.push(ScheduledRule {
                    rule_id: rule.id,
                    next_run,
                });
            }
        }
        debug!("Scheduler queue holds {} rules", self.queue.len());
    }

    /// Run the scheduler loop
    ///
    /// Sleeps until the earliest queued rule is due, executes it against
    /// the catalog, and reschedules it. The queue is resynced from the
    /// store at least every `refresh_secs` so created, edited, and
    /// deleted rules are picked up.
    pub async fn run(
        &mut self,
        rules: Arc<RwLock<RuleStore>>,
        catalog: Arc<FileRepository>,
        outcome_tx: mpsc::Sender<ArchivalOutcome>,
    ) {
        info!("Starting archival scheduler");
        self.running = true;

        {
            let store = rules.read().await;
            self.resync(&store, Utc::now());
        }
        let refresh = Duration::from_secs(self.config.refresh_secs);

        while self.running {
            let entry = match self.queue.pop() {
                Some(entry) => entry,
                None => {
                    tokio::time::sleep(refresh).await;
                    let store = rules.read().await;
                    self.resync(&store, Utc::now());
                    continue;
                }
            };

            let now = Utc::now();
            if entry.next_run > now {
                let wait = (entry.next_run - now).to_std().unwrap_or_default();
                if wait > refresh {
                    // Not due for a while; wake early to pick up changes
                    self.queue.push(entry);
                    tokio::time::sleep(refresh).await;
                    let store = rules.read().await;
                    self.resync(&store, Utc::now());
                    continue;
                }
                tokio::time::sleep(wait).await;
            }

            let now = Utc::now();
            let mut store = rules.write().await;
            match store.get_mut(entry.rule_id) {
                Ok(rule) if rule.enabled && rule.schedule != Schedule::Manual => {
                    match execute_rule(rule, &catalog, now) {
                        Ok(outcome) => {
                            // Send outcome (non-blocking)
                            let _ = outcome_tx.try_send(outcome);
                        }
                        Err(e) => warn!("Archival rule {} failed: {}", entry.rule_id, e),
                    }
                    if let Some(next_run) = rule.schedule.next_run(rule.last_run, now) {
                        self.queue.push(ScheduledRule {
                            rule_id: rule.id,
                            next_run,
                        });
                    }
                }
                _ => debug!("Rule {} no longer schedulable", entry.rule_id),
            }
        }

        info!("Archival scheduler stopped");
    }

    /// Stop the scheduler
    pub fn stop(&mut self) {
        info!("Stopping archival scheduler");
        self.running = false;
    }

    /// Check if the scheduler is running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of queued rules
    pub fn rule_count(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::{Criteria, CriteriaKind, CriteriaUnit, RuleDraft};
    use chrono::Duration as ChronoDuration;
    use file_catalog::FileRecord;

    #[test]
    fn test_scheduled_rule_ordering() {
        let now = Utc::now();
        let mut heap = BinaryHeap::new();
        let late = ScheduledRule {
            rule_id: Uuid::new_v4(),
            next_run: now + ChronoDuration::hours(2),
        };
        let early = ScheduledRule {
            rule_id: Uuid::new_v4(),
            next_run: now + ChronoDuration::minutes(5),
        };
        heap.push(late.clone());
        heap.push(early.clone());

        assert_eq!(heap.pop().unwrap().rule_id, early.rule_id);
        assert_eq!(heap.pop().unwrap().rule_id, late.rule_id);
    }

    #[test]
    fn test_resync_skips_manual_and_disabled() {
        let mut store = RuleStore::new();
        store
            .create(RuleDraft {
                name: "Daily".to_string(),
                schedule: Schedule::Daily,
                ..Default::default()
            })
            .unwrap();
        store
            .create(RuleDraft {
                name: "Manual".to_string(),
                schedule: Schedule::Manual,
                ..Default::default()
            })
            .unwrap();
        store
            .create(RuleDraft {
                name: "Off".to_string(),
                schedule: Schedule::Daily,
                enabled: false,
                ..Default::default()
            })
            .unwrap();

        let mut scheduler = ArchivalScheduler::new(SchedulerConfig::default());
        scheduler.resync(&store, Utc::now());
        assert_eq!(scheduler.rule_count(), 1);
    }

    #[tokio::test]
    async fn test_due_rule_executes_and_reports() {
        let now = Utc::now();
        let catalog = Arc::new(FileRepository::default());
        catalog
            .insert(FileRecord::new(
                "old.pdf",
                "/documents",
                1024,
                now - ChronoDuration::days(400),
            ))
            .unwrap();

        let mut store = RuleStore::new();
        // Never-run daily rule is due immediately
        let rule_id = store
            .create(RuleDraft {
                name: "Old docs".to_string(),
                criteria: Criteria {
                    kind: CriteriaKind::Age,
                    value: 365,
                    unit: CriteriaUnit::Days,
                },
                schedule: Schedule::Daily,
                ..Default::default()
            })
            .unwrap();
        let rules = Arc::new(RwLock::new(store));

        let (tx, mut rx) = mpsc::channel(4);
        let mut scheduler = ArchivalScheduler::new(SchedulerConfig { refresh_secs: 1 });
        let runner = {
            let rules = rules.clone();
            let catalog = catalog.clone();
            tokio::spawn(async move { scheduler.run(rules, catalog, tx).await })
        };

        let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("scheduler did not report in time")
            .expect("outcome channel closed");
        runner.abort();

        assert_eq!(outcome.rule_id, rule_id);
        assert_eq!(outcome.files_archived, 1);
        assert!(rules.read().await.get(rule_id).unwrap().last_run.is_some());
        assert!(catalog.active().is_empty());
    }
}
