//! Batch importer
//!
//! Creates one staff member per valid record. Records are independent: a
//! failure is collected and the loop continues; no transaction spans the
//! batch. Uniqueness of email/employee id doubles as the per-row idempotency
//! key, so re-submitting a partially applied batch reports the already
//! created rows as duplicate failures instead of creating them twice.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use serde::Serialize;
use thiserror::Error;

use super::normalize::NormalizedRecord;
use crate::entity::staff_member;
use crate::notify::Notifier;

/// What kind of roster is being imported
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RosterKind {
    Staff,
    Student,
}

impl RosterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterKind::Staff => "staff",
            RosterKind::Student => "student",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "staff" => Some(RosterKind::Staff),
            "student" => Some(RosterKind::Student),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("duplicate {field}: {value}")]
    Duplicate { field: &'static str, value: String },

    #[error("{0}")]
    Other(String),
}

impl From<sea_orm::DbErr> for SinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        SinkError::Other(err.to_string())
    }
}

/// Persistence seam for the importer
#[async_trait]
pub trait RosterSink: Send + Sync {
    async fn create(&self, record: &NormalizedRecord, kind: RosterKind) -> Result<(), SinkError>;
}

/// Per-record failure detail; index is the position within the imported batch
#[derive(Clone, Debug, Serialize)]
pub struct ImportFailure {
    pub index: usize,
    pub error: String,
}

/// Aggregate result of one batch import - the sole return contract of the
/// pipeline
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub total_successful: usize,
    pub total_failed: usize,
    pub failures: Vec<ImportFailure>,
}

/// Run the batch over pre-filtered valid records, sequentially. For student
/// rosters a welcome notification is queued per created record; queuing never
/// blocks and never fails the row.
pub async fn run_import(
    sink: &dyn RosterSink,
    notifier: &dyn Notifier,
    records: &[NormalizedRecord],
    kind: RosterKind,
) -> ImportReport {
    let mut report = ImportReport::default();

    for (index, record) in records.iter().enumerate() {
        match sink.create(record, kind).await {
            Ok(()) => {
                report.total_successful += 1;
                if kind == RosterKind::Student {
                    let full_name = format!("{} {}", record.first_name, record.last_name);
                    notifier.queue_welcome(&record.email, &full_name);
                }
            }
            Err(e) => {
                tracing::warn!("Import row {} failed: {}", index, e);
                report.total_failed += 1;
                report.failures.push(ImportFailure {
                    index,
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

/// Production sink backed by sea-orm
pub struct SeaOrmRosterSink {
    db: DatabaseConnection,
}

impl SeaOrmRosterSink {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RosterSink for SeaOrmRosterSink {
    async fn create(&self, record: &NormalizedRecord, kind: RosterKind) -> Result<(), SinkError> {
        // Pre-checks give descriptive duplicate messages; the unique indexes
        // on the table still backstop a concurrent insert.
        let email_taken = staff_member::Entity::find()
            .filter(staff_member::Column::Email.eq(&record.email))
            .one(&self.db)
            .await?;
        if email_taken.is_some() {
            return Err(SinkError::Duplicate {
                field: "email",
                value: record.email.clone(),
            });
        }

        if !record.employee_id.is_empty() {
            let id_taken = staff_member::Entity::find()
                .filter(staff_member::Column::EmployeeId.eq(&record.employee_id))
                .one(&self.db)
                .await?;
            if id_taken.is_some() {
                return Err(SinkError::Duplicate {
                    field: "employee id",
                    value: record.employee_id.clone(),
                });
            }
        }

        let employee_id = if record.employee_id.is_empty() {
            None
        } else {
            Some(record.employee_id.clone())
        };

        let member = staff_member::ActiveModel {
            first_name: Set(record.first_name.clone()),
            last_name: Set(record.last_name.clone()),
            department_code: Set(record.department.clone()),
            email: Set(record.email.clone()),
            role: Set(record.role.clone()),
            designation: Set(record.designation.clone()),
            employee_id: Set(employee_id),
            phone: Set(record.phone.clone()),
            admin_notes: Set(record.admin_notes.clone()),
            is_active: Set(record.is_active),
            is_verified: Set(record.is_verified),
            kind: Set(kind.as_str().to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        member.insert(&self.db).await.map_err(|e| {
            let text = e.to_string();
            if text.contains("duplicate key") || text.contains("unique constraint") {
                SinkError::Duplicate {
                    field: "email or employee id",
                    value: record.email.clone(),
                }
            } else {
                SinkError::Other(text)
            }
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::CountingNotifier;
    use std::collections::HashSet;
    use std::sync::atomic::Ordering;
    use std::sync::Mutex;

    /// In-memory sink that rejects duplicate employee ids and emails
    #[derive(Default)]
    struct MemorySink {
        seen_emails: Mutex<HashSet<String>>,
        seen_employee_ids: Mutex<HashSet<String>>,
    }

    #[async_trait]
    impl RosterSink for MemorySink {
        async fn create(
            &self,
            record: &NormalizedRecord,
            _kind: RosterKind,
        ) -> Result<(), SinkError> {
            if !self.seen_emails.lock().unwrap().insert(record.email.clone()) {
                return Err(SinkError::Duplicate {
                    field: "email",
                    value: record.email.clone(),
                });
            }
            if !record.employee_id.is_empty()
                && !self
                    .seen_employee_ids
                    .lock()
                    .unwrap()
                    .insert(record.employee_id.clone())
            {
                return Err(SinkError::Duplicate {
                    field: "employee id",
                    value: record.employee_id.clone(),
                });
            }
            Ok(())
        }
    }

    fn record(n: usize) -> NormalizedRecord {
        NormalizedRecord {
            first_name: format!("First{}", n),
            last_name: format!("Last{}", n),
            department: "CSE".to_string(),
            email: format!("person{}@college.edu", n),
            employee_id: format!("EMP{:03}", n),
            role: "other_staff".to_string(),
            is_active: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_all_records_succeed() {
        let sink = MemorySink::default();
        let notifier = CountingNotifier::default();
        let records: Vec<_> = (0..4).map(record).collect();

        let report = run_import(&sink, &notifier, &records, RosterKind::Staff).await;
        assert_eq!(report.total_successful, 4);
        assert_eq!(report.total_failed, 0);
        assert!(report.failures.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_mid_batch_does_not_abort() {
        let sink = MemorySink::default();
        let notifier = CountingNotifier::default();
        let mut records: Vec<_> = (0..5).map(record).collect();
        // Record 2 reuses record 1's employee id
        records[2].employee_id = records[1].employee_id.clone();

        let report = run_import(&sink, &notifier, &records, RosterKind::Staff).await;
        assert_eq!(report.total_successful, 4);
        assert_eq!(report.total_failed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 2);
        assert!(report.failures[0].error.contains("employee id"));
    }

    #[tokio::test]
    async fn test_student_import_queues_welcome_per_created_record() {
        let sink = MemorySink::default();
        let notifier = CountingNotifier::default();
        let mut records: Vec<_> = (0..3).map(record).collect();
        records[1].email = records[0].email.clone();

        let report = run_import(&sink, &notifier, &records, RosterKind::Student).await;
        assert_eq!(report.total_successful, 2);
        // No notification for the failed row
        assert_eq!(notifier.queued.load(Ordering::SeqCst), 2);
        assert_eq!(report.failures[0].index, 1);
    }

    #[tokio::test]
    async fn test_staff_import_queues_no_welcome() {
        let sink = MemorySink::default();
        let notifier = CountingNotifier::default();
        let records: Vec<_> = (0..2).map(record).collect();

        run_import(&sink, &notifier, &records, RosterKind::Staff).await;
        assert_eq!(notifier.queued.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_roster_kind_parse() {
        assert_eq!(RosterKind::parse("staff"), Some(RosterKind::Staff));
        assert_eq!(RosterKind::parse("student"), Some(RosterKind::Student));
        assert_eq!(RosterKind::parse("alumni"), None);
    }
}
