//! Append-only status history ledger.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::application::{ApplicationStatus, JobApplication};

/// One row in an application's status ledger.
///
/// Rows are only ever appended. `seq` is a 1-based per-application ordinal
/// assigned by storage at insert time; it gives a total order even when
/// rows created in one batch transaction share a timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationHistory {
    /// Unique ledger row identifier
    pub id: Uuid,
    /// Application this row belongs to
    pub application_id: Uuid,
    /// Position in the application's ledger, assigned by storage
    pub seq: i64,
    /// Status before the change; `None` marks the creation row
    pub previous_status: Option<ApplicationStatus>,
    /// Status after the change
    pub new_status: ApplicationStatus,
    /// Actor who made the change
    pub changed_by: Uuid,
    /// Free-form reason supplied by the actor
    pub change_reason: Option<String>,
    /// Structured context (batch id, mentor id, rollback provenance)
    pub change_metadata: HashMap<String, serde_json::Value>,
    /// When the change happened
    pub created_at: DateTime<Utc>,
}

impl ApplicationHistory {
    /// Ledger row recording an application's creation.
    ///
    /// Creation rows have no previous status and share the application's
    /// batch timestamp.
    pub fn creation(application: &JobApplication, changed_by: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            application_id: application.id,
            seq: 0,
            previous_status: None,
            new_status: application.status,
            changed_by,
            change_reason: None,
            change_metadata: HashMap::new(),
            created_at: application.recommended_at,
        }
    }

    /// Ledger row recording a status transition that already happened on
    /// the model.
    pub fn transition(
        application: &JobApplication,
        previous_status: ApplicationStatus,
        changed_by: Uuid,
        change_reason: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            application_id: application.id,
            seq: 0,
            previous_status: Some(previous_status),
            new_status: application.status,
            changed_by,
            change_reason,
            change_metadata: HashMap::new(),
            created_at: application.updated_at,
        }
    }

    /// Attach a metadata entry (builder pattern).
    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.change_metadata.insert(key.to_string(), value);
        self
    }

    /// Whether this row records the application's creation.
    pub fn is_creation(&self) -> bool {
        self.previous_status.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::application::{ApplicationType, JobReference};

    fn sample_application() -> JobApplication {
        JobApplication::new(
            Uuid::new_v4(),
            ApplicationType::Referral,
            JobReference::Catalog(Uuid::new_v4()),
            "QA Engineer".to_string(),
            "Initech".to_string(),
            Uuid::new_v4(),
            Utc::now(),
        )
    }

    #[test]
    fn creation_row_has_no_previous_status() {
        let application = sample_application();
        let actor = Uuid::new_v4();
        let row = ApplicationHistory::creation(&application, actor);

        assert!(row.is_creation());
        assert_eq!(row.new_status, ApplicationStatus::Recommended);
        assert_eq!(row.changed_by, actor);
        assert_eq!(row.created_at, application.recommended_at);
    }

    #[test]
    fn transition_row_records_both_statuses() {
        let mut application = sample_application();
        let previous = application.status;
        application
            .transition_to(ApplicationStatus::Interested)
            .unwrap();

        let row = ApplicationHistory::transition(
            &application,
            previous,
            Uuid::new_v4(),
            Some("student replied".to_string()),
        );
        assert!(!row.is_creation());
        assert_eq!(row.previous_status, Some(ApplicationStatus::Recommended));
        assert_eq!(row.new_status, ApplicationStatus::Interested);
        assert_eq!(row.change_reason.as_deref(), Some("student replied"));
    }

    #[test]
    fn metadata_builder_accumulates_entries() {
        let application = sample_application();
        let row = ApplicationHistory::creation(&application, Uuid::new_v4())
            .with_metadata("batch_id", serde_json::json!("b-1"))
            .with_metadata("source", serde_json::json!("import"));

        assert_eq!(row.change_metadata.len(), 2);
        assert_eq!(
            row.change_metadata.get("batch_id"),
            Some(&serde_json::json!("b-1"))
        );
    }
}
