//! Domain error types for the candidacy engine.

use thiserror::Error;
use uuid::Uuid;

use crate::domain::models::ApplicationStatus;

/// A (student, job) pair that collided with an existing application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    pub student_id: Uuid,
    /// Catalog posting id or external job id, as supplied by the caller.
    pub job_key: String,
}

impl std::fmt::Display for DuplicatePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "student {} / job {}", self.student_id, self.job_key)
    }
}

/// Domain-specific errors for application lifecycle operations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Application not found: {0}")]
    ApplicationNotFound(Uuid),

    #[error("Job posting not found: {0}")]
    JobNotFound(Uuid),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Duplicate application(s) detected{}", format_sample_detail(.sample, .total, "pair(s)"))]
    DuplicateApplications {
        /// Bounded sample of the colliding pairs, for error messages.
        sample: Vec<DuplicatePair>,
        /// Total collisions found, which may exceed the sample length.
        total: usize,
    },

    #[error("Referenced job posting(s) missing or inactive{}", format_sample_detail(.sample, .total, "id(s)"))]
    ReferenceNotFound {
        /// Bounded sample of the missing or inactive posting ids.
        sample: Vec<Uuid>,
        /// Total offending ids, which may exceed the sample length.
        total: usize,
    },

    #[error("Invalid status transition from {from} to {to}: {reason}")]
    InvalidTransition {
        from: ApplicationStatus,
        to: ApplicationStatus,
        reason: String,
    },

    #[error("History integrity violation for application {application_id}: {reason}")]
    HistoryIntegrity { application_id: Uuid, reason: String },

    #[error("Student {student_id} has no active service entitlement")]
    EntitlementDenied { student_id: Uuid },

    #[error("Concurrency conflict: {entity} {id} was modified by another operation")]
    ConcurrencyConflict { entity: String, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Render a bounded error sample for display.
///
/// Batch failures report a sample instead of the full offending set so
/// the payload stays small however large the batch was. An empty sample
/// produces no suffix (constraint-level collisions carry no detail).
fn format_sample_detail<T: std::fmt::Display>(sample: &[T], total: &usize, unit: &str) -> String {
    if sample.is_empty() {
        return String::new();
    }
    let shown = sample
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if *total > sample.len() {
        format!(": {total} {unit}, including {shown}")
    } else {
        format!(": {shown}")
    }
}
