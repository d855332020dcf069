//! Repository port for application and history persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    ApplicationHistory, ApplicationStatus, ApplicationType, JobApplication, JobReference,
};

/// A (student, job) pair considered for creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidatePair {
    pub student_id: Uuid,
    pub job: JobReference,
}

/// Filters for querying applications
#[derive(Default, Debug, Clone)]
pub struct ApplicationFilter {
    pub student_id: Option<Uuid>,
    pub status: Option<ApplicationStatus>,
    pub application_type: Option<ApplicationType>,
    pub limit: Option<i64>,
}

/// Repository port for application persistence.
///
/// Every write that changes an application's status couples the
/// application row and its ledger row in one transaction, so readers
/// never observe one without the other.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Get an application by ID
    async fn get(&self, id: Uuid) -> DomainResult<Option<JobApplication>>;

    /// List applications with optional filters
    async fn list(&self, filter: ApplicationFilter) -> DomainResult<Vec<JobApplication>>;

    /// Count applications matching filters
    async fn count(&self, filter: ApplicationFilter) -> DomainResult<i64>;

    /// Return the subset of candidate pairs that already have an
    /// application, in candidate order
    async fn find_existing_pairs(
        &self,
        candidates: &[CandidatePair],
    ) -> DomainResult<Vec<CandidatePair>>;

    /// Insert a batch of applications and their creation ledger rows in
    /// one transaction; either everything commits or nothing does
    async fn insert_batch(
        &self,
        applications: &[JobApplication],
        history: &[ApplicationHistory],
    ) -> DomainResult<()>;

    /// Persist a status change guarded by the status the caller loaded,
    /// appending the ledger row in the same transaction
    async fn apply_transition(
        &self,
        application: &JobApplication,
        expected_status: ApplicationStatus,
        entry: &ApplicationHistory,
    ) -> DomainResult<()>;

    /// Full ledger for an application, oldest first
    async fn history_for(&self, application_id: Uuid) -> DomainResult<Vec<ApplicationHistory>>;

    /// Most recent ledger row for an application
    async fn latest_history(&self, application_id: Uuid)
        -> DomainResult<Option<ApplicationHistory>>;
}
