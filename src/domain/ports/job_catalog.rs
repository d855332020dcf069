//! Repository port for the job posting catalog.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{JobPosting, JobPostingState};

/// Repository port for catalog posting persistence.
#[async_trait]
pub trait JobCatalog: Send + Sync {
    /// Insert a new posting
    async fn insert(&self, posting: &JobPosting) -> DomainResult<()>;

    /// Get a posting by ID
    async fn get(&self, id: Uuid) -> DomainResult<Option<JobPosting>>;

    /// Fetch many postings by ID; missing ids are simply absent from
    /// the result
    async fn fetch_many(&self, ids: &[Uuid]) -> DomainResult<Vec<JobPosting>>;

    /// List postings, newest first
    async fn list(&self, limit: Option<i64>) -> DomainResult<Vec<JobPosting>>;

    /// Update a posting's lifecycle state
    async fn set_state(&self, id: Uuid, state: JobPostingState) -> DomainResult<()>;
}
