//! Batch application creation for the proxy and referral flows.
//!
//! One request fans out to the full cartesian product of students and
//! jobs. The whole batch commits or fails as a unit: validation, the
//! duplicate pre-check, and the size cap all run before anything is
//! written, and the storage layer's unique indexes catch races the
//! pre-check cannot see.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult, DuplicatePair};
use crate::domain::models::{
    ApplicationHistory, BatchConfig, ExternalJob, JobApplication, JobPosting, JobReference,
};
use crate::domain::ports::{ApplicationRepository, CandidatePair, EntitlementGate, JobCatalog};
use crate::services::event_bus::{EventBus, StatusChangedEvent};

/// Request to create proxy applications for externally sourced jobs.
#[derive(Debug, Clone)]
pub struct ProxyBatchRequest {
    pub student_ids: Vec<Uuid>,
    pub jobs: Vec<ExternalJob>,
    pub created_by: Uuid,
}

/// Request to create referral applications against catalog postings.
#[derive(Debug, Clone)]
pub struct ReferralBatchRequest {
    pub student_ids: Vec<Uuid>,
    pub job_ids: Vec<Uuid>,
    pub recommended_by: Uuid,
}

/// Service that creates application batches.
pub struct BatchApplicationCreator<R, C, E>
where
    R: ApplicationRepository,
    C: JobCatalog,
    E: EntitlementGate,
{
    applications: Arc<R>,
    catalog: Arc<C>,
    entitlements: Arc<E>,
    events: Arc<EventBus>,
    config: BatchConfig,
}

impl<R, C, E> BatchApplicationCreator<R, C, E>
where
    R: ApplicationRepository,
    C: JobCatalog,
    E: EntitlementGate,
{
    pub fn new(
        applications: Arc<R>,
        catalog: Arc<C>,
        entitlements: Arc<E>,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            applications,
            catalog,
            entitlements,
            events,
            config: BatchConfig::default(),
        }
    }

    /// Create with custom batch limits.
    pub fn with_config(mut self, config: BatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Create one proxy application per (student, external job) pair.
    ///
    /// Proxy applications consume a service entitlement and start in
    /// `submitted`. Returns the created applications in student-major
    /// order.
    #[instrument(skip(self, request), fields(students = request.student_ids.len(), jobs = request.jobs.len()))]
    pub async fn create_proxy_batch(
        &self,
        request: ProxyBatchRequest,
    ) -> DomainResult<Vec<JobApplication>> {
        let ProxyBatchRequest {
            student_ids,
            jobs,
            created_by,
        } = request;

        ensure_actor(created_by)?;
        let student_ids = dedupe_students(student_ids)?;
        let jobs = dedupe_external_jobs(jobs)?;
        for job in &jobs {
            job.validate()?;
        }
        self.ensure_within_cap(student_ids.len(), jobs.len())?;

        for student_id in &student_ids {
            if !self.entitlements.check(*student_id).await? {
                return Err(DomainError::EntitlementDenied {
                    student_id: *student_id,
                });
            }
        }

        let candidates: Vec<CandidatePair> = student_ids
            .iter()
            .flat_map(|student_id| {
                jobs.iter().map(|job| CandidatePair {
                    student_id: *student_id,
                    job: JobReference::External(job.external_id.clone()),
                })
            })
            .collect();
        self.ensure_no_duplicates(&candidates).await?;

        let batch_id = Uuid::new_v4();
        let now = Utc::now();
        let mut created = Vec::with_capacity(candidates.len());
        let mut ledger = Vec::with_capacity(candidates.len());
        for student_id in &student_ids {
            for job in &jobs {
                let application = JobApplication::new_proxy(*student_id, job, created_by, now);
                let entry = ApplicationHistory::creation(&application, created_by)
                    .with_metadata("batch_id", serde_json::json!(batch_id));
                created.push(application);
                ledger.push(entry);
            }
        }

        self.applications.insert_batch(&created, &ledger).await?;

        info!(
            count = created.len(),
            batch_id = %batch_id,
            "created proxy application batch"
        );
        for application in &created {
            self.events
                .publish(StatusChangedEvent::creation(application, created_by));
        }

        Ok(created)
    }

    /// Create one referral application per (student, posting) pair.
    ///
    /// Every posting must exist and be active. Referral applications
    /// start in `recommended` and carry a mentor later in the workflow.
    /// Returns the created applications in student-major order.
    #[instrument(skip(self, request), fields(students = request.student_ids.len(), jobs = request.job_ids.len()))]
    pub async fn create_referral_batch(
        &self,
        request: ReferralBatchRequest,
    ) -> DomainResult<Vec<JobApplication>> {
        let ReferralBatchRequest {
            student_ids,
            job_ids,
            recommended_by,
        } = request;

        ensure_actor(recommended_by)?;
        let student_ids = dedupe_students(student_ids)?;
        let job_ids = dedupe_job_ids(job_ids)?;
        self.ensure_within_cap(student_ids.len(), job_ids.len())?;

        let postings = self.fetch_active_postings(&job_ids).await?;

        let candidates: Vec<CandidatePair> = student_ids
            .iter()
            .flat_map(|student_id| {
                job_ids.iter().map(|job_id| CandidatePair {
                    student_id: *student_id,
                    job: JobReference::Catalog(*job_id),
                })
            })
            .collect();
        self.ensure_no_duplicates(&candidates).await?;

        let batch_id = Uuid::new_v4();
        let now = Utc::now();
        let mut created = Vec::with_capacity(candidates.len());
        let mut ledger = Vec::with_capacity(candidates.len());
        for student_id in &student_ids {
            for posting in &postings {
                let application =
                    JobApplication::new_referral(*student_id, posting, recommended_by, now);
                let entry = ApplicationHistory::creation(&application, recommended_by)
                    .with_metadata("batch_id", serde_json::json!(batch_id));
                created.push(application);
                ledger.push(entry);
            }
        }

        self.applications.insert_batch(&created, &ledger).await?;

        info!(
            count = created.len(),
            batch_id = %batch_id,
            "created referral application batch"
        );
        for application in &created {
            self.events
                .publish(StatusChangedEvent::creation(application, recommended_by));
        }

        Ok(created)
    }

    /// Load the requested postings and fail if any are missing or not
    /// accepting applications, preserving the requested order.
    async fn fetch_active_postings(&self, job_ids: &[Uuid]) -> DomainResult<Vec<JobPosting>> {
        let fetched = self.catalog.fetch_many(job_ids).await?;

        let mut ordered = Vec::with_capacity(job_ids.len());
        let mut rejected = Vec::new();
        for job_id in job_ids {
            match fetched.iter().find(|p| p.id == *job_id) {
                Some(posting) if posting.is_active() => ordered.push(posting.clone()),
                _ => rejected.push(*job_id),
            }
        }

        if rejected.is_empty() {
            Ok(ordered)
        } else {
            let total = rejected.len();
            rejected.truncate(self.config.duplicate_sample_size);
            Err(DomainError::ReferenceNotFound {
                sample: rejected,
                total,
            })
        }
    }

    async fn ensure_no_duplicates(&self, candidates: &[CandidatePair]) -> DomainResult<()> {
        let existing = self.applications.find_existing_pairs(candidates).await?;
        if existing.is_empty() {
            return Ok(());
        }

        let total = existing.len();
        let sample = existing
            .into_iter()
            .take(self.config.duplicate_sample_size)
            .map(|pair| DuplicatePair {
                student_id: pair.student_id,
                job_key: pair.job.key(),
            })
            .collect();
        Err(DomainError::DuplicateApplications { sample, total })
    }

    /// The cap guards memory and transaction size, so it runs before any
    /// database work.
    fn ensure_within_cap(&self, students: usize, jobs: usize) -> DomainResult<()> {
        let pairs = students * jobs;
        if pairs > self.config.max_pairs {
            return Err(DomainError::Validation(format!(
                "batch would create {pairs} applications, exceeding the cap of {}",
                self.config.max_pairs
            )));
        }
        Ok(())
    }
}

fn ensure_actor(actor: Uuid) -> DomainResult<()> {
    if actor.is_nil() {
        return Err(DomainError::Validation(
            "acting staff member id must be set".to_string(),
        ));
    }
    Ok(())
}

/// Order-preserving dedupe; repeated ids collapse silently.
fn dedupe_students(student_ids: Vec<Uuid>) -> DomainResult<Vec<Uuid>> {
    if student_ids.is_empty() {
        return Err(DomainError::Validation(
            "at least one student id is required".to_string(),
        ));
    }
    let mut seen = std::collections::HashSet::new();
    Ok(student_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect())
}

fn dedupe_job_ids(job_ids: Vec<Uuid>) -> DomainResult<Vec<Uuid>> {
    if job_ids.is_empty() {
        return Err(DomainError::Validation(
            "at least one job id is required".to_string(),
        ));
    }
    let mut seen = std::collections::HashSet::new();
    Ok(job_ids.into_iter().filter(|id| seen.insert(*id)).collect())
}

/// Dedupe external jobs by id. Exact repeats collapse; two payloads
/// sharing an id with different content are a caller bug and rejected.
fn dedupe_external_jobs(jobs: Vec<ExternalJob>) -> DomainResult<Vec<ExternalJob>> {
    if jobs.is_empty() {
        return Err(DomainError::Validation(
            "at least one job is required".to_string(),
        ));
    }

    let mut deduped: Vec<ExternalJob> = Vec::with_capacity(jobs.len());
    for job in jobs {
        match deduped.iter().find(|j| j.external_id == job.external_id) {
            None => deduped.push(job),
            Some(kept) if *kept == job => {}
            Some(_) => {
                return Err(DomainError::Validation(format!(
                    "conflicting payloads share external job id {}",
                    job.external_id
                )));
            }
        }
    }
    Ok(deduped)
}
