//! Common test utilities for integration tests
//!
//! Provides a fully wired engine over an in-memory database plus seed
//! helpers shared across test files.

#![allow(dead_code)]

use std::sync::Arc;

use sqlx::SqlitePool;

use candidacy::adapters::sqlite::{
    create_migrated_test_pool, SqliteApplicationRepository, SqliteJobCatalog,
};
use candidacy::domain::models::{ExternalJob, JobPosting};
use candidacy::domain::ports::{AllowAllEntitlements, JobCatalog};
use candidacy::services::{BatchApplicationCreator, EventBus, RollbackService, TransitionService};

type Creator =
    BatchApplicationCreator<SqliteApplicationRepository, SqliteJobCatalog, AllowAllEntitlements>;

/// Everything needed to drive the engine against an isolated database.
pub struct TestEngine {
    pub pool: SqlitePool,
    pub applications: Arc<SqliteApplicationRepository>,
    pub catalog: Arc<SqliteJobCatalog>,
    pub events: Arc<EventBus>,
    pub creator: Creator,
    pub transitions: TransitionService<SqliteApplicationRepository>,
    pub rollback: RollbackService<SqliteApplicationRepository>,
}

impl TestEngine {
    /// Build a fresh engine over an in-memory database with the schema
    /// applied.
    pub async fn new() -> Self {
        let pool = create_migrated_test_pool()
            .await
            .expect("failed to create test database");
        let applications = Arc::new(SqliteApplicationRepository::new(pool.clone()));
        let catalog = Arc::new(SqliteJobCatalog::new(pool.clone()));
        let events = Arc::new(EventBus::new(64));

        Self {
            creator: BatchApplicationCreator::new(
                applications.clone(),
                catalog.clone(),
                Arc::new(AllowAllEntitlements::new()),
                events.clone(),
            ),
            transitions: TransitionService::new(applications.clone(), events.clone()),
            rollback: RollbackService::new(applications.clone(), events.clone()),
            pool,
            applications,
            catalog,
            events,
        }
    }

    /// Insert an active catalog posting.
    pub async fn seed_posting(&self, title: &str, company: &str) -> JobPosting {
        let posting = JobPosting::new(title.to_string(), company.to_string());
        self.catalog
            .insert(&posting)
            .await
            .expect("failed to insert posting");
        posting
    }
}

/// External job payload with the given id and stock display fields.
pub fn external_job(external_id: &str) -> ExternalJob {
    ExternalJob {
        external_id: external_id.to_string(),
        title: format!("{external_id} role"),
        company: "Test Corp".to_string(),
        location: Some("Remote".to_string()),
        level: None,
    }
}
