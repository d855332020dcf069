//! Candidacy - Job Application Lifecycle Engine
//!
//! Candidacy manages student job applications end to end: batch creation
//! for proxy and referral flows, a closed status state machine, an
//! append-only audit ledger, history-replay rollback, and post-commit
//! event publication.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, the transition table, and port traits
//! - **Service Layer** (`services`): batch creation, transition, and rollback commands
//! - **Adapters** (`adapters`): SQLite persistence
//! - **Infrastructure Layer** (`infrastructure`): configuration management
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use candidacy::adapters::sqlite::{initialize_database, SqliteApplicationRepository};
//! use candidacy::services::{EventBus, TransitionService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = initialize_database("sqlite:.candidacy/candidacy.db").await?;
//!     let applications = Arc::new(SqliteApplicationRepository::new(pool));
//!     let transitions = TransitionService::new(applications, Arc::new(EventBus::default()));
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    ApplicationHistory, ApplicationStatus, ApplicationType, Config, DatabaseConfig, ExternalJob,
    JobApplication, JobPosting, JobPostingState, JobReference, LoggingConfig,
};
pub use domain::ports::{
    ApplicationFilter, ApplicationRepository, CandidatePair, EntitlementGate, JobCatalog,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{
    BatchApplicationCreator, EventBus, ProxyBatchRequest, ReferralBatchRequest, RollbackService,
    StatusChangedEvent, TransitionService,
};
