//! Domain models for the candidacy engine.

pub mod application;
pub mod config;
pub mod history;
pub mod job;

pub use application::{ApplicationStatus, ApplicationType, JobApplication, JobReference};
pub use config::{BatchConfig, Config, DatabaseConfig, EventsConfig, LoggingConfig};
pub use history::ApplicationHistory;
pub use job::{ExternalJob, JobPosting, JobPostingState};
