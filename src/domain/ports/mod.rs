//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that infrastructure adapters implement:
//! - `ApplicationRepository`: application and history persistence
//! - `JobCatalog`: catalog posting persistence
//! - `EntitlementGate`: external service entitlement checks
//!
//! These traits keep the domain independent of specific infrastructure.

pub mod application_repository;
pub mod entitlement;
pub mod job_catalog;

pub use application_repository::{ApplicationFilter, ApplicationRepository, CandidatePair};
pub use entitlement::{AllowAllEntitlements, EntitlementGate};
pub use job_catalog::JobCatalog;
