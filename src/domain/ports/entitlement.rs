//! Service entitlement gate port.
//!
//! Proxy and BD applications consume a paid placement entitlement. The
//! balance ledger itself lives in a separate system; deployments wire
//! their client in through this port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;

/// Gate consulted before entitlement-consuming flows create applications.
#[async_trait]
pub trait EntitlementGate: Send + Sync {
    /// Whether the student may consume one placement entitlement
    async fn check(&self, student_id: Uuid) -> DomainResult<bool>;
}

/// A gate that admits every student.
///
/// Use this when no balance service is wired in.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllEntitlements;

impl AllowAllEntitlements {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EntitlementGate for AllowAllEntitlements {
    async fn check(&self, _student_id: Uuid) -> DomainResult<bool> {
        Ok(true)
    }
}
