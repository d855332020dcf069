//! Job application domain model and status workflow.
//!
//! Applications move through a closed status graph. Every status change is
//! validated against the transition table here and recorded as a row in the
//! append-only history ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::job::{ExternalJob, JobPosting};

/// Status of a job application in the placement workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Recommended to the student, awaiting their response
    Recommended,
    /// Student expressed interest
    Interested,
    /// Student declined the recommendation
    NotInterested,
    /// Withdrawn by staff
    Revoked,
    /// Mentor attached, referral flow only
    MentorAssigned,
    /// Submitted to the employer
    Submitted,
    /// Employer ran at least one interview
    Interviewed,
    /// Employer extended an offer
    GotOffer,
    /// Employer passed on the candidate
    Rejected,
}

impl ApplicationStatus {
    /// All statuses, in workflow order. Useful for exhaustive checks.
    pub const ALL: [Self; 9] = [
        Self::Recommended,
        Self::Interested,
        Self::NotInterested,
        Self::Revoked,
        Self::MentorAssigned,
        Self::Submitted,
        Self::Interviewed,
        Self::GotOffer,
        Self::Rejected,
    ];

    /// Convert status to string representation for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Interested => "interested",
            Self::NotInterested => "not_interested",
            Self::Revoked => "revoked",
            Self::MentorAssigned => "mentor_assigned",
            Self::Submitted => "submitted",
            Self::Interviewed => "interviewed",
            Self::GotOffer => "got_offer",
            Self::Rejected => "rejected",
        }
    }

    /// Parse status from string representation.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "recommended" => Some(Self::Recommended),
            "interested" => Some(Self::Interested),
            "not_interested" => Some(Self::NotInterested),
            "revoked" => Some(Self::Revoked),
            "mentor_assigned" => Some(Self::MentorAssigned),
            "submitted" => Some(Self::Submitted),
            "interviewed" => Some(Self::Interviewed),
            "got_offer" => Some(Self::GotOffer),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Legal forward transitions out of this status.
    ///
    /// Terminal statuses return an empty slice. Unlisted pairs are
    /// rejected; there are no self-loops.
    pub fn valid_transitions(&self) -> &'static [Self] {
        match self {
            Self::Recommended => &[Self::Interested, Self::NotInterested, Self::Revoked],
            Self::Interested => &[Self::MentorAssigned, Self::Submitted, Self::Revoked],
            Self::MentorAssigned => &[Self::Submitted, Self::Revoked],
            Self::Submitted => &[Self::Interviewed, Self::Rejected, Self::Revoked],
            Self::Interviewed => &[Self::GotOffer, Self::Rejected],
            Self::NotInterested | Self::Revoked | Self::GotOffer | Self::Rejected => &[],
        }
    }

    /// Check if a transition to the target status is legal.
    pub fn can_transition_to(&self, target: Self) -> bool {
        self.valid_transitions().contains(&target)
    }

    /// Check if this is a terminal status (no outgoing transitions).
    pub fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a job application was created, which drives per-type policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationType {
    /// Student applied on their own through the catalog
    Direct,
    /// Staff applied on the student's behalf to an externally sourced job
    Proxy,
    /// Counselor recommendation backed by a mentor
    Referral,
    /// Sourced by the business development team
    Bd,
}

impl ApplicationType {
    /// Convert type to string representation for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Proxy => "proxy",
            Self::Referral => "referral",
            Self::Bd => "bd",
        }
    }

    /// Parse type from string representation.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "direct" => Some(Self::Direct),
            "proxy" => Some(Self::Proxy),
            "referral" => Some(Self::Referral),
            "bd" => Some(Self::Bd),
            _ => None,
        }
    }

    /// Whether applications of this type carry a mentor through the workflow.
    pub fn requires_mentor(&self) -> bool {
        matches!(self, Self::Referral)
    }

    /// Whether creating an application of this type consumes a paid
    /// service entitlement.
    pub fn requires_service_entitlement(&self) -> bool {
        matches!(self, Self::Proxy | Self::Bd)
    }

    /// Status a freshly created application of this type starts in.
    ///
    /// Proxy and direct submissions have already reached the employer when
    /// the row is created; referral and BD recommendations await the
    /// student's response.
    pub fn initial_status(&self) -> ApplicationStatus {
        match self {
            Self::Direct | Self::Proxy => ApplicationStatus::Submitted,
            Self::Referral | Self::Bd => ApplicationStatus::Recommended,
        }
    }
}

impl std::fmt::Display for ApplicationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which job an application points at.
///
/// Referral and direct flows reference a catalog posting by id; the proxy
/// flow inlines an externally sourced job. The two are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum JobReference {
    /// Catalog posting id
    Catalog(Uuid),
    /// Caller-supplied external job id
    External(String),
}

impl JobReference {
    /// Catalog posting id, if this is a catalog reference.
    pub fn catalog_id(&self) -> Option<Uuid> {
        match self {
            Self::Catalog(id) => Some(*id),
            Self::External(_) => None,
        }
    }

    /// External job id, if this is an external reference.
    pub fn external_id(&self) -> Option<&str> {
        match self {
            Self::Catalog(_) => None,
            Self::External(id) => Some(id.as_str()),
        }
    }

    /// Stable string key for display and duplicate reporting.
    pub fn key(&self) -> String {
        match self {
            Self::Catalog(id) => id.to_string(),
            Self::External(id) => id.clone(),
        }
    }
}

/// A student's candidacy for one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    /// Unique application identifier
    pub id: Uuid,
    /// Student this application belongs to
    pub student_id: Uuid,
    /// Creation flow, which fixes per-type policy for the row's lifetime
    pub application_type: ApplicationType,
    /// Current workflow status
    pub status: ApplicationStatus,
    /// Catalog posting or inlined external job
    pub job: JobReference,
    /// Job title snapshot taken at creation
    pub job_title: String,
    /// Company name snapshot taken at creation
    pub company: String,
    /// Job location, if known
    pub location: Option<String>,
    /// Seniority level, if known
    pub level: Option<String>,
    /// Mentor attached via the referral flow
    pub mentor_id: Option<Uuid>,
    /// Staff member or student who created the application
    pub recommended_by: Uuid,
    /// Batch timestamp shared by every application created together
    pub recommended_at: DateTime<Utc>,
    /// When the application first reached the employer
    pub submitted_at: Option<DateTime<Utc>>,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl JobApplication {
    /// Create an application in its type's initial status.
    pub fn new(
        student_id: Uuid,
        application_type: ApplicationType,
        job: JobReference,
        job_title: String,
        company: String,
        created_by: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        let status = application_type.initial_status();
        Self {
            id: Uuid::new_v4(),
            student_id,
            application_type,
            status,
            job,
            job_title,
            company,
            location: None,
            level: None,
            mentor_id: None,
            recommended_by: created_by,
            recommended_at: created_at,
            submitted_at: (status == ApplicationStatus::Submitted).then_some(created_at),
            created_at,
            updated_at: created_at,
        }
    }

    /// Referral application against a catalog posting, starting in
    /// `recommended`.
    pub fn new_referral(
        student_id: Uuid,
        posting: &JobPosting,
        recommended_by: Uuid,
        recommended_at: DateTime<Utc>,
    ) -> Self {
        let mut application = Self::new(
            student_id,
            ApplicationType::Referral,
            JobReference::Catalog(posting.id),
            posting.title.clone(),
            posting.company.clone(),
            recommended_by,
            recommended_at,
        );
        application.location = posting.location.clone();
        application.level = posting.level.clone();
        application
    }

    /// Proxy application against an externally sourced job, starting in
    /// `submitted`.
    pub fn new_proxy(
        student_id: Uuid,
        job: &ExternalJob,
        created_by: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut application = Self::new(
            student_id,
            ApplicationType::Proxy,
            JobReference::External(job.external_id.clone()),
            job.title.clone(),
            job.company.clone(),
            created_by,
            created_at,
        );
        application.location = job.location.clone();
        application.level = job.level.clone();
        application
    }

    /// Apply a forward transition, maintaining timestamps.
    ///
    /// Rejects anything the transition table does not allow, including
    /// self-loops and moves out of terminal statuses.
    pub fn transition_to(&mut self, target: ApplicationStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            let reason = if self.status.is_terminal() {
                format!("{} is a terminal status", self.status)
            } else if self.status == target {
                "application is already in this status".to_string()
            } else {
                "transition is not in the allowed table".to_string()
            };
            return Err(DomainError::InvalidTransition {
                from: self.status,
                to: target,
                reason,
            });
        }

        self.status = target;
        self.updated_at = Utc::now();
        if target == ApplicationStatus::Submitted && self.submitted_at.is_none() {
            self.submitted_at = Some(self.updated_at);
        }
        Ok(())
    }

    /// Rewind to a prior status after ledger-based validation.
    ///
    /// Deliberately bypasses the forward table: rollback replays recorded
    /// history rather than adding backward edges to the graph. Callers
    /// must have verified the target against the ledger first.
    pub(crate) fn rewind_to(&mut self, target: ApplicationStatus) {
        self.status = target;
        self.updated_at = Utc::now();
    }
}
