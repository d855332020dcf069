//! Job posting catalog model and external job payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Maximum length for caller-supplied external job ids, in characters.
pub const MAX_EXTERNAL_ID_LEN: usize = 50;
/// Maximum length for job titles, in characters.
pub const MAX_TITLE_LEN: usize = 300;
/// Maximum length for company names, in characters.
pub const MAX_COMPANY_LEN: usize = 200;
/// Maximum length for job locations, in characters.
pub const MAX_LOCATION_LEN: usize = 200;
/// Maximum length for seniority levels, in characters.
pub const MAX_LEVEL_LEN: usize = 50;

/// Lifecycle state of a catalog posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobPostingState {
    /// Open for new applications
    Active,
    /// Temporarily not accepting applications
    Paused,
    /// Filled or withdrawn
    Closed,
}

impl JobPostingState {
    /// Convert state to string representation for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Closed => "closed",
        }
    }

    /// Parse state from string representation.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "paused" => Some(Self::Paused),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobPostingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job posting in the internal catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    /// Unique posting identifier
    pub id: Uuid,
    /// Job title
    pub title: String,
    /// Company name
    pub company: String,
    /// Job location, if known
    pub location: Option<String>,
    /// Seniority level, if known
    pub level: Option<String>,
    /// Whether the posting accepts new applications
    pub state: JobPostingState,
    /// Row creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl JobPosting {
    /// Create a new active posting.
    pub fn new(title: String, company: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            company,
            location: None,
            level: None,
            state: JobPostingState::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the location (builder pattern).
    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the seniority level (builder pattern).
    pub fn with_level(mut self, level: String) -> Self {
        self.level = Some(level);
        self
    }

    /// Whether referrals may target this posting.
    pub fn is_active(&self) -> bool {
        self.state == JobPostingState::Active
    }

    /// Validate field limits before persisting.
    pub fn validate(&self) -> DomainResult<()> {
        check_len("title", &self.title, MAX_TITLE_LEN)?;
        check_len("company", &self.company, MAX_COMPANY_LEN)?;
        check_optional_len("location", self.location.as_deref(), MAX_LOCATION_LEN)?;
        check_optional_len("level", self.level.as_deref(), MAX_LEVEL_LEN)?;
        Ok(())
    }
}

/// Caller-supplied job payload for the proxy flow.
///
/// These jobs live outside the catalog; the engine snapshots the fields
/// onto each application it creates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalJob {
    /// Identifier in the external system, unique per student pairing
    pub external_id: String,
    /// Job title
    pub title: String,
    /// Company name
    pub company: String,
    /// Job location, if known
    pub location: Option<String>,
    /// Seniority level, if known
    pub level: Option<String>,
}

impl ExternalJob {
    /// Validate required fields and length limits.
    ///
    /// Limits are counted in characters, not bytes, so multibyte input is
    /// not penalized.
    pub fn validate(&self) -> DomainResult<()> {
        if self.external_id.trim().is_empty() {
            return Err(DomainError::Validation(
                "external job id must not be empty".to_string(),
            ));
        }
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation(
                "job title must not be empty".to_string(),
            ));
        }
        check_len("external job id", &self.external_id, MAX_EXTERNAL_ID_LEN)?;
        check_len("title", &self.title, MAX_TITLE_LEN)?;
        check_len("company", &self.company, MAX_COMPANY_LEN)?;
        check_optional_len("location", self.location.as_deref(), MAX_LOCATION_LEN)?;
        check_optional_len("level", self.level.as_deref(), MAX_LEVEL_LEN)?;
        Ok(())
    }
}

fn check_len(field: &str, value: &str, max: usize) -> DomainResult<()> {
    let chars = value.chars().count();
    if chars > max {
        return Err(DomainError::Validation(format!(
            "{field} exceeds {max} characters (got {chars})"
        )));
    }
    Ok(())
}

fn check_optional_len(field: &str, value: Option<&str>, max: usize) -> DomainResult<()> {
    match value {
        Some(v) => check_len(field, v, max),
        None => Ok(()),
    }
}
