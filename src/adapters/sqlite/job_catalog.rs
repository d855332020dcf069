//! SQLite implementation of the JobCatalog.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{JobPosting, JobPostingState};
use crate::domain::ports::JobCatalog;

/// Upper bound on ids per IN clause.
const IN_CLAUSE_CHUNK: usize = 800;

#[derive(Clone)]
pub struct SqliteJobCatalog {
    pool: SqlitePool,
}

impl SqliteJobCatalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobCatalog for SqliteJobCatalog {
    async fn insert(&self, posting: &JobPosting) -> DomainResult<()> {
        posting.validate()?;

        sqlx::query(
            r#"INSERT INTO job_postings (id, title, company, location, level, state,
               created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(posting.id.to_string())
        .bind(&posting.title)
        .bind(&posting.company)
        .bind(&posting.location)
        .bind(&posting.level)
        .bind(posting.state.as_str())
        .bind(posting.created_at.to_rfc3339())
        .bind(posting.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<JobPosting>> {
        let row: Option<JobPostingRow> = sqlx::query_as("SELECT * FROM job_postings WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn fetch_many(&self, ids: &[Uuid]) -> DomainResult<Vec<JobPosting>> {
        let mut postings = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(IN_CLAUSE_CHUNK) {
            let marks = vec!["?"; chunk.len()].join(", ");
            let query = format!("SELECT * FROM job_postings WHERE id IN ({marks})");

            let mut q = sqlx::query_as::<_, JobPostingRow>(&query);
            for id in chunk {
                q = q.bind(id.to_string());
            }

            let rows = q.fetch_all(&self.pool).await?;
            for row in rows {
                postings.push(row.try_into()?);
            }
        }

        Ok(postings)
    }

    async fn list(&self, limit: Option<i64>) -> DomainResult<Vec<JobPosting>> {
        let rows: Vec<JobPostingRow> =
            sqlx::query_as("SELECT * FROM job_postings ORDER BY created_at DESC LIMIT ?")
                .bind(limit.unwrap_or(i64::MAX))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn set_state(&self, id: Uuid, state: JobPostingState) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE job_postings SET state = ?, updated_at = ? WHERE id = ?",
        )
        .bind(state.as_str())
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::JobNotFound(id));
        }

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct JobPostingRow {
    id: String,
    title: String,
    company: String,
    location: Option<String>,
    level: Option<String>,
    state: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<JobPostingRow> for JobPosting {
    type Error = DomainError;

    fn try_from(row: JobPostingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            title: row.title,
            company: row.company,
            location: row.location,
            level: row.level,
            state: JobPostingState::from_str(&row.state).ok_or_else(|| {
                DomainError::Serialization(format!("unknown posting state: {}", row.state))
            })?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
