//! SQLite implementation of the ApplicationRepository.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use uuid::Uuid;

use crate::adapters::sqlite::{
    parse_datetime, parse_json_or_default, parse_optional_datetime, parse_optional_uuid,
    parse_uuid,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ApplicationHistory, ApplicationStatus, ApplicationType, JobApplication, JobReference,
};
use crate::domain::ports::{ApplicationFilter, ApplicationRepository, CandidatePair};

/// Upper bound on ids per IN clause, kept well under SQLite's bind
/// parameter limit even when two lists appear in one query.
const IN_CLAUSE_CHUNK: usize = 400;

#[derive(Clone)]
pub struct SqliteApplicationRepository {
    pool: SqlitePool,
}

impl SqliteApplicationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append a ledger row inside an open transaction.
    ///
    /// `seq` is assigned here by a subquery over rows already visible to
    /// the transaction, so entries inserted together are ordered by
    /// insertion even though they share a timestamp.
    async fn insert_history_tx(
        tx: &mut Transaction<'_, Sqlite>,
        entry: &ApplicationHistory,
    ) -> DomainResult<()> {
        let metadata_json = if entry.change_metadata.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&entry.change_metadata)?)
        };

        sqlx::query(
            r#"INSERT INTO application_history (id, application_id, seq, previous_status,
               new_status, changed_by, change_reason, change_metadata, created_at)
               VALUES (?, ?,
                   (SELECT COALESCE(MAX(seq), 0) + 1 FROM application_history WHERE application_id = ?),
                   ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.id.to_string())
        .bind(entry.application_id.to_string())
        .bind(entry.application_id.to_string())
        .bind(entry.previous_status.map(|s| s.as_str()))
        .bind(entry.new_status.as_str())
        .bind(entry.changed_by.to_string())
        .bind(&entry.change_reason)
        .bind(&metadata_json)
        .bind(entry.created_at.to_rfc3339())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn insert_application_tx(
        tx: &mut Transaction<'_, Sqlite>,
        application: &JobApplication,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO job_applications (id, student_id, application_type, status,
               job_id, external_job_id, job_title, company, location, level, mentor_id,
               recommended_by, recommended_at, submitted_at, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(application.id.to_string())
        .bind(application.student_id.to_string())
        .bind(application.application_type.as_str())
        .bind(application.status.as_str())
        .bind(application.job.catalog_id().map(|id| id.to_string()))
        .bind(application.job.external_id())
        .bind(&application.job_title)
        .bind(&application.company)
        .bind(&application.location)
        .bind(&application.level)
        .bind(application.mentor_id.map(|id| id.to_string()))
        .bind(application.recommended_by.to_string())
        .bind(application.recommended_at.to_rfc3339())
        .bind(application.submitted_at.map(|t| t.to_rfc3339()))
        .bind(application.created_at.to_rfc3339())
        .bind(application.updated_at.to_rfc3339())
        .execute(&mut **tx)
        .await
        .map_err(map_insert_error)?;

        Ok(())
    }

    /// Query existing (student, job) pairs for one reference kind.
    ///
    /// Distinct student and job ids are chunked into nested IN clauses;
    /// the cross product a chunk may return is intersected with the real
    /// candidate set afterwards.
    async fn existing_keys_for_column(
        &self,
        column: &str,
        students: &[String],
        jobs: &[String],
    ) -> DomainResult<HashSet<(String, String)>> {
        let mut existing = HashSet::new();

        for student_chunk in students.chunks(IN_CLAUSE_CHUNK) {
            for job_chunk in jobs.chunks(IN_CLAUSE_CHUNK) {
                let student_marks = vec!["?"; student_chunk.len()].join(", ");
                let job_marks = vec!["?"; job_chunk.len()].join(", ");
                let query = format!(
                    "SELECT student_id, {column} FROM job_applications
                     WHERE {column} IS NOT NULL
                       AND student_id IN ({student_marks})
                       AND {column} IN ({job_marks})"
                );

                let mut q = sqlx::query_as::<_, (String, String)>(&query);
                for student in student_chunk {
                    q = q.bind(student);
                }
                for job in job_chunk {
                    q = q.bind(job);
                }

                let rows = q.fetch_all(&self.pool).await?;
                existing.extend(rows);
            }
        }

        Ok(existing)
    }
}

#[async_trait]
impl ApplicationRepository for SqliteApplicationRepository {
    async fn get(&self, id: Uuid) -> DomainResult<Option<JobApplication>> {
        let row: Option<ApplicationRow> =
            sqlx::query_as("SELECT * FROM job_applications WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self, filter: ApplicationFilter) -> DomainResult<Vec<JobApplication>> {
        let mut query = String::from("SELECT * FROM job_applications WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(student_id) = &filter.student_id {
            query.push_str(" AND student_id = ?");
            bindings.push(student_id.to_string());
        }
        if let Some(status) = &filter.status {
            query.push_str(" AND status = ?");
            bindings.push(status.as_str().to_string());
        }
        if let Some(application_type) = &filter.application_type {
            query.push_str(" AND application_type = ?");
            bindings.push(application_type.as_str().to_string());
        }

        query.push_str(" ORDER BY created_at DESC");

        if filter.limit.is_some() {
            query.push_str(" LIMIT ?");
        }

        let mut q = sqlx::query_as::<_, ApplicationRow>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }
        if let Some(limit) = filter.limit {
            q = q.bind(limit);
        }

        let rows: Vec<ApplicationRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn count(&self, filter: ApplicationFilter) -> DomainResult<i64> {
        let mut query = String::from("SELECT COUNT(*) FROM job_applications WHERE 1=1");
        let mut bindings: Vec<String> = Vec::new();

        if let Some(student_id) = &filter.student_id {
            query.push_str(" AND student_id = ?");
            bindings.push(student_id.to_string());
        }
        if let Some(status) = &filter.status {
            query.push_str(" AND status = ?");
            bindings.push(status.as_str().to_string());
        }
        if let Some(application_type) = &filter.application_type {
            query.push_str(" AND application_type = ?");
            bindings.push(application_type.as_str().to_string());
        }

        let mut q = sqlx::query_as::<_, (i64,)>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let (count,) = q.fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn find_existing_pairs(
        &self,
        candidates: &[CandidatePair],
    ) -> DomainResult<Vec<CandidatePair>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        let mut catalog_students: Vec<String> = Vec::new();
        let mut catalog_jobs: Vec<String> = Vec::new();
        let mut external_students: Vec<String> = Vec::new();
        let mut external_jobs: Vec<String> = Vec::new();

        for candidate in candidates {
            let student = candidate.student_id.to_string();
            match &candidate.job {
                JobReference::Catalog(id) => {
                    push_unique(&mut catalog_students, student);
                    push_unique(&mut catalog_jobs, id.to_string());
                }
                JobReference::External(id) => {
                    push_unique(&mut external_students, student);
                    push_unique(&mut external_jobs, id.clone());
                }
            }
        }

        let mut existing = HashSet::new();
        if !catalog_jobs.is_empty() {
            existing.extend(
                self.existing_keys_for_column("job_id", &catalog_students, &catalog_jobs)
                    .await?
                    .into_iter()
                    .map(|(student, job)| (student, job, true)),
            );
        }
        if !external_jobs.is_empty() {
            existing.extend(
                self.existing_keys_for_column(
                    "external_job_id",
                    &external_students,
                    &external_jobs,
                )
                .await?
                .into_iter()
                .map(|(student, job)| (student, job, false)),
            );
        }

        let duplicates = candidates
            .iter()
            .filter(|candidate| {
                let key = (
                    candidate.student_id.to_string(),
                    candidate.job.key(),
                    candidate.job.catalog_id().is_some(),
                );
                existing.contains(&key)
            })
            .cloned()
            .collect();

        Ok(duplicates)
    }

    async fn insert_batch(
        &self,
        applications: &[JobApplication],
        history: &[ApplicationHistory],
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        for application in applications {
            Self::insert_application_tx(&mut tx, application).await?;
        }
        for entry in history {
            Self::insert_history_tx(&mut tx, entry).await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn apply_transition(
        &self,
        application: &JobApplication,
        expected_status: ApplicationStatus,
        entry: &ApplicationHistory,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"UPDATE job_applications
               SET status = ?, mentor_id = ?, submitted_at = ?, updated_at = ?
               WHERE id = ? AND status = ?"#,
        )
        .bind(application.status.as_str())
        .bind(application.mentor_id.map(|id| id.to_string()))
        .bind(application.submitted_at.map(|t| t.to_rfc3339()))
        .bind(application.updated_at.to_rfc3339())
        .bind(application.id.to_string())
        .bind(expected_status.as_str())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            // Either the row vanished or another writer moved it first.
            let exists: Option<(i64,)> =
                sqlx::query_as("SELECT 1 FROM job_applications WHERE id = ?")
                    .bind(application.id.to_string())
                    .fetch_optional(&mut *tx)
                    .await?;

            return Err(match exists {
                Some(_) => DomainError::ConcurrencyConflict {
                    entity: "application".to_string(),
                    id: application.id.to_string(),
                },
                None => DomainError::ApplicationNotFound(application.id),
            });
        }

        Self::insert_history_tx(&mut tx, entry).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn history_for(&self, application_id: Uuid) -> DomainResult<Vec<ApplicationHistory>> {
        let rows: Vec<HistoryRow> = sqlx::query_as(
            "SELECT * FROM application_history WHERE application_id = ? ORDER BY seq ASC",
        )
        .bind(application_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn latest_history(
        &self,
        application_id: Uuid,
    ) -> DomainResult<Option<ApplicationHistory>> {
        let row: Option<HistoryRow> = sqlx::query_as(
            "SELECT * FROM application_history WHERE application_id = ? ORDER BY seq DESC LIMIT 1",
        )
        .bind(application_id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}

fn push_unique(values: &mut Vec<String>, value: String) {
    if !values.contains(&value) {
        values.push(value);
    }
}

/// Surface storage-level duplicate rejections as the domain duplicate
/// error. The constraint is the last line of defense when two batches
/// race past the pre-check.
fn map_insert_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(ref db) = err {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            return DomainError::DuplicateApplications {
                sample: Vec::new(),
                total: 0,
            };
        }
    }
    DomainError::from(err)
}

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: String,
    student_id: String,
    application_type: String,
    status: String,
    job_id: Option<String>,
    external_job_id: Option<String>,
    job_title: String,
    company: String,
    location: Option<String>,
    level: Option<String>,
    mentor_id: Option<String>,
    recommended_by: String,
    recommended_at: String,
    submitted_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ApplicationRow> for JobApplication {
    type Error = DomainError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        let job = match (row.job_id, row.external_job_id) {
            (Some(id), None) => JobReference::Catalog(parse_uuid(&id)?),
            (None, Some(id)) => JobReference::External(id),
            _ => {
                return Err(DomainError::Serialization(
                    "application row must reference exactly one of job_id and external_job_id"
                        .to_string(),
                ))
            }
        };

        Ok(Self {
            id: parse_uuid(&row.id)?,
            student_id: parse_uuid(&row.student_id)?,
            application_type: parse_application_type(&row.application_type)?,
            status: parse_status(&row.status)?,
            job,
            job_title: row.job_title,
            company: row.company,
            location: row.location,
            level: row.level,
            mentor_id: parse_optional_uuid(row.mentor_id)?,
            recommended_by: parse_uuid(&row.recommended_by)?,
            recommended_at: parse_datetime(&row.recommended_at)?,
            submitted_at: parse_optional_datetime(row.submitted_at)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: String,
    application_id: String,
    seq: i64,
    previous_status: Option<String>,
    new_status: String,
    changed_by: String,
    change_reason: Option<String>,
    change_metadata: Option<String>,
    created_at: String,
}

impl TryFrom<HistoryRow> for ApplicationHistory {
    type Error = DomainError;

    fn try_from(row: HistoryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            application_id: parse_uuid(&row.application_id)?,
            seq: row.seq,
            previous_status: row
                .previous_status
                .as_deref()
                .map(parse_status)
                .transpose()?,
            new_status: parse_status(&row.new_status)?,
            changed_by: parse_uuid(&row.changed_by)?,
            change_reason: row.change_reason,
            change_metadata: parse_json_or_default::<HashMap<String, serde_json::Value>>(
                row.change_metadata,
            )?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

fn parse_status(s: &str) -> DomainResult<ApplicationStatus> {
    ApplicationStatus::from_str(s)
        .ok_or_else(|| DomainError::Serialization(format!("unknown application status: {s}")))
}

fn parse_application_type(s: &str) -> DomainResult<ApplicationType> {
    ApplicationType::from_str(s)
        .ok_or_else(|| DomainError::Serialization(format!("unknown application type: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;
    use crate::domain::models::ExternalJob;
    use chrono::Utc;

    fn external_job(external_id: &str) -> ExternalJob {
        ExternalJob {
            external_id: external_id.to_string(),
            title: "Site Reliability Engineer".to_string(),
            company: "Globex".to_string(),
            location: Some("Remote".to_string()),
            level: Some("senior".to_string()),
        }
    }

    fn proxy_application(external_id: &str) -> JobApplication {
        JobApplication::new_proxy(
            Uuid::new_v4(),
            &external_job(external_id),
            Uuid::new_v4(),
            Utc::now(),
        )
    }

    async fn repo_with_application(external_id: &str) -> (SqliteApplicationRepository, JobApplication) {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteApplicationRepository::new(pool);
        let application = proxy_application(external_id);
        let entry = ApplicationHistory::creation(&application, application.recommended_by);
        repo.insert_batch(std::slice::from_ref(&application), &[entry])
            .await
            .unwrap();
        (repo, application)
    }

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let (repo, application) = repo_with_application("ext-100").await;

        let loaded = repo.get(application.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, application.id);
        assert_eq!(loaded.student_id, application.student_id);
        assert_eq!(loaded.status, ApplicationStatus::Submitted);
        assert_eq!(loaded.job.external_id(), Some("ext-100"));
        assert_eq!(loaded.location.as_deref(), Some("Remote"));
        assert!(loaded.submitted_at.is_some());
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteApplicationRepository::new(pool);
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn creation_ledger_row_is_written_with_seq_one() {
        let (repo, application) = repo_with_application("ext-101").await;

        let history = repo.history_for(application.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].seq, 1);
        assert!(history[0].is_creation());
        assert_eq!(history[0].new_status, ApplicationStatus::Submitted);
    }

    #[tokio::test]
    async fn seq_counts_per_application() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteApplicationRepository::new(pool);

        let first = proxy_application("ext-a");
        let second = proxy_application("ext-b");
        let entries = vec![
            ApplicationHistory::creation(&first, first.recommended_by),
            ApplicationHistory::creation(&second, second.recommended_by),
        ];
        repo.insert_batch(&[first.clone(), second.clone()], &entries)
            .await
            .unwrap();

        // A transition on one application must not advance the other's seq.
        let mut moved = first.clone();
        moved.transition_to(ApplicationStatus::Interviewed).unwrap();
        let entry = ApplicationHistory::transition(
            &moved,
            ApplicationStatus::Submitted,
            Uuid::new_v4(),
            None,
        );
        repo.apply_transition(&moved, ApplicationStatus::Submitted, &entry)
            .await
            .unwrap();

        let first_history = repo.history_for(first.id).await.unwrap();
        let second_history = repo.history_for(second.id).await.unwrap();
        assert_eq!(
            first_history.iter().map(|h| h.seq).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(second_history.len(), 1);
        assert_eq!(second_history[0].seq, 1);
    }

    #[tokio::test]
    async fn duplicate_insert_rolls_back_the_whole_batch() {
        let (repo, existing) = repo_with_application("ext-dup").await;

        // New batch contains a fresh pair plus a collision with the
        // existing row.
        let fresh = proxy_application("ext-fresh");
        let colliding = JobApplication::new_proxy(
            existing.student_id,
            &external_job("ext-dup"),
            Uuid::new_v4(),
            Utc::now(),
        );
        let entries = vec![
            ApplicationHistory::creation(&fresh, fresh.recommended_by),
            ApplicationHistory::creation(&colliding, colliding.recommended_by),
        ];

        let err = repo
            .insert_batch(&[fresh.clone(), colliding], &entries)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateApplications { .. }));

        // The fresh row must not have survived the rollback.
        assert!(repo.get(fresh.id).await.unwrap().is_none());
        assert_eq!(repo.count(ApplicationFilter::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_existing_pairs_matches_only_real_collisions() {
        let (repo, existing) = repo_with_application("ext-seen").await;

        let candidates = vec![
            CandidatePair {
                student_id: existing.student_id,
                job: JobReference::External("ext-seen".to_string()),
            },
            // Same student, different job: not a duplicate.
            CandidatePair {
                student_id: existing.student_id,
                job: JobReference::External("ext-unseen".to_string()),
            },
            // Different student, same job: not a duplicate.
            CandidatePair {
                student_id: Uuid::new_v4(),
                job: JobReference::External("ext-seen".to_string()),
            },
        ];

        let found = repo.find_existing_pairs(&candidates).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].student_id, existing.student_id);
        assert_eq!(found[0].job.external_id(), Some("ext-seen"));
    }

    #[tokio::test]
    async fn stale_status_guard_reports_concurrency_conflict() {
        let (repo, application) = repo_with_application("ext-guard").await;

        let mut moved = application.clone();
        moved.transition_to(ApplicationStatus::Rejected).unwrap();
        let entry = ApplicationHistory::transition(
            &moved,
            ApplicationStatus::Submitted,
            Uuid::new_v4(),
            None,
        );

        // Guard expects a status the row is not in.
        let err = repo
            .apply_transition(&moved, ApplicationStatus::Interviewed, &entry)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ConcurrencyConflict { .. }));

        // No ledger row leaked from the failed attempt.
        assert_eq!(repo.history_for(application.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn apply_transition_on_missing_row_reports_not_found() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteApplicationRepository::new(pool);

        let application = proxy_application("ext-ghost");
        let entry = ApplicationHistory::creation(&application, application.recommended_by);
        let err = repo
            .apply_transition(&application, ApplicationStatus::Submitted, &entry)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ApplicationNotFound(_)));
    }

    #[tokio::test]
    async fn latest_history_returns_highest_seq() {
        let (repo, application) = repo_with_application("ext-latest").await;

        let mut moved = application.clone();
        moved.transition_to(ApplicationStatus::Interviewed).unwrap();
        let entry = ApplicationHistory::transition(
            &moved,
            ApplicationStatus::Submitted,
            Uuid::new_v4(),
            Some("phone screen scheduled".to_string()),
        );
        repo.apply_transition(&moved, ApplicationStatus::Submitted, &entry)
            .await
            .unwrap();

        let latest = repo.latest_history(application.id).await.unwrap().unwrap();
        assert_eq!(latest.seq, 2);
        assert_eq!(latest.new_status, ApplicationStatus::Interviewed);
        assert_eq!(latest.change_reason.as_deref(), Some("phone screen scheduled"));
    }

    #[tokio::test]
    async fn list_filters_by_student_and_status() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteApplicationRepository::new(pool);

        let student = Uuid::new_v4();
        let mine = JobApplication::new_proxy(
            student,
            &external_job("ext-mine"),
            Uuid::new_v4(),
            Utc::now(),
        );
        let other = proxy_application("ext-other");
        let entries = vec![
            ApplicationHistory::creation(&mine, mine.recommended_by),
            ApplicationHistory::creation(&other, other.recommended_by),
        ];
        repo.insert_batch(&[mine.clone(), other], &entries)
            .await
            .unwrap();

        let listed = repo
            .list(ApplicationFilter {
                student_id: Some(student),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, mine.id);

        let none = repo
            .list(ApplicationFilter {
                student_id: Some(student),
                status: Some(ApplicationStatus::Rejected),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn list_honors_the_row_limit() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteApplicationRepository::new(pool);

        let student = Uuid::new_v4();
        let applications: Vec<JobApplication> = (0..3)
            .map(|i| {
                JobApplication::new_proxy(
                    student,
                    &external_job(&format!("ext-{i}")),
                    Uuid::new_v4(),
                    Utc::now(),
                )
            })
            .collect();
        let entries: Vec<ApplicationHistory> = applications
            .iter()
            .map(|a| ApplicationHistory::creation(a, a.recommended_by))
            .collect();
        repo.insert_batch(&applications, &entries).await.unwrap();

        let limited = repo
            .list(ApplicationFilter {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(limited.len(), 2);

        // Filters and the limit bind in one query.
        let filtered = repo
            .list(ApplicationFilter {
                student_id: Some(student),
                status: Some(ApplicationStatus::Submitted),
                limit: Some(1),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].student_id, student);
    }
}
