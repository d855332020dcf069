//! Status transition commands.
//!
//! All writes go through here (or through rollback), so every status an
//! application has ever held is present in its ledger. Updates are guarded
//! by the status the command loaded; a concurrent writer surfaces as a
//! conflict instead of a lost update.

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ApplicationHistory, ApplicationStatus, JobApplication};
use crate::domain::ports::ApplicationRepository;
use crate::services::event_bus::{EventBus, StatusChangedEvent};

/// Service applying single status changes to applications.
pub struct TransitionService<R: ApplicationRepository> {
    applications: Arc<R>,
    events: Arc<EventBus>,
}

impl<R: ApplicationRepository> TransitionService<R> {
    pub fn new(applications: Arc<R>, events: Arc<EventBus>) -> Self {
        Self {
            applications,
            events,
        }
    }

    /// Move an application to `target`, recording the change in the
    /// ledger and publishing an event after commit.
    ///
    /// `mentor_assigned` is rejected here regardless of application type;
    /// it is only reachable through [`Self::assign_mentor`], which
    /// enforces the mentor policy.
    #[instrument(skip(self, reason), fields(application_id = %application_id, target = %target))]
    pub async fn update_status(
        &self,
        application_id: Uuid,
        target: ApplicationStatus,
        actor: Uuid,
        reason: Option<String>,
    ) -> DomainResult<JobApplication> {
        ensure_actor(actor)?;
        let mut application = self
            .applications
            .get(application_id)
            .await?
            .ok_or(DomainError::ApplicationNotFound(application_id))?;

        if target == ApplicationStatus::MentorAssigned {
            return Err(DomainError::InvalidTransition {
                from: application.status,
                to: target,
                reason: "mentor_assigned is only reachable through mentor assignment".to_string(),
            });
        }

        let previous = application.status;
        application.transition_to(target)?;

        let entry = ApplicationHistory::transition(&application, previous, actor, reason);
        self.applications
            .apply_transition(&application, previous, &entry)
            .await?;

        info!(from = %previous, to = %target, "application status updated");
        self.events
            .publish(StatusChangedEvent::transition(&application, previous, actor));

        Ok(application)
    }

    /// Attach a mentor to a referral application, moving it to
    /// `mentor_assigned`.
    ///
    /// Only referral applications carry mentors; the transition table
    /// further restricts the move to applications in `interested`.
    #[instrument(skip(self), fields(application_id = %application_id, mentor_id = %mentor_id))]
    pub async fn assign_mentor(
        &self,
        application_id: Uuid,
        mentor_id: Uuid,
        actor: Uuid,
    ) -> DomainResult<JobApplication> {
        ensure_actor(actor)?;
        if mentor_id.is_nil() {
            return Err(DomainError::Validation(
                "mentor id must be set".to_string(),
            ));
        }

        let mut application = self
            .applications
            .get(application_id)
            .await?
            .ok_or(DomainError::ApplicationNotFound(application_id))?;

        if !application.application_type.requires_mentor() {
            return Err(DomainError::InvalidTransition {
                from: application.status,
                to: ApplicationStatus::MentorAssigned,
                reason: format!(
                    "{} applications do not carry a mentor",
                    application.application_type
                ),
            });
        }

        let previous = application.status;
        application.transition_to(ApplicationStatus::MentorAssigned)?;
        application.mentor_id = Some(mentor_id);

        let entry = ApplicationHistory::transition(&application, previous, actor, None)
            .with_metadata("mentor_id", serde_json::json!(mentor_id));
        self.applications
            .apply_transition(&application, previous, &entry)
            .await?;

        info!(from = %previous, "mentor assigned");
        self.events
            .publish(StatusChangedEvent::transition(&application, previous, actor));

        Ok(application)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteApplicationRepository};
    use crate::domain::models::{ApplicationType, ExternalJob, JobReference};
    use chrono::Utc;

    async fn service_with_application(
        application_type: ApplicationType,
    ) -> (
        TransitionService<SqliteApplicationRepository>,
        Arc<SqliteApplicationRepository>,
        JobApplication,
    ) {
        let pool = create_migrated_test_pool().await.unwrap();
        let applications = Arc::new(SqliteApplicationRepository::new(pool));

        let application = match application_type {
            ApplicationType::Proxy => JobApplication::new_proxy(
                Uuid::new_v4(),
                &ExternalJob {
                    external_id: "ext-1".to_string(),
                    title: "Engineer".to_string(),
                    company: "Acme".to_string(),
                    location: None,
                    level: None,
                },
                Uuid::new_v4(),
                Utc::now(),
            ),
            other => JobApplication::new(
                Uuid::new_v4(),
                other,
                JobReference::External("ext-1".to_string()),
                "Engineer".to_string(),
                "Acme".to_string(),
                Uuid::new_v4(),
                Utc::now(),
            ),
        };
        let entry = ApplicationHistory::creation(&application, application.recommended_by);
        applications
            .insert_batch(std::slice::from_ref(&application), &[entry])
            .await
            .unwrap();

        let service = TransitionService::new(applications.clone(), Arc::new(EventBus::default()));
        (service, applications, application)
    }

    #[tokio::test]
    async fn legal_update_persists_and_appends_history() {
        let (service, applications, application) =
            service_with_application(ApplicationType::Proxy).await;
        let actor = Uuid::new_v4();

        let updated = service
            .update_status(
                application.id,
                ApplicationStatus::Interviewed,
                actor,
                Some("onsite scheduled".to_string()),
            )
            .await
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Interviewed);

        let stored = applications.get(application.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Interviewed);

        let history = applications.history_for(application.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].previous_status, Some(ApplicationStatus::Submitted));
        assert_eq!(history[1].new_status, ApplicationStatus::Interviewed);
        assert_eq!(history[1].changed_by, actor);
        assert_eq!(history[1].change_reason.as_deref(), Some("onsite scheduled"));
    }

    #[tokio::test]
    async fn illegal_update_leaves_no_trace() {
        let (service, applications, application) =
            service_with_application(ApplicationType::Proxy).await;

        let err = service
            .update_status(
                application.id,
                ApplicationStatus::GotOffer,
                Uuid::new_v4(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        let stored = applications.get(application.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ApplicationStatus::Submitted);
        assert_eq!(applications.history_for(application.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mentor_assigned_is_not_reachable_via_update_status() {
        let (service, _, application) =
            service_with_application(ApplicationType::Referral).await;

        let err = service
            .update_status(
                application.id,
                ApplicationStatus::MentorAssigned,
                Uuid::new_v4(),
                None,
            )
            .await
            .unwrap_err();
        match err {
            DomainError::InvalidTransition { reason, .. } => {
                assert!(reason.contains("mentor assignment"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn assign_mentor_moves_interested_referrals() {
        let (service, applications, application) =
            service_with_application(ApplicationType::Referral).await;
        let actor = Uuid::new_v4();
        let mentor = Uuid::new_v4();

        service
            .update_status(application.id, ApplicationStatus::Interested, actor, None)
            .await
            .unwrap();
        let updated = service
            .assign_mentor(application.id, mentor, actor)
            .await
            .unwrap();

        assert_eq!(updated.status, ApplicationStatus::MentorAssigned);
        assert_eq!(updated.mentor_id, Some(mentor));

        let stored = applications.get(application.id).await.unwrap().unwrap();
        assert_eq!(stored.mentor_id, Some(mentor));

        let history = applications.history_for(application.id).await.unwrap();
        let last = history.last().unwrap();
        assert_eq!(last.new_status, ApplicationStatus::MentorAssigned);
        assert_eq!(
            last.change_metadata.get("mentor_id"),
            Some(&serde_json::json!(mentor))
        );
    }

    #[tokio::test]
    async fn assign_mentor_rejects_non_referral_types() {
        let (service, _, application) =
            service_with_application(ApplicationType::Direct).await;

        let err = service
            .assign_mentor(application.id, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        match err {
            DomainError::InvalidTransition { reason, .. } => {
                assert!(reason.contains("direct"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn assign_mentor_requires_interested_status() {
        let (service, _, application) =
            service_with_application(ApplicationType::Referral).await;

        // Still in recommended.
        let err = service
            .assign_mentor(application.id, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn update_on_missing_application_reports_not_found() {
        let (service, _, _) = service_with_application(ApplicationType::Proxy).await;

        let err = service
            .update_status(
                Uuid::new_v4(),
                ApplicationStatus::Interviewed,
                Uuid::new_v4(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ApplicationNotFound(_)));
    }

    #[tokio::test]
    async fn update_publishes_event_with_actor_and_statuses() {
        let pool = create_migrated_test_pool().await.unwrap();
        let applications = Arc::new(SqliteApplicationRepository::new(pool));
        let bus = Arc::new(EventBus::new(16));
        let mut rx = bus.subscribe();

        let application = JobApplication::new_proxy(
            Uuid::new_v4(),
            &ExternalJob {
                external_id: "ext-ev".to_string(),
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                location: None,
                level: None,
            },
            Uuid::new_v4(),
            Utc::now(),
        );
        let entry = ApplicationHistory::creation(&application, application.recommended_by);
        applications
            .insert_batch(std::slice::from_ref(&application), &[entry])
            .await
            .unwrap();

        let service = TransitionService::new(applications, bus);
        let actor = Uuid::new_v4();
        service
            .update_status(application.id, ApplicationStatus::Rejected, actor, None)
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(event.application_id, application.id);
        assert_eq!(event.previous_status, Some(ApplicationStatus::Submitted));
        assert_eq!(event.new_status, ApplicationStatus::Rejected);
        assert_eq!(event.changed_by, actor);
    }
}
