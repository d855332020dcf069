//! History-replay rollback.
//!
//! Rollback never invents a backward edge in the transition table. It
//! reads the ledger, takes the previous status of the most recent row,
//! and re-applies it as a new ledger entry, so the audit trail stays
//! append-only and the table stays the single description of forward
//! moves.

use std::sync::Arc;

use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ApplicationHistory, JobApplication};
use crate::domain::ports::ApplicationRepository;
use crate::services::event_bus::{EventBus, StatusChangedEvent};

/// Service reverting an application to the status it held before its
/// most recent change.
pub struct RollbackService<R: ApplicationRepository> {
    applications: Arc<R>,
    events: Arc<EventBus>,
}

impl<R: ApplicationRepository> RollbackService<R> {
    pub fn new(applications: Arc<R>, events: Arc<EventBus>) -> Self {
        Self {
            applications,
            events,
        }
    }

    /// Revert `application_id` to the previous status recorded in its
    /// ledger.
    ///
    /// The ledger must agree with the application row (its latest
    /// `new_status` equals the current status), the latest row must not
    /// be the creation event, and the move it records must have been a
    /// legal forward transition. Any of those failing means the ledger
    /// cannot be replayed.
    #[instrument(skip(self), fields(application_id = %application_id))]
    pub async fn rollback(
        &self,
        application_id: Uuid,
        actor: Uuid,
    ) -> DomainResult<JobApplication> {
        if actor.is_nil() {
            return Err(DomainError::Validation(
                "acting staff member id must be set".to_string(),
            ));
        }

        let mut application = self
            .applications
            .get(application_id)
            .await?
            .ok_or(DomainError::ApplicationNotFound(application_id))?;

        let latest = self
            .applications
            .latest_history(application_id)
            .await?
            .ok_or_else(|| {
                error!("application has no ledger rows");
                DomainError::HistoryIntegrity {
                    application_id,
                    reason: "no ledger rows exist for this application".to_string(),
                }
            })?;

        if latest.new_status != application.status {
            error!(
                ledger = %latest.new_status,
                current = %application.status,
                "ledger diverged from application status"
            );
            return Err(DomainError::HistoryIntegrity {
                application_id,
                reason: format!(
                    "latest ledger row ends in {} but the application is in {}",
                    latest.new_status, application.status
                ),
            });
        }

        let Some(target) = latest.previous_status else {
            return Err(DomainError::HistoryIntegrity {
                application_id,
                reason: "nothing to roll back to: the latest ledger row is the creation event"
                    .to_string(),
            });
        };

        // The latest row claims target -> current happened. If the table
        // never allowed that move, the row was not a forward transition
        // (or the ledger is corrupt) and replaying it is unsafe.
        if !target.can_transition_to(application.status) {
            error!(
                from = %target,
                to = %application.status,
                "latest ledger row does not record a legal forward move"
            );
            return Err(DomainError::HistoryIntegrity {
                application_id,
                reason: format!(
                    "the recorded move {} -> {} was never a legal transition",
                    target, application.status
                ),
            });
        }

        let previous = application.status;
        application.rewind_to(target);

        let entry = ApplicationHistory::transition(&application, previous, actor, None)
            .with_metadata("rolled_back_from", serde_json::json!(previous.as_str()))
            .with_metadata("rollback_of_seq", serde_json::json!(latest.seq));
        self.applications
            .apply_transition(&application, previous, &entry)
            .await?;

        info!(from = %previous, to = %target, "application rolled back");
        self.events
            .publish(StatusChangedEvent::transition(&application, previous, actor));

        Ok(application)
    }
}
