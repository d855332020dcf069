//! Post-commit status change events.
//!
//! Downstream consumers (billing, mentor matching, notifications) react to
//! status changes through a broadcast channel. Events are published only
//! after the owning transaction commits, and a publish failure never undoes
//! the committed change, so delivery is at-least-once from the engine's
//! point of view and consumers must tolerate replays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::domain::models::{ApplicationStatus, JobApplication};

/// Payload emitted for every committed status change, creation included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangedEvent {
    pub application_id: Uuid,
    /// `None` when the event records the application's creation
    pub previous_status: Option<ApplicationStatus>,
    pub new_status: ApplicationStatus,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
}

impl StatusChangedEvent {
    /// Event for a freshly created application.
    pub fn creation(application: &JobApplication, changed_by: Uuid) -> Self {
        Self {
            application_id: application.id,
            previous_status: None,
            new_status: application.status,
            changed_by,
            changed_at: application.recommended_at,
        }
    }

    /// Event for a transition already applied to the model.
    pub fn transition(
        application: &JobApplication,
        previous_status: ApplicationStatus,
        changed_by: Uuid,
    ) -> Self {
        Self {
            application_id: application.id,
            previous_status: Some(previous_status),
            new_status: application.status,
            changed_by,
            changed_at: application.updated_at,
        }
    }
}

/// Broadcast bus for status change events.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StatusChangedEvent>,
}

impl EventBus {
    /// Create a bus whose channel buffers `capacity` events per subscriber
    /// before slow subscribers start lagging.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// Send errors mean nobody is listening, which is normal for CLI
    /// invocations; the event is dropped after a debug log.
    pub fn publish(&self, event: StatusChangedEvent) {
        match self.sender.send(event) {
            Ok(subscribers) => {
                tracing::debug!(subscribers, "published status change event");
            }
            Err(_) => {
                tracing::debug!("no subscribers for status change event");
            }
        }
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusChangedEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
