//! Application services orchestrating domain models, persistence, and
//! event publication.

pub mod batch_creator;
pub mod event_bus;
pub mod rollback;
pub mod transition;

pub use batch_creator::{BatchApplicationCreator, ProxyBatchRequest, ReferralBatchRequest};
pub use event_bus::{EventBus, StatusChangedEvent};
pub use rollback::RollbackService;
pub use transition::TransitionService;
