//! # Review Notifications
//!
//! Fire-and-forget confirmation step that runs after a review is committed.
//!
//! The catalog service enqueues a job only after the store has returned the
//! persisted review, so a confirmation can never run for a review that does
//! not exist yet. Delivery failures are logged and counted, never propagated
//! back to the request that triggered them.

pub mod dispatcher;
pub mod sender;
pub mod types;

pub use dispatcher::{
    NotificationStats, NotificationStatsSnapshot, NotificationWorker, NotificationWorkerHandle,
    ReviewNotifier,
};
pub use sender::{ConfirmationSender, SimulatedEmailSender};
pub use types::{NotificationError, ReviewNotification};
