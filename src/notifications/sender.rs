//! Confirmation transports
//!
//! The worker hands each job to a [`ConfirmationSender`]. The shipped
//! [`SimulatedEmailSender`] only logs the email it would have sent.

use async_trait::async_trait;
use tracing::info;

use super::types::{NotificationError, ReviewNotification};

#[async_trait]
pub trait ConfirmationSender: Send + Sync {
    async fn send_confirmation(
        &self,
        notification: &ReviewNotification,
    ) -> Result<(), NotificationError>;

    fn name(&self) -> &'static str;
}

/// Logs a confirmation email instead of delivering one
#[derive(Debug, Clone)]
pub struct SimulatedEmailSender {
    from_address: String,
}

impl SimulatedEmailSender {
    pub fn new(from_address: impl Into<String>) -> Self {
        Self {
            from_address: from_address.into(),
        }
    }

    pub fn from_address(&self) -> &str {
        &self.from_address
    }

    /// Subject line of the simulated email
    pub fn subject(notification: &ReviewNotification) -> String {
        format!(
            "Thanks for your {}-star review (review #{})",
            notification.rating, notification.review_id
        )
    }
}

#[async_trait]
impl ConfirmationSender for SimulatedEmailSender {
    async fn send_confirmation(
        &self,
        notification: &ReviewNotification,
    ) -> Result<(), NotificationError> {
        info!(
            notification_id = %notification.notification_id,
            review_id = notification.review_id,
            book_id = notification.book_id,
            from = %self.from_address,
            subject = %Self::subject(notification),
            "Simulating email confirmation for review"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "simulated_email"
    }
}
