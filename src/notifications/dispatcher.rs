//! Review confirmation dispatch
//!
//! [`ReviewNotifier`] is the producer half held by the catalog service: it
//! pushes an immutable [`ReviewNotification`] onto an unbounded channel and
//! returns immediately. [`NotificationWorker`] is the consumer half, running
//! as its own tokio task. Nothing is shared between the two except the job
//! payload and the delivery counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::sender::ConfirmationSender;
use super::types::{NotificationError, ReviewNotification};
use crate::logging::log_notification_operation;
use crate::models::Review;

/// Producer handle for review confirmations
#[derive(Debug, Clone, Default)]
pub struct ReviewNotifier {
    queue: Option<mpsc::UnboundedSender<ReviewNotification>>,
}

impl ReviewNotifier {
    /// A notifier that schedules nothing
    pub fn disabled() -> Self {
        Self { queue: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.queue.is_some()
    }

    /// Schedule a confirmation for a persisted review without waiting on it.
    ///
    /// Returns the notification id when the job was queued. A closed queue is
    /// logged and otherwise ignored.
    pub fn notify(&self, review: &Review) -> Option<Uuid> {
        let queue = self.queue.as_ref()?;
        let notification = ReviewNotification::from_review(review);
        let notification_id = notification.notification_id;

        match queue.send(notification) {
            Ok(()) => Some(notification_id),
            Err(_) => {
                warn!(
                    review_id = review.id,
                    error = %NotificationError::ChannelClosed,
                    "Dropping review confirmation"
                );
                None
            }
        }
    }
}

/// Delivery counters shared between the worker and its handle
#[derive(Debug, Default)]
pub struct NotificationStats {
    delivered: AtomicU64,
    failed: AtomicU64,
}

impl NotificationStats {
    pub fn snapshot(&self) -> NotificationStatsSnapshot {
        NotificationStatsSnapshot {
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationStatsSnapshot {
    pub delivered: u64,
    pub failed: u64,
}

/// Owner handle for a running worker
#[derive(Debug)]
pub struct NotificationWorkerHandle {
    join: JoinHandle<()>,
    shutdown: oneshot::Sender<()>,
    stats: Arc<NotificationStats>,
}

impl NotificationWorkerHandle {
    pub fn stats(&self) -> NotificationStatsSnapshot {
        self.stats.snapshot()
    }

    /// Stop accepting jobs, deliver everything already queued, then wait for the worker
    pub async fn shutdown(self) -> NotificationStatsSnapshot {
        // The worker may already have exited after every notifier was dropped
        let _ = self.shutdown.send(());

        if let Err(e) = self.join.await {
            error!(error = %e, "Notification worker terminated abnormally");
        }

        self.stats.snapshot()
    }
}

pub struct NotificationWorker;

impl NotificationWorker {
    /// Start a worker on the current tokio runtime.
    ///
    /// Dropping the returned handle detaches the worker; it then runs until
    /// every notifier clone is gone.
    pub fn spawn(sender: Arc<dyn ConfirmationSender>) -> (ReviewNotifier, NotificationWorkerHandle) {
        let (queue, jobs) = mpsc::unbounded_channel();
        let (shutdown, shutdown_rx) = oneshot::channel();
        let stats = Arc::new(NotificationStats::default());

        info!(sender = sender.name(), "Starting notification worker");

        let join = tokio::spawn(Self::run(jobs, shutdown_rx, sender, Arc::clone(&stats)));

        (
            ReviewNotifier { queue: Some(queue) },
            NotificationWorkerHandle {
                join,
                shutdown,
                stats,
            },
        )
    }

    async fn run(
        mut jobs: mpsc::UnboundedReceiver<ReviewNotification>,
        shutdown_rx: oneshot::Receiver<()>,
        sender: Arc<dyn ConfirmationSender>,
        stats: Arc<NotificationStats>,
    ) {
        let mut shutdown_rx = Some(shutdown_rx);

        loop {
            let job = match shutdown_rx.as_mut() {
                Some(signal) => tokio::select! {
                    job = jobs.recv() => job,
                    requested = signal => {
                        shutdown_rx = None;
                        if requested.is_ok() {
                            // Buffered jobs are still delivered below
                            jobs.close();
                        }
                        continue;
                    }
                },
                None => jobs.recv().await,
            };

            match job {
                Some(notification) => Self::deliver(&sender, &stats, notification).await,
                None => break,
            }
        }

        let snapshot = stats.snapshot();
        info!(
            delivered = snapshot.delivered,
            failed = snapshot.failed,
            "Notification worker stopped"
        );
    }

    async fn deliver(
        sender: &Arc<dyn ConfirmationSender>,
        stats: &NotificationStats,
        notification: ReviewNotification,
    ) {
        let notification_id = notification.notification_id.to_string();
        let review_id = notification.review_id;

        // Run each delivery in its own task so a panicking sender cannot take the worker down
        let transport = Arc::clone(sender);
        let outcome =
            tokio::spawn(async move { transport.send_confirmation(&notification).await }).await;

        match outcome {
            Ok(Ok(())) => {
                stats.delivered.fetch_add(1, Ordering::Relaxed);
                log_notification_operation(&notification_id, review_id, "delivered", None);
            }
            Ok(Err(e)) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    notification_id = %notification_id,
                    review_id = review_id,
                    error = %e,
                    "Review confirmation failed"
                );
            }
            Err(join_error) => {
                stats.failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    notification_id = %notification_id,
                    review_id = review_id,
                    error = %NotificationError::SenderPanicked,
                    details = %join_error,
                    "Review confirmation failed"
                );
            }
        }
    }
}
