//! Queue-backed notification dispatcher

use std::sync::Arc;

use bmb_shared::phone::mask_phone_number;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::domain::entities::OrderId;
use crate::errors::NotificationError;

use super::traits::{NotificationSink, NotificationTransport, OutboundNotification};

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Outcome of a submitted notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    /// The transport accepted the message
    Delivered {
        id: Uuid,
        order_id: Option<OrderId>,
        provider_message_id: String,
    },
    /// The transport rejected the message
    Failed {
        id: Uuid,
        order_id: Option<OrderId>,
        error: NotificationError,
    },
    /// The message never reached the queue
    Dropped {
        id: Uuid,
        order_id: Option<OrderId>,
        error: NotificationError,
    },
}

impl NotificationEvent {
    /// Submission id the event belongs to
    pub fn id(&self) -> Uuid {
        match self {
            NotificationEvent::Delivered { id, .. }
            | NotificationEvent::Failed { id, .. }
            | NotificationEvent::Dropped { id, .. } => *id,
        }
    }
}

/// Submission handle for outbound notifications.
///
/// Cloning is cheap; the worker stops once every handle is dropped and the
/// queue has drained.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<OutboundNotification>,
    events: broadcast::Sender<NotificationEvent>,
}

impl NotificationDispatcher {
    /// Create a dispatcher and the worker that drains its queue
    pub fn new(
        transport: Arc<dyn NotificationTransport>,
        capacity: usize,
    ) -> (Self, NotificationWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let dispatcher = Self {
            sender,
            events: events.clone(),
        };
        let worker = NotificationWorker {
            transport,
            receiver,
            events,
        };

        (dispatcher, worker)
    }

    /// Create a dispatcher and run its worker on the current tokio runtime
    pub fn spawn(
        transport: Arc<dyn NotificationTransport>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (dispatcher, worker) = Self::new(transport, capacity);
        let handle = tokio::spawn(worker.run());
        (dispatcher, handle)
    }

    /// Subscribe to delivery outcomes
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: NotificationEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

impl NotificationSink for NotificationDispatcher {
    fn submit(&self, notification: OutboundNotification) -> Result<Uuid, NotificationError> {
        let id = notification.id;
        let order_id = notification.order_id.clone();

        match self.sender.try_send(notification) {
            Ok(()) => {
                debug!(notification_id = %id, "Notification queued");
                Ok(id)
            }
            Err(err) => {
                let error = match err {
                    mpsc::error::TrySendError::Full(_) => NotificationError::QueueFull,
                    mpsc::error::TrySendError::Closed(_) => NotificationError::WorkerClosed,
                };
                warn!(
                    notification_id = %id,
                    error = %error,
                    event = "notification_dropped",
                    "Failed to queue notification"
                );
                self.publish(NotificationEvent::Dropped {
                    id,
                    order_id,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }
}

/// Background worker delivering queued notifications one at a time
pub struct NotificationWorker {
    transport: Arc<dyn NotificationTransport>,
    receiver: mpsc::Receiver<OutboundNotification>,
    events: broadcast::Sender<NotificationEvent>,
}

impl NotificationWorker {
    /// Run until every dispatcher handle is dropped
    pub async fn run(mut self) {
        info!(
            provider = self.transport.provider_name(),
            "Notification worker started"
        );

        while let Some(notification) = self.receiver.recv().await {
            let span = info_span!("deliver_notification", notification_id = %notification.id);
            let event = self.deliver(notification).instrument(span).await;
            let _ = self.events.send(event);
        }

        info!("Notification worker shutting down");
    }

    async fn deliver(&self, notification: OutboundNotification) -> NotificationEvent {
        let OutboundNotification {
            id,
            phone,
            order_id,
            body,
        } = notification;

        match self.transport.send(&phone, &body, order_id.as_ref()).await {
            Ok(provider_message_id) => {
                info!(
                    phone = %mask_phone_number(&phone),
                    provider = self.transport.provider_name(),
                    provider_message_id = %provider_message_id,
                    event = "notification_delivered",
                    "Notification delivered"
                );
                NotificationEvent::Delivered {
                    id,
                    order_id,
                    provider_message_id,
                }
            }
            Err(error) => {
                warn!(
                    phone = %mask_phone_number(&phone),
                    provider = self.transport.provider_name(),
                    error = %error,
                    event = "notification_failed",
                    "Notification delivery failed"
                );
                NotificationEvent::Failed {
                    id,
                    order_id,
                    error,
                }
            }
        }
    }
}
