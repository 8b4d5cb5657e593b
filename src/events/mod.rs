use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::services::notifications::{NotificationService, OrderNotification};

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// The events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Order events
    OrderCreated {
        order_id: Uuid,
        order_number: String,
    },
    OrderStatusChanged {
        order_id: Uuid,
        order_number: String,
        old_status: String,
        new_status: String,
    },
    ProgressStageChanged {
        order_id: Uuid,
        order_number: String,
        old_stage: Option<String>,
        new_stage: String,
    },
    OrderArchived(Uuid),
    OrderUpdatePosted {
        order_id: Uuid,
        order_number: String,
        update_id: Uuid,
        author_id: Uuid,
    },

    // Purchase order events
    PurchaseOrderLogged {
        order_id: Uuid,
        purchase_order_id: Uuid,
        supplier_id: Uuid,
    },

    // Directory events
    CompanyCreated(Uuid),
    SupplierCreated(Uuid),
}

/// Drains the event channel and fans events out to their side effects.
///
/// Status changes and posted updates notify by email when a notifier is
/// configured; everything else is logged only. Delivery is best-effort.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, notifier: Option<Arc<NotificationService>>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        info!("Received event: {:?}", event);

        match &event {
            Event::OrderStatusChanged {
                order_id,
                order_number,
                old_status,
                new_status,
            } => {
                if let Some(notifier) = &notifier {
                    let notification = OrderNotification {
                        subject: format!("Order {} is now {}", order_number, new_status),
                        order_id: *order_id,
                        order_number: order_number.clone(),
                        body: format!(
                            "Order {} moved from '{}' to '{}'.",
                            order_number, old_status, new_status
                        ),
                    };
                    if let Err(e) = notifier.notify(notification).await {
                        error!(
                            "Failed to send status notification: order_id={}, error={}",
                            order_id, e
                        );
                    }
                }
            }
            Event::OrderUpdatePosted {
                order_id,
                order_number,
                update_id,
                ..
            } => {
                if let Some(notifier) = &notifier {
                    let notification = OrderNotification {
                        subject: format!("New update on order {}", order_number),
                        order_id: *order_id,
                        order_number: order_number.clone(),
                        body: format!("Order {} received update {}.", order_number, update_id),
                    };
                    if let Err(e) = notifier.notify(notification).await {
                        error!(
                            "Failed to send update notification: order_id={}, error={}",
                            order_id, e
                        );
                    }
                }
            }
            _ => {}
        }
    }

    warn!("Event channel closed; event processing loop exiting");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_fails_once_receiver_is_dropped() {
        let (tx, rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);
        drop(rx);

        let result = sender
            .send(Event::OrderArchived(Uuid::new_v4()))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (tx, mut rx) = mpsc::channel(4);
        let sender = EventSender::new(tx);

        sender
            .send(Event::OrderCreated {
                order_id: Uuid::new_v4(),
                order_number: "ORD-1".into(),
            })
            .await
            .unwrap();

        match rx.recv().await {
            Some(Event::OrderCreated { order_number, .. }) => {
                assert_eq!(order_number, "ORD-1");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
