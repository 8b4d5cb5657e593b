use crate::errors::ServiceError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Payload delivered to the outbound email endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderNotification {
    pub subject: String,
    pub order_id: Uuid,
    pub order_number: String,
    pub body: String,
}

#[derive(Debug, Serialize)]
struct NotificationEnvelope<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    sender: Option<&'a str>,
    #[serde(flatten)]
    notification: &'a OrderNotification,
}

/// Outbound email boundary.
///
/// Emails leave the system through a hosted function reached over HTTP; this
/// service POSTs the notification payload to that endpoint. With no endpoint
/// configured, notifications are disabled and every send is a logged no-op.
#[derive(Debug, Clone)]
pub struct NotificationService {
    client: reqwest::Client,
    endpoint: Option<String>,
    sender: Option<String>,
}

impl NotificationService {
    pub fn new(endpoint: Option<String>, sender: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
            endpoint,
            sender,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Delivers one notification. Failures surface as
    /// `ServiceError::ExternalServiceError`; callers treat delivery as
    /// best-effort and log rather than propagate.
    #[instrument(skip(self, notification), fields(order_id = %notification.order_id))]
    pub async fn notify(&self, notification: OrderNotification) -> Result<(), ServiceError> {
        let Some(endpoint) = &self.endpoint else {
            debug!("Notification endpoint not configured; dropping notification");
            return Ok(());
        };

        let envelope = NotificationEnvelope {
            sender: self.sender.as_deref(),
            notification: &notification,
        };

        let response = self
            .client
            .post(endpoint)
            .json(&envelope)
            .send()
            .await
            .map_err(|e| ServiceError::ExternalServiceError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "notification endpoint returned {}",
                response.status()
            )));
        }

        info!(
            "Notification delivered: order_number={}, subject={}",
            notification.order_number, notification.subject
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrderNotification {
        OrderNotification {
            subject: "Order ORD-1 is now received".into(),
            order_id: Uuid::new_v4(),
            order_number: "ORD-1".into(),
            body: "Order ORD-1 moved from 'pending' to 'received'.".into(),
        }
    }

    #[tokio::test]
    async fn disabled_service_drops_notifications() {
        let service = NotificationService::new(None, None);
        assert!(!service.is_enabled());
        assert!(service.notify(sample()).await.is_ok());
    }

    #[test]
    fn envelope_flattens_notification_fields() {
        let notification = sample();
        let envelope = NotificationEnvelope {
            sender: Some("orders@example.com"),
            notification: &notification,
        };
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["sender"], "orders@example.com");
        assert_eq!(value["order_number"], "ORD-1");
        assert_eq!(value["subject"], "Order ORD-1 is now received");
    }
}
