use crate::{
    entities::order::Entity as OrderEntity,
    entities::order_update::{
        self, ActiveModel as UpdateActiveModel, Entity as UpdateEntity, Model as UpdateModel,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PostUpdateRequest {
    pub author_id: Uuid,
    #[validate(length(min = 1, max = 4000, message = "Update body is required"))]
    pub body: String,
}

/// Client-visible messages posted against an order.
#[derive(Clone)]
pub struct UpdateService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<Arc<EventSender>>,
}

impl UpdateService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, request), fields(order_id = %order_id, author_id = %request.author_id))]
    pub async fn post_update(
        &self,
        order_id: Uuid,
        request: PostUpdateRequest,
    ) -> Result<UpdateModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        let update = UpdateActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            author_id: Set(request.author_id),
            body: Set(request.body),
            created_at: Set(Utc::now()),
        };

        let model = update.insert(&*self.db).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to post update");
            ServiceError::DatabaseError(e)
        })?;

        info!(update_id = %model.id, order_id = %order_id, "Order update posted");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::OrderUpdatePosted {
                    order_id,
                    order_number: order.order_number,
                    update_id: model.id,
                    author_id: model.author_id,
                })
                .await
            {
                warn!(error = %e, "Failed to send order update event");
            }
        }

        Ok(model)
    }

    /// Messages on an order, newest first.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn list_for_order(&self, order_id: Uuid) -> Result<Vec<UpdateModel>, ServiceError> {
        UpdateEntity::find()
            .filter(order_update::Column::OrderId.eq(order_id))
            .order_by_desc(order_update::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_request_requires_a_body() {
        let request = PostUpdateRequest {
            author_id: Uuid::new_v4(),
            body: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
