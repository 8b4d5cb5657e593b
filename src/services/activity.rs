use crate::{
    entities::order_activity::{
        self, ActiveModel as ActivityActiveModel, Entity as ActivityEntity, Model as ActivityModel,
    },
    errors::ServiceError,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;
use tracing::{error, instrument};
use uuid::Uuid;

/// Default number of trail entries returned per order.
const DEFAULT_TRAIL_LIMIT: u64 = 50;

/// Read/append access to the per-order activity trail.
///
/// Order mutations write their own trail rows transactionally; this service
/// covers standalone appends and reads.
#[derive(Clone)]
pub struct ActivityService {
    db: Arc<DatabaseConnection>,
}

impl ActivityService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, detail), fields(order_id = %order_id, action = %action))]
    pub async fn record(
        &self,
        order_id: Uuid,
        actor_id: Option<Uuid>,
        action: &str,
        detail: Option<String>,
    ) -> Result<ActivityModel, ServiceError> {
        let entry = ActivityActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            actor_id: Set(actor_id),
            action: Set(action.to_string()),
            detail: Set(detail),
            created_at: Set(Utc::now()),
        };

        entry.insert(&*self.db).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to record activity");
            ServiceError::DatabaseError(e)
        })
    }

    /// The order's trail, newest first.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn list_for_order(
        &self,
        order_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<ActivityModel>, ServiceError> {
        ActivityEntity::find()
            .filter(order_activity::Column::OrderId.eq(order_id))
            .order_by_desc(order_activity::Column::CreatedAt)
            .limit(limit.unwrap_or(DEFAULT_TRAIL_LIMIT))
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Most recent activity across all orders, for the dashboard.
    #[instrument(skip(self))]
    pub async fn recent(&self, limit: u64) -> Result<Vec<ActivityModel>, ServiceError> {
        ActivityEntity::find()
            .order_by_desc(order_activity::Column::CreatedAt)
            .limit(limit)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }
}
