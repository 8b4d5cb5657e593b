use crate::{
    entities::order::Entity as OrderEntity,
    entities::order_purchase_order::{
        self, ActiveModel as PurchaseOrderActiveModel, Entity as PurchaseOrderEntity,
        Model as PurchaseOrderModel,
    },
    entities::supplier::Entity as SupplierEntity,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
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
pub struct LogPurchaseOrderRequest {
    pub supplier_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "PO number is required"))]
    pub po_number: String,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
}

/// Records purchase orders raised against suppliers while fulfilling an
/// order. This is also the order↔supplier junction.
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<Arc<EventSender>>,
}

impl PurchaseOrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, request), fields(order_id = %order_id, supplier_id = %request.supplier_id))]
    pub async fn log_purchase_order(
        &self,
        order_id: Uuid,
        request: LogPurchaseOrderRequest,
    ) -> Result<PurchaseOrderModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db;

        // Both ends of the junction must exist before logging.
        OrderEntity::find_by_id(order_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        SupplierEntity::find_by_id(request.supplier_id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier {} not found", request.supplier_id))
            })?;

        let purchase_order = PurchaseOrderActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            supplier_id: Set(request.supplier_id),
            po_number: Set(request.po_number),
            amount: Set(request.amount),
            description: Set(request.description),
            created_at: Set(Utc::now()),
        };

        let model = purchase_order.insert(db).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to log purchase order");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            purchase_order_id = %model.id,
            order_id = %order_id,
            po_number = %model.po_number,
            "Purchase order logged"
        );

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender
                .send(Event::PurchaseOrderLogged {
                    order_id,
                    purchase_order_id: model.id,
                    supplier_id: model.supplier_id,
                })
                .await
            {
                warn!(error = %e, "Failed to send purchase order event");
            }
        }

        Ok(model)
    }

    /// Purchase orders raised for an order, oldest first.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn list_for_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<PurchaseOrderModel>, ServiceError> {
        PurchaseOrderEntity::find()
            .filter(order_purchase_order::Column::OrderId.eq(order_id))
            .order_by_asc(order_purchase_order::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Purchase orders raised against a supplier, newest first.
    #[instrument(skip(self), fields(supplier_id = %supplier_id))]
    pub async fn list_for_supplier(
        &self,
        supplier_id: Uuid,
    ) -> Result<Vec<PurchaseOrderModel>, ServiceError> {
        PurchaseOrderEntity::find()
            .filter(order_purchase_order::Column::SupplierId.eq(supplier_id))
            .order_by_desc(order_purchase_order::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self), fields(purchase_order_id = %purchase_order_id))]
    pub async fn delete_purchase_order(
        &self,
        purchase_order_id: Uuid,
    ) -> Result<(), ServiceError> {
        let result = PurchaseOrderEntity::delete_by_id(purchase_order_id)
            .exec(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Purchase order {} not found",
                purchase_order_id
            )));
        }

        info!(purchase_order_id = %purchase_order_id, "Purchase order deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_request_requires_a_po_number() {
        let request = LogPurchaseOrderRequest {
            supplier_id: Uuid::new_v4(),
            po_number: String::new(),
            amount: None,
            description: None,
        };
        assert!(request.validate().is_err());
    }
}
