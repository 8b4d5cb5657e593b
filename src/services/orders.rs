use crate::{
    entities::order::{
        self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel,
    },
    entities::order_activity,
    errors::ServiceError,
    events::{Event, EventSender},
    items::{self, OrderItem},
    services::order_number::{generate_order_number, MAX_GENERATION_ATTEMPTS},
    status::{self, OrderStatus, PipelineView, ProgressStage},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Largest page size a caller can request.
const MAX_PAGE_SIZE: u64 = 100;

/// Request/Response types for the order service
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub company_id: Uuid,
    pub created_by: Uuid,
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    /// Newline-delimited item lines; normalized through the item parser.
    pub description: Option<String>,
    pub delivery_address: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, max = 200, message = "Title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub delivery_address: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub order_number: String,
    pub company_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Items recovered from the description field.
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub progress_stage: Option<ProgressStage>,
    pub delivery_address: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

/// Filters applied by the list endpoint and the screen views.
#[derive(Debug, Default, Clone)]
pub struct OrderListFilter {
    pub statuses: Vec<OrderStatus>,
    pub company_id: Option<Uuid>,
    pub include_archived: bool,
    pub search: Option<String>,
}

/// Service for managing orders through the pipeline.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<Arc<EventSender>>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a new order with a freshly generated order number.
    ///
    /// Order numbers are best-effort unique; when the insert trips the unique
    /// constraint the number is regenerated, up to three attempts total.
    #[instrument(skip(self, request), fields(company_id = %request.company_id))]
    pub async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db;
        let description = request
            .description
            .as_deref()
            .map(normalize_description)
            .filter(|text| !text.is_empty());

        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let order_number = generate_order_number();
            let now = Utc::now();
            let order_id = Uuid::new_v4();

            let txn = db.begin().await.map_err(|e| {
                error!(error = %e, "Failed to start transaction for order creation");
                ServiceError::DatabaseError(e)
            })?;

            let order_active_model = OrderActiveModel {
                id: Set(order_id),
                order_number: Set(order_number.clone()),
                company_id: Set(request.company_id),
                created_by: Set(request.created_by),
                title: Set(request.title.clone()),
                description: Set(description.clone()),
                status: Set(OrderStatus::Pending.to_string()),
                progress_stage: Set(None),
                delivery_address: Set(request.delivery_address.clone()),
                due_date: Set(request.due_date),
                amount: Set(request.amount),
                is_archived: Set(false),
                created_at: Set(now),
                updated_at: Set(Some(now)),
                version: Set(1),
            };

            let order_model = match order_active_model.insert(&txn).await {
                Ok(model) => model,
                Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    let _ = txn.rollback().await;
                    warn!(
                        attempt,
                        order_number = %order_number,
                        "Order number collision, regenerating"
                    );
                    continue;
                }
                Err(e) => {
                    error!(error = %e, order_id = %order_id, "Failed to create order");
                    return Err(ServiceError::DatabaseError(e));
                }
            };

            self.record_activity(
                &txn,
                order_id,
                Some(request.created_by),
                "order created",
                Some(format!("order number {}", order_number)),
            )
            .await?;

            txn.commit().await.map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to commit order creation");
                ServiceError::DatabaseError(e)
            })?;

            info!(order_id = %order_id, order_number = %order_number, "Order created");

            self.emit(Event::OrderCreated {
                order_id,
                order_number,
            })
            .await;

            return self.order_to_response(order_model);
        }

        Err(ServiceError::Conflict(format!(
            "Could not allocate a unique order number after {} attempts",
            MAX_GENERATION_ATTEMPTS
        )))
    }

    /// Retrieves an order by ID
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order(&self, order_id: Uuid) -> Result<Option<OrderResponse>, ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to fetch order");
                ServiceError::DatabaseError(e)
            })?;

        order.map(|model| self.order_to_response(model)).transpose()
    }

    /// Retrieves an order by its human-facing order number
    #[instrument(skip(self), fields(order_number = %order_number))]
    pub async fn get_order_by_number(
        &self,
        order_number: &str,
    ) -> Result<Option<OrderResponse>, ServiceError> {
        let order = OrderEntity::find()
            .filter(order::Column::OrderNumber.eq(order_number))
            .one(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to fetch order by number");
                ServiceError::DatabaseError(e)
            })?;

        order.map(|model| self.order_to_response(model)).transpose()
    }

    /// Lists orders with filters and pagination, newest first.
    #[instrument(skip(self, filter))]
    pub async fn list_orders(
        &self,
        filter: OrderListFilter,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PAGE_SIZE);

        let mut query = OrderEntity::find();
        if !filter.include_archived {
            query = query.filter(order::Column::IsArchived.eq(false));
        }
        if let Some(company_id) = filter.company_id {
            query = query.filter(order::Column::CompanyId.eq(company_id));
        }
        if !filter.statuses.is_empty() {
            let statuses: Vec<String> = filter.statuses.iter().map(ToString::to_string).collect();
            query = query.filter(order::Column::Status.is_in(statuses));
        }
        if let Some(search) = filter.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                query = query.filter(
                    Condition::any()
                        .add(order::Column::OrderNumber.contains(search))
                        .add(order::Column::Title.contains(search)),
                );
            }
        }

        let paginator = query
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&*self.db, per_page);

        let total = paginator.num_items().await.map_err(|e| {
            error!(error = %e, "Failed to count orders");
            ServiceError::DatabaseError(e)
        })?;

        let orders = paginator.fetch_page(page - 1).await.map_err(|e| {
            error!(error = %e, page, per_page, "Failed to fetch orders page");
            ServiceError::DatabaseError(e)
        })?;

        let orders = orders
            .into_iter()
            .map(|model| self.order_to_response(model))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(OrderListResponse {
            orders,
            total,
            page,
            per_page,
        })
    }

    /// Lists the orders visible on one of the admin screens.
    #[instrument(skip(self))]
    pub async fn list_view(
        &self,
        view: PipelineView,
        company_id: Option<Uuid>,
        page: u64,
        per_page: u64,
    ) -> Result<OrderListResponse, ServiceError> {
        let filter = OrderListFilter {
            statuses: view.statuses().to_vec(),
            company_id,
            ..Default::default()
        };
        self.list_orders(filter, page, per_page).await
    }

    /// Updates an order's editable fields.
    #[instrument(skip(self, request), fields(order_id = %order_id))]
    pub async fn update_order(
        &self,
        order_id: Uuid,
        request: UpdateOrderRequest,
        actor_id: Option<Uuid>,
    ) -> Result<OrderResponse, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = self.find_in_txn(&txn, order_id).await?;
        let next_version = order.version + 1;

        let mut active: OrderActiveModel = order.into();
        if let Some(title) = request.title {
            active.title = Set(title);
        }
        if let Some(description) = request.description.as_deref() {
            let normalized = normalize_description(description);
            active.description = Set((!normalized.is_empty()).then_some(normalized));
        }
        if let Some(delivery_address) = request.delivery_address {
            active.delivery_address = Set(Some(delivery_address));
        }
        if let Some(due_date) = request.due_date {
            active.due_date = Set(Some(due_date));
        }
        if let Some(amount) = request.amount {
            active.amount = Set(Some(amount));
        }
        active.updated_at = Set(Some(Utc::now()));
        active.version = Set(next_version);

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update order");
            ServiceError::DatabaseError(e)
        })?;

        self.record_activity(&txn, order_id, actor_id, "order updated", None)
            .await?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;
        info!(order_id = %order_id, "Order updated");

        self.order_to_response(updated)
    }

    /// Moves an order to a new pipeline status.
    ///
    /// Transition validity is checked centrally; illegal moves are rejected
    /// before anything is written.
    #[instrument(skip(self), fields(order_id = %order_id, new_status = %new_status))]
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        actor_id: Option<Uuid>,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = self.find_in_txn(&txn, order_id).await?;
        let old_status = parse_status(&order.status)?;
        let old_stage = parse_stage(order.progress_stage.as_deref())?;

        let (status, stage) = status::transition(old_status, old_stage, new_status)
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let order_number = order.order_number.clone();
        let next_version = order.version + 1;

        let mut active: OrderActiveModel = order.into();
        active.status = Set(status.to_string());
        active.progress_stage = Set(stage.map(|s| s.to_string()));
        active.updated_at = Set(Some(Utc::now()));
        active.version = Set(next_version);

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update order status");
            ServiceError::DatabaseError(e)
        })?;

        self.record_activity(
            &txn,
            order_id,
            actor_id,
            "status changed",
            Some(format!("{} -> {}", old_status, status)),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        info!(
            order_id = %order_id,
            old_status = %old_status,
            new_status = %status,
            "Order status updated"
        );

        self.emit(Event::OrderStatusChanged {
            order_id,
            order_number,
            old_status: old_status.to_string(),
            new_status: status.to_string(),
        })
        .await;

        self.order_to_response(updated)
    }

    /// Sets the progress-stage refinement of an in-progress order.
    #[instrument(skip(self), fields(order_id = %order_id, stage = %stage))]
    pub async fn set_progress_stage(
        &self,
        order_id: Uuid,
        stage: ProgressStage,
        actor_id: Option<Uuid>,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = self.find_in_txn(&txn, order_id).await?;
        let current_status = parse_status(&order.status)?;
        let current_stage = parse_stage(order.progress_stage.as_deref())?;

        let new_stage = status::set_stage(current_status, current_stage, stage).map_err(|e| {
            let message = e.to_string();
            match e {
                status::InvalidStage::WrongStatus(_) => ServiceError::InvalidOperation(message),
                status::InvalidStage::Backwards { .. } => ServiceError::ValidationError(message),
            }
        })?;

        let order_number = order.order_number.clone();
        let next_version = order.version + 1;

        let mut active: OrderActiveModel = order.into();
        active.progress_stage = Set(Some(new_stage.to_string()));
        active.updated_at = Set(Some(Utc::now()));
        active.version = Set(next_version);

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to update progress stage");
            ServiceError::DatabaseError(e)
        })?;

        self.record_activity(
            &txn,
            order_id,
            actor_id,
            "progress stage changed",
            Some(new_stage.to_string()),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        self.emit(Event::ProgressStageChanged {
            order_id,
            order_number,
            old_stage: current_stage.map(|s| s.to_string()),
            new_stage: new_stage.to_string(),
        })
        .await;

        self.order_to_response(updated)
    }

    /// Returns the structured items parsed from an order's description.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order_items(&self, order_id: Uuid) -> Result<Vec<OrderItem>, ServiceError> {
        let order = OrderEntity::find_by_id(order_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Order {} not found", order_id)))?;

        Ok(order
            .description
            .as_deref()
            .map(items::parse_items)
            .unwrap_or_default())
    }

    /// Replaces an order's items, rewriting the description field.
    #[instrument(skip(self, new_items), fields(order_id = %order_id, count = new_items.len()))]
    pub async fn set_order_items(
        &self,
        order_id: Uuid,
        new_items: Vec<OrderItem>,
        actor_id: Option<Uuid>,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = self.find_in_txn(&txn, order_id).await?;
        let next_version = order.version + 1;
        let rendered = items::render_items(&new_items);

        let mut active: OrderActiveModel = order.into();
        active.description = Set((!rendered.is_empty()).then_some(rendered));
        active.updated_at = Set(Some(Utc::now()));
        active.version = Set(next_version);

        let updated = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to replace order items");
            ServiceError::DatabaseError(e)
        })?;

        self.record_activity(
            &txn,
            order_id,
            actor_id,
            "items updated",
            Some(format!("{} item lines", new_items.len())),
        )
        .await?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        self.order_to_response(updated)
    }

    /// Archives an order
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn archive_order(
        &self,
        order_id: Uuid,
        actor_id: Option<Uuid>,
    ) -> Result<OrderResponse, ServiceError> {
        let db = &*self.db;
        let txn = db.begin().await.map_err(ServiceError::DatabaseError)?;

        let order = self.find_in_txn(&txn, order_id).await?;
        let next_version = order.version + 1;

        let mut active: OrderActiveModel = order.into();
        active.is_archived = Set(true);
        active.updated_at = Set(Some(Utc::now()));
        active.version = Set(next_version);

        let archived = active.update(&txn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to archive order");
            ServiceError::DatabaseError(e)
        })?;

        self.record_activity(&txn, order_id, actor_id, "order archived", None)
            .await?;

        txn.commit().await.map_err(ServiceError::DatabaseError)?;
        info!(order_id = %order_id, "Order archived");

        self.emit(Event::OrderArchived(order_id)).await;

        self.order_to_response(archived)
    }

    async fn find_in_txn<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: Uuid,
    ) -> Result<OrderModel, ServiceError> {
        OrderEntity::find_by_id(order_id)
            .one(conn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = %order_id, "Failed to fetch order");
                ServiceError::DatabaseError(e)
            })?
            .ok_or_else(|| {
                warn!(order_id = %order_id, "Order not found");
                ServiceError::NotFound(format!("Order {} not found", order_id))
            })
    }

    async fn record_activity<C: ConnectionTrait>(
        &self,
        conn: &C,
        order_id: Uuid,
        actor_id: Option<Uuid>,
        action: &str,
        detail: Option<String>,
    ) -> Result<(), ServiceError> {
        let entry = order_activity::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            actor_id: Set(actor_id),
            action: Set(action.to_string()),
            detail: Set(detail),
            created_at: Set(Utc::now()),
        };
        entry.insert(conn).await.map_err(|e| {
            error!(error = %e, order_id = %order_id, "Failed to record activity");
            ServiceError::DatabaseError(e)
        })?;
        Ok(())
    }

    async fn emit(&self, event: Event) {
        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(event).await {
                warn!(error = %e, "Failed to send event");
            }
        }
    }

    /// Converts an order model to response format
    fn order_to_response(&self, model: OrderModel) -> Result<OrderResponse, ServiceError> {
        let status = parse_status(&model.status)?;
        let progress_stage = parse_stage(model.progress_stage.as_deref())?;
        let items = model
            .description
            .as_deref()
            .map(items::parse_items)
            .unwrap_or_default();

        Ok(OrderResponse {
            id: model.id,
            order_number: model.order_number,
            company_id: model.company_id,
            created_by: model.created_by,
            title: model.title,
            description: model.description,
            items,
            status,
            progress_stage,
            delivery_address: model.delivery_address,
            due_date: model.due_date,
            amount: model.amount,
            is_archived: model.is_archived,
            created_at: model.created_at,
            updated_at: model.updated_at,
            version: model.version,
        })
    }
}

/// Reparses and re-renders a description so stored text is always canonical.
fn normalize_description(text: &str) -> String {
    items::render_items(&items::parse_items(text))
}

fn parse_status(raw: &str) -> Result<OrderStatus, ServiceError> {
    OrderStatus::from_str(raw)
        .map_err(|_| ServiceError::InvalidStatus(format!("unknown order status '{}'", raw)))
}

fn parse_stage(raw: Option<&str>) -> Result<Option<ProgressStage>, ServiceError> {
    raw.map(|s| {
        ProgressStage::from_str(s)
            .map_err(|_| ServiceError::InvalidStatus(format!("unknown progress stage '{}'", s)))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn sample_model() -> OrderModel {
        let now = Utc::now();
        OrderModel {
            id: Uuid::new_v4(),
            order_number: "ORD-20250609-1030220-12345678".to_string(),
            company_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            title: "Workshop restock".to_string(),
            description: Some("Widget (Qty: 3) - fragile\nGasket (Qty: 2)".to_string()),
            status: "in-progress".to_string(),
            progress_stage: Some("packing".to_string()),
            delivery_address: Some("Unit 4, Trading Estate".to_string()),
            due_date: None,
            amount: Some(dec!(149.50)),
            is_archived: false,
            created_at: now,
            updated_at: Some(now),
            version: 3,
        }
    }

    fn service() -> OrderService {
        OrderService::new(Arc::new(DatabaseConnection::Disconnected), None)
    }

    #[test]
    fn order_to_response_parses_status_and_items() {
        let model = sample_model();
        let id = model.id;

        let response = service().order_to_response(model).unwrap();
        assert_eq!(response.id, id);
        assert_eq!(response.status, OrderStatus::InProgress);
        assert_eq!(response.progress_stage, Some(ProgressStage::Packing));
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].name, "Widget");
        assert_eq!(response.items[0].quantity, 3);
        assert_eq!(response.amount, Some(dec!(149.50)));
    }

    #[test]
    fn order_to_response_rejects_unknown_status() {
        let mut model = sample_model();
        model.status = "misplaced".to_string();

        let err = service().order_to_response(model).unwrap_err();
        assert_matches!(err, ServiceError::InvalidStatus(_));
    }

    #[test]
    fn normalize_description_is_canonical() {
        let normalized = normalize_description("Widget\nGasket (Qty: 2)");
        assert_eq!(normalized, "Widget (Qty: 1)\nGasket (Qty: 2)");
        assert_eq!(normalize_description(&normalized), normalized);
    }

    #[test]
    fn create_request_requires_a_title() {
        let request = CreateOrderRequest {
            company_id: Uuid::new_v4(),
            created_by: Uuid::new_v4(),
            title: String::new(),
            description: None,
            delivery_address: None,
            due_date: None,
            amount: None,
        };
        assert!(request.validate().is_err());
    }
}
