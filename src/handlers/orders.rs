use super::common::{
    created_response, default_page, default_per_page, map_service_error, no_content_response,
    success_response, validate_input,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    items::OrderItem,
    services::orders::{CreateOrderRequest, OrderListFilter, UpdateOrderRequest},
    services::updates::PostUpdateRequest,
    status::{OrderStatus, PipelineView, ProgressStage},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// Request DTOs

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
    pub actor_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct SetProgressStageRequest {
    pub stage: ProgressStage,
    pub actor_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ReplaceItemsRequest {
    pub items: Vec<OrderItem>,
    pub actor_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderListParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    /// Restrict to a single pipeline status
    pub status: Option<OrderStatus>,
    /// Restrict to one company (tenant scoping)
    pub company_id: Option<Uuid>,
    #[serde(default)]
    pub include_archived: bool,
    /// Free-text match on order number and title
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ViewParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub company_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct TrailParams {
    pub limit: Option<u64>,
}

// Handler functions

/// Create a new order
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = crate::services::orders::OrderResponse),
        (status = 400, description = "Invalid payload", body = crate::errors::ErrorResponse),
        (status = 409, description = "Order number allocation failed", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .orders
        .create_order(payload)
        .await
        .map_err(map_service_error)?;

    info!("Order created: {}", order.order_number);

    Ok(created_response(order))
}

/// List orders with filters and pagination
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    params(OrderListParams),
    responses(
        (status = 200, description = "Orders page", body = crate::services::orders::OrderListResponse),
    ),
    tag = "orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<OrderListParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = OrderListFilter {
        statuses: params.status.into_iter().collect(),
        company_id: params.company_id,
        include_archived: params.include_archived,
        search: params.search,
    };

    let orders = state
        .services
        .orders
        .list_orders(filter, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(orders))
}

/// List the orders on one of the admin screens
async fn list_view(
    State(state): State<AppState>,
    Path(view): Path<PipelineView>,
    Query(params): Query<ViewParams>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = state
        .services
        .orders
        .list_view(view, params.company_id, params.page, params.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(orders))
}

/// Get an order by ID
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = Uuid, Path, description = "Order id")),
    responses(
        (status = 200, description = "The order", body = crate::services::orders::OrderResponse),
        (status = 404, description = "No such order", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get_order(order_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Order with ID {} not found", order_id)))?;

    Ok(success_response(order))
}

/// Get an order by its order number
async fn get_order_by_number(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .get_order_by_number(&order_number)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Order '{}' not found", order_number)))?;

    Ok(success_response(order))
}

/// Update an order's editable fields
async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let order = state
        .services
        .orders
        .update_order(order_id, payload, None)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(order))
}

/// Move an order to a new pipeline status
#[utoipa::path(
    put,
    path = "/api/v1/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order after the transition", body = crate::services::orders::OrderResponse),
        (status = 400, description = "Illegal transition", body = crate::errors::ErrorResponse),
        (status = 404, description = "No such order", body = crate::errors::ErrorResponse),
    ),
    tag = "orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .update_status(order_id, payload.status, payload.actor_id)
        .await
        .map_err(map_service_error)?;

    info!(
        "Order {} moved to status {}",
        order.order_number, order.status
    );

    Ok(success_response(order))
}

/// Set the progress stage of an in-progress order
async fn set_progress_stage(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<SetProgressStageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .set_progress_stage(order_id, payload.stage, payload.actor_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(order))
}

/// Archive an order
async fn archive_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .orders
        .archive_order(order_id, None)
        .await
        .map_err(map_service_error)?;

    info!("Order archived: {}", order_id);

    Ok(no_content_response())
}

/// Get the structured items of an order
async fn get_order_items(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .services
        .orders
        .get_order_items(order_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(items))
}

/// Replace the items of an order
async fn set_order_items(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<ReplaceItemsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state
        .services
        .orders
        .set_order_items(order_id, payload.items, payload.actor_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(order))
}

/// Get an order's activity trail
async fn get_order_activity(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Query(params): Query<TrailParams>,
) -> Result<impl IntoResponse, ApiError> {
    let trail = state
        .services
        .activity
        .list_for_order(order_id, params.limit)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(trail))
}

/// List the messages posted on an order
async fn list_order_updates(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let updates = state
        .services
        .updates
        .list_for_order(order_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(updates))
}

/// Post a message on an order
async fn post_order_update(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<PostUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let update = state
        .services
        .updates
        .post_update(order_id, payload)
        .await
        .map_err(map_service_error)?;

    Ok(created_response(update))
}

/// Creates the router for order endpoints
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/views/:view", get(list_view))
        .route("/by-number/:order_number", get(get_order_by_number))
        .route("/:id", get(get_order).put(update_order))
        .route("/:id/status", put(update_order_status))
        .route("/:id/stage", put(set_progress_stage))
        .route("/:id/archive", post(archive_order))
        .route("/:id/items", get(get_order_items).put(set_order_items))
        .route("/:id/activity", get(get_order_activity))
        .route(
            "/:id/updates",
            get(list_order_updates).post(post_order_update),
        )
}
