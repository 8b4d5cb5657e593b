use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{
    errors::ApiError, handlers::AppState, services::purchase_orders::LogPurchaseOrderRequest,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use tracing::info;
use uuid::Uuid;

/// Log a purchase order against an order and supplier
async fn log_purchase_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(payload): Json<LogPurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let purchase_order = state
        .services
        .purchase_orders
        .log_purchase_order(order_id, payload)
        .await
        .map_err(map_service_error)?;

    info!(
        "Purchase order {} logged against order {}",
        purchase_order.po_number, order_id
    );

    Ok(created_response(purchase_order))
}

/// List the purchase orders raised for an order
async fn list_for_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase_orders = state
        .services
        .purchase_orders
        .list_for_order(order_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(purchase_orders))
}

/// List the purchase orders raised against a supplier
async fn list_for_supplier(
    State(state): State<AppState>,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let purchase_orders = state
        .services
        .purchase_orders
        .list_for_supplier(supplier_id)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(purchase_orders))
}

/// Delete a logged purchase order
async fn delete_purchase_order(
    State(state): State<AppState>,
    Path(purchase_order_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .purchase_orders
        .delete_purchase_order(purchase_order_id)
        .await
        .map_err(map_service_error)?;

    info!("Purchase order deleted: {}", purchase_order_id);

    Ok(no_content_response())
}

/// Creates the router for purchase order endpoints
pub fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/orders/:id",
            post(log_purchase_order).get(list_for_order),
        )
        .route("/suppliers/:id", get(list_for_supplier))
        .route("/:id", delete(delete_purchase_order))
}
