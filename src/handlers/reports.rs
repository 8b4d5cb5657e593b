use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, handlers::AppState};
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
pub struct OrderVolumeParams {
    /// First day of the reporting period (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the reporting period (inclusive)
    pub end_date: NaiveDate,
}

/// Dashboard summary: counts by status and stage, directory sizes, and the
/// latest activity.
async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .reports
        .dashboard()
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Order volume per company over a date range
#[utoipa::path(
    get,
    path = "/api/v1/reports/order-volume",
    params(OrderVolumeParams),
    responses(
        (status = 200, description = "Volume report", body = crate::services::reports::OrderVolumeReport),
        (status = 400, description = "Bad date range", body = crate::errors::ErrorResponse),
    ),
    tag = "reports"
)]
pub async fn order_volume(
    State(state): State<AppState>,
    Query(params): Query<OrderVolumeParams>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .services
        .reports
        .order_volume(params.start_date, params.end_date)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(report))
}

/// Creates the router for report endpoints
pub fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/order-volume", get(order_volume))
}
