use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
    PaginationParams,
};
use crate::{
    errors::ApiError,
    handlers::AppState,
    services::companies::{CreateCompanyRequest, UpdateCompanyRequest},
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use tracing::info;
use uuid::Uuid;

/// Create a new company
async fn create_company(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let company = state
        .services
        .companies
        .create_company(payload)
        .await
        .map_err(map_service_error)?;

    info!("Company created: {}", company.id);

    Ok(created_response(company))
}

/// Get a company by ID
async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let company = state
        .services
        .companies
        .get_company(company_id)
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound(format!("Company with ID {} not found", company_id)))?;

    Ok(success_response(company))
}

/// List companies with pagination
async fn list_companies(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ApiError> {
    let companies = state
        .services
        .companies
        .list_companies(pagination.page, pagination.per_page)
        .await
        .map_err(map_service_error)?;

    Ok(success_response(companies))
}

/// Update a company
async fn update_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let company = state
        .services
        .companies
        .update_company(company_id, payload)
        .await
        .map_err(map_service_error)?;

    info!("Company updated: {}", company_id);

    Ok(success_response(company))
}

/// Delete a company without orders on file
async fn delete_company(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .companies
        .delete_company(company_id)
        .await
        .map_err(map_service_error)?;

    info!("Company deleted: {}", company_id);

    Ok(no_content_response())
}

/// Creates the router for company endpoints
pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_company))
        .route("/", get(list_companies))
        .route("/:id", get(get_company))
        .route("/:id", put(update_company))
        .route("/:id", delete(delete_company))
}
