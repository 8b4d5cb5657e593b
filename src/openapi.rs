use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Orderdesk API",
        version = "0.1.0",
        description = r#"
Order management for a small supplies and engineering business.

Clients submit orders; administrators move them through a fixed pipeline
(pending → received → in-progress → processing → delivered), log purchase
orders against suppliers, post updates, and read dashboard reports.
"#
    ),
    paths(
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order_status,
        crate::handlers::reports::order_volume,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::items::OrderItem,
        crate::items::StockStatus,
        crate::items::ItemStatus,
        crate::status::OrderStatus,
        crate::status::ProgressStage,
        crate::services::orders::CreateOrderRequest,
        crate::services::orders::OrderResponse,
        crate::services::orders::OrderListResponse,
        crate::handlers::orders::UpdateOrderStatusRequest,
        crate::services::reports::OrderVolumeReport,
        crate::services::reports::CompanyOrderVolume,
    )),
    tags(
        (name = "orders", description = "Order pipeline operations"),
        (name = "reports", description = "Dashboards and reporting"),
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_includes_the_order_paths() {
        let doc = ApiDocV1::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/orders"));
        assert!(paths
            .iter()
            .any(|p| p.as_str() == "/api/v1/orders/{id}/status"));
        assert!(paths
            .iter()
            .any(|p| p.as_str() == "/api/v1/reports/order-volume"));
    }
}
