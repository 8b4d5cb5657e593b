pub mod common;
pub mod companies;
pub mod orders;
pub mod purchase_orders;
pub mod reports;
pub mod suppliers;

use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub orders: Arc<crate::services::orders::OrderService>,
    pub companies: Arc<crate::services::companies::CompanyService>,
    pub suppliers: Arc<crate::services::suppliers::SupplierService>,
    pub purchase_orders: Arc<crate::services::purchase_orders::PurchaseOrderService>,
    pub activity: Arc<crate::services::activity::ActivityService>,
    pub updates: Arc<crate::services::updates::UpdateService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    /// Build the services container shared by all handlers.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self {
            orders: Arc::new(crate::services::orders::OrderService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            companies: Arc::new(crate::services::companies::CompanyService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            suppliers: Arc::new(crate::services::suppliers::SupplierService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            purchase_orders: Arc::new(crate::services::purchase_orders::PurchaseOrderService::new(
                db_pool.clone(),
                event_sender.clone(),
            )),
            activity: Arc::new(crate::services::activity::ActivityService::new(
                db_pool.clone(),
            )),
            updates: Arc::new(crate::services::updates::UpdateService::new(
                db_pool.clone(),
                event_sender,
            )),
            reports: Arc::new(crate::services::reports::ReportService::new(db_pool)),
        }
    }
}
