use crate::{
    entities::company::Entity as CompanyEntity,
    entities::order::{self, Entity as OrderEntity},
    entities::order_activity::Model as ActivityModel,
    entities::supplier::Entity as SupplierEntity,
    errors::ServiceError,
    services::activity::ActivityService,
    status::OrderStatus,
};
use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// Number of activity rows shown on the dashboard.
const DASHBOARD_ACTIVITY_LIMIT: u64 = 10;

/// Dashboard summary data
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardReport {
    pub total_orders: u64,
    pub open_orders: u64,
    pub orders_by_status: HashMap<String, u64>,
    pub orders_by_stage: HashMap<String, u64>,
    pub companies: u64,
    pub suppliers: u64,
    pub recent_activity: Vec<ActivityModel>,
}

/// Per-company order volume over a reporting period
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CompanyOrderVolume {
    pub company_id: Uuid,
    pub company_name: String,
    pub orders: u64,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderVolumeReport {
    pub period: String,
    pub total_orders: u64,
    pub total_amount: Decimal,
    pub by_company: Vec<CompanyOrderVolume>,
}

/// Service for generating dashboard and reporting data
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DatabaseConnection>,
    activity: ActivityService,
}

impl ReportService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        let activity = ActivityService::new(db.clone());
        Self { db, activity }
    }

    /// Generates the admin dashboard summary.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardReport, ServiceError> {
        let db = &*self.db;

        let orders = OrderEntity::find()
            .filter(order::Column::IsArchived.eq(false))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut orders_by_status: HashMap<String, u64> = OrderStatus::iter()
            .map(|status| (status.to_string(), 0))
            .collect();
        let mut orders_by_stage: HashMap<String, u64> = HashMap::new();
        let mut open_orders = 0u64;

        for order in &orders {
            *orders_by_status.entry(order.status.clone()).or_insert(0) += 1;
            if let Some(stage) = &order.progress_stage {
                *orders_by_stage.entry(stage.clone()).or_insert(0) += 1;
            }
            if order.status != OrderStatus::Delivered.to_string() {
                open_orders += 1;
            }
        }

        let companies = CompanyEntity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let suppliers = SupplierEntity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let recent_activity = self.activity.recent(DASHBOARD_ACTIVITY_LIMIT).await?;

        Ok(DashboardReport {
            total_orders: orders.len() as u64,
            open_orders,
            orders_by_status,
            orders_by_stage,
            companies,
            suppliers,
            recent_activity,
        })
    }

    /// Order volume per company over a date range (inclusive).
    #[instrument(skip(self))]
    pub async fn order_volume(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<OrderVolumeReport, ServiceError> {
        if end_date < start_date {
            return Err(ServiceError::InvalidInput(
                "end_date must not be before start_date".to_string(),
            ));
        }

        let start = start_date.and_time(NaiveTime::MIN).and_utc();
        let end = end_date
            .succ_opt()
            .unwrap_or(end_date)
            .and_time(NaiveTime::MIN)
            .and_utc();

        let orders_with_companies = OrderEntity::find()
            .filter(order::Column::CreatedAt.gte(start))
            .filter(order::Column::CreatedAt.lt(end))
            .find_also_related(CompanyEntity)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut by_company: HashMap<Uuid, CompanyOrderVolume> = HashMap::new();
        let mut total_amount = Decimal::ZERO;

        for (order, company) in &orders_with_companies {
            let amount = order.amount.unwrap_or(Decimal::ZERO);
            total_amount += amount;

            let entry = by_company
                .entry(order.company_id)
                .or_insert_with(|| CompanyOrderVolume {
                    company_id: order.company_id,
                    company_name: company
                        .as_ref()
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| "unknown".to_string()),
                    orders: 0,
                    total_amount: Decimal::ZERO,
                });
            entry.orders += 1;
            entry.total_amount += amount;
        }

        let mut by_company: Vec<CompanyOrderVolume> = by_company.into_values().collect();
        by_company.sort_by(|a, b| b.orders.cmp(&a.orders).then(a.company_name.cmp(&b.company_name)));

        Ok(OrderVolumeReport {
            period: format!("{} to {}", start_date, end_date),
            total_orders: orders_with_companies.len() as u64,
            total_amount,
            by_company,
        })
    }
}
