use crate::{
    entities::company::{
        self, ActiveModel as CompanyActiveModel, Entity as CompanyEntity, Model as CompanyModel,
    },
    entities::order::{self, Entity as OrderEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "Company name is required"))]
    pub name: String,
    #[validate(email(message = "Contact email must be a valid address"))]
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 200, message = "Company name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Contact email must be a valid address"))]
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyListResponse {
    pub companies: Vec<CompanyModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Clone)]
pub struct CompanyService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<Arc<EventSender>>,
}

impl CompanyService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_company(
        &self,
        request: CreateCompanyRequest,
    ) -> Result<CompanyModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let company = CompanyActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            contact_email: Set(request.contact_email),
            phone: Set(request.phone),
            address: Set(request.address),
            ..Default::default()
        };

        let model = company.insert(&*self.db).await.map_err(|e| {
            error!(error = %e, "Failed to create company");
            ServiceError::DatabaseError(e)
        })?;

        info!(company_id = %model.id, "Company created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::CompanyCreated(model.id)).await {
                warn!(error = %e, "Failed to send company created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self), fields(company_id = %company_id))]
    pub async fn get_company(&self, company_id: Uuid) -> Result<Option<CompanyModel>, ServiceError> {
        CompanyEntity::find_by_id(company_id)
            .one(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, company_id = %company_id, "Failed to fetch company");
                ServiceError::DatabaseError(e)
            })
    }

    #[instrument(skip(self))]
    pub async fn list_companies(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<CompanyListResponse, ServiceError> {
        let page = page.max(1);
        let paginator = CompanyEntity::find()
            .order_by_asc(company::Column::Name)
            .paginate(&*self.db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let companies = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(CompanyListResponse {
            companies,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request), fields(company_id = %company_id))]
    pub async fn update_company(
        &self,
        company_id: Uuid,
        request: UpdateCompanyRequest,
    ) -> Result<CompanyModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let company = CompanyEntity::find_by_id(company_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Company {} not found", company_id)))?;

        let mut active: CompanyActiveModel = company.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(contact_email) = request.contact_email {
            active.contact_email = Set(Some(contact_email));
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }

        let updated = active.update(&*self.db).await.map_err(|e| {
            error!(error = %e, company_id = %company_id, "Failed to update company");
            ServiceError::DatabaseError(e)
        })?;

        info!(company_id = %company_id, "Company updated");
        Ok(updated)
    }

    /// Deletes a company. Companies with orders on file cannot be removed.
    #[instrument(skip(self), fields(company_id = %company_id))]
    pub async fn delete_company(&self, company_id: Uuid) -> Result<(), ServiceError> {
        let order_count = OrderEntity::find()
            .filter(order::Column::CompanyId.eq(company_id))
            .count(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if order_count > 0 {
            return Err(ServiceError::Conflict(format!(
                "Company {} has {} orders on file",
                company_id, order_count
            )));
        }

        let result = CompanyEntity::delete_by_id(company_id)
            .exec(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Company {} not found",
                company_id
            )));
        }

        info!(company_id = %company_id, "Company deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_validates_email() {
        let request = CreateCompanyRequest {
            name: "Acme Supplies".into(),
            contact_email: Some("not-an-email".into()),
            phone: None,
            address: None,
        };
        assert!(request.validate().is_err());

        let request = CreateCompanyRequest {
            name: "Acme Supplies".into(),
            contact_email: Some("orders@acme.example".into()),
            phone: None,
            address: None,
        };
        assert!(request.validate().is_ok());
    }
}
