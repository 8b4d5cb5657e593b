use crate::{
    entities::supplier::{
        self, ActiveModel as SupplierActiveModel, Entity as SupplierEntity, Model as SupplierModel,
    },
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
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 200, message = "Supplier name is required"))]
    pub name: String,
    pub contact_name: Option<String>,
    #[validate(email(message = "Supplier email must be a valid address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierRequest {
    #[validate(length(min = 1, max = 200, message = "Supplier name cannot be empty"))]
    pub name: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email(message = "Supplier email must be a valid address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SupplierListResponse {
    pub suppliers: Vec<SupplierModel>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

#[derive(Clone)]
pub struct SupplierService {
    db: Arc<DatabaseConnection>,
    event_sender: Option<Arc<EventSender>>,
}

impl SupplierService {
    pub fn new(db: Arc<DatabaseConnection>, event_sender: Option<Arc<EventSender>>) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create_supplier(
        &self,
        request: CreateSupplierRequest,
    ) -> Result<SupplierModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let supplier = SupplierActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(request.name),
            contact_name: Set(request.contact_name),
            email: Set(request.email),
            phone: Set(request.phone),
            address: Set(request.address),
            notes: Set(request.notes),
            ..Default::default()
        };

        let model = supplier.insert(&*self.db).await.map_err(|e| {
            error!(error = %e, "Failed to create supplier");
            ServiceError::DatabaseError(e)
        })?;

        info!(supplier_id = %model.id, "Supplier created");

        if let Some(event_sender) = &self.event_sender {
            if let Err(e) = event_sender.send(Event::SupplierCreated(model.id)).await {
                warn!(error = %e, "Failed to send supplier created event");
            }
        }

        Ok(model)
    }

    #[instrument(skip(self), fields(supplier_id = %supplier_id))]
    pub async fn get_supplier(
        &self,
        supplier_id: Uuid,
    ) -> Result<Option<SupplierModel>, ServiceError> {
        SupplierEntity::find_by_id(supplier_id)
            .one(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, supplier_id = %supplier_id, "Failed to fetch supplier");
                ServiceError::DatabaseError(e)
            })
    }

    /// Looks a supplier up by exact name.
    #[instrument(skip(self))]
    pub async fn get_supplier_by_name(
        &self,
        name: &str,
    ) -> Result<Option<SupplierModel>, ServiceError> {
        SupplierEntity::find()
            .filter(supplier::Column::Name.eq(name))
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn list_suppliers(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<SupplierListResponse, ServiceError> {
        let page = page.max(1);
        let paginator = SupplierEntity::find()
            .order_by_asc(supplier::Column::Name)
            .paginate(&*self.db, per_page);

        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::DatabaseError)?;
        let suppliers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(SupplierListResponse {
            suppliers,
            total,
            page,
            per_page,
        })
    }

    #[instrument(skip(self, request), fields(supplier_id = %supplier_id))]
    pub async fn update_supplier(
        &self,
        supplier_id: Uuid,
        request: UpdateSupplierRequest,
    ) -> Result<SupplierModel, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let supplier = SupplierEntity::find_by_id(supplier_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", supplier_id)))?;

        let mut active: SupplierActiveModel = supplier.into();
        if let Some(name) = request.name {
            active.name = Set(name);
        }
        if let Some(contact_name) = request.contact_name {
            active.contact_name = Set(Some(contact_name));
        }
        if let Some(email) = request.email {
            active.email = Set(Some(email));
        }
        if let Some(phone) = request.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(address) = request.address {
            active.address = Set(Some(address));
        }
        if let Some(notes) = request.notes {
            active.notes = Set(Some(notes));
        }

        let updated = active.update(&*self.db).await.map_err(|e| {
            error!(error = %e, supplier_id = %supplier_id, "Failed to update supplier");
            ServiceError::DatabaseError(e)
        })?;

        info!(supplier_id = %supplier_id, "Supplier updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(supplier_id = %supplier_id))]
    pub async fn delete_supplier(&self, supplier_id: Uuid) -> Result<(), ServiceError> {
        let result = SupplierEntity::delete_by_id(supplier_id)
            .exec(&*self.db)
            .await
            .map_err(|e| {
                error!(error = %e, supplier_id = %supplier_id, "Failed to delete supplier");
                ServiceError::DatabaseError(e)
            })?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound(format!(
                "Supplier {} not found",
                supplier_id
            )));
        }

        info!(supplier_id = %supplier_id, "Supplier deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_requires_a_name() {
        let request = CreateSupplierRequest {
            name: String::new(),
            contact_name: None,
            email: None,
            phone: None,
            address: None,
            notes: None,
        };
        assert!(request.validate().is_err());
    }
}
