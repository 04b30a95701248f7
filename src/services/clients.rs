//! Client and technician directory.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{client, equipment, invoice, technician, work_order};
use crate::errors::ServiceError;
use crate::services::audit::AuditService;

pub const CLIENT_STATUSES: &[&str] = &["ACTIVE", "INACTIVE", "BLOCKED"];
pub const CLIENT_TYPES: &[&str] = &["INDIVIDUAL", "COMPANY"];

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateClientInput {
    #[validate(length(min = 1, max = 20))]
    pub client_code: String,
    pub client_type: String,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub contact_name: Option<String>,
    pub tax_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub payment_terms_days: Option<i32>,
    pub discount_percent: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateClientInput {
    pub name: Option<String>,
    pub contact_name: Option<String>,
    pub tax_id: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub credit_limit: Option<Decimal>,
    pub payment_terms_days: Option<i32>,
    pub discount_percent: Option<Decimal>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTechnicianInput {
    #[validate(length(min = 1, max = 20))]
    pub employee_number: String,
    #[validate(length(min = 1, max = 80))]
    pub first_name: String,
    #[validate(length(min = 1, max = 80))]
    pub last_name: String,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub specialty: Option<String>,
    pub certification_level: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct ClientService {
    db: Arc<DbPool>,
    audit: AuditService,
}

impl ClientService {
    pub fn new(db: Arc<DbPool>, audit: AuditService) -> Self {
        Self { db, audit }
    }

    #[instrument(skip(self, input))]
    pub async fn create_client(
        &self,
        input: CreateClientInput,
        actor: Option<i32>,
    ) -> Result<client::Model, ServiceError> {
        input.validate()?;
        if !CLIENT_TYPES.contains(&input.client_type.as_str()) {
            return Err(ServiceError::InvalidInput(format!(
                "Unknown client type {}",
                input.client_type
            )));
        }

        let duplicate = client::Entity::find()
            .filter(client::Column::ClientCode.eq(input.client_code.clone()))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Client {} already exists",
                input.client_code
            )));
        }

        let created = client::ActiveModel {
            client_code: Set(input.client_code),
            client_type: Set(input.client_type),
            name: Set(input.name),
            contact_name: Set(input.contact_name),
            tax_id: Set(input.tax_id),
            email: Set(input.email),
            phone: Set(input.phone),
            mobile: Set(input.mobile),
            address: Set(input.address),
            city: Set(input.city),
            state: Set(input.state),
            postal_code: Set(input.postal_code),
            credit_limit: Set(input.credit_limit.unwrap_or_default()),
            current_balance: Set(Decimal::ZERO),
            payment_terms_days: Set(input.payment_terms_days.unwrap_or(0)),
            discount_percent: Set(input.discount_percent),
            status: Set("ACTIVE".to_string()),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)?;

        self.audit
            .record_change(
                "clients",
                &created.client_id.to_string(),
                "CREATE",
                None,
                serde_json::to_value(&created).ok(),
                actor,
            )
            .await;
        info!(client_id = created.client_id, code = %created.client_code, "client created");
        Ok(created)
    }

    pub async fn get_client(&self, client_id: i32) -> Result<client::Model, ServiceError> {
        client::Entity::find_by_id(client_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Client {} not found", client_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_clients(
        &self,
        search: Option<&str>,
        status: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<client::Model>, u64), ServiceError> {
        let mut query = client::Entity::find();
        if let Some(term) = search {
            let pattern = format!("%{}%", term.trim());
            query = query.filter(
                Condition::any()
                    .add(client::Column::Name.like(pattern.clone()))
                    .add(client::Column::ClientCode.like(pattern.clone()))
                    .add(client::Column::Email.like(pattern)),
            );
        }
        if let Some(status) = status {
            query = query.filter(client::Column::Status.eq(status));
        }
        let paginator = query
            .order_by_asc(client::Column::Name)
            .paginate(&*self.db, limit.max(1));
        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((rows, total))
    }

    #[instrument(skip(self, input))]
    pub async fn update_client(
        &self,
        client_id: i32,
        input: UpdateClientInput,
        actor: Option<i32>,
    ) -> Result<client::Model, ServiceError> {
        input.validate()?;
        if let Some(status) = &input.status {
            if !CLIENT_STATUSES.contains(&status.as_str()) {
                return Err(ServiceError::InvalidInput(format!(
                    "Unknown client status {}",
                    status
                )));
            }
        }

        let existing = self.get_client(client_id).await?;
        let before = serde_json::to_value(&existing).ok();
        let mut active: client::ActiveModel = existing.into();
        if let Some(v) = input.name {
            active.name = Set(v);
        }
        if let Some(v) = input.contact_name {
            active.contact_name = Set(Some(v));
        }
        if let Some(v) = input.tax_id {
            active.tax_id = Set(Some(v));
        }
        if let Some(v) = input.email {
            active.email = Set(Some(v));
        }
        if let Some(v) = input.phone {
            active.phone = Set(Some(v));
        }
        if let Some(v) = input.mobile {
            active.mobile = Set(Some(v));
        }
        if let Some(v) = input.address {
            active.address = Set(Some(v));
        }
        if let Some(v) = input.city {
            active.city = Set(Some(v));
        }
        if let Some(v) = input.state {
            active.state = Set(Some(v));
        }
        if let Some(v) = input.postal_code {
            active.postal_code = Set(Some(v));
        }
        if let Some(v) = input.credit_limit {
            active.credit_limit = Set(v);
        }
        if let Some(v) = input.payment_terms_days {
            active.payment_terms_days = Set(v);
        }
        if let Some(v) = input.discount_percent {
            active.discount_percent = Set(Some(v));
        }
        if let Some(v) = input.status {
            active.status = Set(v);
        }
        if let Some(v) = input.notes {
            active.notes = Set(Some(v));
        }
        active.updated_at = Set(Some(Utc::now()));
        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        self.audit
            .record_change(
                "clients",
                &client_id.to_string(),
                "UPDATE",
                before,
                serde_json::to_value(&updated).ok(),
                actor,
            )
            .await;
        Ok(updated)
    }

    /// Deletes a client with no history. A client referenced by
    /// equipment, work orders or invoices is kept and must be
    /// deactivated instead.
    #[instrument(skip(self))]
    pub async fn delete_client(
        &self,
        client_id: i32,
        actor: Option<i32>,
    ) -> Result<(), ServiceError> {
        let existing = self.get_client(client_id).await?;

        let has_equipment = equipment::Entity::find()
            .filter(equipment::Column::ClientId.eq(client_id))
            .count(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            > 0;
        let has_work_orders = work_order::Entity::find()
            .filter(work_order::Column::ClientId.eq(client_id))
            .count(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            > 0;
        let has_invoices = invoice::Entity::find()
            .filter(invoice::Column::ClientId.eq(client_id))
            .count(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            > 0;
        if has_equipment || has_work_orders || has_invoices {
            return Err(ServiceError::Conflict(format!(
                "Client {} has history and cannot be deleted; deactivate it instead",
                existing.client_code
            )));
        }

        let before = serde_json::to_value(&existing).ok();
        existing
            .delete(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        self.audit
            .record_change("clients", &client_id.to_string(), "DELETE", before, None, actor)
            .await;
        info!(client_id = client_id, "client deleted");
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_technician(
        &self,
        input: CreateTechnicianInput,
    ) -> Result<technician::Model, ServiceError> {
        input.validate()?;

        let duplicate = technician::Entity::find()
            .filter(technician::Column::EmployeeNumber.eq(input.employee_number.clone()))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Technician {} already exists",
                input.employee_number
            )));
        }

        technician::ActiveModel {
            employee_number: Set(input.employee_number),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            email: Set(input.email),
            phone: Set(input.phone),
            specialty: Set(input.specialty),
            certification_level: Set(input.certification_level),
            hourly_rate: Set(input.hourly_rate.unwrap_or_default()),
            hire_date: Set(input.hire_date),
            is_active: Set(true),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_technician(
        &self,
        technician_id: i32,
    ) -> Result<technician::Model, ServiceError> {
        technician::Entity::find_by_id(technician_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Technician {} not found", technician_id))
            })
    }

    pub async fn list_technicians(
        &self,
        active_only: bool,
    ) -> Result<Vec<technician::Model>, ServiceError> {
        let mut query = technician::Entity::find();
        if active_only {
            query = query.filter(technician::Column::IsActive.eq(true));
        }
        query
            .order_by_asc(technician::Column::EmployeeNumber)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Technicians are never deleted, only deactivated, because labor
    /// lines reference them.
    #[instrument(skip(self))]
    pub async fn deactivate_technician(
        &self,
        technician_id: i32,
    ) -> Result<technician::Model, ServiceError> {
        let existing = self.get_technician(technician_id).await?;
        let mut active: technician::ActiveModel = existing.into();
        active.is_active = Set(false);
        active
            .update(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}
