//! Equipment directory: serviced units and their types.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{client, equipment, equipment_type, work_order};
use crate::errors::ServiceError;
use crate::services::audit::AuditService;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEquipmentInput {
    #[validate(length(min = 1, max = 30))]
    pub equipment_code: String,
    pub equipment_type_id: Option<i32>,
    #[validate(length(min = 1, max = 60))]
    pub brand: String,
    #[validate(length(min = 1, max = 60))]
    pub model: String,
    pub year: Option<i16>,
    pub serial_number: Option<String>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub engine_desc: Option<String>,
    pub client_id: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub warranty_until: Option<NaiveDate>,
    pub current_mileage_hours: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateEquipmentInput {
    pub equipment_type_id: Option<i32>,
    pub client_id: Option<i32>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub engine_desc: Option<String>,
    pub warranty_until: Option<NaiveDate>,
    pub next_service_date: Option<NaiveDate>,
    pub current_mileage_hours: Option<i32>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEquipmentTypeInput {
    #[validate(length(min = 1, max = 20))]
    pub type_code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Clone)]
pub struct EquipmentService {
    db: Arc<DbPool>,
    audit: AuditService,
}

impl EquipmentService {
    pub fn new(db: Arc<DbPool>, audit: AuditService) -> Self {
        Self { db, audit }
    }

    #[instrument(skip(self, input))]
    pub async fn create_equipment(
        &self,
        input: CreateEquipmentInput,
    ) -> Result<equipment::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;
        if let Some(client_id) = input.client_id {
            client::Entity::find_by_id(client_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Client {} not found", client_id))
                })?;
        }
        if let Some(type_id) = input.equipment_type_id {
            equipment_type::Entity::find_by_id(type_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Equipment type {} not found", type_id))
                })?;
        }

        let duplicate = equipment::Entity::find()
            .filter(equipment::Column::EquipmentCode.eq(input.equipment_code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Equipment {} already exists",
                input.equipment_code
            )));
        }

        let created = equipment::ActiveModel {
            equipment_code: Set(input.equipment_code),
            equipment_type_id: Set(input.equipment_type_id),
            brand: Set(input.brand),
            model: Set(input.model),
            year: Set(input.year),
            serial_number: Set(input.serial_number),
            vin: Set(input.vin),
            license_plate: Set(input.license_plate),
            color: Set(input.color),
            engine_desc: Set(input.engine_desc),
            client_id: Set(input.client_id),
            purchase_date: Set(input.purchase_date),
            warranty_until: Set(input.warranty_until),
            last_service_date: Set(None),
            next_service_date: Set(None),
            current_mileage_hours: Set(input.current_mileage_hours.unwrap_or(0)),
            total_service_cost: Set(Default::default()),
            status: Set("ACTIVE".to_string()),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::db_error)?;

        self.audit
            .record_change(
                "equipment",
                &created.equipment_id.to_string(),
                "CREATE",
                None,
                serde_json::to_value(&created).ok(),
                None,
            )
            .await;
        info!(equipment_id = created.equipment_id, code = %created.equipment_code, "equipment created");
        Ok(created)
    }

    pub async fn get_equipment(&self, equipment_id: i32) -> Result<equipment::Model, ServiceError> {
        equipment::Entity::find_by_id(equipment_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Equipment {} not found", equipment_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_equipment(
        &self,
        client_id: Option<i32>,
        search: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<equipment::Model>, u64), ServiceError> {
        let mut query = equipment::Entity::find();
        if let Some(client_id) = client_id {
            query = query.filter(equipment::Column::ClientId.eq(client_id));
        }
        if let Some(term) = search {
            let pattern = format!("%{}%", term.trim());
            query = query.filter(
                Condition::any()
                    .add(equipment::Column::EquipmentCode.like(pattern.clone()))
                    .add(equipment::Column::Vin.like(pattern.clone()))
                    .add(equipment::Column::LicensePlate.like(pattern.clone()))
                    .add(equipment::Column::SerialNumber.like(pattern)),
            );
        }
        let paginator = query
            .order_by_asc(equipment::Column::EquipmentCode)
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
    pub async fn update_equipment(
        &self,
        equipment_id: i32,
        input: UpdateEquipmentInput,
    ) -> Result<equipment::Model, ServiceError> {
        input.validate()?;
        if let Some(status) = &input.status {
            if !equipment::STATUSES.contains(&status.as_str()) {
                return Err(ServiceError::InvalidInput(format!(
                    "Unknown equipment status {}",
                    status
                )));
            }
        }

        let existing = self.get_equipment(equipment_id).await?;

        if let Some(client_id) = input.client_id {
            client::Entity::find_by_id(client_id)
                .one(&*self.db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Client {} not found", client_id))
                })?;
        }

        // Mileage only moves forward.
        if let Some(mileage) = input.current_mileage_hours {
            if mileage < existing.current_mileage_hours {
                return Err(ServiceError::InvalidInput(format!(
                    "Mileage {} is below the recorded {}",
                    mileage, existing.current_mileage_hours
                )));
            }
        }

        let before = serde_json::to_value(&existing).ok();
        let mut active: equipment::ActiveModel = existing.into();
        if input.equipment_type_id.is_some() {
            active.equipment_type_id = Set(input.equipment_type_id);
        }
        if input.client_id.is_some() {
            active.client_id = Set(input.client_id);
        }
        if let Some(v) = input.license_plate {
            active.license_plate = Set(Some(v));
        }
        if let Some(v) = input.color {
            active.color = Set(Some(v));
        }
        if let Some(v) = input.engine_desc {
            active.engine_desc = Set(Some(v));
        }
        if input.warranty_until.is_some() {
            active.warranty_until = Set(input.warranty_until);
        }
        if input.next_service_date.is_some() {
            active.next_service_date = Set(input.next_service_date);
        }
        if let Some(v) = input.current_mileage_hours {
            active.current_mileage_hours = Set(v);
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
                "equipment",
                &equipment_id.to_string(),
                "UPDATE",
                before,
                serde_json::to_value(&updated).ok(),
                None,
            )
            .await;
        Ok(updated)
    }

    /// Deletes a unit with no service history; otherwise it must be
    /// marked SOLD or SCRAPPED.
    #[instrument(skip(self))]
    pub async fn delete_equipment(&self, equipment_id: i32) -> Result<(), ServiceError> {
        let existing = self.get_equipment(equipment_id).await?;

        let has_work_orders = work_order::Entity::find()
            .filter(work_order::Column::EquipmentId.eq(equipment_id))
            .count(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            > 0;
        if has_work_orders {
            return Err(ServiceError::Conflict(format!(
                "Equipment {} has service history and cannot be deleted",
                existing.equipment_code
            )));
        }

        let before = serde_json::to_value(&existing).ok();
        existing
            .delete(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        self.audit
            .record_change(
                "equipment",
                &equipment_id.to_string(),
                "DELETE",
                before,
                None,
                None,
            )
            .await;
        Ok(())
    }

    #[instrument(skip(self, input))]
    pub async fn create_equipment_type(
        &self,
        input: CreateEquipmentTypeInput,
    ) -> Result<equipment_type::Model, ServiceError> {
        input.validate()?;

        let duplicate = equipment_type::Entity::find()
            .filter(equipment_type::Column::TypeCode.eq(input.type_code.clone()))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Equipment type {} already exists",
                input.type_code
            )));
        }

        equipment_type::ActiveModel {
            type_code: Set(input.type_code),
            name: Set(input.name),
            description: Set(input.description),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn list_equipment_types(&self) -> Result<Vec<equipment_type::Model>, ServiceError> {
        equipment_type::Entity::find()
            .order_by_asc(equipment_type::Column::TypeCode)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}
