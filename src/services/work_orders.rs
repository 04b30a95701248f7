//! Work order service
//!
//! Lifecycle management for service work orders: creation, the status
//! machine, part and labor lines, and cost roll-up.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    client, equipment, flat_rate_standard, product, wo_item,
    wo_item::WoItemStatus,
    wo_service,
    wo_service::CompletionStatus,
    work_order,
    work_order::WorkOrderStatus,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit::AuditService;
use crate::services::inventory::InventoryService;
use crate::services::pricing::PricingService;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkOrderInput {
    pub client_id: i32,
    pub equipment_id: i32,
    #[validate(length(min = 1, max = 50))]
    pub service_type: String,
    pub customer_complaints: Option<String>,
    pub appointment_date: Option<chrono::DateTime<Utc>>,
    pub estimated_hours: Option<Decimal>,
    pub labor_rate: Option<Decimal>,
    pub priority: Option<String>,
    pub advisor_id: Option<i32>,
    pub technician_id: Option<i32>,
    pub mileage_in: Option<i32>,
    pub created_by: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddPartLineInput {
    #[validate(length(min = 1, max = 40))]
    pub internal_sku: String,
    #[validate(range(min = 1))]
    pub qty: i32,
    /// Resolved from the default price list when omitted.
    pub unit_price: Option<Decimal>,
    pub price_list_code: Option<String>,
    pub discount_percent: Option<Decimal>,
    pub tax_percent: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddServiceLineInput {
    /// Flat-rate service code. When present the line inherits the
    /// standard's description and hours.
    pub service_code: Option<String>,
    pub description: Option<String>,
    pub estimated_hours: Option<Decimal>,
    /// Falls back to the work order labor rate when omitted.
    pub hourly_rate: Option<Decimal>,
    pub technician_id: Option<i32>,
}

/// Cost summary returned after a roll-up.
#[derive(Debug, Clone, Serialize)]
pub struct CostSummary {
    pub labor_cost: Decimal,
    pub parts_cost: Decimal,
    pub discount_amount: Decimal,
    pub total_cost: Decimal,
}

#[derive(Clone)]
pub struct WorkOrderService {
    db: Arc<DbPool>,
    event_sender: EventSender,
    inventory: InventoryService,
    pricing: PricingService,
    audit: AuditService,
}

impl WorkOrderService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: EventSender,
        inventory: InventoryService,
        pricing: PricingService,
        audit: AuditService,
    ) -> Self {
        Self {
            db,
            event_sender,
            inventory,
            pricing,
            audit,
        }
    }

    /// Creates a work order in DRAFT. The work order number is derived
    /// from the generated id so it is unique without a counter table.
    #[instrument(skip(self, input))]
    pub async fn create_work_order(
        &self,
        input: CreateWorkOrderInput,
    ) -> Result<work_order::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let cl = client::Entity::find_by_id(input.client_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Client {} not found", input.client_id))
            })?;
        if cl.status != "ACTIVE" {
            return Err(ServiceError::InvalidOperation(format!(
                "Client {} is {}",
                cl.client_code, cl.status
            )));
        }

        let eq = equipment::Entity::find_by_id(input.equipment_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Equipment {} not found", input.equipment_id))
            })?;
        if eq.client_id != Some(input.client_id) {
            return Err(ServiceError::InvalidOperation(format!(
                "Equipment {} does not belong to client {}",
                eq.equipment_id, input.client_id
            )));
        }

        let now = Utc::now();
        let created = work_order::ActiveModel {
            wo_number: Set(format!("WO-{}", now.timestamp_millis())),
            equipment_id: Set(input.equipment_id),
            client_id: Set(input.client_id),
            appointment_date: Set(input.appointment_date),
            reception_date: Set(None),
            estimated_start_date: Set(None),
            actual_start_date: Set(None),
            estimated_completion_date: Set(None),
            actual_completion_date: Set(None),
            delivery_date: Set(None),
            service_type: Set(input.service_type),
            customer_complaints: Set(input.customer_complaints),
            initial_findings: Set(None),
            technician_notes: Set(None),
            final_report: Set(None),
            estimated_hours: Set(input.estimated_hours.unwrap_or_default()),
            actual_hours: Set(Decimal::ZERO),
            labor_rate: Set(input.labor_rate.unwrap_or_default()),
            labor_cost: Set(Decimal::ZERO),
            parts_cost: Set(Decimal::ZERO),
            total_cost: Set(Decimal::ZERO),
            discount_amount: Set(Decimal::ZERO),
            status: Set(WorkOrderStatus::Draft.as_ref().to_string()),
            priority: Set(input.priority.unwrap_or_else(|| "NORMAL".to_string())),
            advisor_id: Set(input.advisor_id),
            technician_id: Set(input.technician_id),
            mileage_in: Set(input.mileage_in),
            mileage_out: Set(None),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(None),
            closed_at: Set(None),
            notes: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        // Rewrite the number from the generated id for a stable format.
        let mut active: work_order::ActiveModel = created.clone().into();
        active.wo_number = Set(format!("WO-{:06}", created.wo_id));
        let created = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::WorkOrderCreated(created.wo_id))
            .await;
        self.audit
            .record_change(
                "work_orders",
                &created.wo_id.to_string(),
                "CREATE",
                None,
                serde_json::to_value(&created).ok(),
                created.created_by,
            )
            .await;

        info!(wo_id = created.wo_id, wo_number = %created.wo_number, "work order created");
        Ok(created)
    }

    pub async fn get_work_order(&self, wo_id: i32) -> Result<work_order::Model, ServiceError> {
        work_order::Entity::find_by_id(wo_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Work order {} not found", wo_id)))
    }

    #[instrument(skip(self))]
    pub async fn list_work_orders(
        &self,
        status: Option<WorkOrderStatus>,
        client_id: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<work_order::Model>, u64), ServiceError> {
        let mut query = work_order::Entity::find();
        if let Some(status) = status {
            query = query.filter(work_order::Column::Status.eq(status.as_ref()));
        }
        if let Some(client_id) = client_id {
            query = query.filter(work_order::Column::ClientId.eq(client_id));
        }
        let paginator = query
            .order_by_desc(work_order::Column::CreatedAt)
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

    /// Moves a work order through its status machine, applying the
    /// milestone side effects for the target status. Entering COMPLETED
    /// consumes whatever is still reserved, so the parts journal always
    /// matches the finished job.
    #[instrument(skip(self))]
    pub async fn advance_status(
        &self,
        wo_id: i32,
        next: WorkOrderStatus,
        actor: Option<i32>,
    ) -> Result<work_order::Model, ServiceError> {
        if next == WorkOrderStatus::Cancelled {
            return self.cancel_work_order(wo_id, None, actor).await;
        }

        let wo = self.get_work_order(wo_id).await?;
        let current: WorkOrderStatus = wo
            .status
            .parse()
            .map_err(|_| ServiceError::InvalidStatus(wo.status.clone()))?;
        if !current.can_transition_to(next) {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "Cannot move work order {} from {} to {}",
                wo.wo_number, current, next
            )));
        }

        if next == WorkOrderStatus::Completed {
            let reserved = wo_item::Entity::find()
                .filter(wo_item::Column::WoId.eq(wo_id))
                .filter(wo_item::Column::Status.eq(WoItemStatus::Reserved.as_ref()))
                .count(&*self.db)
                .await
                .map_err(ServiceError::db_error)?;
            if reserved > 0 {
                self.inventory.consume_for_work_order(wo_id).await?;
            }
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let now = Utc::now();
        let mut active: work_order::ActiveModel = wo.clone().into();
        active.status = Set(next.as_ref().to_string());
        active.updated_at = Set(Some(now));

        match next {
            WorkOrderStatus::InProgress => {
                if wo.actual_start_date.is_none() {
                    active.actual_start_date = Set(Some(now));
                }
                if wo.reception_date.is_none() {
                    active.reception_date = Set(Some(now));
                }
            }
            WorkOrderStatus::Completed => {
                active.actual_completion_date = Set(Some(now));
                active.closed_at = Set(Some(now));
                let costs = recalculate_costs(&txn, &wo).await?;
                active.labor_cost = Set(costs.labor_cost);
                active.parts_cost = Set(costs.parts_cost);
                active.total_cost = Set(costs.total_cost);
            }
            WorkOrderStatus::Invoiced => {
                active.closed_at = Set(Some(now));
            }
            _ => {}
        }

        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;
        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::WorkOrderStatusChanged {
                wo_id,
                old_status: current.as_ref().to_string(),
                new_status: next.as_ref().to_string(),
            })
            .await;
        self.audit
            .record_change(
                "work_orders",
                &wo_id.to_string(),
                "STATUS_CHANGE",
                Some(json!({ "status": current.as_ref() })),
                Some(json!({ "status": next.as_ref() })),
                actor,
            )
            .await;

        Ok(updated)
    }

    /// Cancels a work order. Reserved stock is released first so no
    /// reservation outlives its work order.
    #[instrument(skip(self))]
    pub async fn cancel_work_order(
        &self,
        wo_id: i32,
        reason: Option<String>,
        actor: Option<i32>,
    ) -> Result<work_order::Model, ServiceError> {
        let wo = self.get_work_order(wo_id).await?;
        let current: WorkOrderStatus = wo
            .status
            .parse()
            .map_err(|_| ServiceError::InvalidStatus(wo.status.clone()))?;
        if !current.can_transition_to(WorkOrderStatus::Cancelled) {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "Work order {} is {} and cannot be cancelled",
                wo.wo_number, current
            )));
        }

        self.inventory.release_for_work_order(wo_id).await?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let open_items = wo_item::Entity::find()
            .filter(wo_item::Column::WoId.eq(wo_id))
            .filter(wo_item::Column::Status.eq(WoItemStatus::Pending.as_ref()))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        for item in open_items {
            let mut active: wo_item::ActiveModel = item.into();
            active.status = Set(WoItemStatus::Cancelled.as_ref().to_string());
            active.update(&txn).await.map_err(ServiceError::db_error)?;
        }

        let now = Utc::now();
        let mut active: work_order::ActiveModel = wo.clone().into();
        active.status = Set(WorkOrderStatus::Cancelled.as_ref().to_string());
        active.closed_at = Set(Some(now));
        active.updated_at = Set(Some(now));
        if let Some(reason) = reason {
            let notes = match &wo.notes {
                Some(existing) => format!("{}\nCancelled: {}", existing, reason),
                None => format!("Cancelled: {}", reason),
            };
            active.notes = Set(Some(notes));
        }
        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self.event_sender.send(Event::WorkOrderCancelled(wo_id)).await;
        self.audit
            .record_change(
                "work_orders",
                &wo_id.to_string(),
                "STATUS_CHANGE",
                Some(json!({ "status": current.as_ref() })),
                Some(json!({ "status": WorkOrderStatus::Cancelled.as_ref() })),
                actor,
            )
            .await;
        info!(wo_id = wo_id, "work order cancelled");
        Ok(updated)
    }

    /// Adds a part line in PENDING. Reservation happens separately.
    #[instrument(skip(self, input))]
    pub async fn add_part_line(
        &self,
        wo_id: i32,
        input: AddPartLineInput,
    ) -> Result<wo_item::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let wo = work_order::Entity::find_by_id(wo_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Work order {} not found", wo_id)))?;
        let status: WorkOrderStatus = wo
            .status
            .parse()
            .map_err(|_| ServiceError::InvalidStatus(wo.status.clone()))?;
        if status.is_terminal() || status == WorkOrderStatus::Completed {
            return Err(ServiceError::InvalidOperation(format!(
                "Work order {} is {} and cannot take new part lines",
                wo.wo_number, wo.status
            )));
        }

        let prod = product::Entity::find_by_id(input.internal_sku.clone())
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.internal_sku))
            })?;
        if !prod.is_active {
            return Err(ServiceError::InvalidOperation(format!(
                "Product {} is inactive",
                prod.internal_sku
            )));
        }

        let unit_price = match input.unit_price {
            Some(price) => price,
            None => {
                self.pricing
                    .resolve_price(
                        &prod.internal_sku,
                        input.price_list_code.as_deref(),
                        None,
                        input.qty,
                    )
                    .await?
                    .unit_price
            }
        };

        let created = wo_item::ActiveModel {
            wo_id: Set(wo_id),
            internal_sku: Set(prod.internal_sku),
            qty_ordered: Set(input.qty),
            qty_used: Set(0),
            qty_returned: Set(0),
            unit_price: Set(unit_price),
            discount_percent: Set(input.discount_percent.unwrap_or_default()),
            tax_percent: Set(input.tax_percent.unwrap_or_default()),
            reserved_stock_id: Set(None),
            reserved_stock_date: Set(None),
            used_stock_id: Set(None),
            used_stock_date: Set(None),
            status: Set(WoItemStatus::Pending.as_ref().to_string()),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(created)
    }

    /// Adds a labor line. A flat-rate code pins the hours to the
    /// effective standard for today.
    #[instrument(skip(self, input))]
    pub async fn add_service_line(
        &self,
        wo_id: i32,
        input: AddServiceLineInput,
    ) -> Result<wo_service::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let wo = work_order::Entity::find_by_id(wo_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Work order {} not found", wo_id)))?;
        let status: WorkOrderStatus = wo
            .status
            .parse()
            .map_err(|_| ServiceError::InvalidStatus(wo.status.clone()))?;
        if status.is_terminal() || status == WorkOrderStatus::Completed {
            return Err(ServiceError::InvalidOperation(format!(
                "Work order {} is {} and cannot take new labor lines",
                wo.wo_number, wo.status
            )));
        }

        let standard = match &input.service_code {
            Some(code) => {
                let today = Utc::now().date_naive();
                let found = flat_rate_standard::Entity::find()
                    .filter(flat_rate_standard::Column::ServiceCode.eq(code.clone()))
                    .filter(flat_rate_standard::Column::IsActive.eq(true))
                    .filter(flat_rate_standard::Column::ValidFrom.lte(today))
                    .one(&txn)
                    .await
                    .map_err(ServiceError::db_error)?
                    .filter(|s| s.valid_until.map_or(true, |until| until >= today));
                Some(found.ok_or_else(|| {
                    ServiceError::NotFound(format!("No effective flat-rate standard for {}", code))
                })?)
            }
            None => None,
        };

        let description = match (&standard, input.description) {
            (Some(s), None) => s.description.clone(),
            (_, Some(d)) => d,
            (None, None) => {
                return Err(ServiceError::InvalidInput(
                    "A labor line needs a description or a flat-rate code".into(),
                ))
            }
        };
        let flat_hours = standard
            .as_ref()
            .map(|s| s.standard_hours)
            .unwrap_or_default();
        let estimated_hours = input.estimated_hours.unwrap_or(flat_hours);

        let created = wo_service::ActiveModel {
            wo_id: Set(wo_id),
            flat_rate_id: Set(standard.as_ref().map(|s| s.standard_id)),
            service_code: Set(input.service_code),
            description: Set(description),
            flat_hours: Set(flat_hours),
            estimated_hours: Set(estimated_hours),
            actual_hours: Set(Decimal::ZERO),
            hourly_rate: Set(input.hourly_rate.unwrap_or(wo.labor_rate)),
            completion_status: Set(CompletionStatus::Pending.as_ref().to_string()),
            technician_id: Set(input.technician_id),
            started_at: Set(None),
            completed_at: Set(None),
            notes: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(created)
    }

    /// Records completion of one labor line with the hours worked.
    #[instrument(skip(self))]
    pub async fn complete_service_line(
        &self,
        wo_id: i32,
        service_id: i32,
        actual_hours: Decimal,
        technician_id: Option<i32>,
    ) -> Result<wo_service::Model, ServiceError> {
        if actual_hours < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Actual hours cannot be negative".into(),
            ));
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let line = wo_service::Entity::find_by_id(service_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .filter(|l| l.wo_id == wo_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Labor line {} not found on work order {}",
                    service_id, wo_id
                ))
            })?;
        if line.completion_status == CompletionStatus::Completed.as_ref() {
            return Err(ServiceError::InvalidOperation(format!(
                "Labor line {} is already completed",
                service_id
            )));
        }

        let now = Utc::now();
        let mut active: wo_service::ActiveModel = line.clone().into();
        active.actual_hours = Set(actual_hours);
        active.completion_status = Set(CompletionStatus::Completed.as_ref().to_string());
        active.completed_at = Set(Some(now));
        if line.started_at.is_none() {
            active.started_at = Set(Some(now));
        }
        if technician_id.is_some() {
            active.technician_id = Set(technician_id);
        }
        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(updated)
    }

    /// Recalculates costs outside a status change, e.g. for a live quote.
    #[instrument(skip(self))]
    pub async fn cost_summary(&self, wo_id: i32) -> Result<CostSummary, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        let wo = work_order::Entity::find_by_id(wo_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Work order {} not found", wo_id)))?;
        let costs = recalculate_costs(&txn, &wo).await?;
        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(costs)
    }

    pub async fn part_lines(&self, wo_id: i32) -> Result<Vec<wo_item::Model>, ServiceError> {
        wo_item::Entity::find()
            .filter(wo_item::Column::WoId.eq(wo_id))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    pub async fn service_lines(&self, wo_id: i32) -> Result<Vec<wo_service::Model>, ServiceError> {
        wo_service::Entity::find()
            .filter(wo_service::Column::WoId.eq(wo_id))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFlatRateInput {
    #[validate(length(min = 1, max = 30))]
    pub service_code: String,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    pub equipment_type_id: Option<i32>,
    pub group_code: Option<String>,
    pub standard_hours: Decimal,
    pub min_hours: Option<Decimal>,
    pub max_hours: Option<Decimal>,
    #[validate(range(min = 1, max = 5))]
    pub difficulty_level: Option<i32>,
    pub valid_from: chrono::NaiveDate,
    pub valid_until: Option<chrono::NaiveDate>,
}

impl WorkOrderService {
    #[instrument(skip(self, input))]
    pub async fn create_flat_rate_standard(
        &self,
        input: CreateFlatRateInput,
    ) -> Result<flat_rate_standard::Model, ServiceError> {
        input.validate()?;
        if input.standard_hours <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Standard hours must be positive".into(),
            ));
        }
        if let (Some(min), Some(max)) = (input.min_hours, input.max_hours) {
            if max < min {
                return Err(ServiceError::InvalidInput(
                    "max_hours cannot be below min_hours".into(),
                ));
            }
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        // A new standard replaces the open one for the same code.
        let existing = flat_rate_standard::Entity::find()
            .filter(flat_rate_standard::Column::ServiceCode.eq(input.service_code.clone()))
            .filter(flat_rate_standard::Column::IsActive.eq(true))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if let Some(prev) = existing {
            if prev.valid_from >= input.valid_from {
                return Err(ServiceError::Conflict(format!(
                    "An active standard for {} already starts on or after {}",
                    input.service_code, input.valid_from
                )));
            }
            let mut active: flat_rate_standard::ActiveModel = prev.into();
            active.valid_until = Set(input.valid_from.pred_opt());
            active.is_active = Set(false);
            active.update(&txn).await.map_err(ServiceError::db_error)?;
        }

        let created = flat_rate_standard::ActiveModel {
            service_code: Set(input.service_code),
            description: Set(input.description),
            equipment_type_id: Set(input.equipment_type_id),
            group_code: Set(input.group_code),
            standard_hours: Set(input.standard_hours),
            min_hours: Set(input.min_hours),
            max_hours: Set(input.max_hours),
            difficulty_level: Set(input.difficulty_level),
            valid_from: Set(input.valid_from),
            valid_until: Set(input.valid_until),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(created)
    }

    pub async fn list_flat_rate_standards(
        &self,
        active_only: bool,
    ) -> Result<Vec<flat_rate_standard::Model>, ServiceError> {
        let mut query = flat_rate_standard::Entity::find();
        if active_only {
            query = query.filter(flat_rate_standard::Column::IsActive.eq(true));
        }
        query
            .order_by_asc(flat_rate_standard::Column::ServiceCode)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}

/// Labor from completed lines at their hourly rate, parts from used
/// quantities net of returns and discount. Tax is added at invoicing.
async fn recalculate_costs(
    txn: &DatabaseTransaction,
    wo: &work_order::Model,
) -> Result<CostSummary, ServiceError> {
    let hundred = Decimal::new(100, 0);

    let services = wo_service::Entity::find()
        .filter(wo_service::Column::WoId.eq(wo.wo_id))
        .all(txn)
        .await
        .map_err(ServiceError::db_error)?;
    let mut labor_cost = Decimal::ZERO;
    for line in &services {
        if line.completion_status == CompletionStatus::Skipped.as_ref() {
            continue;
        }
        let hours = if line.actual_hours > Decimal::ZERO {
            line.actual_hours
        } else if line.flat_hours > Decimal::ZERO {
            line.flat_hours
        } else {
            line.estimated_hours
        };
        labor_cost += hours * line.hourly_rate;
    }

    let items = wo_item::Entity::find()
        .filter(wo_item::Column::WoId.eq(wo.wo_id))
        .all(txn)
        .await
        .map_err(ServiceError::db_error)?;
    let mut parts_cost = Decimal::ZERO;
    for item in &items {
        let billable = item.qty_used - item.qty_returned;
        if billable <= 0 {
            continue;
        }
        let gross = item.unit_price * Decimal::from(billable);
        parts_cost += gross * (hundred - item.discount_percent) / hundred;
    }

    Ok(CostSummary {
        labor_cost,
        parts_cost,
        discount_amount: wo.discount_amount,
        total_cost: labor_cost + parts_cost - wo.discount_amount,
    })
}
