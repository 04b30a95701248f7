//! Purchasing service
//!
//! Suppliers, supplier part mappings and the purchase order lifecycle.
//! Receipts post into stock through the inventory service so costing
//! and the movement journal stay in one place.

use chrono::{NaiveDate, Utc};
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
    po_item, product, purchase_order,
    purchase_order::PurchaseOrderStatus,
    stock, supplier, supplier_sku, warehouse,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit::AuditService;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSupplierInput {
    #[validate(length(min = 1, max = 20))]
    pub supplier_code: String,
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    pub tax_id: Option<String>,
    pub contact_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub payment_terms_days: Option<i32>,
    pub lead_time_days: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SupplierSkuInput {
    #[validate(length(min = 1, max = 40))]
    pub internal_sku: String,
    #[validate(length(min = 1, max = 60))]
    pub supplier_part_number: String,
    pub unit_cost: Option<Decimal>,
    pub currency_code: Option<String>,
    pub min_order_qty: Option<i32>,
    pub lead_time_days: Option<i32>,
    #[serde(default)]
    pub is_preferred: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePurchaseOrderInput {
    pub supplier_id: i32,
    pub warehouse_code: Option<String>,
    pub expected_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    #[validate(length(min = 1))]
    pub lines: Vec<PurchaseOrderLineInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PurchaseOrderLineInput {
    #[validate(length(min = 1, max = 40))]
    pub internal_sku: String,
    #[validate(range(min = 1))]
    pub qty: i32,
    /// Falls back to the supplier mapping cost, then the product's last
    /// purchase cost.
    pub unit_cost: Option<Decimal>,
    pub tax_percent: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiveLineInput {
    pub po_item_id: i32,
    pub qty: i32,
}

/// Purchase order with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub purchase_order: purchase_order::Model,
    pub items: Vec<po_item::Model>,
}

#[derive(Clone)]
pub struct PurchasingService {
    db: Arc<DbPool>,
    event_sender: EventSender,
    inventory: crate::services::inventory::InventoryService,
    default_currency: String,
    audit: AuditService,
}

impl PurchasingService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: EventSender,
        inventory: crate::services::inventory::InventoryService,
        default_currency: String,
        audit: AuditService,
    ) -> Self {
        Self {
            db,
            event_sender,
            inventory,
            default_currency,
            audit,
        }
    }

    #[instrument(skip(self, input))]
    pub async fn create_supplier(
        &self,
        input: CreateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        input.validate()?;

        let duplicate = supplier::Entity::find()
            .filter(supplier::Column::SupplierCode.eq(input.supplier_code.clone()))
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Supplier {} already exists",
                input.supplier_code
            )));
        }

        supplier::ActiveModel {
            supplier_code: Set(input.supplier_code),
            name: Set(input.name),
            tax_id: Set(input.tax_id),
            contact_name: Set(input.contact_name),
            email: Set(input.email),
            phone: Set(input.phone),
            address: Set(input.address),
            city: Set(input.city),
            country: Set(input.country),
            payment_terms_days: Set(input.payment_terms_days),
            rating: Set(None),
            lead_time_days: Set(input.lead_time_days),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn get_supplier(&self, supplier_id: i32) -> Result<supplier::Model, ServiceError> {
        supplier::Entity::find_by_id(supplier_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", supplier_id)))
    }

    pub async fn list_suppliers(&self) -> Result<Vec<supplier::Model>, ServiceError> {
        supplier::Entity::find()
            .order_by_asc(supplier::Column::SupplierCode)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Creates or updates the supplier mapping for a SKU. Marking one
    /// mapping preferred clears the flag on the SKU's other mappings.
    #[instrument(skip(self, input))]
    pub async fn upsert_supplier_sku(
        &self,
        supplier_id: i32,
        input: SupplierSkuInput,
    ) -> Result<supplier_sku::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        supplier::Entity::find_by_id(supplier_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", supplier_id)))?;
        product::Entity::find_by_id(input.internal_sku.clone())
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.internal_sku))
            })?;

        if input.is_preferred {
            let others = supplier_sku::Entity::find()
                .filter(supplier_sku::Column::InternalSku.eq(input.internal_sku.clone()))
                .filter(supplier_sku::Column::IsPreferred.eq(true))
                .all(&txn)
                .await
                .map_err(ServiceError::db_error)?;
            for other in others {
                let mut active: supplier_sku::ActiveModel = other.into();
                active.is_preferred = Set(false);
                active.updated_at = Set(Some(Utc::now()));
                active.update(&txn).await.map_err(ServiceError::db_error)?;
            }
        }

        let existing = supplier_sku::Entity::find()
            .filter(supplier_sku::Column::SupplierId.eq(supplier_id))
            .filter(supplier_sku::Column::InternalSku.eq(input.internal_sku.clone()))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let saved = match existing {
            Some(row) => {
                let mut active: supplier_sku::ActiveModel = row.into();
                active.supplier_part_number = Set(input.supplier_part_number);
                active.unit_cost = Set(input.unit_cost);
                active.currency_code = Set(input.currency_code);
                active.min_order_qty = Set(input.min_order_qty);
                active.lead_time_days = Set(input.lead_time_days);
                active.is_preferred = Set(input.is_preferred);
                active.updated_at = Set(Some(Utc::now()));
                active.update(&txn).await.map_err(ServiceError::db_error)?
            }
            None => supplier_sku::ActiveModel {
                supplier_id: Set(supplier_id),
                internal_sku: Set(input.internal_sku),
                supplier_part_number: Set(input.supplier_part_number),
                unit_cost: Set(input.unit_cost),
                currency_code: Set(input.currency_code),
                min_order_qty: Set(input.min_order_qty),
                lead_time_days: Set(input.lead_time_days),
                is_preferred: Set(input.is_preferred),
                created_at: Set(Utc::now()),
                updated_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?,
        };

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(saved)
    }

    pub async fn supplier_skus(
        &self,
        supplier_id: i32,
    ) -> Result<Vec<supplier_sku::Model>, ServiceError> {
        supplier_sku::Entity::find()
            .filter(supplier_sku::Column::SupplierId.eq(supplier_id))
            .order_by_asc(supplier_sku::Column::InternalSku)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Creates a purchase order in DRAFT with its lines and totals.
    #[instrument(skip(self, input))]
    pub async fn create_purchase_order(
        &self,
        input: CreatePurchaseOrderInput,
    ) -> Result<PurchaseOrderDetail, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let sup = supplier::Entity::find_by_id(input.supplier_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Supplier {} not found", input.supplier_id))
            })?;
        if !sup.is_active {
            return Err(ServiceError::InvalidOperation(format!(
                "Supplier {} is inactive",
                sup.supplier_code
            )));
        }

        if let Some(wh) = &input.warehouse_code {
            warehouse::Entity::find_by_id(wh.clone())
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| ServiceError::NotFound(format!("Warehouse {} not found", wh)))?;
        }

        let today = Utc::now().date_naive();
        let created = purchase_order::ActiveModel {
            po_number: Set(format!("PO-{}", Utc::now().timestamp_millis())),
            supplier_id: Set(input.supplier_id),
            warehouse_code: Set(input.warehouse_code),
            status: Set(PurchaseOrderStatus::Draft.as_ref().to_string()),
            order_date: Set(today),
            expected_date: Set(input.expected_date),
            received_date: Set(None),
            currency_code: Set(Some(self.default_currency.clone())),
            subtotal: Set(Decimal::ZERO),
            tax_amount: Set(Decimal::ZERO),
            total_amount: Set(Decimal::ZERO),
            notes: Set(input.notes),
            created_by: Set(input.created_by),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let hundred = Decimal::new(100, 0);
        let mut subtotal = Decimal::ZERO;
        let mut tax_amount = Decimal::ZERO;
        let mut items = Vec::with_capacity(input.lines.len());

        for line in input.lines {
            line.validate()?;
            let prod = product::Entity::find_by_id(line.internal_sku.clone())
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Product {} not found", line.internal_sku))
                })?;

            let unit_cost = match line.unit_cost {
                Some(cost) => cost,
                None => {
                    let mapping = supplier_sku::Entity::find()
                        .filter(supplier_sku::Column::SupplierId.eq(sup.supplier_id))
                        .filter(supplier_sku::Column::InternalSku.eq(prod.internal_sku.clone()))
                        .one(&txn)
                        .await
                        .map_err(ServiceError::db_error)?;
                    mapping
                        .and_then(|m| m.unit_cost)
                        .unwrap_or(prod.last_purchase_cost)
                }
            };
            let tax_percent = line.tax_percent.unwrap_or_default();

            let line_net = unit_cost * Decimal::from(line.qty);
            subtotal += line_net;
            tax_amount += line_net * tax_percent / hundred;

            let item = po_item::ActiveModel {
                po_id: Set(created.po_id),
                internal_sku: Set(prod.internal_sku),
                qty_ordered: Set(line.qty),
                qty_received: Set(0),
                unit_cost: Set(unit_cost),
                tax_percent: Set(tax_percent),
                notes: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
            items.push(item);
        }

        let mut active: purchase_order::ActiveModel = created.clone().into();
        active.po_number = Set(format!("PO-{:06}", created.po_id));
        active.subtotal = Set(subtotal);
        active.tax_amount = Set(tax_amount);
        active.total_amount = Set(subtotal + tax_amount);
        let saved = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::PurchaseOrderCreated(saved.po_id))
            .await;
        self.audit
            .record_change(
                "purchase_orders",
                &saved.po_id.to_string(),
                "CREATE",
                None,
                serde_json::to_value(&saved).ok(),
                saved.created_by,
            )
            .await;
        info!(po_id = saved.po_id, po_number = %saved.po_number, "purchase order created");

        Ok(PurchaseOrderDetail {
            purchase_order: saved,
            items,
        })
    }

    pub async fn get_purchase_order(
        &self,
        po_id: i32,
    ) -> Result<PurchaseOrderDetail, ServiceError> {
        let db = &*self.db;
        let po = purchase_order::Entity::find_by_id(po_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", po_id)))?;
        let items = po_item::Entity::find()
            .filter(po_item::Column::PoId.eq(po_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(PurchaseOrderDetail {
            purchase_order: po,
            items,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_purchase_orders(
        &self,
        status: Option<PurchaseOrderStatus>,
        supplier_id: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<purchase_order::Model>, u64), ServiceError> {
        let mut query = purchase_order::Entity::find();
        if let Some(status) = status {
            query = query.filter(purchase_order::Column::Status.eq(status.as_ref()));
        }
        if let Some(supplier_id) = supplier_id {
            query = query.filter(purchase_order::Column::SupplierId.eq(supplier_id));
        }
        let paginator = query
            .order_by_desc(purchase_order::Column::CreatedAt)
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

    /// Moves a purchase order along its status machine. Confirmation
    /// books outstanding quantities onto `qty_on_order`; cancellation
    /// after confirmation releases them.
    #[instrument(skip(self))]
    pub async fn advance_status(
        &self,
        po_id: i32,
        next: PurchaseOrderStatus,
        actor: Option<i32>,
    ) -> Result<purchase_order::Model, ServiceError> {
        if matches!(
            next,
            PurchaseOrderStatus::PartiallyReceived | PurchaseOrderStatus::Received
        ) {
            return Err(ServiceError::InvalidStatusTransition(
                "Receiving states are reached by posting receipts".into(),
            ));
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let po = purchase_order::Entity::find_by_id(po_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", po_id)))?;
        let current: PurchaseOrderStatus = po
            .status
            .parse()
            .map_err(|_| ServiceError::InvalidStatus(po.status.clone()))?;
        if !current.can_transition_to(next) {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "Cannot move purchase order {} from {} to {}",
                po.po_number, current, next
            )));
        }

        let booked = matches!(
            current,
            PurchaseOrderStatus::Confirmed | PurchaseOrderStatus::PartiallyReceived
        );
        match next {
            PurchaseOrderStatus::Confirmed => {
                self.adjust_on_order(&txn, &po, 1).await?;
            }
            PurchaseOrderStatus::Cancelled if booked => {
                self.adjust_on_order(&txn, &po, -1).await?;
            }
            _ => {}
        }

        let mut active: purchase_order::ActiveModel = po.into();
        active.status = Set(next.as_ref().to_string());
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        self.audit
            .record_change(
                "purchase_orders",
                &po_id.to_string(),
                "STATUS_CHANGE",
                Some(json!({ "status": current.as_ref() })),
                Some(json!({ "status": next.as_ref() })),
                actor,
            )
            .await;
        Ok(updated)
    }

    /// Posts a receipt against one or more lines. Stock and costing
    /// updates go through the inventory service; the purchase order
    /// moves to PARTIALLY_RECEIVED or RECEIVED depending on what is
    /// still outstanding.
    #[instrument(skip(self, lines))]
    pub async fn receive_items(
        &self,
        po_id: i32,
        lines: Vec<ReceiveLineInput>,
        actor: Option<i32>,
    ) -> Result<PurchaseOrderDetail, ServiceError> {
        if lines.is_empty() {
            return Err(ServiceError::InvalidInput(
                "A receipt needs at least one line".into(),
            ));
        }

        let detail = self.get_purchase_order(po_id).await?;
        let po = &detail.purchase_order;
        let current: PurchaseOrderStatus = po
            .status
            .parse()
            .map_err(|_| ServiceError::InvalidStatus(po.status.clone()))?;
        if !matches!(
            current,
            PurchaseOrderStatus::Confirmed | PurchaseOrderStatus::PartiallyReceived
        ) {
            return Err(ServiceError::InvalidOperation(format!(
                "Purchase order {} is {} and cannot receive stock",
                po.po_number, po.status
            )));
        }
        let warehouse_code = po.warehouse_code.clone().ok_or_else(|| {
            ServiceError::InvalidOperation(format!(
                "Purchase order {} has no destination warehouse",
                po.po_number
            ))
        })?;

        for line in &lines {
            if line.qty <= 0 {
                return Err(ServiceError::InvalidInput(
                    "Receipt quantity must be positive".into(),
                ));
            }
            let item = detail
                .items
                .iter()
                .find(|i| i.po_item_id == line.po_item_id)
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Line {} not found on purchase order {}",
                        line.po_item_id, po.po_number
                    ))
                })?;
            if line.qty > item.qty_outstanding() {
                return Err(ServiceError::InvalidOperation(format!(
                    "Receipt of {} exceeds outstanding {} on line {}",
                    line.qty,
                    item.qty_outstanding(),
                    line.po_item_id
                )));
            }
        }

        // Post each line through the inventory service, then record the
        // received quantities on the order.
        for line in &lines {
            let item = detail
                .items
                .iter()
                .find(|i| i.po_item_id == line.po_item_id)
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Line {} not found", line.po_item_id))
                })?;
            self.inventory
                .receive_stock(
                    &warehouse_code,
                    &item.internal_sku,
                    line.qty,
                    item.unit_cost,
                    Some("purchase_order"),
                    Some(po_id),
                    Some(&po.po_number),
                    actor,
                )
                .await?;
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        for line in &lines {
            let item = po_item::Entity::find_by_id(line.po_item_id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Line {} not found", line.po_item_id))
                })?;
            let mut active: po_item::ActiveModel = item.clone().into();
            active.qty_received = Set(item.qty_received + line.qty);
            active.update(&txn).await.map_err(ServiceError::db_error)?;
        }

        let items = po_item::Entity::find()
            .filter(po_item::Column::PoId.eq(po_id))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        let complete = items.iter().all(|i| i.qty_outstanding() == 0);
        let next = if complete {
            PurchaseOrderStatus::Received
        } else {
            PurchaseOrderStatus::PartiallyReceived
        };

        let po_model = purchase_order::Entity::find_by_id(po_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Purchase order {} not found", po_id)))?;
        let mut active: purchase_order::ActiveModel = po_model.into();
        active.status = Set(next.as_ref().to_string());
        if complete {
            active.received_date = Set(Some(Utc::now().date_naive()));
        }
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::PurchaseOrderReceived { po_id, complete })
            .await;
        self.audit
            .record_change(
                "purchase_orders",
                &po_id.to_string(),
                "RECEIPT",
                Some(json!({ "status": current.as_ref() })),
                Some(json!({ "status": next.as_ref(), "complete": complete })),
                actor,
            )
            .await;
        info!(po_id = po_id, complete = complete, "receipt posted");

        Ok(PurchaseOrderDetail {
            purchase_order: updated,
            items,
        })
    }

    /// Adds or removes the order's outstanding quantities on the
    /// destination stock rows. `sign` is +1 on confirm, -1 on cancel.
    async fn adjust_on_order(
        &self,
        txn: &DatabaseTransaction,
        po: &purchase_order::Model,
        sign: i32,
    ) -> Result<(), ServiceError> {
        let Some(warehouse_code) = &po.warehouse_code else {
            return Ok(());
        };

        let items = po_item::Entity::find()
            .filter(po_item::Column::PoId.eq(po.po_id))
            .all(txn)
            .await
            .map_err(ServiceError::db_error)?;

        for item in items {
            let outstanding = item.qty_outstanding();
            if outstanding == 0 {
                continue;
            }
            let existing = stock::Entity::find()
                .filter(stock::Column::WarehouseCode.eq(warehouse_code.clone()))
                .filter(stock::Column::InternalSku.eq(item.internal_sku.clone()))
                .one(txn)
                .await
                .map_err(ServiceError::db_error)?;
            match existing {
                Some(row) => {
                    let mut active: stock::ActiveModel = row.clone().into();
                    active.qty_on_order = Set((row.qty_on_order + sign * outstanding).max(0));
                    active.updated_at = Set(Some(Utc::now()));
                    active.update(txn).await.map_err(ServiceError::db_error)?;
                }
                None if sign > 0 => {
                    stock::ActiveModel {
                        warehouse_code: Set(warehouse_code.clone()),
                        internal_sku: Set(item.internal_sku.clone()),
                        bin_id: Set(None),
                        qty_on_hand: Set(0),
                        qty_reserved: Set(0),
                        qty_available: Set(0),
                        qty_on_order: Set(outstanding),
                        unit_cost: Set(item.unit_cost),
                        last_receipt_date: Set(None),
                        last_count_date: Set(None),
                        status: Set("ACTIVE".to_string()),
                        created_at: Set(Utc::now()),
                        updated_at: Set(None),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .map_err(ServiceError::db_error)?;
                }
                None => {}
            }
        }

        Ok(())
    }
}
