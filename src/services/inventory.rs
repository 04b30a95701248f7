//! Inventory service
//!
//! Owns every stock mutation. All multi-row updates run inside a single
//! database transaction so the balance equation
//! `qty_on_hand = qty_reserved + qty_available` holds at every commit.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::{
    alert, po_item, product, purchase_order,
    purchase_order::PurchaseOrderStatus,
    stock, stock_transaction,
    stock_transaction::TransactionType,
    supplier_sku, wo_item,
    wo_item::WoItemStatus,
    work_order,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit::AuditService;

/// Outcome of reserving parts for one work order line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservedLine {
    pub item_id: i32,
    pub internal_sku: String,
    pub warehouse_code: String,
    pub quantity: i32,
    pub stock_id: i64,
}

/// Replenishment suggestion for a SKU below its reorder point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentSuggestion {
    pub internal_sku: String,
    pub warehouse_code: String,
    pub qty_available: i32,
    pub qty_on_order: i32,
    pub reorder_point: i32,
    pub suggested_qty: i32,
    pub unit_cost: Decimal,
    pub preferred_supplier_id: Option<i32>,
    pub lead_time_days: i32,
}

/// Outcome of a replenishment sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplenishmentReport {
    pub skus_below_reorder: u32,
    pub orders_created: u32,
    pub po_numbers: Vec<String>,
    /// SKUs below their reorder point with no preferred supplier.
    pub unmapped_skus: Vec<String>,
    pub suggestions: Vec<ReplenishmentSuggestion>,
}

/// One row of the inventory aging report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgingRow {
    pub internal_sku: String,
    pub warehouse_code: String,
    pub qty_on_hand: i32,
    pub unit_cost: Decimal,
    pub stock_value: Decimal,
    pub age_days: Option<i64>,
    pub category: String,
}

/// Classifies stock age against an analysis horizon: CURRENT within a
/// quarter of the horizon, AGING within half, STALE within the full
/// horizon, OBSOLETE beyond it. Stock with no receipt on record has
/// unknowable age and lands in OBSOLETE.
pub fn age_category(age_days: Option<i64>, horizon_days: i64) -> &'static str {
    match age_days {
        Some(d) if d <= horizon_days / 4 => "CURRENT",
        Some(d) if d <= horizon_days / 2 => "AGING",
        Some(d) if d <= horizon_days => "STALE",
        _ => "OBSOLETE",
    }
}

#[derive(Clone)]
pub struct InventoryService {
    db: Arc<DbPool>,
    event_sender: EventSender,
    audit: AuditService,
}

impl InventoryService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender, audit: AuditService) -> Self {
        Self {
            db,
            event_sender,
            audit,
        }
    }

    /// Reserves stock for every pending line of a work order.
    ///
    /// All lines reserve or none do: a single line without enough
    /// availability rolls the whole transaction back.
    #[instrument(skip(self))]
    pub async fn reserve_for_work_order(
        &self,
        wo_id: i32,
    ) -> Result<Vec<ReservedLine>, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let wo = work_order::Entity::find_by_id(wo_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Work order {} not found", wo_id)))?;

        let status: work_order::WorkOrderStatus = wo
            .status
            .parse()
            .map_err(|_| ServiceError::InvalidStatus(wo.status.clone()))?;
        if status.is_terminal() {
            return Err(ServiceError::InvalidOperation(format!(
                "Work order {} is {} and cannot reserve stock",
                wo.wo_number, wo.status
            )));
        }

        let pending_items = wo_item::Entity::find()
            .filter(wo_item::Column::WoId.eq(wo_id))
            .filter(wo_item::Column::Status.eq(WoItemStatus::Pending.as_ref()))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        if pending_items.is_empty() {
            return Err(ServiceError::InvalidOperation(format!(
                "Work order {} has no pending part lines",
                wo.wo_number
            )));
        }

        let today = Utc::now().date_naive();
        let mut reserved = Vec::with_capacity(pending_items.len());

        for item in pending_items {
            let qty = item.qty_ordered;

            // Pick the stock row with the most availability for the SKU.
            let row = stock::Entity::find()
                .filter(stock::Column::InternalSku.eq(item.internal_sku.clone()))
                .filter(stock::Column::QtyAvailable.gte(qty))
                .order_by_desc(stock::Column::QtyAvailable)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::InsufficientStock(format!(
                        "{} x{} for work order {}",
                        item.internal_sku, qty, wo.wo_number
                    ))
                })?;

            let mut stock_active: stock::ActiveModel = row.clone().into();
            stock_active.qty_reserved = Set(row.qty_reserved + qty);
            stock_active.qty_available = Set(row.qty_available - qty);
            stock_active.updated_at = Set(Some(Utc::now()));
            stock_active
                .update(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            let mut item_active: wo_item::ActiveModel = item.clone().into();
            item_active.status = Set(WoItemStatus::Reserved.as_ref().to_string());
            item_active.reserved_stock_id = Set(Some(row.stock_id));
            item_active.reserved_stock_date = Set(Some(today));
            item_active
                .update(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            reserved.push(ReservedLine {
                item_id: item.item_id,
                internal_sku: item.internal_sku,
                warehouse_code: row.warehouse_code,
                quantity: qty,
                stock_id: row.stock_id,
            });
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        for line in &reserved {
            let _ = self
                .event_sender
                .send(Event::StockReserved {
                    wo_id,
                    internal_sku: line.internal_sku.clone(),
                    warehouse_code: line.warehouse_code.clone(),
                    quantity: line.quantity,
                })
                .await;
        }

        info!(wo_id = wo_id, lines = reserved.len(), "stock reserved");
        Ok(reserved)
    }

    /// Releases every reserved line of a work order back to available.
    #[instrument(skip(self))]
    pub async fn release_for_work_order(&self, wo_id: i32) -> Result<u32, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let reserved_items = wo_item::Entity::find()
            .filter(wo_item::Column::WoId.eq(wo_id))
            .filter(wo_item::Column::Status.eq(WoItemStatus::Reserved.as_ref()))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let mut released = 0u32;
        let mut events = Vec::new();

        for item in reserved_items {
            let stock_id = item.reserved_stock_id.ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Reserved line {} has no stock reference",
                    item.item_id
                ))
            })?;

            let row = stock::Entity::find_by_id(stock_id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Stock row {} not found", stock_id))
                })?;

            let qty = item.qty_ordered;
            let mut stock_active: stock::ActiveModel = row.clone().into();
            stock_active.qty_reserved = Set(row.qty_reserved - qty);
            stock_active.qty_available = Set(row.qty_available + qty);
            stock_active.updated_at = Set(Some(Utc::now()));
            stock_active
                .update(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            let mut item_active: wo_item::ActiveModel = item.clone().into();
            item_active.status = Set(WoItemStatus::Pending.as_ref().to_string());
            item_active.reserved_stock_id = Set(None);
            item_active.reserved_stock_date = Set(None);
            item_active
                .update(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            events.push(Event::StockReleased {
                wo_id,
                internal_sku: item.internal_sku,
                warehouse_code: row.warehouse_code,
                quantity: qty,
            });
            released += 1;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        for event in events {
            let _ = self.event_sender.send(event).await;
        }

        info!(wo_id = wo_id, lines = released, "reservations released");
        Ok(released)
    }

    /// Consumes every reserved line of a work order: moves quantities
    /// out of on-hand and writes an issue row to the movement journal.
    #[instrument(skip(self))]
    pub async fn consume_for_work_order(&self, wo_id: i32) -> Result<u32, ServiceError> {
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let wo = work_order::Entity::find_by_id(wo_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Work order {} not found", wo_id)))?;

        let reserved_items = wo_item::Entity::find()
            .filter(wo_item::Column::WoId.eq(wo_id))
            .filter(wo_item::Column::Status.eq(WoItemStatus::Reserved.as_ref()))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        if reserved_items.is_empty() {
            return Err(ServiceError::InvalidOperation(format!(
                "Work order {} has no reserved lines to consume",
                wo.wo_number
            )));
        }

        let today = Utc::now().date_naive();
        let mut consumed = 0u32;
        let mut events = Vec::new();

        for item in reserved_items {
            let stock_id = item.reserved_stock_id.ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "Reserved line {} has no stock reference",
                    item.item_id
                ))
            })?;

            let row = stock::Entity::find_by_id(stock_id)
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Stock row {} not found", stock_id))
                })?;

            let qty = item.qty_ordered;
            let mut stock_active: stock::ActiveModel = row.clone().into();
            stock_active.qty_reserved = Set(row.qty_reserved - qty);
            stock_active.qty_on_hand = Set(row.qty_on_hand - qty);
            stock_active.updated_at = Set(Some(Utc::now()));
            stock_active
                .update(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            record_movement(
                &txn,
                TransactionType::Issue,
                &row.warehouse_code,
                &item.internal_sku,
                -qty,
                Some(row.unit_cost),
                "work_order",
                Some(wo_id),
                Some(&wo.wo_number),
            )
            .await?;

            let mut item_active: wo_item::ActiveModel = item.clone().into();
            item_active.status = Set(WoItemStatus::Used.as_ref().to_string());
            item_active.qty_used = Set(qty);
            item_active.used_stock_id = Set(Some(row.stock_id));
            item_active.used_stock_date = Set(Some(today));
            item_active
                .update(&txn)
                .await
                .map_err(ServiceError::db_error)?;

            self.check_reorder_point(&txn, &item.internal_sku, &row.warehouse_code)
                .await?;

            events.push(Event::StockConsumed {
                wo_id,
                internal_sku: item.internal_sku,
                warehouse_code: row.warehouse_code,
                quantity: qty,
            });
            consumed += 1;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        for event in events {
            let _ = self.event_sender.send(event).await;
        }

        info!(wo_id = wo_id, lines = consumed, "stock consumed");
        Ok(consumed)
    }

    /// Returns part of a consumed line back to stock.
    #[instrument(skip(self))]
    pub async fn return_for_work_order(
        &self,
        wo_id: i32,
        item_id: i32,
        qty: i32,
    ) -> Result<(), ServiceError> {
        if qty <= 0 {
            return Err(ServiceError::InvalidInput(
                "Return quantity must be positive".into(),
            ));
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let wo = work_order::Entity::find_by_id(wo_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Work order {} not found", wo_id)))?;

        let item = wo_item::Entity::find_by_id(item_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .filter(|i| i.wo_id == wo_id)
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Part line {} not found on work order {}",
                    item_id, wo_id
                ))
            })?;

        if item.status != WoItemStatus::Used.as_ref() {
            return Err(ServiceError::InvalidOperation(format!(
                "Part line {} is {} and cannot be returned",
                item_id, item.status
            )));
        }

        let returnable = item.qty_used - item.qty_returned;
        if qty > returnable {
            return Err(ServiceError::InvalidInput(format!(
                "Cannot return {} of line {}; only {} returnable",
                qty, item_id, returnable
            )));
        }

        let stock_id = item.used_stock_id.ok_or_else(|| {
            ServiceError::InternalError(format!("Used line {} has no stock reference", item_id))
        })?;
        let row = stock::Entity::find_by_id(stock_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Stock row {} not found", stock_id)))?;

        let mut stock_active: stock::ActiveModel = row.clone().into();
        stock_active.qty_on_hand = Set(row.qty_on_hand + qty);
        stock_active.qty_available = Set(row.qty_available + qty);
        stock_active.updated_at = Set(Some(Utc::now()));
        stock_active
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        record_movement(
            &txn,
            TransactionType::Return,
            &row.warehouse_code,
            &item.internal_sku,
            qty,
            Some(row.unit_cost),
            "work_order",
            Some(wo_id),
            Some(&wo.wo_number),
        )
        .await?;

        let fully_returned = item.qty_returned + qty == item.qty_used;
        let mut item_active: wo_item::ActiveModel = item.clone().into();
        item_active.qty_returned = Set(item.qty_returned + qty);
        if fully_returned {
            item_active.status = Set(WoItemStatus::Returned.as_ref().to_string());
        }
        item_active
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::StockReturned {
                wo_id,
                internal_sku: item.internal_sku,
                warehouse_code: row.warehouse_code,
                quantity: qty,
            })
            .await;

        Ok(())
    }

    /// Receives stock into a warehouse, creating the stock row when the
    /// SKU has never been stocked there. Updates product costing with a
    /// quantity-weighted average.
    #[allow(clippy::too_many_arguments)]
    #[instrument(skip(self))]
    pub async fn receive_stock(
        &self,
        warehouse_code: &str,
        internal_sku: &str,
        qty: i32,
        unit_cost: Decimal,
        reference_type: Option<&str>,
        reference_id: Option<i32>,
        reference_number: Option<&str>,
        actor: Option<i32>,
    ) -> Result<stock::Model, ServiceError> {
        if qty <= 0 {
            return Err(ServiceError::InvalidInput(
                "Receipt quantity must be positive".into(),
            ));
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let prod = product::Entity::find_by_id(internal_sku.to_string())
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", internal_sku))
            })?;

        let existing = stock::Entity::find()
            .filter(stock::Column::WarehouseCode.eq(warehouse_code))
            .filter(stock::Column::InternalSku.eq(internal_sku))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let today = Utc::now().date_naive();
        let updated = match existing {
            Some(row) => {
                let mut active: stock::ActiveModel = row.clone().into();
                active.qty_on_hand = Set(row.qty_on_hand + qty);
                active.qty_available = Set(row.qty_available + qty);
                active.qty_on_order = Set((row.qty_on_order - qty).max(0));
                active.unit_cost = Set(unit_cost);
                active.last_receipt_date = Set(Some(today));
                active.updated_at = Set(Some(Utc::now()));
                active.update(&txn).await.map_err(ServiceError::db_error)?
            }
            None => {
                let active = stock::ActiveModel {
                    warehouse_code: Set(warehouse_code.to_string()),
                    internal_sku: Set(internal_sku.to_string()),
                    bin_id: Set(None),
                    qty_on_hand: Set(qty),
                    qty_reserved: Set(0),
                    qty_available: Set(qty),
                    qty_on_order: Set(0),
                    unit_cost: Set(unit_cost),
                    last_receipt_date: Set(Some(today)),
                    last_count_date: Set(None),
                    status: Set("ACTIVE".to_string()),
                    created_at: Set(Utc::now()),
                    updated_at: Set(None),
                    ..Default::default()
                };
                active.insert(&txn).await.map_err(ServiceError::db_error)?
            }
        };

        record_movement(
            &txn,
            TransactionType::Receipt,
            warehouse_code,
            internal_sku,
            qty,
            Some(unit_cost),
            reference_type.unwrap_or("receipt"),
            reference_id,
            reference_number,
        )
        .await?;

        // Weighted average cost over the pre-receipt quantity.
        let prior_qty = updated.qty_on_hand - qty;
        let new_avg = if prior_qty > 0 {
            (prod.avg_cost * Decimal::from(prior_qty) + unit_cost * Decimal::from(qty))
                / Decimal::from(updated.qty_on_hand)
        } else {
            unit_cost
        };
        let mut prod_active: product::ActiveModel = prod.into();
        prod_active.avg_cost = Set(new_avg);
        prod_active.last_purchase_cost = Set(unit_cost);
        prod_active.updated_at = Set(Some(Utc::now()));
        prod_active
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::StockReceived {
                internal_sku: internal_sku.to_string(),
                warehouse_code: warehouse_code.to_string(),
                quantity: qty,
            })
            .await;

        self.audit
            .record_change(
                "stock",
                &format!("{}:{}", warehouse_code, internal_sku),
                "RECEIPT",
                None,
                Some(json!({
                    "qty": qty,
                    "unit_cost": unit_cost,
                    "qty_on_hand": updated.qty_on_hand,
                })),
                actor,
            )
            .await;

        Ok(updated)
    }

    /// Sets the on-hand count to `new_qty`, e.g. after a physical count.
    /// The delta lands on the available bucket, so an adjustment can
    /// never cut into reserved quantities.
    #[instrument(skip(self))]
    pub async fn adjust_stock(
        &self,
        warehouse_code: &str,
        internal_sku: &str,
        new_qty: i32,
        reason: &str,
        actor: Option<i32>,
    ) -> Result<stock::Model, ServiceError> {
        if new_qty < 0 {
            return Err(ServiceError::InvalidInput(
                "Adjusted quantity cannot be negative".into(),
            ));
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let row = stock::Entity::find()
            .filter(stock::Column::WarehouseCode.eq(warehouse_code))
            .filter(stock::Column::InternalSku.eq(internal_sku))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No stock for {} in {}",
                    internal_sku, warehouse_code
                ))
            })?;

        let delta = new_qty - row.qty_on_hand;
        if row.qty_available + delta < 0 {
            return Err(ServiceError::InvalidOperation(format!(
                "Adjustment would cut into reserved stock for {} in {}",
                internal_sku, warehouse_code
            )));
        }

        let old_qty = row.qty_on_hand;
        let today = Utc::now().date_naive();
        let mut active: stock::ActiveModel = row.clone().into();
        active.qty_on_hand = Set(new_qty);
        active.qty_available = Set(row.qty_available + delta);
        active.last_count_date = Set(Some(today));
        active.updated_at = Set(Some(Utc::now()));
        let updated = active.update(&txn).await.map_err(ServiceError::db_error)?;

        record_movement(
            &txn,
            TransactionType::Adjustment,
            warehouse_code,
            internal_sku,
            delta,
            Some(row.unit_cost),
            "adjustment",
            None,
            Some(reason),
        )
        .await?;

        self.check_reorder_point(&txn, internal_sku, warehouse_code)
            .await?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::StockAdjusted {
                internal_sku: internal_sku.to_string(),
                warehouse_code: warehouse_code.to_string(),
                old_qty,
                new_qty,
                reason: reason.to_string(),
            })
            .await;

        self.audit
            .record_change(
                "stock",
                &format!("{}:{}", warehouse_code, internal_sku),
                "ADJUSTMENT",
                Some(json!({ "qty_on_hand": old_qty })),
                Some(json!({ "qty_on_hand": new_qty, "reason": reason })),
                actor,
            )
            .await;

        Ok(updated)
    }

    /// Replenishment sweep: every SKU whose projected position
    /// (available + on order) sits at or below its reorder point gets
    /// topped back up to max_stock. Suggestions with a preferred
    /// supplier become DRAFT purchase orders, one per supplier and
    /// destination warehouse. SKUs without a supplier mapping only
    /// raise LowStockDetected.
    #[instrument(skip(self))]
    pub async fn auto_replenishment(
        &self,
        warehouse_code: Option<&str>,
        actor: Option<i32>,
    ) -> Result<ReplenishmentReport, ServiceError> {
        let db = &*self.db;

        let mut query = stock::Entity::find();
        if let Some(wh) = warehouse_code {
            query = query.filter(stock::Column::WarehouseCode.eq(wh));
        }
        let rows = query.all(db).await.map_err(ServiceError::db_error)?;

        let mut suggestions = Vec::new();
        for row in rows {
            let prod = product::Entity::find_by_id(row.internal_sku.clone())
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;
            let Some(prod) = prod else { continue };
            if !prod.is_active || prod.reorder_point <= 0 {
                continue;
            }

            let position = row.qty_available + row.qty_on_order;
            if position > prod.reorder_point {
                continue;
            }

            let target = prod.max_stock.max(prod.reorder_point + prod.safety_stock);
            let suggested_qty = (target - position).max(1);

            let preferred = supplier_sku::Entity::find()
                .filter(supplier_sku::Column::InternalSku.eq(prod.internal_sku.clone()))
                .filter(supplier_sku::Column::IsPreferred.eq(true))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;

            suggestions.push(ReplenishmentSuggestion {
                internal_sku: prod.internal_sku.clone(),
                warehouse_code: row.warehouse_code.clone(),
                qty_available: row.qty_available,
                qty_on_order: row.qty_on_order,
                reorder_point: prod.reorder_point,
                suggested_qty,
                unit_cost: preferred
                    .as_ref()
                    .and_then(|s| s.unit_cost)
                    .unwrap_or(prod.last_purchase_cost),
                preferred_supplier_id: preferred.map(|s| s.supplier_id),
                lead_time_days: prod.lead_time_days,
            });
        }

        // One order per supplier and destination warehouse.
        let mut grouped: BTreeMap<(i32, String), Vec<&ReplenishmentSuggestion>> = BTreeMap::new();
        let mut unmapped = Vec::new();
        for suggestion in &suggestions {
            match suggestion.preferred_supplier_id {
                Some(supplier_id) => grouped
                    .entry((supplier_id, suggestion.warehouse_code.clone()))
                    .or_default()
                    .push(suggestion),
                None => unmapped.push(suggestion),
            }
        }

        let today = Utc::now().date_naive();
        let mut po_ids = Vec::new();
        let mut po_numbers = Vec::new();

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;
        for ((supplier_id, wh), group) in &grouped {
            let lead_days = group.iter().map(|s| s.lead_time_days).max().unwrap_or(0);
            let subtotal: Decimal = group
                .iter()
                .map(|s| s.unit_cost * Decimal::from(s.suggested_qty))
                .sum();

            let created = purchase_order::ActiveModel {
                po_number: Set(format!("PO-{}", Utc::now().timestamp_millis())),
                supplier_id: Set(*supplier_id),
                warehouse_code: Set(Some(wh.clone())),
                status: Set(PurchaseOrderStatus::Draft.as_ref().to_string()),
                order_date: Set(today),
                expected_date: Set(Some(today + Duration::days(i64::from(lead_days)))),
                received_date: Set(None),
                currency_code: Set(None),
                subtotal: Set(subtotal),
                tax_amount: Set(Decimal::ZERO),
                total_amount: Set(subtotal),
                notes: Set(Some("Replenishment sweep".to_string())),
                created_by: Set(actor),
                created_at: Set(Utc::now()),
                updated_at: Set(None),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;

            for suggestion in group {
                po_item::ActiveModel {
                    po_id: Set(created.po_id),
                    internal_sku: Set(suggestion.internal_sku.clone()),
                    qty_ordered: Set(suggestion.suggested_qty),
                    qty_received: Set(0),
                    unit_cost: Set(suggestion.unit_cost),
                    tax_percent: Set(Decimal::ZERO),
                    notes: Set(None),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(ServiceError::db_error)?;
            }

            let mut active: purchase_order::ActiveModel = created.clone().into();
            active.po_number = Set(format!("PO-{:06}", created.po_id));
            let saved = active.update(&txn).await.map_err(ServiceError::db_error)?;
            po_ids.push(saved.po_id);
            po_numbers.push(saved.po_number);
        }
        txn.commit().await.map_err(ServiceError::db_error)?;

        for po_id in &po_ids {
            let _ = self
                .event_sender
                .send(Event::PurchaseOrderCreated(*po_id))
                .await;
        }
        for suggestion in &unmapped {
            let _ = self
                .event_sender
                .send(Event::LowStockDetected {
                    internal_sku: suggestion.internal_sku.clone(),
                    warehouse_code: suggestion.warehouse_code.clone(),
                    qty_available: suggestion.qty_available,
                    reorder_point: suggestion.reorder_point,
                })
                .await;
        }
        for (po_id, po_number) in po_ids.iter().zip(&po_numbers) {
            self.audit
                .record_change(
                    "purchase_orders",
                    &po_id.to_string(),
                    "CREATE",
                    None,
                    Some(json!({ "po_number": po_number, "source": "replenishment" })),
                    actor,
                )
                .await;
        }

        let report = ReplenishmentReport {
            skus_below_reorder: suggestions.len() as u32,
            orders_created: po_numbers.len() as u32,
            po_numbers,
            unmapped_skus: unmapped
                .iter()
                .map(|s| s.internal_sku.clone())
                .collect(),
            suggestions,
        };
        info!(
            skus = report.skus_below_reorder,
            orders = report.orders_created,
            "replenishment sweep finished"
        );
        Ok(report)
    }

    /// Inventory aging report: how long stock has sat since its last
    /// receipt, with value at current unit cost. `months` sets the
    /// analysis horizon the categories are derived from.
    #[instrument(skip(self))]
    pub async fn inventory_aging(
        &self,
        warehouse_code: Option<&str>,
        months: u32,
    ) -> Result<Vec<AgingRow>, ServiceError> {
        let db = &*self.db;
        let horizon_days = i64::from(months.max(1)) * 30;

        let mut query = stock::Entity::find().filter(stock::Column::QtyOnHand.gt(0));
        if let Some(wh) = warehouse_code {
            query = query.filter(stock::Column::WarehouseCode.eq(wh));
        }
        let rows = query.all(db).await.map_err(ServiceError::db_error)?;

        let today = Utc::now().date_naive();
        let report = rows
            .into_iter()
            .map(|row| {
                let age_days = row
                    .last_receipt_date
                    .map(|d| (today - d).num_days());
                AgingRow {
                    stock_value: row.unit_cost * Decimal::from(row.qty_on_hand),
                    category: age_category(age_days, horizon_days).to_string(),
                    internal_sku: row.internal_sku,
                    warehouse_code: row.warehouse_code,
                    qty_on_hand: row.qty_on_hand,
                    unit_cost: row.unit_cost,
                    age_days,
                }
            })
            .collect();

        Ok(report)
    }

    /// Stock rows filtered by warehouse and/or SKU.
    #[instrument(skip(self))]
    pub async fn stock_levels(
        &self,
        warehouse_code: Option<&str>,
        internal_sku: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<stock::Model>, u64), ServiceError> {
        let mut query = stock::Entity::find();
        if let Some(wh) = warehouse_code {
            query = query.filter(stock::Column::WarehouseCode.eq(wh));
        }
        if let Some(sku) = internal_sku {
            query = query.filter(stock::Column::InternalSku.eq(sku));
        }
        let paginator = query
            .order_by_asc(stock::Column::WarehouseCode)
            .order_by_asc(stock::Column::InternalSku)
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

    /// Movement journal, newest first.
    #[instrument(skip(self))]
    pub async fn movements(
        &self,
        warehouse_code: Option<&str>,
        internal_sku: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<stock_transaction::Model>, u64), ServiceError> {
        let mut query = stock_transaction::Entity::find();
        if let Some(wh) = warehouse_code {
            query = query.filter(stock_transaction::Column::WarehouseCode.eq(wh));
        }
        if let Some(sku) = internal_sku {
            query = query.filter(stock_transaction::Column::InternalSku.eq(sku));
        }
        let paginator = query
            .order_by_desc(stock_transaction::Column::TransactionDate)
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

    /// Raises a low-stock alert when availability drops to or below the
    /// product's reorder point. Skips when an unresolved alert for the
    /// same SKU/warehouse already exists.
    async fn check_reorder_point(
        &self,
        txn: &DatabaseTransaction,
        internal_sku: &str,
        warehouse_code: &str,
    ) -> Result<(), ServiceError> {
        let Some(prod) = product::Entity::find_by_id(internal_sku.to_string())
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?
        else {
            return Ok(());
        };
        if prod.reorder_point <= 0 {
            return Ok(());
        }

        let Some(row) = stock::Entity::find()
            .filter(stock::Column::WarehouseCode.eq(warehouse_code))
            .filter(stock::Column::InternalSku.eq(internal_sku))
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?
        else {
            return Ok(());
        };

        if row.qty_available > prod.reorder_point {
            return Ok(());
        }

        let reference = format!("{}:{}", warehouse_code, internal_sku);
        let open_alert = alert::Entity::find()
            .filter(alert::Column::AlertType.eq(alert::AlertType::LowStock.as_ref()))
            .filter(alert::Column::ReferenceId.eq(reference.clone()))
            .filter(alert::Column::IsResolved.eq(false))
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?;
        if open_alert.is_some() {
            return Ok(());
        }

        let severity = if row.qty_available <= prod.safety_stock {
            alert::AlertSeverity::Critical
        } else {
            alert::AlertSeverity::Warning
        };

        alert::ActiveModel {
            alert_type: Set(alert::AlertType::LowStock.as_ref().to_string()),
            severity: Set(severity.as_ref().to_string()),
            message: Set(format!(
                "{} in {} down to {} (reorder point {})",
                internal_sku, warehouse_code, row.qty_available, prod.reorder_point
            )),
            reference_type: Set(Some("stock".to_string())),
            reference_id: Set(Some(reference)),
            is_resolved: Set(false),
            resolved_at: Set(None),
            resolved_by: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(txn)
        .await
        .map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::LowStockDetected {
                internal_sku: internal_sku.to_string(),
                warehouse_code: warehouse_code.to_string(),
                qty_available: row.qty_available,
                reorder_point: prod.reorder_point,
            })
            .await;

        Ok(())
    }
}

/// Appends one row to the movement journal.
#[allow(clippy::too_many_arguments)]
async fn record_movement(
    txn: &DatabaseTransaction,
    kind: TransactionType,
    warehouse_code: &str,
    internal_sku: &str,
    quantity: i32,
    unit_cost: Option<Decimal>,
    reference_type: &str,
    reference_id: Option<i32>,
    reference_number: Option<&str>,
) -> Result<(), ServiceError> {
    stock_transaction::ActiveModel {
        transaction_date: Set(Utc::now()),
        transaction_type: Set(kind.as_ref().to_string()),
        warehouse_code: Set(warehouse_code.to_string()),
        internal_sku: Set(internal_sku.to_string()),
        quantity: Set(quantity),
        unit_cost: Set(unit_cost),
        total_cost: Set(unit_cost.map(|c| c * Decimal::from(quantity.abs()))),
        reference_type: Set(Some(reference_type.to_string())),
        reference_id: Set(reference_id),
        reference_number: Set(reference_number.map(|s| s.to_string())),
        notes: Set(None),
        created_by: Set(None),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(ServiceError::db_error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::age_category;

    #[test]
    fn age_categories_over_a_twelve_month_horizon() {
        let horizon = 360;
        assert_eq!(age_category(Some(0), horizon), "CURRENT");
        assert_eq!(age_category(Some(90), horizon), "CURRENT");
        assert_eq!(age_category(Some(91), horizon), "AGING");
        assert_eq!(age_category(Some(180), horizon), "AGING");
        assert_eq!(age_category(Some(181), horizon), "STALE");
        assert_eq!(age_category(Some(360), horizon), "STALE");
        assert_eq!(age_category(Some(361), horizon), "OBSOLETE");
        assert_eq!(age_category(None, horizon), "OBSOLETE");
    }
}
