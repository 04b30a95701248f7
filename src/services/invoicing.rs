//! Invoicing service
//!
//! Builds invoices from completed work orders and records payments.
//! The schema enforces one invoice per work order with a unique index
//! on `invoices.wo_id`.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    invoice,
    invoice::InvoiceStatus,
    invoice_item, payment,
    payment::PaymentMethod,
    wo_item,
    wo_item::WoItemStatus,
    wo_service,
    wo_service::CompletionStatus,
    work_order,
    work_order::WorkOrderStatus,
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit::AuditService;

const DEFAULT_PAYMENT_TERMS_DAYS: i64 = 30;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateInvoiceInput {
    pub due_date: Option<NaiveDate>,
    /// Percentage applied to labor lines when the work order carries a
    /// default tax rate instead of per-line rates.
    pub tax_percent: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordPaymentInput {
    pub amount: Decimal,
    pub payment_method: String,
    pub payment_date: Option<NaiveDate>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
}

/// Invoice with its lines, as returned to callers.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: invoice::Model,
    pub items: Vec<invoice_item::Model>,
    pub payments: Vec<payment::Model>,
    pub balance_due: Decimal,
}

#[derive(Clone)]
pub struct InvoicingService {
    db: Arc<DbPool>,
    event_sender: EventSender,
    default_currency: String,
    default_tax_percent: Decimal,
    audit: AuditService,
}

impl InvoicingService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: EventSender,
        default_currency: String,
        default_tax_percent: Decimal,
        audit: AuditService,
    ) -> Self {
        Self {
            db,
            event_sender,
            default_currency,
            default_tax_percent,
            audit,
        }
    }

    /// Creates an invoice from a COMPLETED work order and advances the
    /// work order to INVOICED in the same transaction.
    ///
    /// Part lines bill `qty_used - qty_returned` at the line price.
    /// Labor lines bill worked hours at the line rate.
    #[instrument(skip(self, input))]
    pub async fn create_from_work_order(
        &self,
        wo_id: i32,
        input: CreateInvoiceInput,
        actor: Option<i32>,
    ) -> Result<InvoiceDetail, ServiceError> {
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
        if status != WorkOrderStatus::Completed {
            return Err(ServiceError::InvalidOperation(format!(
                "Work order {} is {} and only COMPLETED work orders can be invoiced",
                wo.wo_number, wo.status
            )));
        }

        let existing = invoice::Entity::find()
            .filter(invoice::Column::WoId.eq(wo_id))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if let Some(existing) = existing {
            return Err(ServiceError::Conflict(format!(
                "Work order {} is already invoiced as {}",
                wo.wo_number, existing.invoice_number
            )));
        }

        let today = Utc::now().date_naive();
        let due_date = input
            .due_date
            .unwrap_or(today + Duration::days(DEFAULT_PAYMENT_TERMS_DAYS));
        let labor_tax = input.tax_percent.unwrap_or(self.default_tax_percent);

        let created = invoice::ActiveModel {
            invoice_number: Set(format!("INV-{}", Utc::now().timestamp_millis())),
            wo_id: Set(Some(wo_id)),
            client_id: Set(wo.client_id),
            currency_code: Set(Some(self.default_currency.clone())),
            subtotal: Set(Decimal::ZERO),
            tax_amount: Set(Decimal::ZERO),
            discount_amount: Set(wo.discount_amount),
            total_amount: Set(Decimal::ZERO),
            status: Set(InvoiceStatus::Draft.as_ref().to_string()),
            issue_date: Set(Some(today)),
            due_date: Set(Some(due_date)),
            paid_date: Set(None),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        let mut items = Vec::new();

        let part_lines = wo_item::Entity::find()
            .filter(wo_item::Column::WoId.eq(wo_id))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        for line in part_lines {
            let billable = line.qty_used - line.qty_returned;
            if billable <= 0 || line.status == WoItemStatus::Cancelled.as_ref() {
                continue;
            }
            let item = invoice_item::ActiveModel {
                invoice_id: Set(created.invoice_id),
                internal_sku: Set(Some(line.internal_sku.clone())),
                description: Set(line.internal_sku),
                qty: Set(billable),
                unit_price: Set(line.unit_price),
                tax_percent: Set(line.tax_percent),
                discount_percent: Set(line.discount_percent),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
            items.push(item);
        }

        let labor_lines = wo_service::Entity::find()
            .filter(wo_service::Column::WoId.eq(wo_id))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        for line in labor_lines {
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
            if hours <= Decimal::ZERO || line.hourly_rate <= Decimal::ZERO {
                continue;
            }
            let item = invoice_item::ActiveModel {
                invoice_id: Set(created.invoice_id),
                internal_sku: Set(None),
                description: Set(format!("Labor: {} ({} h)", line.description, hours)),
                qty: Set(1),
                unit_price: Set(hours * line.hourly_rate),
                tax_percent: Set(labor_tax),
                discount_percent: Set(Decimal::ZERO),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(ServiceError::db_error)?;
            items.push(item);
        }

        if items.is_empty() {
            return Err(ServiceError::InvalidOperation(format!(
                "Work order {} has nothing billable",
                wo.wo_number
            )));
        }

        let totals = compute_totals(&items, wo.discount_amount);

        let mut inv_active: invoice::ActiveModel = created.clone().into();
        inv_active.invoice_number = Set(format!("INV-{:06}", created.invoice_id));
        inv_active.subtotal = Set(totals.subtotal);
        inv_active.tax_amount = Set(totals.tax_amount);
        inv_active.total_amount = Set(totals.total_amount);
        let saved = inv_active
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let mut wo_active: work_order::ActiveModel = wo.into();
        wo_active.status = Set(WorkOrderStatus::Invoiced.as_ref().to_string());
        wo_active.closed_at = Set(Some(Utc::now()));
        wo_active.updated_at = Set(Some(Utc::now()));
        wo_active
            .update(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::InvoiceCreated {
                invoice_id: saved.invoice_id,
                wo_id: Some(wo_id),
            })
            .await;
        let _ = self
            .event_sender
            .send(Event::WorkOrderStatusChanged {
                wo_id,
                old_status: WorkOrderStatus::Completed.as_ref().to_string(),
                new_status: WorkOrderStatus::Invoiced.as_ref().to_string(),
            })
            .await;
        self.audit
            .record_change(
                "invoices",
                &saved.invoice_id.to_string(),
                "CREATE",
                None,
                serde_json::to_value(&saved).ok(),
                actor,
            )
            .await;
        self.audit
            .record_change(
                "work_orders",
                &wo_id.to_string(),
                "STATUS_CHANGE",
                Some(json!({ "status": WorkOrderStatus::Completed.as_ref() })),
                Some(json!({ "status": WorkOrderStatus::Invoiced.as_ref() })),
                actor,
            )
            .await;

        info!(
            invoice_id = saved.invoice_id,
            invoice_number = %saved.invoice_number,
            wo_id = wo_id,
            "invoice created"
        );

        let balance_due = saved.total_amount;
        Ok(InvoiceDetail {
            invoice: saved,
            items,
            payments: Vec::new(),
            balance_due,
        })
    }

    #[instrument(skip(self))]
    pub async fn get_invoice(&self, invoice_id: i32) -> Result<InvoiceDetail, ServiceError> {
        let db = &*self.db;
        let inv = invoice::Entity::find_by_id(invoice_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        let items = invoice_item::Entity::find()
            .filter(invoice_item::Column::InvoiceId.eq(invoice_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let payments = payment::Entity::find()
            .filter(payment::Column::InvoiceId.eq(invoice_id))
            .order_by_asc(payment::Column::PaymentDate)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let paid: Decimal = payments.iter().map(|p| p.amount).sum();
        let balance_due = inv.total_amount - paid;
        Ok(InvoiceDetail {
            invoice: inv,
            items,
            payments,
            balance_due,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_invoices(
        &self,
        status: Option<InvoiceStatus>,
        client_id: Option<i32>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<invoice::Model>, u64), ServiceError> {
        let mut query = invoice::Entity::find();
        if let Some(status) = status {
            query = query.filter(invoice::Column::Status.eq(status.as_ref()));
        }
        if let Some(client_id) = client_id {
            query = query.filter(invoice::Column::ClientId.eq(client_id));
        }
        let paginator = query
            .order_by_desc(invoice::Column::CreatedAt)
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

    /// Marks a draft invoice as sent to the client.
    #[instrument(skip(self))]
    pub async fn send_invoice(
        &self,
        invoice_id: i32,
        actor: Option<i32>,
    ) -> Result<invoice::Model, ServiceError> {
        let inv = invoice::Entity::find_by_id(invoice_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;
        if inv.status != InvoiceStatus::Draft.as_ref() {
            return Err(ServiceError::InvalidStatusTransition(format!(
                "Invoice {} is {} and cannot be sent",
                inv.invoice_number, inv.status
            )));
        }
        let mut active: invoice::ActiveModel = inv.into();
        active.status = Set(InvoiceStatus::Sent.as_ref().to_string());
        active.updated_at = Set(Some(Utc::now()));
        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        self.audit
            .record_change(
                "invoices",
                &invoice_id.to_string(),
                "STATUS_CHANGE",
                Some(json!({ "status": InvoiceStatus::Draft.as_ref() })),
                Some(json!({ "status": InvoiceStatus::Sent.as_ref() })),
                actor,
            )
            .await;
        Ok(updated)
    }

    /// Records a payment. Overpayment is rejected; the payment that
    /// settles the balance marks the invoice PAID.
    #[instrument(skip(self, input))]
    pub async fn record_payment(
        &self,
        invoice_id: i32,
        input: RecordPaymentInput,
        actor: Option<i32>,
    ) -> Result<payment::Model, ServiceError> {
        input.validate()?;
        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Payment amount must be positive".into(),
            ));
        }
        let method = PaymentMethod::from_str(&input.payment_method)
            .map_err(|_| ServiceError::InvalidInput(format!(
                "Unknown payment method {}",
                input.payment_method
            )))?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let inv = invoice::Entity::find_by_id(invoice_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))?;

        if inv.status == InvoiceStatus::Cancelled.as_ref() {
            return Err(ServiceError::InvalidOperation(format!(
                "Invoice {} is cancelled",
                inv.invoice_number
            )));
        }
        if inv.status == InvoiceStatus::Paid.as_ref() {
            return Err(ServiceError::InvalidOperation(format!(
                "Invoice {} is already paid",
                inv.invoice_number
            )));
        }

        let existing: Vec<payment::Model> = payment::Entity::find()
            .filter(payment::Column::InvoiceId.eq(invoice_id))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        let paid_so_far: Decimal = existing.iter().map(|p| p.amount).sum();
        let balance = inv.total_amount - paid_so_far;
        if input.amount > balance {
            return Err(ServiceError::InvalidOperation(format!(
                "Payment of {} exceeds the open balance of {} on {}",
                input.amount, balance, inv.invoice_number
            )));
        }

        let payment_date = input.payment_date.unwrap_or_else(|| Utc::now().date_naive());
        let created = payment::ActiveModel {
            invoice_id: Set(invoice_id),
            payment_date: Set(payment_date),
            amount: Set(input.amount),
            currency_code: Set(inv.currency_code.clone()),
            payment_method: Set(method.as_ref().to_string()),
            reference_number: Set(input.reference_number),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        if paid_so_far + input.amount == inv.total_amount {
            let mut active: invoice::ActiveModel = inv.into();
            active.status = Set(InvoiceStatus::Paid.as_ref().to_string());
            active.paid_date = Set(Some(payment_date));
            active.updated_at = Set(Some(Utc::now()));
            active.update(&txn).await.map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        let _ = self
            .event_sender
            .send(Event::PaymentRecorded {
                invoice_id,
                payment_id: created.payment_id,
            })
            .await;
        self.audit
            .record_change(
                "invoices",
                &invoice_id.to_string(),
                "PAYMENT",
                Some(json!({ "balance_due": balance })),
                Some(json!({
                    "payment_id": created.payment_id,
                    "amount": created.amount,
                    "balance_due": balance - created.amount,
                })),
                actor,
            )
            .await;

        Ok(created)
    }

    /// Sweeps SENT invoices past their due date into OVERDUE and raises
    /// nothing itself; alert generation rides on the returned count.
    #[instrument(skip(self))]
    pub async fn mark_overdue_invoices(&self) -> Result<u64, ServiceError> {
        let today = Utc::now().date_naive();
        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let overdue = invoice::Entity::find()
            .filter(invoice::Column::Status.eq(InvoiceStatus::Sent.as_ref()))
            .filter(invoice::Column::DueDate.lt(today))
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;

        let count = overdue.len() as u64;
        for inv in overdue {
            let mut active: invoice::ActiveModel = inv.into();
            active.status = Set(InvoiceStatus::Overdue.as_ref().to_string());
            active.updated_at = Set(Some(Utc::now()));
            active.update(&txn).await.map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(count)
    }
}

struct Totals {
    subtotal: Decimal,
    tax_amount: Decimal,
    total_amount: Decimal,
}

fn compute_totals(items: &[invoice_item::Model], discount_amount: Decimal) -> Totals {
    let hundred = Decimal::new(100, 0);
    let mut subtotal = Decimal::ZERO;
    let mut tax_amount = Decimal::ZERO;
    for item in items {
        let gross = item.unit_price * Decimal::from(item.qty);
        let discounted = gross * (hundred - item.discount_percent) / hundred;
        subtotal += discounted;
        tax_amount += discounted * item.tax_percent / hundred;
    }
    Totals {
        subtotal,
        tax_amount,
        total_amount: subtotal + tax_amount - discount_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(qty: i32, price: Decimal, tax: Decimal, discount: Decimal) -> invoice_item::Model {
        invoice_item::Model {
            invoice_item_id: 0,
            invoice_id: 1,
            internal_sku: None,
            description: "test".into(),
            qty,
            unit_price: price,
            tax_percent: tax,
            discount_percent: discount,
        }
    }

    #[test]
    fn totals_add_tax_after_discount() {
        let items = vec![item(2, dec!(100.00), dec!(16.00), dec!(10.00))];
        let totals = compute_totals(&items, Decimal::ZERO);
        assert_eq!(totals.subtotal, dec!(180.0000));
        assert_eq!(totals.tax_amount, dec!(28.800000));
        assert_eq!(totals.total_amount, dec!(208.800000));
    }

    #[test]
    fn order_discount_reduces_total_only() {
        let items = vec![item(1, dec!(50.00), Decimal::ZERO, Decimal::ZERO)];
        let totals = compute_totals(&items, dec!(5.00));
        assert_eq!(totals.subtotal, dec!(50.0000));
        assert_eq!(totals.total_amount, dec!(45.0000));
    }
}
