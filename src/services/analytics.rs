//! Reporting and analytics: dashboard figures, ABC classification and
//! the stock consistency sweep.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::db::DbPool;
use crate::entities::{
    alert::{AlertSeverity, AlertType},
    invoice,
    invoice::InvoiceStatus,
    stock, stock_transaction,
    stock_transaction::TransactionType,
    work_order,
    work_order::WorkOrderStatus,
};
use crate::errors::ServiceError;
use crate::services::audit::AuditService;

const ABC_A_CUTOFF: f64 = 0.80;
const ABC_B_CUTOFF: f64 = 0.95;

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub open_work_orders: u64,
    pub work_orders_by_status: HashMap<String, u64>,
    pub unpaid_invoice_total: Decimal,
    pub overdue_invoices: u64,
    pub inventory_value: Decimal,
    pub low_stock_alerts: u64,
    pub revenue_last_30_days: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AbcRow {
    pub internal_sku: String,
    pub consumption_value: Decimal,
    pub share: f64,
    pub cumulative_share: f64,
    pub class: char,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyReport {
    pub rows_checked: u64,
    pub violations: Vec<stock::Model>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    db: Arc<DbPool>,
    audit: AuditService,
}

impl AnalyticsService {
    pub fn new(db: Arc<DbPool>, audit: AuditService) -> Self {
        Self { db, audit }
    }

    /// Headline figures for the workshop dashboard.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<Dashboard, ServiceError> {
        let db = &*self.db;

        let mut by_status = HashMap::new();
        let mut open = 0u64;
        for status in [
            WorkOrderStatus::Draft,
            WorkOrderStatus::Scheduled,
            WorkOrderStatus::InProgress,
            WorkOrderStatus::WaitingParts,
            WorkOrderStatus::WaitingApproval,
            WorkOrderStatus::Completed,
        ] {
            let count = work_order::Entity::find()
                .filter(work_order::Column::Status.eq(status.as_ref()))
                .count(db)
                .await
                .map_err(ServiceError::db_error)?;
            if count > 0 {
                by_status.insert(status.as_ref().to_string(), count);
            }
            open += count;
        }

        let open_invoices = invoice::Entity::find()
            .filter(
                invoice::Column::Status.is_in([
                    InvoiceStatus::Sent.as_ref(),
                    InvoiceStatus::Overdue.as_ref(),
                ]),
            )
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let unpaid_invoice_total = open_invoices.iter().map(|i| i.total_amount).sum();
        let overdue_invoices = open_invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Overdue.as_ref())
            .count() as u64;

        let stock_rows = stock::Entity::find()
            .filter(stock::Column::QtyOnHand.gt(0))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let inventory_value = stock_rows
            .iter()
            .map(|r| r.unit_cost * Decimal::from(r.qty_on_hand))
            .sum();

        let low_stock_alerts = crate::entities::alert::Entity::find()
            .filter(crate::entities::alert::Column::AlertType.eq(AlertType::LowStock.as_ref()))
            .filter(crate::entities::alert::Column::IsResolved.eq(false))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?;

        let window_start = Utc::now().date_naive() - Duration::days(30);
        let recent_paid = invoice::Entity::find()
            .filter(invoice::Column::Status.eq(InvoiceStatus::Paid.as_ref()))
            .filter(invoice::Column::PaidDate.gte(window_start))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let revenue_last_30_days = recent_paid.iter().map(|i| i.total_amount).sum();

        Ok(Dashboard {
            open_work_orders: open,
            work_orders_by_status: by_status,
            unpaid_invoice_total,
            overdue_invoices,
            inventory_value,
            low_stock_alerts,
            revenue_last_30_days,
        })
    }

    /// ABC classification over issue movements in the trailing window.
    /// Class A covers the SKUs that make up the first 80% of consumption
    /// value, B up to 95%, C the tail.
    #[instrument(skip(self))]
    pub async fn abc_analysis(&self, window_days: i64) -> Result<Vec<AbcRow>, ServiceError> {
        let since = Utc::now() - Duration::days(window_days.max(1));
        let issues = stock_transaction::Entity::find()
            .filter(stock_transaction::Column::TransactionType.eq(TransactionType::Issue.as_ref()))
            .filter(stock_transaction::Column::TransactionDate.gte(since))
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut by_sku: HashMap<String, Decimal> = HashMap::new();
        for t in issues {
            let value = t
                .total_cost
                .or_else(|| t.unit_cost.map(|c| c * Decimal::from(t.quantity.abs())))
                .unwrap_or_default();
            *by_sku.entry(t.internal_sku).or_default() += value;
        }

        let total: Decimal = by_sku.values().copied().sum();
        if total <= Decimal::ZERO {
            return Ok(Vec::new());
        }

        let mut ranked: Vec<(String, Decimal)> = by_sku.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let total_f = decimal_to_f64(total);
        let mut cumulative = 0.0;
        let rows = ranked
            .into_iter()
            .map(|(sku, value)| {
                let share = decimal_to_f64(value) / total_f;
                cumulative += share;
                let class = if cumulative <= ABC_A_CUTOFF {
                    'A'
                } else if cumulative <= ABC_B_CUTOFF {
                    'B'
                } else {
                    'C'
                };
                AbcRow {
                    internal_sku: sku,
                    consumption_value: value,
                    share,
                    cumulative_share: cumulative,
                    class,
                }
            })
            .collect();
        Ok(rows)
    }

    /// Sweeps every stock row against the balance equation and raises a
    /// critical alert per violation.
    #[instrument(skip(self))]
    pub async fn stock_consistency_check(&self) -> Result<ConsistencyReport, ServiceError> {
        let rows = stock::Entity::find()
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        let rows_checked = rows.len() as u64;
        let violations: Vec<stock::Model> =
            rows.into_iter().filter(|r| !r.is_consistent()).collect();

        for row in &violations {
            warn!(
                stock_id = row.stock_id,
                sku = %row.internal_sku,
                warehouse = %row.warehouse_code,
                on_hand = row.qty_on_hand,
                reserved = row.qty_reserved,
                available = row.qty_available,
                "stock balance violation"
            );
            self.audit
                .raise_alert(
                    AlertType::StockInconsistency,
                    AlertSeverity::Critical,
                    &format!(
                        "Stock row {} for {} in {} violates the balance equation",
                        row.stock_id, row.internal_sku, row.warehouse_code
                    ),
                    Some("stock"),
                    Some(&row.stock_id.to_string()),
                )
                .await?;
        }

        Ok(ConsistencyReport {
            rows_checked,
            violations,
        })
    }
}

fn decimal_to_f64(value: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    value.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abc_cutoffs_are_ordered() {
        assert!(ABC_A_CUTOFF < ABC_B_CUTOFF);
        assert!(ABC_B_CUTOFF < 1.0);
    }
}
