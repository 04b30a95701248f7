use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Operational alert raised by background checks (low stock, overdue
/// work orders, overdue invoices). Resolved manually or by the check
/// that raised it once the condition clears.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub alert_id: i64,
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTimeUtc>,
    pub resolved_by: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    LowStock,
    Reorder,
    WorkOrderOverdue,
    InvoiceOverdue,
    StockInconsistency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}
