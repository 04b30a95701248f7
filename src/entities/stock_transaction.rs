use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Inventory movement journal. Append-only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub transaction_id: i64,
    pub transaction_date: DateTimeUtc,
    pub transaction_type: String,
    pub warehouse_code: String,
    pub internal_sku: String,
    /// Signed: positive adds to on-hand, negative removes.
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))", nullable)]
    pub unit_cost: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))", nullable)]
    pub total_cost: Option<Decimal>,
    /// e.g. "work_order", "purchase_order"
    pub reference_type: Option<String>,
    pub reference_id: Option<i32>,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::stock::Entity",
        from = "Column::WarehouseCode",
        to = "super::stock::Column::WarehouseCode"
    )]
    Stock,
}

impl ActiveModelBehavior for ActiveModel {}

/// Movement kinds recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TransactionType {
    Receipt,
    Issue,
    Transfer,
    Adjustment,
    Return,
    Scrap,
}
