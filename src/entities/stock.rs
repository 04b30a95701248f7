use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stock level per (warehouse, product).
///
/// Invariant maintained by the inventory service:
/// `qty_on_hand = qty_reserved + qty_available`, all three non-negative.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub stock_id: i64,
    pub warehouse_code: String,
    pub internal_sku: String,
    pub bin_id: Option<i32>,
    pub qty_on_hand: i32,
    pub qty_reserved: i32,
    pub qty_available: i32,
    pub qty_on_order: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))")]
    pub unit_cost: Decimal,
    pub last_receipt_date: Option<Date>,
    pub last_count_date: Option<Date>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseCode",
        to = "super::warehouse::Column::WarehouseCode"
    )]
    Warehouse,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::InternalSku",
        to = "super::product::Column::InternalSku"
    )]
    Product,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// True when the balance equation holds.
    pub fn is_consistent(&self) -> bool {
        self.qty_on_hand == self.qty_reserved + self.qty_available
            && self.qty_on_hand >= 0
            && self.qty_reserved >= 0
            && self.qty_available >= 0
    }
}
