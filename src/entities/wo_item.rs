use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Part line on a work order. Tracks the reserve → use → return flow
/// against a concrete stock row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wo_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub item_id: i32,
    pub wo_id: i32,
    pub internal_sku: String,
    pub qty_ordered: i32,
    pub qty_used: i32,
    pub qty_returned: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub discount_percent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub tax_percent: Decimal,
    pub reserved_stock_id: Option<i64>,
    pub reserved_stock_date: Option<Date>,
    pub used_stock_id: Option<i64>,
    pub used_stock_date: Option<Date>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_order::Entity",
        from = "Column::WoId",
        to = "super::work_order::Column::WoId"
    )]
    WorkOrder,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::InternalSku",
        to = "super::product::Column::InternalSku"
    )]
    Product,
}

impl Related<super::work_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkOrder.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WoItemStatus {
    Pending,
    Reserved,
    Used,
    Returned,
    Cancelled,
}
