use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "po_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub po_item_id: i32,
    pub po_id: i32,
    pub internal_sku: String,
    pub qty_ordered: i32,
    pub qty_received: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))")]
    pub unit_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub tax_percent: Decimal,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::purchase_order::Entity",
        from = "Column::PoId",
        to = "super::purchase_order::Column::PoId"
    )]
    PurchaseOrder,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::InternalSku",
        to = "super::product::Column::InternalSku"
    )]
    Product,
}

impl Related<super::purchase_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PurchaseOrder.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn qty_outstanding(&self) -> i32 {
        (self.qty_ordered - self.qty_received).max(0)
    }
}
