use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Maps an internal SKU to a supplier's own part number and terms.
/// A product may carry one preferred supplier among several.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "supplier_skus")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub supplier_sku_id: i32,
    pub supplier_id: i32,
    pub internal_sku: String,
    pub supplier_part_number: String,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))", nullable)]
    pub unit_cost: Option<Decimal>,
    pub currency_code: Option<String>,
    pub min_order_qty: Option<i32>,
    pub lead_time_days: Option<i32>,
    pub is_preferred: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::SupplierId"
    )]
    Supplier,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::InternalSku",
        to = "super::product::Column::InternalSku"
    )]
    Product,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
