use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Effective-dated price row. The price in force for a SKU on a date is
/// the row with the latest `valid_from` not after that date, not expired,
/// with the highest `min_qty` not exceeding the requested quantity.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub price_id: i64,
    pub price_list_id: i32,
    pub internal_sku: String,
    #[sea_orm(column_type = "Decimal(Some((12, 4)))")]
    pub unit_price: Decimal,
    pub min_qty: i32,
    pub valid_from: Date,
    pub valid_until: Option<Date>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::price_list::Entity",
        from = "Column::PriceListId",
        to = "super::price_list::Column::PriceListId"
    )]
    PriceList,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::InternalSku",
        to = "super::product::Column::InternalSku"
    )]
    Product,
}

impl Related<super::price_list::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceList.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether this row applies on `date` for a line of `qty` units.
    pub fn applies(&self, date: Date, qty: i32) -> bool {
        self.valid_from <= date
            && self.valid_until.map_or(true, |until| until >= date)
            && self.min_qty <= qty
    }
}
