use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoice_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub invoice_item_id: i32,
    pub invoice_id: i32,
    pub internal_sku: Option<String>,
    pub description: String,
    pub qty: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub unit_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub tax_percent: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub discount_percent: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoice::Entity",
        from = "Column::InvoiceId",
        to = "super::invoice::Column::InvoiceId"
    )]
    Invoice,
}

impl Related<super::invoice::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Line total: qty × price, minus discount, plus tax.
    pub fn line_total(&self) -> Decimal {
        let hundred = Decimal::new(100, 0);
        let gross = self.unit_price * Decimal::from(self.qty);
        let discounted = gross * (hundred - self.discount_percent) / hundred;
        discounted * (hundred + self.tax_percent) / hundred
    }
}
