use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A part as published in a manufacturer's catalog. May or may not be
/// linked to an internal SKU; unlinked rows are reference-only.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oem_catalog")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub catalog_item_id: i64,
    pub brand_code: String,
    pub oem_part_number: String,
    pub description: String,
    pub group_code: Option<String>,
    pub internal_sku: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub list_price: Option<Decimal>,
    pub currency_code: Option<String>,
    pub superseded_by: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::oem_brand::Entity",
        from = "Column::BrandCode",
        to = "super::oem_brand::Column::BrandCode"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::InternalSku",
        to = "super::product::Column::InternalSku"
    )]
    Product,
    #[sea_orm(has_many = "super::fitment::Entity")]
    Fitments,
}

impl Related<super::oem_brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::fitment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fitments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
