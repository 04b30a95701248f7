use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Master product catalog, keyed by the internal SKU.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_master")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub internal_sku: String,
    pub group_code: String,
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub oem_ref: Option<String>,
    pub oem_code: Option<String>,
    pub uom_code: String,
    pub barcode: Option<String>,
    // Stock policy
    pub min_stock: i32,
    pub max_stock: i32,
    pub reorder_point: i32,
    pub safety_stock: i32,
    pub lead_time_days: i32,
    // Costing
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub standard_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub avg_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub last_purchase_cost: Decimal,
    pub warranty_days: i32,
    pub is_active: bool,
    pub is_serialized: bool,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::taxonomy_group::Entity",
        from = "Column::GroupCode",
        to = "super::taxonomy_group::Column::GroupCode"
    )]
    TaxonomyGroup,
    #[sea_orm(has_many = "super::stock::Entity")]
    Stock,
}

impl Related<super::taxonomy_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxonomyGroup.def()
    }
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
