use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oem_brands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub brand_code: String,
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::oem_catalog_item::Entity")]
    CatalogItems,
}

impl Related<super::oem_catalog_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
