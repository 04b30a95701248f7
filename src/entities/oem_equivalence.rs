use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Cross-reference between two catalog part numbers. Directional; a
/// reciprocal row is created alongside when equivalence is symmetric.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "oem_equivalences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub equivalence_id: i64,
    pub catalog_item_id: i64,
    pub equivalent_item_id: i64,
    pub equivalence_type: String,
    pub confidence: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::oem_catalog_item::Entity",
        from = "Column::CatalogItemId",
        to = "super::oem_catalog_item::Column::CatalogItemId"
    )]
    Item,
    #[sea_orm(
        belongs_to = "super::oem_catalog_item::Entity",
        from = "Column::EquivalentItemId",
        to = "super::oem_catalog_item::Column::CatalogItemId"
    )]
    EquivalentItem,
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EquivalenceType {
    Direct,
    Supersession,
    Aftermarket,
    Partial,
}
