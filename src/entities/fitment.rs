use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which equipment types a catalog part fits, optionally bounded by
/// model years. Rows against a specific equipment unit take precedence
/// over type-level rows.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fitments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub fitment_id: i64,
    pub catalog_item_id: i64,
    pub equipment_type_id: Option<i32>,
    pub equipment_id: Option<i32>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub engine_code: Option<String>,
    pub notes: Option<String>,
    pub is_verified: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::oem_catalog_item::Entity",
        from = "Column::CatalogItemId",
        to = "super::oem_catalog_item::Column::CatalogItemId"
    )]
    CatalogItem,
    #[sea_orm(
        belongs_to = "super::equipment_type::Entity",
        from = "Column::EquipmentTypeId",
        to = "super::equipment_type::Column::EquipmentTypeId"
    )]
    EquipmentType,
    #[sea_orm(
        belongs_to = "super::equipment::Entity",
        from = "Column::EquipmentId",
        to = "super::equipment::Column::EquipmentId"
    )]
    Equipment,
}

impl Related<super::oem_catalog_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CatalogItem.def()
    }
}

impl Related<super::equipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether a model year falls inside this fitment's year range.
    pub fn covers_year(&self, year: i32) -> bool {
        self.year_from.map_or(true, |from| year >= from)
            && self.year_to.map_or(true, |to| year <= to)
    }
}
