use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Leaf of the taxonomy tree; products reference `group_code`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "taxonomy_groups")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub group_code: String,
    pub subsystem_code: String,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::taxonomy_subsystem::Entity",
        from = "Column::SubsystemCode",
        to = "super::taxonomy_subsystem::Column::SubsystemCode"
    )]
    Subsystem,
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
}

impl Related<super::taxonomy_subsystem::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subsystem.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
