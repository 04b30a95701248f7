use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "taxonomy_subsystems")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub subsystem_code: String,
    pub system_code: String,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::taxonomy_system::Entity",
        from = "Column::SystemCode",
        to = "super::taxonomy_system::Column::SystemCode"
    )]
    System,
    #[sea_orm(has_many = "super::taxonomy_group::Entity")]
    Groups,
}

impl Related<super::taxonomy_system::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::System.def()
    }
}

impl Related<super::taxonomy_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
