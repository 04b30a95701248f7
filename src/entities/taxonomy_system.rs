use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Top level of the part-classification hierarchy (system → subsystem → group).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "taxonomy_systems")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub system_code: String,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::taxonomy_subsystem::Entity")]
    Subsystems,
}

impl Related<super::taxonomy_subsystem::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subsystems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
