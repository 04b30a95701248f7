use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub warehouse_code: String,
    pub name: String,
    pub warehouse_type: Option<String>,
    pub address: Option<String>,
    pub contact_phone: Option<String>,
    pub manager: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock::Entity")]
    Stock,
    #[sea_orm(has_many = "super::bin::Entity")]
    Bins,
}

impl Related<super::stock::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Stock.def()
    }
}

impl Related<super::bin::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
