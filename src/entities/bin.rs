use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Storage location inside a warehouse; (warehouse_code, bin_code) is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub bin_id: i32,
    pub warehouse_code: String,
    pub bin_code: String,
    pub description: Option<String>,
    pub zone: Option<String>,
    pub aisle: Option<String>,
    pub rack: Option<String>,
    pub level: Option<String>,
    pub capacity: Option<i32>,
    pub current_occupancy: i32,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::warehouse::Entity",
        from = "Column::WarehouseCode",
        to = "super::warehouse::Column::WarehouseCode"
    )]
    Warehouse,
}

impl Related<super::warehouse::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Warehouse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
