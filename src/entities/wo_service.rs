use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Labor line on a work order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "wo_services")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub service_id: i32,
    pub wo_id: i32,
    pub flat_rate_id: Option<i32>,
    pub service_code: Option<String>,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub flat_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub estimated_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub actual_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub hourly_rate: Decimal,
    pub completion_status: String,
    pub technician_id: Option<i32>,
    pub started_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_order::Entity",
        from = "Column::WoId",
        to = "super::work_order::Column::WoId"
    )]
    WorkOrder,
    #[sea_orm(
        belongs_to = "super::flat_rate_standard::Entity",
        from = "Column::FlatRateId",
        to = "super::flat_rate_standard::Column::StandardId"
    )]
    FlatRate,
}

impl Related<super::work_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkOrder.def()
    }
}

impl Related<super::flat_rate_standard::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FlatRate.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}
