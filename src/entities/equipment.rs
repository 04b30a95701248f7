use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client vehicles and serviced equipment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "equipment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub equipment_id: i32,
    #[sea_orm(unique)]
    pub equipment_code: String,
    pub equipment_type_id: Option<i32>,
    pub brand: String,
    pub model: String,
    pub year: Option<i16>,
    pub serial_number: Option<String>,
    pub vin: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub engine_desc: Option<String>,
    pub client_id: Option<i32>,
    pub purchase_date: Option<Date>,
    pub warranty_until: Option<Date>,
    pub last_service_date: Option<Date>,
    pub next_service_date: Option<Date>,
    pub current_mileage_hours: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_service_cost: Decimal,
    /// ACTIVE, INACTIVE, SOLD or SCRAPPED
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::ClientId"
    )]
    Client,
    #[sea_orm(has_many = "super::work_order::Entity")]
    WorkOrders,
    #[sea_orm(has_many = "super::fitment::Entity")]
    Fitments,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::work_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Equipment status values accepted by the API.
pub const STATUSES: &[&str] = &["ACTIVE", "INACTIVE", "SOLD", "SCRAPPED"];
