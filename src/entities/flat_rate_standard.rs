use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Flat-rate labor time standards, effective-dated like product prices.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "flat_rate_standards")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub standard_id: i32,
    /// Effective-dated; several rows may share a code over time.
    pub service_code: String,
    pub description: String,
    pub equipment_type_id: Option<i32>,
    pub group_code: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub standard_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub min_hours: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub max_hours: Option<Decimal>,
    pub difficulty_level: Option<i32>,
    pub valid_from: Date,
    pub valid_until: Option<Date>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wo_service::Entity")]
    WoServices,
}

impl Related<super::wo_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WoServices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
