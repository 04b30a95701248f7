use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only change trail. One row per mutation, with before/after
/// snapshots as JSON. Never updated or deleted by application code.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub audit_id: i64,
    pub table_name: String,
    pub record_id: String,
    pub action: String,
    #[sea_orm(column_type = "Json", nullable)]
    pub old_values: Option<Json>,
    #[sea_orm(column_type = "Json", nullable)]
    pub new_values: Option<Json>,
    pub user_id: Option<i32>,
    pub username: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
