use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A named price list (retail, wholesale, fleet). Prices live in
/// `product_prices` and are resolved by effective date.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_lists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub price_list_id: i32,
    #[sea_orm(unique)]
    pub list_code: String,
    pub name: String,
    pub currency_code: String,
    pub is_default: bool,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_price::Entity")]
    Prices,
}

impl Related<super::product_price::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Prices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
