use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub po_id: i32,
    #[sea_orm(unique)]
    pub po_number: String,
    pub supplier_id: i32,
    pub warehouse_code: Option<String>,
    pub status: String,
    pub order_date: Date,
    pub expected_date: Option<Date>,
    pub received_date: Option<Date>,
    pub currency_code: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_amount: Decimal,
    pub notes: Option<String>,
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::SupplierId"
    )]
    Supplier,
    #[sea_orm(has_many = "super::po_item::Entity")]
    Items,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::po_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    Draft,
    Sent,
    Confirmed,
    PartiallyReceived,
    Received,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            PurchaseOrderStatus::Received | PurchaseOrderStatus::Cancelled
        )
    }

    pub fn can_transition_to(self, next: PurchaseOrderStatus) -> bool {
        use PurchaseOrderStatus::*;
        if self == next {
            return false;
        }
        match (self, next) {
            (_, Cancelled) => !self.is_terminal(),
            (Draft, Sent) => true,
            (Sent, Confirmed) => true,
            (Confirmed, PartiallyReceived) | (Confirmed, Received) => true,
            (PartiallyReceived, Received) => true,
            _ => false,
        }
    }
}
