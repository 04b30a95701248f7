use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter as StrumEnumIter, EnumString};

/// Service work order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "work_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub wo_id: i32,
    #[sea_orm(unique)]
    pub wo_number: String,
    pub equipment_id: i32,
    pub client_id: i32,
    // Milestones
    pub appointment_date: Option<DateTimeUtc>,
    pub reception_date: Option<DateTimeUtc>,
    pub estimated_start_date: Option<DateTimeUtc>,
    pub actual_start_date: Option<DateTimeUtc>,
    pub estimated_completion_date: Option<DateTimeUtc>,
    pub actual_completion_date: Option<DateTimeUtc>,
    pub delivery_date: Option<DateTimeUtc>,
    // Service description
    pub service_type: String,
    pub customer_complaints: Option<String>,
    pub initial_findings: Option<String>,
    pub technician_notes: Option<String>,
    pub final_report: Option<String>,
    // Hours
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub estimated_hours: Decimal,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub actual_hours: Decimal,
    // Money
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub labor_rate: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub labor_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub parts_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub total_cost: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub discount_amount: Decimal,
    // State
    pub status: String,
    pub priority: String,
    // People
    pub advisor_id: Option<i32>,
    pub technician_id: Option<i32>,
    // Odometer
    pub mileage_in: Option<i32>,
    pub mileage_out: Option<i32>,
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
    pub closed_at: Option<DateTimeUtc>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::ClientId"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::equipment::Entity",
        from = "Column::EquipmentId",
        to = "super::equipment::Column::EquipmentId"
    )]
    Equipment,
    #[sea_orm(has_many = "super::wo_item::Entity")]
    Items,
    #[sea_orm(has_many = "super::wo_service::Entity")]
    Services,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::equipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Equipment.def()
    }
}

impl Related<super::wo_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::wo_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Services.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Work order lifecycle states.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString, StrumEnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkOrderStatus {
    Draft,
    Scheduled,
    InProgress,
    WaitingParts,
    WaitingApproval,
    Completed,
    Invoiced,
    Cancelled,
}

impl WorkOrderStatus {
    /// Forward edges of the lifecycle. Cancellation is handled separately
    /// because it is reachable from every non-terminal state.
    pub fn can_transition_to(self, next: WorkOrderStatus) -> bool {
        use WorkOrderStatus::*;
        if self == next {
            return false;
        }
        match (self, next) {
            (_, Cancelled) => !self.is_terminal(),
            (Draft, Scheduled) => true,
            (Draft, InProgress) => true, // walk-in jobs skip scheduling
            (Scheduled, InProgress) => true,
            (InProgress, WaitingParts) | (InProgress, WaitingApproval) => true,
            (WaitingParts, InProgress) | (WaitingApproval, InProgress) => true,
            (InProgress, Completed) => true,
            (Completed, Invoiced) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkOrderStatus::Invoiced | WorkOrderStatus::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::WorkOrderStatus::*;

    #[test]
    fn happy_path_transitions_allowed() {
        assert!(Draft.can_transition_to(Scheduled));
        assert!(Scheduled.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
        assert!(Completed.can_transition_to(Invoiced));
    }

    #[test]
    fn terminal_states_reject_everything() {
        for next in [Draft, Scheduled, InProgress, Completed, Invoiced, Cancelled] {
            assert!(!Invoiced.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn cancellation_reachable_from_non_terminal() {
        for from in [Draft, Scheduled, InProgress, WaitingParts, WaitingApproval, Completed] {
            assert!(from.can_transition_to(Cancelled), "{from} -> CANCELLED");
        }
    }

    #[test]
    fn no_skipping_to_invoiced() {
        assert!(!Draft.can_transition_to(Invoiced));
        assert!(!InProgress.can_transition_to(Invoiced));
    }
}
