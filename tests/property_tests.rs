use proptest::prelude::*;
use rstest::rstest;
use test_case::test_case;

use forge_api::entities::purchase_order::PurchaseOrderStatus;
use forge_api::entities::work_order::WorkOrderStatus;
use forge_api::services::inventory::age_category;

fn wo_status() -> impl Strategy<Value = WorkOrderStatus> {
    use WorkOrderStatus::*;
    prop_oneof![
        Just(Draft),
        Just(Scheduled),
        Just(InProgress),
        Just(WaitingParts),
        Just(WaitingApproval),
        Just(Completed),
        Just(Invoiced),
        Just(Cancelled),
    ]
}

proptest! {
    #[test]
    fn no_status_transitions_to_itself(status in wo_status()) {
        prop_assert!(!status.can_transition_to(status));
    }

    #[test]
    fn terminal_statuses_never_move(from in wo_status(), to in wo_status()) {
        if from.is_terminal() {
            prop_assert!(!from.can_transition_to(to));
        }
    }

    #[test]
    fn cancellation_is_reachable_from_every_open_status(from in wo_status()) {
        if !from.is_terminal() {
            prop_assert!(from.can_transition_to(WorkOrderStatus::Cancelled));
        }
    }

    #[test]
    fn status_strings_round_trip(status in wo_status()) {
        let parsed: WorkOrderStatus = status.as_ref().parse().unwrap();
        prop_assert_eq!(parsed, status);
    }

    #[test]
    fn every_age_lands_in_exactly_one_category(age in 0i64..10_000, months in 1u32..60) {
        let horizon = i64::from(months) * 30;
        let category = age_category(Some(age), horizon);
        prop_assert!(["CURRENT", "AGING", "STALE", "OBSOLETE"].contains(&category));
        // Categories are ordered: a larger age never maps to an earlier one.
        let rank = |c: &str| match c {
            "CURRENT" => 0,
            "AGING" => 1,
            "STALE" => 2,
            _ => 3,
        };
        prop_assert!(rank(age_category(Some(age + 1), horizon)) >= rank(category));
    }
}

#[test]
fn unknown_age_is_obsolete() {
    assert_eq!(age_category(None, 360), "OBSOLETE");
}

#[test_case(0, "CURRENT")]
#[test_case(90, "CURRENT")]
#[test_case(91, "AGING")]
#[test_case(180, "AGING")]
#[test_case(181, "STALE")]
#[test_case(360, "STALE")]
#[test_case(361, "OBSOLETE")]
#[test_case(4000, "OBSOLETE")]
fn age_category_boundaries_on_a_year_horizon(age: i64, expected: &str) {
    assert_eq!(age_category(Some(age), 360), expected);
}

#[rstest]
#[case(WorkOrderStatus::Draft, WorkOrderStatus::Scheduled, true)]
#[case(WorkOrderStatus::Draft, WorkOrderStatus::InProgress, true)]
#[case(WorkOrderStatus::Draft, WorkOrderStatus::Completed, false)]
#[case(WorkOrderStatus::Scheduled, WorkOrderStatus::InProgress, true)]
#[case(WorkOrderStatus::InProgress, WorkOrderStatus::WaitingParts, true)]
#[case(WorkOrderStatus::WaitingParts, WorkOrderStatus::InProgress, true)]
#[case(WorkOrderStatus::WaitingParts, WorkOrderStatus::Completed, false)]
#[case(WorkOrderStatus::InProgress, WorkOrderStatus::Completed, true)]
#[case(WorkOrderStatus::Completed, WorkOrderStatus::Invoiced, true)]
#[case(WorkOrderStatus::Invoiced, WorkOrderStatus::Draft, false)]
fn transition_table_spot_checks(
    #[case] from: WorkOrderStatus,
    #[case] to: WorkOrderStatus,
    #[case] allowed: bool,
) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[test]
fn purchase_order_statuses_round_trip() {
    use PurchaseOrderStatus::*;
    for status in [Draft, Sent, Confirmed, PartiallyReceived, Received, Cancelled] {
        let parsed: PurchaseOrderStatus = status.as_ref().parse().unwrap();
        assert_eq!(parsed, status);
    }
}
