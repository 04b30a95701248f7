//! Change-trail coverage: mutating operations append audit rows with
//! the acting user and before/after snapshots.

mod common;

use rust_decimal_macros::dec;
use serde_json::json;

use forge_api::entities::work_order::WorkOrderStatus;
use forge_api::services::clients::CreateClientInput;
use forge_api::services::work_orders::CreateWorkOrderInput;

use common::TestCtx;

#[tokio::test]
async fn client_mutations_carry_the_acting_user() {
    let ctx = TestCtx::new().await;

    let client = ctx
        .services
        .clients
        .create_client(
            CreateClientInput {
                client_code: "C200".into(),
                client_type: "INDIVIDUAL".into(),
                name: "Trail Client".into(),
                contact_name: None,
                tax_id: None,
                email: None,
                phone: None,
                mobile: None,
                address: None,
                city: None,
                state: None,
                postal_code: None,
                credit_limit: None,
                payment_terms_days: None,
                discount_percent: None,
                notes: None,
            },
            Some(7),
        )
        .await
        .expect("client");
    ctx.services
        .clients
        .delete_client(client.client_id, Some(7))
        .await
        .expect("delete");

    let trail = ctx
        .services
        .audit
        .history("clients", &client.client_id.to_string())
        .await
        .expect("history");
    assert_eq!(trail.len(), 2);
    assert!(trail.iter().all(|row| row.user_id == Some(7)));

    let create = trail
        .iter()
        .find(|row| row.action == "CREATE")
        .expect("create row");
    assert!(create.new_values.is_some());
    assert!(create.old_values.is_none());

    let delete = trail
        .iter()
        .find(|row| row.action == "DELETE")
        .expect("delete row");
    assert!(delete.old_values.is_some());
    assert!(delete.new_values.is_none());
}

#[tokio::test]
async fn status_changes_snapshot_old_and_new() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    let client = ctx.seed_client("C201").await;
    let unit = ctx.seed_equipment(client.client_id, "EQ201").await;

    let wo = ctx
        .services
        .work_orders
        .create_work_order(CreateWorkOrderInput {
            client_id: client.client_id,
            equipment_id: unit.equipment_id,
            service_type: "REPAIR".into(),
            customer_complaints: None,
            appointment_date: None,
            estimated_hours: Some(dec!(1.0)),
            labor_rate: Some(dec!(50.00)),
            priority: None,
            advisor_id: None,
            technician_id: None,
            mileage_in: None,
            created_by: None,
        })
        .await
        .expect("work order");
    ctx.services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::InProgress, Some(9))
        .await
        .expect("in progress");

    let trail = ctx
        .services
        .audit
        .history("work_orders", &wo.wo_id.to_string())
        .await
        .expect("history");
    let change = trail
        .iter()
        .find(|row| row.action == "STATUS_CHANGE")
        .expect("status change row");
    assert_eq!(change.user_id, Some(9));
    assert_eq!(change.old_values, Some(json!({ "status": "DRAFT" })));
    assert_eq!(change.new_values, Some(json!({ "status": "IN_PROGRESS" })));
    assert!(trail.iter().any(|row| row.action == "CREATE"));
}

#[tokio::test]
async fn stock_receipts_land_in_the_trail() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-200").await;

    ctx.services
        .inventory
        .receive_stock("MAIN", "FIL-200", 5, dec!(4.00), None, None, None, Some(7))
        .await
        .expect("receipt");

    let trail = ctx
        .services
        .audit
        .history("stock", "MAIN:FIL-200")
        .await
        .expect("history");
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, "RECEIPT");
    assert_eq!(trail[0].user_id, Some(7));
}
