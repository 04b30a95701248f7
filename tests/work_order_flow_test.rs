mod common;

use assert_matches::assert_matches;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use forge_api::entities::work_order::WorkOrderStatus;
use forge_api::entities::{stock, wo_item};
use forge_api::errors::ServiceError;
use forge_api::services::invoicing::{CreateInvoiceInput, RecordPaymentInput};
use forge_api::services::work_orders::{
    AddPartLineInput, AddServiceLineInput, CreateWorkOrderInput,
};

use common::TestCtx;

fn wo_input(client_id: i32, equipment_id: i32) -> CreateWorkOrderInput {
    CreateWorkOrderInput {
        client_id,
        equipment_id,
        service_type: "REPAIR".into(),
        customer_complaints: Some("Engine noise".into()),
        appointment_date: None,
        estimated_hours: Some(dec!(2.0)),
        labor_rate: Some(dec!(50.00)),
        priority: None,
        advisor_id: None,
        technician_id: None,
        mileage_in: Some(42_500),
        created_by: None,
    }
}

#[tokio::test]
async fn walk_in_job_runs_from_draft_to_invoiced() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-100").await;
    ctx.seed_stock("MAIN", "FIL-100", 10, dec!(4.00)).await;
    let client = ctx.seed_client("C100").await;
    let unit = ctx.seed_equipment(client.client_id, "EQ100").await;

    let wo = ctx
        .services
        .work_orders
        .create_work_order(wo_input(client.client_id, unit.equipment_id))
        .await
        .expect("work order");
    assert_eq!(wo.status, "DRAFT");
    assert!(wo.wo_number.starts_with("WO-"));

    ctx.services
        .work_orders
        .add_part_line(
            wo.wo_id,
            AddPartLineInput {
                internal_sku: "FIL-100".into(),
                qty: 2,
                unit_price: Some(dec!(20.00)),
                price_list_code: None,
                discount_percent: None,
                tax_percent: None,
                notes: None,
            },
        )
        .await
        .expect("part line");
    let labor = ctx
        .services
        .work_orders
        .add_service_line(
            wo.wo_id,
            AddServiceLineInput {
                service_code: None,
                description: Some("Replace filter".into()),
                estimated_hours: Some(dec!(1.0)),
                hourly_rate: None,
                technician_id: None,
            },
        )
        .await
        .expect("service line");
    // Inherits the work order labor rate.
    assert_eq!(labor.hourly_rate, dec!(50.00));

    // Walk-ins skip SCHEDULED.
    let wo = ctx
        .services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::InProgress, None)
        .await
        .expect("in progress");
    assert!(wo.actual_start_date.is_some());

    ctx.services
        .inventory
        .reserve_for_work_order(wo.wo_id)
        .await
        .expect("reserve");
    ctx.services
        .inventory
        .consume_for_work_order(wo.wo_id)
        .await
        .expect("consume");
    ctx.services
        .work_orders
        .complete_service_line(wo.wo_id, labor.service_id, dec!(1.5), None)
        .await
        .expect("complete labor");

    let wo = ctx
        .services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::Completed, None)
        .await
        .expect("completed");
    // 1.5 h * 50 + 2 * 20
    assert_eq!(wo.labor_cost, dec!(75.00));
    assert_eq!(wo.parts_cost, dec!(40.00));

    let invoice = ctx
        .services
        .invoicing
        .create_from_work_order(
            wo.wo_id,
            CreateInvoiceInput {
                due_date: None,
                tax_percent: Some(Decimal::ZERO),
                notes: None,
            },
            None,
        )
        .await
        .expect("invoice");
    assert!(invoice.invoice.invoice_number.starts_with("INV-"));
    assert_eq!(invoice.items.len(), 2);

    let wo = ctx
        .services
        .work_orders
        .get_work_order(wo.wo_id)
        .await
        .expect("reload");
    assert_eq!(wo.status, "INVOICED");
}

#[tokio::test]
async fn completing_a_job_consumes_whatever_is_still_reserved() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-103").await;
    ctx.seed_stock("MAIN", "FIL-103", 10, dec!(4.00)).await;
    let client = ctx.seed_client("C103").await;
    let unit = ctx.seed_equipment(client.client_id, "EQ103").await;

    let wo = ctx
        .services
        .work_orders
        .create_work_order(wo_input(client.client_id, unit.equipment_id))
        .await
        .expect("work order");
    ctx.services
        .work_orders
        .add_part_line(
            wo.wo_id,
            AddPartLineInput {
                internal_sku: "FIL-103".into(),
                qty: 3,
                unit_price: Some(dec!(20.00)),
                price_list_code: None,
                discount_percent: None,
                tax_percent: None,
                notes: None,
            },
        )
        .await
        .expect("part line");
    ctx.services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::InProgress, None)
        .await
        .expect("in progress");
    ctx.services
        .inventory
        .reserve_for_work_order(wo.wo_id)
        .await
        .expect("reserve");

    // Nobody called consume; completion settles the reservation itself.
    let wo = ctx
        .services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::Completed, None)
        .await
        .expect("completed");
    assert!(wo.actual_completion_date.is_some());
    assert!(wo.closed_at.is_some());
    assert_eq!(wo.parts_cost, dec!(60.00));

    let items = wo_item::Entity::find()
        .filter(wo_item::Column::WoId.eq(wo.wo_id))
        .all(&*ctx.db)
        .await
        .expect("items");
    assert!(items.iter().all(|item| item.status == "USED"));

    let row = stock::Entity::find()
        .filter(stock::Column::WarehouseCode.eq("MAIN"))
        .filter(stock::Column::InternalSku.eq("FIL-103"))
        .one(&*ctx.db)
        .await
        .expect("query")
        .expect("stock row");
    assert_eq!(row.qty_on_hand, 7);
    assert_eq!(row.qty_reserved, 0);
    assert!(row.is_consistent());
}

#[tokio::test]
async fn skipping_straight_to_completed_is_a_conflict() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    let client = ctx.seed_client("C104").await;
    let unit = ctx.seed_equipment(client.client_id, "EQ104").await;

    let wo = ctx
        .services
        .work_orders
        .create_work_order(wo_input(client.client_id, unit.equipment_id))
        .await
        .expect("work order");

    let err = ctx
        .services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::Completed, None)
        .await
        .expect_err("draft cannot complete");
    assert_matches!(err, ServiceError::InvalidStatusTransition(_));
}

#[tokio::test]
async fn one_invoice_per_work_order() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-101").await;
    ctx.seed_stock("MAIN", "FIL-101", 5, dec!(4.00)).await;
    let client = ctx.seed_client("C101").await;
    let unit = ctx.seed_equipment(client.client_id, "EQ101").await;

    let wo = ctx
        .services
        .work_orders
        .create_work_order(wo_input(client.client_id, unit.equipment_id))
        .await
        .expect("work order");

    // Draft work orders cannot be invoiced.
    let err = ctx
        .services
        .invoicing
        .create_from_work_order(wo.wo_id, CreateInvoiceInput::default(), None)
        .await
        .expect_err("not completed");
    assert_matches!(err, ServiceError::InvalidOperation(_));

    ctx.services
        .work_orders
        .add_part_line(
            wo.wo_id,
            AddPartLineInput {
                internal_sku: "FIL-101".into(),
                qty: 1,
                unit_price: Some(dec!(10.00)),
                price_list_code: None,
                discount_percent: None,
                tax_percent: None,
                notes: None,
            },
        )
        .await
        .expect("part line");
    ctx.services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::InProgress, None)
        .await
        .expect("in progress");
    ctx.services
        .inventory
        .reserve_for_work_order(wo.wo_id)
        .await
        .expect("reserve");
    ctx.services
        .inventory
        .consume_for_work_order(wo.wo_id)
        .await
        .expect("consume");
    ctx.services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::Completed, None)
        .await
        .expect("completed");

    ctx.services
        .invoicing
        .create_from_work_order(wo.wo_id, CreateInvoiceInput::default(), None)
        .await
        .expect("first invoice");
    let err = ctx
        .services
        .invoicing
        .create_from_work_order(wo.wo_id, CreateInvoiceInput::default(), None)
        .await
        .expect_err("second invoice");
    assert_matches!(err, ServiceError::Conflict(_) | ServiceError::InvalidOperation(_));
}

#[tokio::test]
async fn payments_settle_an_invoice_exactly() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-102").await;
    ctx.seed_stock("MAIN", "FIL-102", 5, dec!(4.00)).await;
    let client = ctx.seed_client("C102").await;
    let unit = ctx.seed_equipment(client.client_id, "EQ102").await;

    let wo = ctx
        .services
        .work_orders
        .create_work_order(wo_input(client.client_id, unit.equipment_id))
        .await
        .expect("work order");
    ctx.services
        .work_orders
        .add_part_line(
            wo.wo_id,
            AddPartLineInput {
                internal_sku: "FIL-102".into(),
                qty: 2,
                unit_price: Some(dec!(25.00)),
                price_list_code: None,
                discount_percent: None,
                tax_percent: Some(Decimal::ZERO),
                notes: None,
            },
        )
        .await
        .expect("part line");
    ctx.services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::InProgress, None)
        .await
        .expect("in progress");
    ctx.services
        .inventory
        .reserve_for_work_order(wo.wo_id)
        .await
        .expect("reserve");
    ctx.services
        .inventory
        .consume_for_work_order(wo.wo_id)
        .await
        .expect("consume");
    ctx.services
        .work_orders
        .advance_status(wo.wo_id, WorkOrderStatus::Completed, None)
        .await
        .expect("completed");

    let invoice = ctx
        .services
        .invoicing
        .create_from_work_order(wo.wo_id, CreateInvoiceInput::default(), None)
        .await
        .expect("invoice");
    let total = invoice.invoice.total_amount;
    assert_eq!(invoice.balance_due, total);

    let sent = ctx
        .services
        .invoicing
        .send_invoice(invoice.invoice.invoice_id, None)
        .await
        .expect("send");
    assert_eq!(sent.status, "SENT");

    // Overpayment is rejected.
    let err = ctx
        .services
        .invoicing
        .record_payment(
            invoice.invoice.invoice_id,
            RecordPaymentInput {
                amount: total + dec!(0.01),
                payment_method: "CASH".into(),
                payment_date: None,
                reference_number: None,
                notes: None,
            },
            None,
        )
        .await
        .expect_err("overpayment");
    assert_matches!(err, ServiceError::InvalidInput(_) | ServiceError::InvalidOperation(_));

    ctx.services
        .invoicing
        .record_payment(
            invoice.invoice.invoice_id,
            RecordPaymentInput {
                amount: total,
                payment_method: "CASH".into(),
                payment_date: None,
                reference_number: Some("RCPT-1".into()),
                notes: None,
            },
            None,
        )
        .await
        .expect("payment");

    let detail = ctx
        .services
        .invoicing
        .get_invoice(invoice.invoice.invoice_id)
        .await
        .expect("reload");
    assert_eq!(detail.invoice.status, "PAID");
    assert_eq!(detail.balance_due, Decimal::ZERO);
    assert!(detail.invoice.paid_date.is_some());
}
