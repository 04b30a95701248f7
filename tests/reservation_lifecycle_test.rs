mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use forge_api::entities::{stock, wo_item};
use forge_api::errors::ServiceError;
use forge_api::services::work_orders::{AddPartLineInput, CreateWorkOrderInput};

use common::TestCtx;

async fn work_order_with_part(ctx: &TestCtx, sku: &str, qty: i32) -> i32 {
    let client = ctx.seed_client("C001").await;
    let unit = ctx.seed_equipment(client.client_id, "EQ1").await;
    let wo = ctx
        .services
        .work_orders
        .create_work_order(CreateWorkOrderInput {
            client_id: client.client_id,
            equipment_id: unit.equipment_id,
            service_type: "MAINTENANCE".into(),
            customer_complaints: None,
            appointment_date: None,
            estimated_hours: None,
            labor_rate: None,
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
        .add_part_line(
            wo.wo_id,
            AddPartLineInput {
                internal_sku: sku.into(),
                qty,
                unit_price: Some(dec!(15.00)),
                price_list_code: None,
                discount_percent: None,
                tax_percent: None,
                notes: None,
            },
        )
        .await
        .expect("part line");
    wo.wo_id
}

async fn stock_row(ctx: &TestCtx, warehouse: &str, sku: &str) -> stock::Model {
    stock::Entity::find()
        .filter(stock::Column::WarehouseCode.eq(warehouse))
        .filter(stock::Column::InternalSku.eq(sku))
        .one(&*ctx.db)
        .await
        .expect("query")
        .expect("stock row")
}

#[tokio::test]
async fn reserve_then_consume_moves_stock_through_the_lifecycle() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-001").await;
    ctx.seed_stock("MAIN", "FIL-001", 10, dec!(4.00)).await;
    let wo_id = work_order_with_part(&ctx, "FIL-001", 4).await;

    let reserved = ctx
        .services
        .inventory
        .reserve_for_work_order(wo_id)
        .await
        .expect("reserve");
    assert_eq!(reserved.len(), 1);
    assert_eq!(reserved[0].quantity, 4);

    let row = stock_row(&ctx, "MAIN", "FIL-001").await;
    assert_eq!(row.qty_on_hand, 10);
    assert_eq!(row.qty_reserved, 4);
    assert_eq!(row.qty_available, 6);
    assert!(row.is_consistent());

    let consumed = ctx
        .services
        .inventory
        .consume_for_work_order(wo_id)
        .await
        .expect("consume");
    assert_eq!(consumed, 1);

    let row = stock_row(&ctx, "MAIN", "FIL-001").await;
    assert_eq!(row.qty_on_hand, 6);
    assert_eq!(row.qty_reserved, 0);
    assert_eq!(row.qty_available, 6);
    assert!(row.is_consistent());

    let item = wo_item::Entity::find()
        .filter(wo_item::Column::WoId.eq(wo_id))
        .one(&*ctx.db)
        .await
        .expect("query")
        .expect("item");
    assert_eq!(item.status, "USED");
    assert_eq!(item.qty_used, 4);
}

#[tokio::test]
async fn release_puts_reserved_quantities_back() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-002").await;
    ctx.seed_stock("MAIN", "FIL-002", 8, dec!(4.00)).await;
    let wo_id = work_order_with_part(&ctx, "FIL-002", 3).await;

    ctx.services
        .inventory
        .reserve_for_work_order(wo_id)
        .await
        .expect("reserve");
    let released = ctx
        .services
        .inventory
        .release_for_work_order(wo_id)
        .await
        .expect("release");
    assert_eq!(released, 1);

    let row = stock_row(&ctx, "MAIN", "FIL-002").await;
    assert_eq!(row.qty_reserved, 0);
    assert_eq!(row.qty_available, 8);

    let item = wo_item::Entity::find()
        .filter(wo_item::Column::WoId.eq(wo_id))
        .one(&*ctx.db)
        .await
        .expect("query")
        .expect("item");
    assert_eq!(item.status, "PENDING");
}

#[tokio::test]
async fn insufficient_stock_rolls_back_every_line() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-003").await;
    ctx.seed_product("FIL-004").await;
    ctx.seed_stock("MAIN", "FIL-003", 10, dec!(4.00)).await;
    ctx.seed_stock("MAIN", "FIL-004", 1, dec!(4.00)).await;
    let wo_id = work_order_with_part(&ctx, "FIL-003", 2).await;
    ctx.services
        .work_orders
        .add_part_line(
            wo_id,
            AddPartLineInput {
                internal_sku: "FIL-004".into(),
                qty: 5,
                unit_price: Some(dec!(9.00)),
                price_list_code: None,
                discount_percent: None,
                tax_percent: None,
                notes: None,
            },
        )
        .await
        .expect("second line");

    let err = ctx
        .services
        .inventory
        .reserve_for_work_order(wo_id)
        .await
        .expect_err("should fail");
    assert_matches!(err, ServiceError::InsufficientStock(_));

    // Neither line may hold a reservation after the rollback.
    let row = stock_row(&ctx, "MAIN", "FIL-003").await;
    assert_eq!(row.qty_reserved, 0);
    assert_eq!(row.qty_available, 10);
    let items = wo_item::Entity::find()
        .filter(wo_item::Column::WoId.eq(wo_id))
        .all(&*ctx.db)
        .await
        .expect("query");
    assert!(items.iter().all(|i| i.status == "PENDING"));
}

#[tokio::test]
async fn returning_used_parts_restores_on_hand() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-005").await;
    ctx.seed_stock("MAIN", "FIL-005", 10, dec!(4.00)).await;
    let wo_id = work_order_with_part(&ctx, "FIL-005", 4).await;

    ctx.services
        .inventory
        .reserve_for_work_order(wo_id)
        .await
        .expect("reserve");
    ctx.services
        .inventory
        .consume_for_work_order(wo_id)
        .await
        .expect("consume");

    let item = wo_item::Entity::find()
        .filter(wo_item::Column::WoId.eq(wo_id))
        .one(&*ctx.db)
        .await
        .expect("query")
        .expect("item");

    ctx.services
        .inventory
        .return_for_work_order(wo_id, item.item_id, 2)
        .await
        .expect("return");

    let row = stock_row(&ctx, "MAIN", "FIL-005").await;
    assert_eq!(row.qty_on_hand, 8);
    assert_eq!(row.qty_available, 8);

    // Returning more than was used is rejected.
    let err = ctx
        .services
        .inventory
        .return_for_work_order(wo_id, item.item_id, 3)
        .await
        .expect_err("over-return");
    assert_matches!(err, ServiceError::InvalidInput(_) | ServiceError::InvalidOperation(_));
}
