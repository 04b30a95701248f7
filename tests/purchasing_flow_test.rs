mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

use forge_api::entities::purchase_order::PurchaseOrderStatus;
use forge_api::entities::{po_item, product, purchase_order, stock};
use forge_api::errors::ServiceError;
use forge_api::services::purchasing::{
    CreatePurchaseOrderInput, CreateSupplierInput, PurchaseOrderLineInput, ReceiveLineInput,
    SupplierSkuInput,
};

use common::TestCtx;

async fn seed_supplier(ctx: &TestCtx) -> i32 {
    let supplier = ctx
        .services
        .purchasing
        .create_supplier(CreateSupplierInput {
            supplier_code: "SUP-1".into(),
            name: "Parts GmbH".into(),
            tax_id: None,
            contact_name: None,
            email: None,
            phone: None,
            address: None,
            city: None,
            country: None,
            payment_terms_days: Some(30),
            lead_time_days: Some(5),
        })
        .await
        .expect("supplier");
    supplier.supplier_id
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
async fn confirmation_books_on_order_and_receipts_clear_it() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-300").await;
    let supplier_id = seed_supplier(&ctx).await;
    ctx.services
        .purchasing
        .upsert_supplier_sku(
            supplier_id,
            SupplierSkuInput {
                internal_sku: "FIL-300".into(),
                supplier_part_number: "P-300".into(),
                unit_cost: Some(dec!(3.50)),
                currency_code: None,
                min_order_qty: None,
                lead_time_days: None,
                is_preferred: true,
            },
        )
        .await
        .expect("mapping");

    let po = ctx
        .services
        .purchasing
        .create_purchase_order(CreatePurchaseOrderInput {
            supplier_id,
            warehouse_code: Some("MAIN".into()),
            expected_date: None,
            notes: None,
            created_by: None,
            lines: vec![PurchaseOrderLineInput {
                internal_sku: "FIL-300".into(),
                qty: 10,
                unit_cost: None, // falls back to the supplier mapping
                tax_percent: None,
            }],
        })
        .await
        .expect("purchase order");
    assert!(po.purchase_order.po_number.starts_with("PO-"));
    assert_eq!(po.items[0].unit_cost, dec!(3.50));

    let po_id = po.purchase_order.po_id;
    ctx.services
        .purchasing
        .advance_status(po_id, PurchaseOrderStatus::Sent, None)
        .await
        .expect("sent");
    ctx.services
        .purchasing
        .advance_status(po_id, PurchaseOrderStatus::Confirmed, None)
        .await
        .expect("confirmed");

    let row = stock_row(&ctx, "MAIN", "FIL-300").await;
    assert_eq!(row.qty_on_order, 10);
    assert_eq!(row.qty_on_hand, 0);

    let detail = ctx
        .services
        .purchasing
        .receive_items(
            po_id,
            vec![ReceiveLineInput {
                po_item_id: po.items[0].po_item_id,
                qty: 6,
            }],
            None,
        )
        .await
        .expect("partial receipt");
    assert_eq!(detail.purchase_order.status, "PARTIALLY_RECEIVED");

    let row = stock_row(&ctx, "MAIN", "FIL-300").await;
    assert_eq!(row.qty_on_hand, 6);
    assert_eq!(row.qty_on_order, 4);

    let detail = ctx
        .services
        .purchasing
        .receive_items(
            po_id,
            vec![ReceiveLineInput {
                po_item_id: po.items[0].po_item_id,
                qty: 4,
            }],
            None,
        )
        .await
        .expect("final receipt");
    assert_eq!(detail.purchase_order.status, "RECEIVED");
    assert!(detail.purchase_order.received_date.is_some());

    let row = stock_row(&ctx, "MAIN", "FIL-300").await;
    assert_eq!(row.qty_on_hand, 10);
    assert_eq!(row.qty_on_order, 0);
    assert!(row.is_consistent());

    let prod = product::Entity::find_by_id("FIL-300".to_string())
        .one(&*ctx.db)
        .await
        .expect("query")
        .expect("product");
    assert_eq!(prod.last_purchase_cost, dec!(3.50));
    assert_eq!(prod.avg_cost, dec!(3.50));
}

#[tokio::test]
async fn receiving_states_cannot_be_set_by_hand() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-301").await;
    let supplier_id = seed_supplier(&ctx).await;

    let po = ctx
        .services
        .purchasing
        .create_purchase_order(CreatePurchaseOrderInput {
            supplier_id,
            warehouse_code: Some("MAIN".into()),
            expected_date: None,
            notes: None,
            created_by: None,
            lines: vec![PurchaseOrderLineInput {
                internal_sku: "FIL-301".into(),
                qty: 5,
                unit_cost: Some(dec!(2.00)),
                tax_percent: None,
            }],
        })
        .await
        .expect("purchase order");

    let err = ctx
        .services
        .purchasing
        .advance_status(po.purchase_order.po_id, PurchaseOrderStatus::Received, None)
        .await
        .expect_err("manual receive");
    assert_matches!(err, ServiceError::InvalidStatusTransition(_));
}

#[tokio::test]
async fn replenishment_sweep_drafts_one_order_per_supplier() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-310").await;
    ctx.seed_product("FIL-311").await;
    // Both land at 2 on hand, below the reorder point of 5.
    ctx.seed_stock("MAIN", "FIL-310", 2, dec!(4.00)).await;
    ctx.seed_stock("MAIN", "FIL-311", 2, dec!(4.00)).await;
    let supplier_id = seed_supplier(&ctx).await;
    ctx.services
        .purchasing
        .upsert_supplier_sku(
            supplier_id,
            SupplierSkuInput {
                internal_sku: "FIL-310".into(),
                supplier_part_number: "P-310".into(),
                unit_cost: Some(dec!(3.50)),
                currency_code: None,
                min_order_qty: None,
                lead_time_days: None,
                is_preferred: true,
            },
        )
        .await
        .expect("mapping");

    let report = ctx
        .services
        .inventory
        .auto_replenishment(Some("MAIN"), None)
        .await
        .expect("sweep");
    assert_eq!(report.skus_below_reorder, 2);
    assert_eq!(report.orders_created, 1);
    assert_eq!(report.unmapped_skus, vec!["FIL-311".to_string()]);
    assert!(report.po_numbers[0].starts_with("PO-"));

    let po = purchase_order::Entity::find()
        .filter(purchase_order::Column::SupplierId.eq(supplier_id))
        .one(&*ctx.db)
        .await
        .expect("query")
        .expect("draft order");
    assert_eq!(po.status, "DRAFT");
    assert_eq!(po.po_number, report.po_numbers[0]);
    assert_eq!(po.warehouse_code.as_deref(), Some("MAIN"));

    // Tops the mapped SKU back up to max stock at the mapping cost.
    let lines = po_item::Entity::find()
        .filter(po_item::Column::PoId.eq(po.po_id))
        .all(&*ctx.db)
        .await
        .expect("lines");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].internal_sku, "FIL-310");
    assert_eq!(lines[0].qty_ordered, 48);
    assert_eq!(lines[0].unit_cost, dec!(3.50));

    // Drafts do not book on-order; confirmation does.
    let row = stock_row(&ctx, "MAIN", "FIL-310").await;
    assert_eq!(row.qty_on_order, 0);
}

#[tokio::test]
async fn cancelling_a_confirmed_order_releases_on_order() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_warehouse("MAIN").await;
    ctx.seed_product("FIL-302").await;
    let supplier_id = seed_supplier(&ctx).await;

    let po = ctx
        .services
        .purchasing
        .create_purchase_order(CreatePurchaseOrderInput {
            supplier_id,
            warehouse_code: Some("MAIN".into()),
            expected_date: None,
            notes: None,
            created_by: None,
            lines: vec![PurchaseOrderLineInput {
                internal_sku: "FIL-302".into(),
                qty: 8,
                unit_cost: Some(dec!(2.00)),
                tax_percent: None,
            }],
        })
        .await
        .expect("purchase order");
    let po_id = po.purchase_order.po_id;

    ctx.services
        .purchasing
        .advance_status(po_id, PurchaseOrderStatus::Sent, None)
        .await
        .expect("sent");
    ctx.services
        .purchasing
        .advance_status(po_id, PurchaseOrderStatus::Confirmed, None)
        .await
        .expect("confirmed");
    assert_eq!(stock_row(&ctx, "MAIN", "FIL-302").await.qty_on_order, 8);

    ctx.services
        .purchasing
        .advance_status(po_id, PurchaseOrderStatus::Cancelled, None)
        .await
        .expect("cancelled");
    assert_eq!(stock_row(&ctx, "MAIN", "FIL-302").await.qty_on_order, 0);
}
