mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

use forge_api::errors::ServiceError;
use forge_api::services::pricing::{CreatePriceListInput, SetPriceInput};

use common::TestCtx;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed_retail_list(ctx: &TestCtx) {
    ctx.services
        .pricing
        .create_price_list(CreatePriceListInput {
            list_code: "RETAIL".into(),
            name: "Retail".into(),
            currency_code: None,
            is_default: true,
        })
        .await
        .expect("price list");
}

#[tokio::test]
async fn newer_price_closes_the_previous_open_row() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_product("FIL-200").await;
    seed_retail_list(&ctx).await;

    ctx.services
        .pricing
        .set_price(
            "RETAIL",
            SetPriceInput {
                internal_sku: "FIL-200".into(),
                unit_price: dec!(10.00),
                min_qty: 0,
                valid_from: date(2026, 1, 1),
                valid_until: None,
            },
        )
        .await
        .expect("first price");
    ctx.services
        .pricing
        .set_price(
            "RETAIL",
            SetPriceInput {
                internal_sku: "FIL-200".into(),
                unit_price: dec!(12.00),
                min_qty: 0,
                valid_from: date(2026, 6, 1),
                valid_until: None,
            },
        )
        .await
        .expect("second price");

    let before = ctx
        .services
        .pricing
        .resolve_price("FIL-200", None, Some(date(2026, 3, 1)), 1)
        .await
        .expect("resolve before");
    assert_eq!(before.unit_price, dec!(10.00));

    let after = ctx
        .services
        .pricing
        .resolve_price("FIL-200", None, Some(date(2026, 7, 1)), 1)
        .await
        .expect("resolve after");
    assert_eq!(after.unit_price, dec!(12.00));
}

#[tokio::test]
async fn backdated_price_is_rejected() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_product("FIL-201").await;
    seed_retail_list(&ctx).await;

    ctx.services
        .pricing
        .set_price(
            "RETAIL",
            SetPriceInput {
                internal_sku: "FIL-201".into(),
                unit_price: dec!(10.00),
                min_qty: 0,
                valid_from: date(2026, 6, 1),
                valid_until: None,
            },
        )
        .await
        .expect("first price");

    let err = ctx
        .services
        .pricing
        .set_price(
            "RETAIL",
            SetPriceInput {
                internal_sku: "FIL-201".into(),
                unit_price: dec!(9.00),
                min_qty: 0,
                valid_from: date(2026, 6, 1),
                valid_until: None,
            },
        )
        .await
        .expect_err("same start date");
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn quantity_tiers_pick_the_best_applicable_price() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_product("FIL-202").await;
    seed_retail_list(&ctx).await;

    ctx.services
        .pricing
        .set_price(
            "RETAIL",
            SetPriceInput {
                internal_sku: "FIL-202".into(),
                unit_price: dec!(12.00),
                min_qty: 0,
                valid_from: date(2026, 1, 1),
                valid_until: None,
            },
        )
        .await
        .expect("base tier");
    ctx.services
        .pricing
        .set_price(
            "RETAIL",
            SetPriceInput {
                internal_sku: "FIL-202".into(),
                unit_price: dec!(9.00),
                min_qty: 10,
                valid_from: date(2026, 1, 1),
                valid_until: None,
            },
        )
        .await
        .expect("volume tier");

    let small = ctx
        .services
        .pricing
        .resolve_price("FIL-202", None, Some(date(2026, 2, 1)), 5)
        .await
        .expect("small order");
    assert_eq!(small.unit_price, dec!(12.00));

    let bulk = ctx
        .services
        .pricing
        .resolve_price("FIL-202", None, Some(date(2026, 2, 1)), 25)
        .await
        .expect("bulk order");
    assert_eq!(bulk.unit_price, dec!(9.00));
}

#[tokio::test]
async fn missing_price_is_a_not_found() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_product("FIL-203").await;
    seed_retail_list(&ctx).await;

    let err = ctx
        .services
        .pricing
        .resolve_price("FIL-203", None, Some(date(2026, 2, 1)), 1)
        .await
        .expect_err("no price rows");
    assert_matches!(err, ServiceError::NotFound(_));
}
