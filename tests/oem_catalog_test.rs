mod common;

use assert_matches::assert_matches;
use sea_orm::EntityTrait;

use forge_api::entities::oem_catalog_item;
use forge_api::errors::ServiceError;
use forge_api::services::equipment::{CreateEquipmentInput, CreateEquipmentTypeInput};
use forge_api::services::oem::{
    CreateBrandInput, CreateCatalogItemInput, CreateEquivalenceInput, CreateFitmentInput,
};

use common::TestCtx;

async fn seed_brand(ctx: &TestCtx, code: &str) {
    ctx.services
        .oem
        .create_brand(CreateBrandInput {
            brand_code: code.into(),
            name: format!("Brand {code}"),
            country: None,
            website: None,
        })
        .await
        .expect("brand");
}

async fn seed_part(ctx: &TestCtx, brand: &str, number: &str) -> oem_catalog_item::Model {
    ctx.services
        .oem
        .create_catalog_item(
            brand,
            CreateCatalogItemInput {
                oem_part_number: number.into(),
                description: format!("Part {number}"),
                group_code: None,
                internal_sku: None,
                list_price: None,
                currency_code: None,
            },
        )
        .await
        .expect("catalog item")
}

#[tokio::test]
async fn part_numbers_are_unique_within_a_brand() {
    let ctx = TestCtx::new().await;
    seed_brand(&ctx, "TOY").await;
    seed_part(&ctx, "TOY", "90915-YZZE1").await;

    let err = ctx
        .services
        .oem
        .create_catalog_item(
            "TOY",
            CreateCatalogItemInput {
                oem_part_number: "90915-YZZE1".into(),
                description: "Oil filter, again".into(),
                group_code: None,
                internal_sku: None,
                list_price: None,
                currency_code: None,
            },
        )
        .await
        .expect_err("duplicate part number");
    assert_matches!(err, ServiceError::Conflict(_));

    let err = ctx
        .services
        .oem
        .create_catalog_item(
            "NIS",
            CreateCatalogItemInput {
                oem_part_number: "15208-65F0A".into(),
                description: "Oil filter".into(),
                group_code: None,
                internal_sku: None,
                list_price: None,
                currency_code: None,
            },
        )
        .await
        .expect_err("unknown brand");
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn direct_equivalences_are_reciprocal() {
    let ctx = TestCtx::new().await;
    seed_brand(&ctx, "TOY").await;
    seed_brand(&ctx, "MAN").await;
    let oem = seed_part(&ctx, "TOY", "90915-YZZE1").await;
    let aftermarket = seed_part(&ctx, "MAN", "W68/3").await;

    ctx.services
        .oem
        .create_equivalence(
            oem.catalog_item_id,
            CreateEquivalenceInput {
                equivalent_item_id: aftermarket.catalog_item_id,
                equivalence_type: "DIRECT".into(),
                confidence: Some(95),
                notes: None,
            },
        )
        .await
        .expect("equivalence");

    // The reciprocal link exists without a second call.
    let back = ctx
        .services
        .oem
        .equivalents(aftermarket.catalog_item_id)
        .await
        .expect("reverse lookup");
    assert_eq!(back.len(), 1);
    assert_eq!(back[0].item.catalog_item_id, oem.catalog_item_id);
    assert_eq!(back[0].equivalence_type, "DIRECT");
    assert_eq!(back[0].confidence, Some(95));

    let err = ctx
        .services
        .oem
        .create_equivalence(
            oem.catalog_item_id,
            CreateEquivalenceInput {
                equivalent_item_id: aftermarket.catalog_item_id,
                equivalence_type: "DIRECT".into(),
                confidence: None,
                notes: None,
            },
        )
        .await
        .expect_err("duplicate link");
    assert_matches!(err, ServiceError::Conflict(_));

    let err = ctx
        .services
        .oem
        .create_equivalence(
            oem.catalog_item_id,
            CreateEquivalenceInput {
                equivalent_item_id: oem.catalog_item_id,
                equivalence_type: "DIRECT".into(),
                confidence: None,
                notes: None,
            },
        )
        .await
        .expect_err("self link");
    assert_matches!(err, ServiceError::InvalidInput(_));
}

#[tokio::test]
async fn supersession_deactivates_the_old_part_and_resolves_forward() {
    let ctx = TestCtx::new().await;
    seed_brand(&ctx, "TOY").await;
    let first = seed_part(&ctx, "TOY", "90915-10001").await;
    let second = seed_part(&ctx, "TOY", "90915-10003").await;
    let third = seed_part(&ctx, "TOY", "90915-YZZE1").await;

    ctx.services
        .oem
        .create_equivalence(
            first.catalog_item_id,
            CreateEquivalenceInput {
                equivalent_item_id: second.catalog_item_id,
                equivalence_type: "SUPERSESSION".into(),
                confidence: None,
                notes: None,
            },
        )
        .await
        .expect("first supersession");
    ctx.services
        .oem
        .create_equivalence(
            second.catalog_item_id,
            CreateEquivalenceInput {
                equivalent_item_id: third.catalog_item_id,
                equivalence_type: "SUPERSESSION".into(),
                confidence: None,
                notes: None,
            },
        )
        .await
        .expect("second supersession");

    let old = oem_catalog_item::Entity::find_by_id(first.catalog_item_id)
        .one(&*ctx.db)
        .await
        .expect("query")
        .expect("old part");
    assert!(!old.is_active);
    assert_eq!(old.superseded_by.as_deref(), Some("90915-10003"));

    // Two hops land on the current part number.
    let current = ctx
        .services
        .oem
        .current_replacement(first.catalog_item_id)
        .await
        .expect("replacement");
    assert_eq!(current.catalog_item_id, third.catalog_item_id);

    // A part without a successor resolves to itself.
    let current = ctx
        .services
        .oem
        .current_replacement(third.catalog_item_id)
        .await
        .expect("replacement");
    assert_eq!(current.catalog_item_id, third.catalog_item_id);
}

#[tokio::test]
async fn fitments_match_units_and_model_years() {
    let ctx = TestCtx::new().await;
    seed_brand(&ctx, "TOY").await;
    let early = seed_part(&ctx, "TOY", "FIT-EARLY").await;
    let late = seed_part(&ctx, "TOY", "FIT-LATE").await;
    let unit_only = seed_part(&ctx, "TOY", "FIT-UNIT").await;

    let kind = ctx
        .services
        .equipment
        .create_equipment_type(CreateEquipmentTypeInput {
            type_code: "PICKUP".into(),
            name: "Pickup truck".into(),
            description: None,
        })
        .await
        .expect("equipment type");
    let client = ctx.seed_client("C100").await;
    let unit = ctx
        .services
        .equipment
        .create_equipment(CreateEquipmentInput {
            equipment_code: "EQ-FIT".into(),
            equipment_type_id: Some(kind.equipment_type_id),
            brand: "Toyota".into(),
            model: "Hilux".into(),
            year: Some(2020),
            serial_number: None,
            vin: None,
            license_plate: None,
            color: None,
            engine_desc: None,
            client_id: Some(client.client_id),
            purchase_date: None,
            warranty_until: None,
            current_mileage_hours: None,
            notes: None,
        })
        .await
        .expect("equipment");

    // Type-level fitment whose year range ends before the unit's year.
    ctx.services
        .oem
        .create_fitment(
            early.catalog_item_id,
            CreateFitmentInput {
                equipment_type_id: Some(kind.equipment_type_id),
                equipment_id: None,
                year_from: Some(2010),
                year_to: Some(2015),
                engine_code: None,
                notes: None,
                is_verified: true,
            },
        )
        .await
        .expect("early fitment");
    // Type-level fitment covering 2020.
    ctx.services
        .oem
        .create_fitment(
            late.catalog_item_id,
            CreateFitmentInput {
                equipment_type_id: Some(kind.equipment_type_id),
                equipment_id: None,
                year_from: Some(2016),
                year_to: None,
                engine_code: None,
                notes: None,
                is_verified: true,
            },
        )
        .await
        .expect("late fitment");
    // Unit-level fitment ignores the year range entirely.
    ctx.services
        .oem
        .create_fitment(
            unit_only.catalog_item_id,
            CreateFitmentInput {
                equipment_type_id: None,
                equipment_id: Some(unit.equipment_id),
                year_from: None,
                year_to: None,
                engine_code: None,
                notes: None,
                is_verified: false,
            },
        )
        .await
        .expect("unit fitment");

    let parts = ctx
        .services
        .oem
        .parts_for_equipment(unit.equipment_id)
        .await
        .expect("lookup");
    let mut numbers: Vec<&str> = parts.iter().map(|p| p.oem_part_number.as_str()).collect();
    numbers.sort_unstable();
    assert_eq!(numbers, vec!["FIT-LATE", "FIT-UNIT"]);
}

#[tokio::test]
async fn fitment_targets_and_year_ranges_are_validated() {
    let ctx = TestCtx::new().await;
    seed_brand(&ctx, "TOY").await;
    let part = seed_part(&ctx, "TOY", "FIT-BAD").await;

    let err = ctx
        .services
        .oem
        .create_fitment(
            part.catalog_item_id,
            CreateFitmentInput {
                equipment_type_id: None,
                equipment_id: None,
                year_from: None,
                year_to: None,
                engine_code: None,
                notes: None,
                is_verified: false,
            },
        )
        .await
        .expect_err("no target");
    assert_matches!(err, ServiceError::InvalidInput(_));

    let err = ctx
        .services
        .oem
        .create_fitment(
            part.catalog_item_id,
            CreateFitmentInput {
                equipment_type_id: Some(1),
                equipment_id: None,
                year_from: Some(2020),
                year_to: Some(2018),
                engine_code: None,
                notes: None,
                is_verified: false,
            },
        )
        .await
        .expect_err("inverted range");
    assert_matches!(err, ServiceError::InvalidInput(_));
}

#[tokio::test]
async fn linking_an_internal_sku_requires_the_product() {
    let ctx = TestCtx::new().await;
    ctx.seed_taxonomy().await;
    ctx.seed_product("FIL-100").await;
    seed_brand(&ctx, "TOY").await;
    let part = seed_part(&ctx, "TOY", "90915-YZZE1").await;

    let err = ctx
        .services
        .oem
        .link_internal_sku(part.catalog_item_id, "NOPE-1")
        .await
        .expect_err("unknown sku");
    assert_matches!(err, ServiceError::NotFound(_));

    let linked = ctx
        .services
        .oem
        .link_internal_sku(part.catalog_item_id, "FIL-100")
        .await
        .expect("link");
    assert_eq!(linked.internal_sku.as_deref(), Some("FIL-100"));
}
