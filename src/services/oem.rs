//! OEM catalog service
//!
//! Manufacturer brands, their published part numbers, cross-references
//! between equivalent parts, supersession chains and fitment lookups.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    equipment, fitment, oem_brand, oem_catalog_item, oem_equivalence,
    oem_equivalence::EquivalenceType,
    product,
};
use crate::errors::ServiceError;

const MAX_SUPERSESSION_HOPS: usize = 10;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBrandInput {
    #[validate(length(min = 1, max = 20))]
    pub brand_code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub country: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCatalogItemInput {
    #[validate(length(min = 1, max = 60))]
    pub oem_part_number: String,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    pub group_code: Option<String>,
    pub internal_sku: Option<String>,
    pub list_price: Option<Decimal>,
    pub currency_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEquivalenceInput {
    pub equivalent_item_id: i64,
    pub equivalence_type: String,
    #[validate(range(min = 0, max = 100))]
    pub confidence: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateFitmentInput {
    pub equipment_type_id: Option<i32>,
    pub equipment_id: Option<i32>,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    pub engine_code: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

/// A cross-reference hit with the related catalog row resolved.
#[derive(Debug, Clone, Serialize)]
pub struct EquivalenceHit {
    pub equivalence_type: String,
    pub confidence: Option<i32>,
    pub item: oem_catalog_item::Model,
}

#[derive(Clone)]
pub struct OemCatalogService {
    db: Arc<DbPool>,
}

impl OemCatalogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input))]
    pub async fn create_brand(
        &self,
        input: CreateBrandInput,
    ) -> Result<oem_brand::Model, ServiceError> {
        input.validate()?;

        let duplicate = oem_brand::Entity::find_by_id(input.brand_code.clone())
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Brand {} already exists",
                input.brand_code
            )));
        }

        oem_brand::ActiveModel {
            brand_code: Set(input.brand_code),
            name: Set(input.name),
            country: Set(input.country),
            website: Set(input.website),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn list_brands(&self) -> Result<Vec<oem_brand::Model>, ServiceError> {
        oem_brand::Entity::find()
            .order_by_asc(oem_brand::Column::BrandCode)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Adds a part number under a brand. The (brand, part number) pair
    /// is unique.
    #[instrument(skip(self, input))]
    pub async fn create_catalog_item(
        &self,
        brand_code: &str,
        input: CreateCatalogItemInput,
    ) -> Result<oem_catalog_item::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        oem_brand::Entity::find_by_id(brand_code.to_string())
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Brand {} not found", brand_code)))?;

        if let Some(sku) = &input.internal_sku {
            product::Entity::find_by_id(sku.clone())
                .one(&txn)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", sku)))?;
        }

        let duplicate = oem_catalog_item::Entity::find()
            .filter(oem_catalog_item::Column::BrandCode.eq(brand_code))
            .filter(oem_catalog_item::Column::OemPartNumber.eq(input.oem_part_number.clone()))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "{} {} is already catalogued",
                brand_code, input.oem_part_number
            )));
        }

        let created = oem_catalog_item::ActiveModel {
            brand_code: Set(brand_code.to_string()),
            oem_part_number: Set(input.oem_part_number),
            description: Set(input.description),
            group_code: Set(input.group_code),
            internal_sku: Set(input.internal_sku),
            list_price: Set(input.list_price),
            currency_code: Set(input.currency_code),
            superseded_by: Set(None),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(created)
    }

    pub async fn get_catalog_item(
        &self,
        catalog_item_id: i64,
    ) -> Result<oem_catalog_item::Model, ServiceError> {
        oem_catalog_item::Entity::find_by_id(catalog_item_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Catalog item {} not found", catalog_item_id))
            })
    }

    /// Part number search across brands, with optional brand filter.
    #[instrument(skip(self))]
    pub async fn search_catalog(
        &self,
        query: &str,
        brand_code: Option<&str>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<oem_catalog_item::Model>, u64), ServiceError> {
        let pattern = format!("%{}%", query.trim());
        let mut find = oem_catalog_item::Entity::find().filter(
            Condition::any()
                .add(oem_catalog_item::Column::OemPartNumber.like(pattern.clone()))
                .add(oem_catalog_item::Column::Description.like(pattern)),
        );
        if let Some(brand) = brand_code {
            find = find.filter(oem_catalog_item::Column::BrandCode.eq(brand));
        }
        let paginator = find
            .order_by_asc(oem_catalog_item::Column::OemPartNumber)
            .paginate(&*self.db, limit.max(1));
        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(ServiceError::db_error)?;
        Ok((rows, total))
    }

    /// Links an internal SKU to a catalog row.
    #[instrument(skip(self))]
    pub async fn link_internal_sku(
        &self,
        catalog_item_id: i64,
        internal_sku: &str,
    ) -> Result<oem_catalog_item::Model, ServiceError> {
        let item = self.get_catalog_item(catalog_item_id).await?;
        product::Entity::find_by_id(internal_sku.to_string())
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", internal_sku)))?;

        let mut active: oem_catalog_item::ActiveModel = item.into();
        active.internal_sku = Set(Some(internal_sku.to_string()));
        active.updated_at = Set(Some(Utc::now()));
        active
            .update(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Records an equivalence between two catalog rows. DIRECT and
    /// AFTERMARKET links are symmetric, so the reciprocal row is created
    /// in the same transaction. SUPERSESSION also stamps the superseding
    /// part number on the old row.
    #[instrument(skip(self, input))]
    pub async fn create_equivalence(
        &self,
        catalog_item_id: i64,
        input: CreateEquivalenceInput,
    ) -> Result<oem_equivalence::Model, ServiceError> {
        input.validate()?;
        if catalog_item_id == input.equivalent_item_id {
            return Err(ServiceError::InvalidInput(
                "A part cannot be equivalent to itself".into(),
            ));
        }
        let kind = EquivalenceType::from_str(&input.equivalence_type).map_err(|_| {
            ServiceError::InvalidInput(format!(
                "Unknown equivalence type {}",
                input.equivalence_type
            ))
        })?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let item = oem_catalog_item::Entity::find_by_id(catalog_item_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Catalog item {} not found", catalog_item_id))
            })?;
        let other = oem_catalog_item::Entity::find_by_id(input.equivalent_item_id)
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "Catalog item {} not found",
                    input.equivalent_item_id
                ))
            })?;

        let duplicate = oem_equivalence::Entity::find()
            .filter(oem_equivalence::Column::CatalogItemId.eq(catalog_item_id))
            .filter(oem_equivalence::Column::EquivalentItemId.eq(input.equivalent_item_id))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Equivalence {} -> {} already exists",
                catalog_item_id, input.equivalent_item_id
            )));
        }

        let created = oem_equivalence::ActiveModel {
            catalog_item_id: Set(catalog_item_id),
            equivalent_item_id: Set(input.equivalent_item_id),
            equivalence_type: Set(kind.as_ref().to_string()),
            confidence: Set(input.confidence),
            notes: Set(input.notes.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        match kind {
            EquivalenceType::Direct | EquivalenceType::Aftermarket => {
                let reciprocal_exists = oem_equivalence::Entity::find()
                    .filter(oem_equivalence::Column::CatalogItemId.eq(input.equivalent_item_id))
                    .filter(oem_equivalence::Column::EquivalentItemId.eq(catalog_item_id))
                    .one(&txn)
                    .await
                    .map_err(ServiceError::db_error)?
                    .is_some();
                if !reciprocal_exists {
                    oem_equivalence::ActiveModel {
                        catalog_item_id: Set(input.equivalent_item_id),
                        equivalent_item_id: Set(catalog_item_id),
                        equivalence_type: Set(kind.as_ref().to_string()),
                        confidence: Set(input.confidence),
                        notes: Set(input.notes),
                        created_at: Set(Utc::now()),
                        ..Default::default()
                    }
                    .insert(&txn)
                    .await
                    .map_err(ServiceError::db_error)?;
                }
            }
            EquivalenceType::Supersession => {
                let mut active: oem_catalog_item::ActiveModel = item.into();
                active.superseded_by = Set(Some(other.oem_part_number.clone()));
                active.is_active = Set(false);
                active.updated_at = Set(Some(Utc::now()));
                active.update(&txn).await.map_err(ServiceError::db_error)?;
            }
            EquivalenceType::Partial => {}
        }

        txn.commit().await.map_err(ServiceError::db_error)?;
        info!(
            from = catalog_item_id,
            to = input.equivalent_item_id,
            kind = %kind,
            "equivalence recorded"
        );
        Ok(created)
    }

    /// All equivalents of a catalog row, each with its related part.
    #[instrument(skip(self))]
    pub async fn equivalents(
        &self,
        catalog_item_id: i64,
    ) -> Result<Vec<EquivalenceHit>, ServiceError> {
        let db = &*self.db;
        self.get_catalog_item(catalog_item_id).await?;

        let links = oem_equivalence::Entity::find()
            .filter(oem_equivalence::Column::CatalogItemId.eq(catalog_item_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut hits = Vec::with_capacity(links.len());
        for link in links {
            let item = oem_catalog_item::Entity::find_by_id(link.equivalent_item_id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;
            if let Some(item) = item {
                hits.push(EquivalenceHit {
                    equivalence_type: link.equivalence_type,
                    confidence: link.confidence,
                    item,
                });
            }
        }
        Ok(hits)
    }

    /// Follows the supersession chain from a part to its current
    /// replacement. Hops are bounded to survive accidental cycles.
    #[instrument(skip(self))]
    pub async fn current_replacement(
        &self,
        catalog_item_id: i64,
    ) -> Result<oem_catalog_item::Model, ServiceError> {
        let db = &*self.db;
        let mut current = self.get_catalog_item(catalog_item_id).await?;
        let mut seen = vec![current.catalog_item_id];

        for _ in 0..MAX_SUPERSESSION_HOPS {
            let Some(next_number) = current.superseded_by.clone() else {
                return Ok(current);
            };
            let next = oem_catalog_item::Entity::find()
                .filter(oem_catalog_item::Column::BrandCode.eq(current.brand_code.clone()))
                .filter(oem_catalog_item::Column::OemPartNumber.eq(next_number.clone()))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Superseding part {} {} is not catalogued",
                        current.brand_code, next_number
                    ))
                })?;
            if seen.contains(&next.catalog_item_id) {
                return Err(ServiceError::InvalidOperation(format!(
                    "Supersession cycle detected at catalog item {}",
                    next.catalog_item_id
                )));
            }
            seen.push(next.catalog_item_id);
            current = next;
        }

        Err(ServiceError::InvalidOperation(format!(
            "Supersession chain from {} exceeds {} hops",
            catalog_item_id, MAX_SUPERSESSION_HOPS
        )))
    }

    #[instrument(skip(self, input))]
    pub async fn create_fitment(
        &self,
        catalog_item_id: i64,
        input: CreateFitmentInput,
    ) -> Result<fitment::Model, ServiceError> {
        input.validate()?;
        if input.equipment_type_id.is_none() && input.equipment_id.is_none() {
            return Err(ServiceError::InvalidInput(
                "A fitment needs an equipment type or a specific unit".into(),
            ));
        }
        if let (Some(from), Some(to)) = (input.year_from, input.year_to) {
            if to < from {
                return Err(ServiceError::InvalidInput(
                    "year_to cannot precede year_from".into(),
                ));
            }
        }

        self.get_catalog_item(catalog_item_id).await?;

        fitment::ActiveModel {
            catalog_item_id: Set(catalog_item_id),
            equipment_type_id: Set(input.equipment_type_id),
            equipment_id: Set(input.equipment_id),
            year_from: Set(input.year_from),
            year_to: Set(input.year_to),
            engine_code: Set(input.engine_code),
            notes: Set(input.notes),
            is_verified: Set(input.is_verified),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    /// Catalog parts that fit a specific equipment unit: unit-level
    /// fitments plus type-level fitments matching the unit's model year.
    #[instrument(skip(self))]
    pub async fn parts_for_equipment(
        &self,
        equipment_id: i32,
    ) -> Result<Vec<oem_catalog_item::Model>, ServiceError> {
        let db = &*self.db;
        let unit = equipment::Entity::find_by_id(equipment_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Equipment {} not found", equipment_id))
            })?;

        let mut condition = Condition::any().add(fitment::Column::EquipmentId.eq(equipment_id));
        if let Some(type_id) = unit.equipment_type_id {
            condition = condition.add(
                Condition::all()
                    .add(fitment::Column::EquipmentTypeId.eq(type_id))
                    .add(fitment::Column::EquipmentId.is_null()),
            );
        }

        let fitments = fitment::Entity::find()
            .filter(condition)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut item_ids: Vec<i64> = Vec::new();
        for f in fitments {
            let year_ok = match (f.equipment_id, unit.year) {
                // Unit-level rows match regardless of year.
                (Some(_), _) => true,
                (None, Some(year)) => f.covers_year(i32::from(year)),
                (None, None) => true,
            };
            if year_ok && !item_ids.contains(&f.catalog_item_id) {
                item_ids.push(f.catalog_item_id);
            }
        }

        let mut items = Vec::with_capacity(item_ids.len());
        for id in item_ids {
            if let Some(item) = oem_catalog_item::Entity::find_by_id(id)
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
            {
                items.push(item);
            }
        }
        Ok(items)
    }
}
