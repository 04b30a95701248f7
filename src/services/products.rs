//! Product master, part taxonomy and warehouse layout.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    bin, product, stock, stock_transaction, taxonomy_group, taxonomy_subsystem, taxonomy_system,
    warehouse,
};
use crate::errors::ServiceError;
use crate::services::audit::AuditService;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, max = 40))]
    pub internal_sku: String,
    #[validate(length(min = 1, max = 20))]
    pub group_code: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub oem_ref: Option<String>,
    pub oem_code: Option<String>,
    #[validate(length(min = 1, max = 10))]
    pub uom_code: String,
    pub barcode: Option<String>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub safety_stock: Option<i32>,
    pub lead_time_days: Option<i32>,
    pub standard_cost: Option<Decimal>,
    pub warranty_days: Option<i32>,
    #[serde(default)]
    pub is_serialized: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, Default)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub barcode: Option<String>,
    pub min_stock: Option<i32>,
    pub max_stock: Option<i32>,
    pub reorder_point: Option<i32>,
    pub safety_stock: Option<i32>,
    pub lead_time_days: Option<i32>,
    pub standard_cost: Option<Decimal>,
    pub warranty_days: Option<i32>,
    pub is_active: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWarehouseInput {
    #[validate(length(min = 1, max = 10))]
    pub warehouse_code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub warehouse_type: Option<String>,
    pub address: Option<String>,
    pub contact_phone: Option<String>,
    pub manager: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBinInput {
    #[validate(length(min = 1, max = 20))]
    pub bin_code: String,
    pub description: Option<String>,
    pub zone: Option<String>,
    pub aisle: Option<String>,
    pub rack: Option<String>,
    pub level: Option<String>,
    pub capacity: Option<i32>,
}

/// Product with its stock position summed across warehouses.
#[derive(Debug, Clone, Serialize)]
pub struct ProductStockOverview {
    #[serde(flatten)]
    pub product: product::Model,
    pub total_on_hand: i32,
    pub total_reserved: i32,
    pub total_available: i32,
    pub total_on_order: i32,
    pub stock_rows: Vec<stock::Model>,
}

#[derive(Clone)]
pub struct ProductService {
    db: Arc<DbPool>,
    audit: AuditService,
}

impl ProductService {
    pub fn new(db: Arc<DbPool>, audit: AuditService) -> Self {
        Self { db, audit }
    }

    #[instrument(skip(self, input))]
    pub async fn create_product(
        &self,
        input: CreateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;
        taxonomy_group::Entity::find_by_id(input.group_code.clone())
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Taxonomy group {} not found", input.group_code))
            })?;

        let duplicate = product::Entity::find_by_id(input.internal_sku.clone())
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Product {} already exists",
                input.internal_sku
            )));
        }

        let reorder_point = input.reorder_point.unwrap_or(0);
        let max_stock = input.max_stock.unwrap_or(0);
        if max_stock > 0 && reorder_point > max_stock {
            return Err(ServiceError::InvalidInput(
                "reorder_point cannot exceed max_stock".into(),
            ));
        }

        let created = product::ActiveModel {
            internal_sku: Set(input.internal_sku),
            group_code: Set(input.group_code),
            name: Set(input.name),
            description: Set(input.description),
            brand: Set(input.brand),
            oem_ref: Set(input.oem_ref),
            oem_code: Set(input.oem_code),
            uom_code: Set(input.uom_code),
            barcode: Set(input.barcode),
            min_stock: Set(input.min_stock.unwrap_or(0)),
            max_stock: Set(max_stock),
            reorder_point: Set(reorder_point),
            safety_stock: Set(input.safety_stock.unwrap_or(0)),
            lead_time_days: Set(input.lead_time_days.unwrap_or(0)),
            standard_cost: Set(input.standard_cost.unwrap_or_default()),
            avg_cost: Set(Decimal::ZERO),
            last_purchase_cost: Set(Decimal::ZERO),
            warranty_days: Set(input.warranty_days.unwrap_or(0)),
            is_active: Set(true),
            is_serialized: Set(input.is_serialized),
            notes: Set(input.notes),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(db)
        .await
        .map_err(ServiceError::db_error)?;

        self.audit
            .record_change(
                "products",
                &created.internal_sku,
                "CREATE",
                None,
                serde_json::to_value(&created).ok(),
                None,
            )
            .await;
        info!(sku = %created.internal_sku, "product created");
        Ok(created)
    }

    pub async fn get_product(&self, internal_sku: &str) -> Result<product::Model, ServiceError> {
        product::Entity::find_by_id(internal_sku.to_string())
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Product {} not found", internal_sku)))
    }

    /// Product with its stock rows and aggregate position.
    #[instrument(skip(self))]
    pub async fn stock_overview(
        &self,
        internal_sku: &str,
    ) -> Result<ProductStockOverview, ServiceError> {
        let prod = self.get_product(internal_sku).await?;
        let rows = stock::Entity::find()
            .filter(stock::Column::InternalSku.eq(internal_sku))
            .order_by_asc(stock::Column::WarehouseCode)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(ProductStockOverview {
            total_on_hand: rows.iter().map(|r| r.qty_on_hand).sum(),
            total_reserved: rows.iter().map(|r| r.qty_reserved).sum(),
            total_available: rows.iter().map(|r| r.qty_available).sum(),
            total_on_order: rows.iter().map(|r| r.qty_on_order).sum(),
            product: prod,
            stock_rows: rows,
        })
    }

    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        search: Option<&str>,
        group_code: Option<&str>,
        active_only: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<product::Model>, u64), ServiceError> {
        let mut query = product::Entity::find();
        if let Some(term) = search {
            let pattern = format!("%{}%", term.trim());
            query = query.filter(
                Condition::any()
                    .add(product::Column::InternalSku.like(pattern.clone()))
                    .add(product::Column::Name.like(pattern.clone()))
                    .add(product::Column::OemRef.like(pattern.clone()))
                    .add(product::Column::Barcode.like(pattern)),
            );
        }
        if let Some(group) = group_code {
            query = query.filter(product::Column::GroupCode.eq(group));
        }
        if active_only {
            query = query.filter(product::Column::IsActive.eq(true));
        }
        let paginator = query
            .order_by_asc(product::Column::InternalSku)
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

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        internal_sku: &str,
        input: UpdateProductInput,
    ) -> Result<product::Model, ServiceError> {
        input.validate()?;
        let existing = self.get_product(internal_sku).await?;
        let before = serde_json::to_value(&existing).ok();

        let mut active: product::ActiveModel = existing.into();
        if let Some(v) = input.name {
            active.name = Set(v);
        }
        if let Some(v) = input.description {
            active.description = Set(Some(v));
        }
        if let Some(v) = input.brand {
            active.brand = Set(Some(v));
        }
        if let Some(v) = input.barcode {
            active.barcode = Set(Some(v));
        }
        if let Some(v) = input.min_stock {
            active.min_stock = Set(v);
        }
        if let Some(v) = input.max_stock {
            active.max_stock = Set(v);
        }
        if let Some(v) = input.reorder_point {
            active.reorder_point = Set(v);
        }
        if let Some(v) = input.safety_stock {
            active.safety_stock = Set(v);
        }
        if let Some(v) = input.lead_time_days {
            active.lead_time_days = Set(v);
        }
        if let Some(v) = input.standard_cost {
            active.standard_cost = Set(v);
        }
        if let Some(v) = input.warranty_days {
            active.warranty_days = Set(v);
        }
        if let Some(v) = input.is_active {
            active.is_active = Set(v);
        }
        if let Some(v) = input.notes {
            active.notes = Set(Some(v));
        }
        active.updated_at = Set(Some(Utc::now()));
        let updated = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        self.audit
            .record_change(
                "products",
                internal_sku,
                "UPDATE",
                before,
                serde_json::to_value(&updated).ok(),
                None,
            )
            .await;
        Ok(updated)
    }

    /// Deletes a product that holds no stock and has no movement
    /// history. Anything else is kept and deactivated instead.
    #[instrument(skip(self))]
    pub async fn delete_product(&self, internal_sku: &str) -> Result<(), ServiceError> {
        let existing = self.get_product(internal_sku).await?;

        let db = &*self.db;
        let holding = stock::Entity::find()
            .filter(stock::Column::InternalSku.eq(internal_sku))
            .filter(
                Condition::any()
                    .add(stock::Column::QtyOnHand.gt(0))
                    .add(stock::Column::QtyReserved.gt(0))
                    .add(stock::Column::QtyOnOrder.gt(0)),
            )
            .count(db)
            .await
            .map_err(ServiceError::db_error)?
            > 0;
        let has_movements = stock_transaction::Entity::find()
            .filter(stock_transaction::Column::InternalSku.eq(internal_sku))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?
            > 0;
        if holding || has_movements {
            return Err(ServiceError::Conflict(format!(
                "Product {} has stock or movement history and cannot be deleted",
                internal_sku
            )));
        }

        // Zero-quantity stock rows go with the product.
        stock::Entity::delete_many()
            .filter(stock::Column::InternalSku.eq(internal_sku))
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;
        let before = serde_json::to_value(&existing).ok();
        existing.delete(db).await.map_err(ServiceError::db_error)?;
        self.audit
            .record_change("products", internal_sku, "DELETE", before, None, None)
            .await;
        info!(sku = %internal_sku, "product deleted");
        Ok(())
    }

    /// Full taxonomy tree, ordered for display.
    #[instrument(skip(self))]
    pub async fn taxonomy_tree(
        &self,
    ) -> Result<
        Vec<(
            taxonomy_system::Model,
            Vec<(taxonomy_subsystem::Model, Vec<taxonomy_group::Model>)>,
        )>,
        ServiceError,
    > {
        let db = &*self.db;
        let systems = taxonomy_system::Entity::find()
            .order_by_asc(taxonomy_system::Column::DisplayOrder)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let subsystems = taxonomy_subsystem::Entity::find()
            .order_by_asc(taxonomy_subsystem::Column::DisplayOrder)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;
        let groups = taxonomy_group::Entity::find()
            .order_by_asc(taxonomy_group::Column::DisplayOrder)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let tree = systems
            .into_iter()
            .map(|sys| {
                let subs = subsystems
                    .iter()
                    .filter(|s| s.system_code == sys.system_code)
                    .map(|sub| {
                        let grps = groups
                            .iter()
                            .filter(|g| g.subsystem_code == sub.subsystem_code)
                            .cloned()
                            .collect();
                        (sub.clone(), grps)
                    })
                    .collect();
                (sys, subs)
            })
            .collect();
        Ok(tree)
    }

    #[instrument(skip(self, input))]
    pub async fn create_warehouse(
        &self,
        input: CreateWarehouseInput,
    ) -> Result<warehouse::Model, ServiceError> {
        input.validate()?;

        let duplicate = warehouse::Entity::find_by_id(input.warehouse_code.clone())
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Warehouse {} already exists",
                input.warehouse_code
            )));
        }

        warehouse::ActiveModel {
            warehouse_code: Set(input.warehouse_code),
            name: Set(input.name),
            warehouse_type: Set(input.warehouse_type),
            address: Set(input.address),
            contact_phone: Set(input.contact_phone),
            manager: Set(input.manager),
            is_active: Set(true),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    /// Deletes a warehouse that holds no stock. Its bins and empty
    /// stock rows are removed with it.
    #[instrument(skip(self))]
    pub async fn delete_warehouse(&self, warehouse_code: &str) -> Result<(), ServiceError> {
        let db = &*self.db;
        let existing = warehouse::Entity::find_by_id(warehouse_code.to_string())
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Warehouse {} not found", warehouse_code))
            })?;

        let holding = stock::Entity::find()
            .filter(stock::Column::WarehouseCode.eq(warehouse_code))
            .filter(
                Condition::any()
                    .add(stock::Column::QtyOnHand.gt(0))
                    .add(stock::Column::QtyReserved.gt(0))
                    .add(stock::Column::QtyOnOrder.gt(0)),
            )
            .count(db)
            .await
            .map_err(ServiceError::db_error)?
            > 0;
        let has_movements = stock_transaction::Entity::find()
            .filter(stock_transaction::Column::WarehouseCode.eq(warehouse_code))
            .count(db)
            .await
            .map_err(ServiceError::db_error)?
            > 0;
        if holding || has_movements {
            return Err(ServiceError::Conflict(format!(
                "Warehouse {} has stock or movement history and cannot be deleted",
                warehouse_code
            )));
        }

        stock::Entity::delete_many()
            .filter(stock::Column::WarehouseCode.eq(warehouse_code))
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;
        bin::Entity::delete_many()
            .filter(bin::Column::WarehouseCode.eq(warehouse_code))
            .exec(db)
            .await
            .map_err(ServiceError::db_error)?;
        existing.delete(db).await.map_err(ServiceError::db_error)?;
        info!(warehouse = %warehouse_code, "warehouse deleted");
        Ok(())
    }

    pub async fn list_warehouses(&self) -> Result<Vec<warehouse::Model>, ServiceError> {
        warehouse::Entity::find()
            .order_by_asc(warehouse::Column::WarehouseCode)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self, input))]
    pub async fn create_bin(
        &self,
        warehouse_code: &str,
        input: CreateBinInput,
    ) -> Result<bin::Model, ServiceError> {
        input.validate()?;

        let db = &*self.db;
        warehouse::Entity::find_by_id(warehouse_code.to_string())
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Warehouse {} not found", warehouse_code))
            })?;

        let duplicate = bin::Entity::find()
            .filter(bin::Column::WarehouseCode.eq(warehouse_code))
            .filter(bin::Column::BinCode.eq(input.bin_code.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Bin {} already exists in {}",
                input.bin_code, warehouse_code
            )));
        }

        bin::ActiveModel {
            warehouse_code: Set(warehouse_code.to_string()),
            bin_code: Set(input.bin_code),
            description: Set(input.description),
            zone: Set(input.zone),
            aisle: Set(input.aisle),
            rack: Set(input.rack),
            level: Set(input.level),
            capacity: Set(input.capacity),
            current_occupancy: Set(0),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(ServiceError::db_error)
    }

    pub async fn list_bins(&self, warehouse_code: &str) -> Result<Vec<bin::Model>, ServiceError> {
        bin::Entity::find()
            .filter(bin::Column::WarehouseCode.eq(warehouse_code))
            .order_by_asc(bin::Column::BinCode)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}
