//! Pricing service
//!
//! Resolves the selling price for a SKU from effective-dated price list
//! rows, and manages the price lists themselves.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{price_list, product, product_price};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize)]
pub struct ResolvedPrice {
    pub internal_sku: String,
    pub list_code: String,
    pub currency_code: String,
    pub unit_price: Decimal,
    pub min_qty: i32,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePriceListInput {
    #[validate(length(min = 1, max = 20))]
    pub list_code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub currency_code: Option<String>,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetPriceInput {
    #[validate(length(min = 1, max = 40))]
    pub internal_sku: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub min_qty: i32,
    pub valid_from: NaiveDate,
    pub valid_until: Option<NaiveDate>,
}

#[derive(Clone)]
pub struct PricingService {
    db: Arc<DbPool>,
    default_currency: String,
}

impl PricingService {
    pub fn new(db: Arc<DbPool>, default_currency: String) -> Self {
        Self {
            db,
            default_currency,
        }
    }

    /// Resolves the price in force for a SKU on a date at a quantity.
    /// Without a list code the default price list is used. Among
    /// applicable rows the best quantity tier wins, ties broken by the
    /// most recent `valid_from`.
    #[instrument(skip(self))]
    pub async fn resolve_price(
        &self,
        internal_sku: &str,
        list_code: Option<&str>,
        date: Option<NaiveDate>,
        qty: i32,
    ) -> Result<ResolvedPrice, ServiceError> {
        if qty <= 0 {
            return Err(ServiceError::InvalidInput(
                "Quantity must be positive".into(),
            ));
        }
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let db = &*self.db;

        let list = match list_code {
            Some(code) => price_list::Entity::find()
                .filter(price_list::Column::ListCode.eq(code))
                .filter(price_list::Column::IsActive.eq(true))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| ServiceError::NotFound(format!("Price list {} not found", code)))?,
            None => price_list::Entity::find()
                .filter(price_list::Column::IsDefault.eq(true))
                .filter(price_list::Column::IsActive.eq(true))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?
                .ok_or_else(|| {
                    ServiceError::InvalidOperation("No default price list configured".into())
                })?,
        };

        let rows = product_price::Entity::find()
            .filter(product_price::Column::PriceListId.eq(list.price_list_id))
            .filter(product_price::Column::InternalSku.eq(internal_sku))
            .order_by_desc(product_price::Column::MinQty)
            .order_by_desc(product_price::Column::ValidFrom)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let row = rows
            .into_iter()
            .find(|r| r.applies(date, qty))
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No price for {} on list {} effective {}",
                    internal_sku, list.list_code, date
                ))
            })?;

        Ok(ResolvedPrice {
            internal_sku: row.internal_sku,
            list_code: list.list_code,
            currency_code: list.currency_code,
            unit_price: row.unit_price,
            min_qty: row.min_qty,
            valid_from: row.valid_from,
            valid_until: row.valid_until,
        })
    }

    #[instrument(skip(self, input))]
    pub async fn create_price_list(
        &self,
        input: CreatePriceListInput,
    ) -> Result<price_list::Model, ServiceError> {
        input.validate()?;

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let duplicate = price_list::Entity::find()
            .filter(price_list::Column::ListCode.eq(input.list_code.clone()))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        if duplicate.is_some() {
            return Err(ServiceError::Conflict(format!(
                "Price list {} already exists",
                input.list_code
            )));
        }

        // Only one default list at a time.
        if input.is_default {
            let current_defaults = price_list::Entity::find()
                .filter(price_list::Column::IsDefault.eq(true))
                .all(&txn)
                .await
                .map_err(ServiceError::db_error)?;
            for list in current_defaults {
                let mut active: price_list::ActiveModel = list.into();
                active.is_default = Set(false);
                active.update(&txn).await.map_err(ServiceError::db_error)?;
            }
        }

        let created = price_list::ActiveModel {
            list_code: Set(input.list_code),
            name: Set(input.name),
            currency_code: Set(input
                .currency_code
                .unwrap_or_else(|| self.default_currency.clone())),
            is_default: Set(input.is_default),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(created)
    }

    pub async fn list_price_lists(&self) -> Result<Vec<price_list::Model>, ServiceError> {
        price_list::Entity::find()
            .order_by_asc(price_list::Column::ListCode)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Adds a price row to a list. An open-ended row for the same SKU
    /// and tier is closed the day before the new row takes effect.
    #[instrument(skip(self, input))]
    pub async fn set_price(
        &self,
        list_code: &str,
        input: SetPriceInput,
    ) -> Result<product_price::Model, ServiceError> {
        input.validate()?;
        if input.unit_price < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Unit price cannot be negative".into(),
            ));
        }
        if input.min_qty < 0 {
            return Err(ServiceError::InvalidInput(
                "Minimum quantity cannot be negative".into(),
            ));
        }
        if let Some(until) = input.valid_until {
            if until < input.valid_from {
                return Err(ServiceError::InvalidInput(
                    "valid_until cannot precede valid_from".into(),
                ));
            }
        }

        let txn = self.db.begin().await.map_err(ServiceError::db_error)?;

        let list = price_list::Entity::find()
            .filter(price_list::Column::ListCode.eq(list_code))
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Price list {} not found", list_code)))?;

        product::Entity::find_by_id(input.internal_sku.clone())
            .one(&txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Product {} not found", input.internal_sku))
            })?;

        let open_rows = product_price::Entity::find()
            .filter(product_price::Column::PriceListId.eq(list.price_list_id))
            .filter(product_price::Column::InternalSku.eq(input.internal_sku.clone()))
            .filter(product_price::Column::MinQty.eq(input.min_qty))
            .filter(product_price::Column::ValidUntil.is_null())
            .all(&txn)
            .await
            .map_err(ServiceError::db_error)?;
        for row in open_rows {
            if row.valid_from >= input.valid_from {
                return Err(ServiceError::Conflict(format!(
                    "An open price row for {} already starts on or after {}",
                    input.internal_sku, input.valid_from
                )));
            }
            let mut active: product_price::ActiveModel = row.into();
            active.valid_until = Set(input.valid_from.pred_opt());
            active.update(&txn).await.map_err(ServiceError::db_error)?;
        }

        let created = product_price::ActiveModel {
            price_list_id: Set(list.price_list_id),
            internal_sku: Set(input.internal_sku),
            unit_price: Set(input.unit_price),
            min_qty: Set(input.min_qty),
            valid_from: Set(input.valid_from),
            valid_until: Set(input.valid_until),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(ServiceError::db_error)?;

        txn.commit().await.map_err(ServiceError::db_error)?;
        Ok(created)
    }

    pub async fn list_prices(
        &self,
        list_code: &str,
        internal_sku: Option<&str>,
    ) -> Result<Vec<product_price::Model>, ServiceError> {
        let db = &*self.db;
        let list = price_list::Entity::find()
            .filter(price_list::Column::ListCode.eq(list_code))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Price list {} not found", list_code)))?;

        let mut query = product_price::Entity::find()
            .filter(product_price::Column::PriceListId.eq(list.price_list_id));
        if let Some(sku) = internal_sku {
            query = query.filter(product_price::Column::InternalSku.eq(sku));
        }
        query
            .order_by_asc(product_price::Column::InternalSku)
            .order_by_asc(product_price::Column::MinQty)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}
