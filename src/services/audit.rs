//! Audit trail and operational alerts.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::db::DbPool;
use crate::entities::{alert, alert::AlertSeverity, alert::AlertType, audit_log};
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct AuditService {
    db: Arc<DbPool>,
}

impl AuditService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Appends one row to the change trail.
    #[instrument(skip(self, old_values, new_values))]
    pub async fn record(
        &self,
        table_name: &str,
        record_id: &str,
        action: &str,
        old_values: Option<Value>,
        new_values: Option<Value>,
        user_id: Option<i32>,
        username: Option<&str>,
    ) -> Result<audit_log::Model, ServiceError> {
        audit_log::ActiveModel {
            table_name: Set(table_name.to_string()),
            record_id: Set(record_id.to_string()),
            action: Set(action.to_string()),
            old_values: Set(old_values),
            new_values: Set(new_values),
            user_id: Set(user_id),
            username: Set(username.map(|s| s.to_string())),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    /// Best-effort append. A failed audit write is logged and swallowed
    /// so it never fails the operation it trails.
    pub async fn record_change(
        &self,
        table_name: &str,
        record_id: &str,
        action: &str,
        old_values: Option<Value>,
        new_values: Option<Value>,
        user_id: Option<i32>,
    ) {
        if let Err(err) = self
            .record(
                table_name, record_id, action, old_values, new_values, user_id, None,
            )
            .await
        {
            warn!(
                table = table_name,
                record = record_id,
                error = %err,
                "audit append failed"
            );
        }
    }

    #[instrument(skip(self))]
    pub async fn history(
        &self,
        table_name: &str,
        record_id: &str,
    ) -> Result<Vec<audit_log::Model>, ServiceError> {
        audit_log::Entity::find()
            .filter(audit_log::Column::TableName.eq(table_name))
            .filter(audit_log::Column::RecordId.eq(record_id))
            .order_by_desc(audit_log::Column::CreatedAt)
            .all(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn raise_alert(
        &self,
        alert_type: AlertType,
        severity: AlertSeverity,
        message: &str,
        reference_type: Option<&str>,
        reference_id: Option<&str>,
    ) -> Result<alert::Model, ServiceError> {
        alert::ActiveModel {
            alert_type: Set(alert_type.as_ref().to_string()),
            severity: Set(severity.as_ref().to_string()),
            message: Set(message.to_string()),
            reference_type: Set(reference_type.map(|s| s.to_string())),
            reference_id: Set(reference_id.map(|s| s.to_string())),
            is_resolved: Set(false),
            resolved_at: Set(None),
            resolved_by: Set(None),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(ServiceError::db_error)
    }

    #[instrument(skip(self))]
    pub async fn list_alerts(
        &self,
        unresolved_only: bool,
        alert_type: Option<AlertType>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<alert::Model>, u64), ServiceError> {
        let mut query = alert::Entity::find();
        if unresolved_only {
            query = query.filter(alert::Column::IsResolved.eq(false));
        }
        if let Some(kind) = alert_type {
            query = query.filter(alert::Column::AlertType.eq(kind.as_ref()));
        }
        let paginator = query
            .order_by_desc(alert::Column::CreatedAt)
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

    #[instrument(skip(self))]
    pub async fn resolve_alert(
        &self,
        alert_id: i64,
        resolved_by: Option<i32>,
    ) -> Result<alert::Model, ServiceError> {
        let existing = alert::Entity::find_by_id(alert_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Alert {} not found", alert_id)))?;
        if existing.is_resolved {
            return Err(ServiceError::InvalidOperation(format!(
                "Alert {} is already resolved",
                alert_id
            )));
        }

        let mut active: alert::ActiveModel = existing.into();
        active.is_resolved = Set(true);
        active.resolved_at = Set(Some(Utc::now()));
        active.resolved_by = Set(resolved_by);
        active
            .update(&*self.db)
            .await
            .map_err(ServiceError::db_error)
    }
}
