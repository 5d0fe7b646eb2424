//! Low-stock alert monitor
//!
//! Runs inside the same database transaction as the stock movement that
//! triggered it, so an alert never refers to a stock level that was
//! rolled back. A partial unique index on pending alerts guarantees at
//! most one open alert per product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Alert lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "alert_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Pending,
    Resolved,
}

/// Low-stock alert record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LowStockAlert {
    pub id: Uuid,
    pub product_id: Uuid,
    pub stock_level: i64,
    pub threshold: i64,
    pub status: AlertStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Whether a stock level at or below the threshold warrants an alert.
pub fn should_alert(stock_level: i64, threshold: i64) -> bool {
    stock_level <= threshold
}

/// What the monitor does with a new stock level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Level is above the threshold, leave alerts untouched
    Skip,
    /// Refresh the stock level on the product's open pending alert
    Refresh,
    /// Open a new pending alert for the product
    Open,
}

/// Decide the monitor's action for a stock level, given whether the
/// product already carries a pending alert. A qualifying level never
/// opens a second pending alert.
pub fn plan_alert(new_stock: i64, threshold: i64, has_pending: bool) -> AlertAction {
    if !should_alert(new_stock, threshold) {
        AlertAction::Skip
    } else if has_pending {
        AlertAction::Refresh
    } else {
        AlertAction::Open
    }
}

/// Fetch a product's low-stock threshold on an open connection.
pub async fn product_threshold(conn: &mut PgConnection, product_id: Uuid) -> AppResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT low_stock_threshold FROM products WHERE id = $1")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
}

/// Check a new stock level against the product threshold and record an
/// alert when it is at or below. If a pending alert already exists its
/// stock level is refreshed rather than duplicated.
pub async fn check_and_alert(
    conn: &mut PgConnection,
    product_id: Uuid,
    new_stock: i64,
    threshold: i64,
) -> AppResult<Option<LowStockAlert>> {
    let pending_id = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM low_stock_alerts WHERE product_id = $1 AND status = 'pending' FOR UPDATE",
    )
    .bind(product_id)
    .fetch_optional(&mut *conn)
    .await?;

    let alert = match plan_alert(new_stock, threshold, pending_id.is_some()) {
        AlertAction::Skip => return Ok(None),
        AlertAction::Refresh => {
            sqlx::query_as::<_, LowStockAlert>(
                r#"
                UPDATE low_stock_alerts
                SET stock_level = $2, threshold = $3, updated_at = NOW()
                WHERE id = $1
                RETURNING id, product_id, stock_level, threshold, status, created_at, updated_at
                "#,
            )
            .bind(pending_id)
            .bind(new_stock)
            .bind(threshold)
            .fetch_one(&mut *conn)
            .await?
        }
        // The partial unique index on pending alerts backstops a race
        // between two first-qualifying movements.
        AlertAction::Open => {
            sqlx::query_as::<_, LowStockAlert>(
                r#"
                INSERT INTO low_stock_alerts (id, product_id, stock_level, threshold, status)
                VALUES ($1, $2, $3, $4, 'pending')
                RETURNING id, product_id, stock_level, threshold, status, created_at, updated_at
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(product_id)
            .bind(new_stock)
            .bind(threshold)
            .fetch_one(&mut *conn)
            .await?
        }
    };

    tracing::warn!(
        product_id = %product_id,
        stock_level = new_stock,
        threshold,
        "inventory.low_stock"
    );

    Ok(Some(alert))
}

/// Alert monitor service
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all pending alerts, most recent first
    pub async fn list_pending(&self) -> AppResult<Vec<LowStockAlert>> {
        let alerts = sqlx::query_as::<_, LowStockAlert>(
            r#"
            SELECT id, product_id, stock_level, threshold, status, created_at, updated_at
            FROM low_stock_alerts
            WHERE status = 'pending'
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(alerts)
    }

    /// Mark an alert as resolved
    pub async fn resolve(&self, alert_id: Uuid) -> AppResult<LowStockAlert> {
        sqlx::query_as::<_, LowStockAlert>(
            r#"
            UPDATE low_stock_alerts
            SET status = 'resolved', updated_at = NOW()
            WHERE id = $1
            RETURNING id, product_id, stock_level, threshold, status, created_at, updated_at
            "#,
        )
        .bind(alert_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Alert".to_string()))
    }
}
