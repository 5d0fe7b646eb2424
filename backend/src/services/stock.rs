//! Stock ledger service for per-channel stock movements
//!
//! Every stock change goes through [`apply_delta`], which locks the
//! inventory row, rejects moves that would drive stock negative, writes
//! an immutable stock transaction, and keeps the denormalized product
//! quantity in step. Callers compose multiple deltas in one database
//! transaction by passing the same connection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Stock movement categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stock_transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StockTransactionType {
    Sale,
    StockIn,
    StockOut,
    Adjustment,
    CancellationReversal,
}

/// Immutable stock movement record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockTransaction {
    pub id: Uuid,
    pub product_id: Uuid,
    pub channel_id: Uuid,
    pub quantity: i64,
    pub transaction_type: StockTransactionType,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Per-channel stock level
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryLevel {
    pub product_id: Uuid,
    pub channel_id: Uuid,
    pub stock: i64,
    pub last_updated: DateTime<Utc>,
}

/// Input for a manual stock adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustStockInput {
    pub product_id: Uuid,
    pub channel_id: Uuid,
    pub delta: i64,
    pub transaction_type: StockTransactionType,
}

/// Input for a bulk adjustment (all applied in one transaction)
#[derive(Debug, Deserialize)]
pub struct BulkAdjustInput {
    pub adjustments: Vec<AdjustStockInput>,
}

/// Outcome of planning a stock delta against the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaOutcome {
    /// Existing inventory row, new level after the delta
    Updated { new_stock: i64 },
    /// No inventory row yet; a positive delta creates one
    Created { new_stock: i64 },
}

/// Why a planned delta cannot be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaError {
    /// Negative delta against a product/channel pair with no inventory row
    MissingRecord,
    /// Delta would drive stock below zero
    Insufficient { available: i64 },
    /// Delta would push the level past the representable range
    OutOfRange,
}

/// Decide what a delta does to the current stock level.
///
/// `current` is `None` when no inventory row exists for the pair.
/// Draining stock to exactly zero is allowed; going below zero is not.
pub fn plan_delta(current: Option<i64>, delta: i64) -> Result<DeltaOutcome, DeltaError> {
    match current {
        Some(stock) => match stock.checked_add(delta) {
            None => Err(DeltaError::OutOfRange),
            Some(new_stock) if new_stock < 0 => Err(DeltaError::Insufficient { available: stock }),
            Some(new_stock) => Ok(DeltaOutcome::Updated { new_stock }),
        },
        None => {
            if delta <= 0 {
                Err(DeltaError::MissingRecord)
            } else {
                Ok(DeltaOutcome::Created { new_stock: delta })
            }
        }
    }
}

/// Apply a stock delta for one product/channel pair on an open connection.
///
/// Locks the inventory row, applies the movement, records it in the
/// stock ledger, and moves the product's denormalized total quantity by
/// the same delta. Returns the new per-channel stock level.
pub async fn apply_delta(
    conn: &mut PgConnection,
    product_id: Uuid,
    channel_id: Uuid,
    delta: i64,
    transaction_type: StockTransactionType,
    order_id: Option<Uuid>,
) -> AppResult<i64> {
    let current = sqlx::query_scalar::<_, i64>(
        "SELECT stock FROM inventory WHERE product_id = $1 AND channel_id = $2 FOR UPDATE",
    )
    .bind(product_id)
    .bind(channel_id)
    .fetch_optional(&mut *conn)
    .await?;

    let outcome = plan_delta(current, delta).map_err(|err| match err {
        DeltaError::MissingRecord => {
            AppError::NotFound(format!("Inventory for product {}", product_id))
        }
        DeltaError::Insufficient { available } => AppError::InsufficientStock {
            product_id,
            available,
            requested: delta.saturating_abs(),
        },
        DeltaError::OutOfRange => AppError::Validation {
            field: "delta".to_string(),
            message: "Stock delta out of range".to_string(),
        },
    })?;

    let new_stock = match outcome {
        DeltaOutcome::Updated { new_stock } => {
            sqlx::query(
                r#"
                UPDATE inventory
                SET stock = $3, last_updated = NOW()
                WHERE product_id = $1 AND channel_id = $2
                "#,
            )
            .bind(product_id)
            .bind(channel_id)
            .bind(new_stock)
            .execute(&mut *conn)
            .await?;
            new_stock
        }
        DeltaOutcome::Created { new_stock } => {
            sqlx::query(
                r#"
                INSERT INTO inventory (product_id, channel_id, stock, last_updated)
                VALUES ($1, $2, $3, NOW())
                "#,
            )
            .bind(product_id)
            .bind(channel_id)
            .bind(new_stock)
            .execute(&mut *conn)
            .await?;
            new_stock
        }
    };

    // Keep the product-level total in step with the per-channel move.
    sqlx::query(
        "UPDATE products SET quantity = quantity + $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(product_id)
    .bind(delta)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO stock_transactions (id, product_id, channel_id, quantity, transaction_type, order_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(product_id)
    .bind(channel_id)
    .bind(delta)
    .bind(transaction_type)
    .bind(order_id)
    .execute(&mut *conn)
    .await?;

    Ok(new_stock)
}

/// Stock ledger service
#[derive(Clone)]
pub struct StockService {
    db: PgPool,
}

impl StockService {
    /// Create a new StockService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply a single manual stock adjustment
    pub async fn adjust(&self, input: AdjustStockInput) -> AppResult<InventoryLevel> {
        if input.delta == 0 {
            return Err(AppError::Validation {
                field: "delta".to_string(),
                message: "Delta must be non-zero".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        let new_stock = apply_delta(
            &mut *tx,
            input.product_id,
            input.channel_id,
            input.delta,
            input.transaction_type,
            None,
        )
        .await?;

        let threshold = super::alert::product_threshold(&mut *tx, input.product_id).await?;
        super::alert::check_and_alert(&mut *tx, input.product_id, new_stock, threshold).await?;

        tx.commit().await?;

        self.get_level(input.product_id, input.channel_id).await
    }

    /// Apply several adjustments atomically; any failure rolls back all
    pub async fn bulk_adjust(&self, input: BulkAdjustInput) -> AppResult<Vec<InventoryLevel>> {
        if input.adjustments.is_empty() {
            return Err(AppError::Validation {
                field: "adjustments".to_string(),
                message: "At least one adjustment is required".to_string(),
            });
        }

        let mut tx = self.db.begin().await?;

        for adj in &input.adjustments {
            if adj.delta == 0 {
                return Err(AppError::Validation {
                    field: "delta".to_string(),
                    message: "Delta must be non-zero".to_string(),
                });
            }

            let new_stock = apply_delta(
                &mut *tx,
                adj.product_id,
                adj.channel_id,
                adj.delta,
                adj.transaction_type,
                None,
            )
            .await?;

            let threshold = super::alert::product_threshold(&mut *tx, adj.product_id).await?;
            super::alert::check_and_alert(&mut *tx, adj.product_id, new_stock, threshold).await?;
        }

        tx.commit().await?;

        let mut levels = Vec::with_capacity(input.adjustments.len());
        for adj in &input.adjustments {
            levels.push(self.get_level(adj.product_id, adj.channel_id).await?);
        }
        Ok(levels)
    }

    /// Get the stock level for one product/channel pair
    pub async fn get_level(&self, product_id: Uuid, channel_id: Uuid) -> AppResult<InventoryLevel> {
        sqlx::query_as::<_, InventoryLevel>(
            r#"
            SELECT product_id, channel_id, stock, last_updated
            FROM inventory
            WHERE product_id = $1 AND channel_id = $2
            "#,
        )
        .bind(product_id)
        .bind(channel_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory record".to_string()))
    }

    /// List stock levels across all channels for a product
    pub async fn list_levels(&self, product_id: Uuid) -> AppResult<Vec<InventoryLevel>> {
        let levels = sqlx::query_as::<_, InventoryLevel>(
            r#"
            SELECT product_id, channel_id, stock, last_updated
            FROM inventory
            WHERE product_id = $1
            ORDER BY channel_id
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(levels)
    }

    /// List stock movements for a product, most recent first
    pub async fn list_transactions(&self, product_id: Uuid) -> AppResult<Vec<StockTransaction>> {
        let transactions = sqlx::query_as::<_, StockTransaction>(
            r#"
            SELECT id, product_id, channel_id, quantity, transaction_type, order_id, created_at
            FROM stock_transactions
            WHERE product_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_updates_existing_stock() {
        assert_eq!(
            plan_delta(Some(10), -3),
            Ok(DeltaOutcome::Updated { new_stock: 7 })
        );
        assert_eq!(
            plan_delta(Some(10), 5),
            Ok(DeltaOutcome::Updated { new_stock: 15 })
        );
    }

    #[test]
    fn delta_may_drain_stock_to_zero() {
        assert_eq!(
            plan_delta(Some(4), -4),
            Ok(DeltaOutcome::Updated { new_stock: 0 })
        );
    }

    #[test]
    fn delta_below_zero_is_rejected() {
        assert_eq!(
            plan_delta(Some(4), -5),
            Err(DeltaError::Insufficient { available: 4 })
        );
        assert_eq!(
            plan_delta(Some(0), -1),
            Err(DeltaError::Insufficient { available: 0 })
        );
    }

    #[test]
    fn positive_delta_creates_missing_record() {
        assert_eq!(
            plan_delta(None, 7),
            Ok(DeltaOutcome::Created { new_stock: 7 })
        );
    }

    #[test]
    fn non_positive_delta_against_missing_record_is_rejected() {
        assert_eq!(plan_delta(None, -1), Err(DeltaError::MissingRecord));
        assert_eq!(plan_delta(None, 0), Err(DeltaError::MissingRecord));
    }

    #[test]
    fn delta_overflowing_the_level_is_rejected() {
        assert_eq!(plan_delta(Some(1), i64::MAX), Err(DeltaError::OutOfRange));
        assert_eq!(
            plan_delta(Some(0), i64::MIN),
            Err(DeltaError::Insufficient { available: 0 })
        );
        assert_eq!(
            plan_delta(Some(i64::MAX), i64::MIN),
            Err(DeltaError::Insufficient { available: i64::MAX })
        );
    }
}
