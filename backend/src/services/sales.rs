//! Sale orchestrator service
//!
//! Composes the stock ledger, alert monitor, and balance ledger inside
//! one database transaction per order, so a sale either fully lands
//! (stock moved, order stored, credit charged) or leaves no trace.
//! Cancellation replays the same path with the deltas inverted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::barcode::{self, MatchRule, Resolution};
use shared::validate_quantity;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::alert;
use crate::services::ledger::{self, LedgerEntryType, PartyKind};
use crate::services::stock::{self, StockTransactionType};

/// Order lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

/// Stored order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub on_credit: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored order line
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i64,
    pub price: Decimal,
}

/// Order with its lines
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// One requested order line
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i64,
}

/// Input for creating an order
#[derive(Debug, Deserialize)]
pub struct CreateOrderInput {
    pub customer_id: Option<Uuid>,
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub items: Vec<OrderItemInput>,
    #[serde(default)]
    pub on_credit: bool,
}

/// Input for selling by scanned barcode (the code travels in the path)
#[derive(Debug, Deserialize)]
pub struct BarcodeSaleInput {
    pub channel_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i64,
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub on_credit: bool,
}

/// A barcode resolved against the catalog
#[derive(Debug, Serialize)]
pub struct ResolvedProduct {
    pub product_id: Uuid,
    pub rule: MatchRule,
    pub alternates: Vec<Uuid>,
}

/// Outcome of a sell-by-barcode request
#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BarcodeSaleOutcome {
    /// Unambiguous match, sale committed
    Sold {
        rule: MatchRule,
        order: OrderWithItems,
    },
    /// Fuzzy match with competing candidates; nothing was sold
    Ambiguous {
        rule: MatchRule,
        product_id: Uuid,
        alternates: Vec<Uuid>,
    },
}

/// Price of one order line.
pub fn line_total(unit_price: Decimal, quantity: i64) -> Decimal {
    unit_price * Decimal::from(quantity)
}

/// Whether an order in the given state may be cancelled.
pub fn can_cancel(status: OrderStatus) -> bool {
    matches!(status, OrderStatus::Pending | OrderStatus::Completed)
}

#[derive(FromRow)]
struct PricedProduct {
    id: Uuid,
    price: Decimal,
    low_stock_threshold: i64,
}

const ORDER_COLUMNS: &str =
    "id, customer_id, channel_id, user_id, total_amount, status, on_credit, created_at, updated_at";

/// Sale orchestrator
#[derive(Clone)]
pub struct SalesService {
    db: PgPool,
}

impl SalesService {
    /// Create a new SalesService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create and complete an order in one transaction
    pub async fn create_order(&self, input: CreateOrderInput) -> AppResult<OrderWithItems> {
        let result = self.create_order_inner(&input).await;

        match &result {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.order.id,
                    channel_id = %input.channel_id,
                    total = %order.order.total_amount,
                    items = order.items.len(),
                    on_credit = input.on_credit,
                    "sale.completed"
                );
            }
            Err(err) => {
                tracing::warn!(
                    channel_id = %input.channel_id,
                    error = %err,
                    "sale.failed"
                );
            }
        }

        result
    }

    async fn create_order_inner(&self, input: &CreateOrderInput) -> AppResult<OrderWithItems> {
        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "Order must contain at least one item".to_string(),
            });
        }
        for item in &input.items {
            validate_quantity(item.quantity).map_err(|msg| AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            })?;
        }
        if input.on_credit && input.customer_id.is_none() {
            return Err(AppError::Validation {
                field: "customer_id".to_string(),
                message: "Credit sales require a customer".to_string(),
            });
        }

        // Lock rows in a stable order so concurrent multi-item orders
        // cannot deadlock against each other.
        let mut items = input.items.clone();
        items.sort_by_key(|item| item.product_id);

        let mut tx = self.db.begin().await?;

        let order_id = Uuid::new_v4();
        let mut total = Decimal::ZERO;
        let mut stored_items = Vec::with_capacity(items.len());

        for item in &items {
            let product = sqlx::query_as::<_, PricedProduct>(
                "SELECT id, price, low_stock_threshold FROM products WHERE id = $1",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

            let new_stock = stock::apply_delta(
                &mut *tx,
                product.id,
                input.channel_id,
                -item.quantity,
                StockTransactionType::Sale,
                Some(order_id),
            )
            .await?;

            alert::check_and_alert(&mut *tx, product.id, new_stock, product.low_stock_threshold)
                .await?;

            // Price comes from the catalog at sale time, never the client.
            total += line_total(product.price, item.quantity);
            stored_items.push((product.id, item.quantity, product.price));
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (id, customer_id, channel_id, user_id, total_amount, status, on_credit)
            VALUES ($1, $2, $3, $4, $5, 'completed', $6)
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(order_id)
        .bind(input.customer_id)
        .bind(input.channel_id)
        .bind(input.user_id)
        .bind(total)
        .bind(input.on_credit)
        .fetch_one(&mut *tx)
        .await?;

        let mut order_items = Vec::with_capacity(stored_items.len());
        for (product_id, quantity, price) in &stored_items {
            let order_item = sqlx::query_as::<_, OrderItem>(
                r#"
                INSERT INTO order_items (id, order_id, product_id, quantity, price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, order_id, product_id, quantity, price
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(order_id)
            .bind(product_id)
            .bind(quantity)
            .bind(price)
            .fetch_one(&mut *tx)
            .await?;
            order_items.push(order_item);
        }

        if input.on_credit {
            if let Some(customer_id) = input.customer_id {
                ledger::apply_entry(
                    &mut *tx,
                    PartyKind::Customer,
                    customer_id,
                    total,
                    LedgerEntryType::Charge,
                    Some(format!("Credit sale, order {}", order_id)),
                    Some(order_id),
                )
                .await?;
            }
        }

        tx.commit().await?;

        Ok(OrderWithItems {
            order,
            items: order_items,
        })
    }

    /// Cancel a completed order: reverse its stock movements and refund
    /// any credit charge, all in one transaction
    pub async fn cancel_order(&self, order_id: Uuid) -> AppResult<OrderWithItems> {
        let mut tx = self.db.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
        ))
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::InvalidState(format!("Order {} cannot be cancelled", order_id)))?;

        if !can_cancel(order.status) {
            return Err(AppError::InvalidState(format!(
                "Order {} cannot be cancelled",
                order_id
            )));
        }

        let mut items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, price
            FROM order_items
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await?;
        items.sort_by_key(|item| item.product_id);

        for item in &items {
            let new_stock = stock::apply_delta(
                &mut *tx,
                item.product_id,
                order.channel_id,
                item.quantity,
                StockTransactionType::CancellationReversal,
                Some(order_id),
            )
            .await?;

            let threshold = alert::product_threshold(&mut *tx, item.product_id).await?;
            alert::check_and_alert(&mut *tx, item.product_id, new_stock, threshold).await?;
        }

        // Refund whatever was charged to the customer for this order.
        if let Some(customer_id) = order.customer_id {
            let charged = sqlx::query_scalar::<_, Decimal>(
                r#"
                SELECT COALESCE(SUM(amount), 0)
                FROM customer_credit_transactions
                WHERE order_id = $1 AND entry_type = 'charge' AND customer_id = $2
                "#,
            )
            .bind(order_id)
            .bind(customer_id)
            .fetch_one(&mut *tx)
            .await?;

            if charged > Decimal::ZERO {
                ledger::apply_entry(
                    &mut *tx,
                    PartyKind::Customer,
                    customer_id,
                    charged,
                    LedgerEntryType::Payment,
                    Some(format!("Cancellation of order {}", order_id)),
                    Some(order_id),
                )
                .await?;
            }
        }

        let cancelled = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET status = 'cancelled', updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(order_id = %order_id, "order.cancelled");

        Ok(OrderWithItems {
            order: cancelled,
            items,
        })
    }

    /// Get an order with its items
    pub async fn get_order(&self, order_id: Uuid) -> AppResult<OrderWithItems> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let items = sqlx::query_as::<_, OrderItem>(
            r#"
            SELECT id, order_id, product_id, quantity, price
            FROM order_items
            WHERE order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        Ok(OrderWithItems { order, items })
    }

    /// List orders, most recent first
    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Resolve a scanned barcode against the product catalog
    pub async fn resolve_product(&self, raw_code: &str) -> AppResult<ResolvedProduct> {
        let catalog = self.catalog().await?;

        match barcode::resolve(raw_code, catalog.iter().map(|(_, b)| b.as_deref())) {
            Resolution::Match {
                index,
                rule,
                alternates,
            } => Ok(ResolvedProduct {
                product_id: catalog[index].0,
                rule,
                alternates: alternates.iter().map(|&i| catalog[i].0).collect(),
            }),
            Resolution::NoMatch { normalized } => Err(AppError::NotFound(format!(
                "Product with barcode '{}'",
                normalized
            ))),
        }
    }

    /// Sell by scanned barcode: resolve first, then run a one-line order.
    /// A fuzzy match with competing candidates never sells; the caller
    /// gets the candidates back to disambiguate.
    pub async fn sell_by_barcode(
        &self,
        raw_code: &str,
        input: BarcodeSaleInput,
    ) -> AppResult<BarcodeSaleOutcome> {
        let resolved = self.resolve_product(raw_code).await?;

        if resolved.rule == MatchRule::Similarity && !resolved.alternates.is_empty() {
            return Ok(BarcodeSaleOutcome::Ambiguous {
                rule: resolved.rule,
                product_id: resolved.product_id,
                alternates: resolved.alternates,
            });
        }

        let order = self
            .create_order(CreateOrderInput {
                customer_id: input.customer_id,
                channel_id: input.channel_id,
                user_id: input.user_id,
                items: vec![OrderItemInput {
                    product_id: resolved.product_id,
                    quantity: input.quantity,
                }],
                on_credit: input.on_credit,
            })
            .await?;

        Ok(BarcodeSaleOutcome::Sold {
            rule: resolved.rule,
            order,
        })
    }

    async fn catalog(&self) -> AppResult<Vec<(Uuid, Option<String>)>> {
        let rows = sqlx::query_as::<_, (Uuid, Option<String>)>(
            "SELECT id, barcode FROM products ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn line_total_multiplies_price_by_quantity() {
        assert_eq!(line_total(dec("19.99"), 3), dec("59.97"));
        assert_eq!(line_total(dec("0.10"), 10), dec("1.00"));
    }

    #[test]
    fn only_live_orders_can_be_cancelled() {
        assert!(can_cancel(OrderStatus::Pending));
        assert!(can_cancel(OrderStatus::Completed));
        assert!(!can_cancel(OrderStatus::Cancelled));
    }
}
