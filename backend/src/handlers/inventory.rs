//! HTTP handlers for stock ledger and alert endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::alert::{AlertService, LowStockAlert};
use crate::services::stock::{
    AdjustStockInput, BulkAdjustInput, InventoryLevel, StockService, StockTransaction,
};
use crate::AppState;

/// Apply a manual stock adjustment
pub async fn adjust_stock(
    State(state): State<AppState>,
    Json(input): Json<AdjustStockInput>,
) -> AppResult<Json<InventoryLevel>> {
    let service = StockService::new(state.db);
    let level = service.adjust(input).await?;
    Ok(Json(level))
}

/// Apply several adjustments atomically
pub async fn bulk_adjust_stock(
    State(state): State<AppState>,
    Json(input): Json<BulkAdjustInput>,
) -> AppResult<Json<Vec<InventoryLevel>>> {
    let service = StockService::new(state.db);
    let levels = service.bulk_adjust(input).await?;
    Ok(Json(levels))
}

/// Get per-channel stock levels for a product
pub async fn get_stock_levels(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryLevel>>> {
    let service = StockService::new(state.db);
    let levels = service.list_levels(product_id).await?;
    Ok(Json(levels))
}

/// List stock movements for a product
pub async fn list_stock_transactions(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<StockTransaction>>> {
    let service = StockService::new(state.db);
    let transactions = service.list_transactions(product_id).await?;
    Ok(Json(transactions))
}

/// List pending low-stock alerts
pub async fn list_alerts(State(state): State<AppState>) -> AppResult<Json<Vec<LowStockAlert>>> {
    let service = AlertService::new(state.db);
    let alerts = service.list_pending().await?;
    Ok(Json(alerts))
}

/// Mark an alert as resolved
pub async fn resolve_alert(
    State(state): State<AppState>,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<LowStockAlert>> {
    let service = AlertService::new(state.db);
    let alert = service.resolve(alert_id).await?;
    Ok(Json(alert))
}
