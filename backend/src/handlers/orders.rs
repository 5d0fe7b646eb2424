//! HTTP handlers for order endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::sales::{CreateOrderInput, Order, OrderWithItems, SalesService};
use crate::AppState;

/// Create and complete an order
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderInput>,
) -> AppResult<Json<OrderWithItems>> {
    let service = SalesService::new(state.db);
    let order = service.create_order(input).await?;
    Ok(Json(order))
}

/// Get an order with its items
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderWithItems>> {
    let service = SalesService::new(state.db);
    let order = service.get_order(order_id).await?;
    Ok(Json(order))
}

/// List orders
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<Order>>> {
    let service = SalesService::new(state.db);
    let orders = service.list_orders().await?;
    Ok(Json(orders))
}

/// Cancel an order, reversing its stock and credit effects
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<OrderWithItems>> {
    let service = SalesService::new(state.db);
    let order = service.cancel_order(order_id).await?;
    Ok(Json(order))
}
