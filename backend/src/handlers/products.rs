//! HTTP handlers for product and sales channel endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::channels::{ChannelService, CreateChannelInput, SalesChannel};
use crate::services::product::{
    BulkCreateInput, BulkCreateResult, CreateProductInput, Product, ProductService,
    UpdateProductInput,
};
use crate::AppState;

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.create(input).await?;
    Ok(Json(product))
}

/// Bulk upload products, skipping duplicate SKUs
pub async fn bulk_create_products(
    State(state): State<AppState>,
    Json(input): Json<BulkCreateInput>,
) -> AppResult<Json<BulkCreateResult>> {
    let service = ProductService::new(state.db);
    let result = service.bulk_create(input).await?;
    Ok(Json(result))
}

/// Get a product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// List all products
pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list().await?;
    Ok(Json(products))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.update(product_id, input).await?;
    Ok(Json(product))
}

/// Create a sales channel
pub async fn create_channel(
    State(state): State<AppState>,
    Json(input): Json<CreateChannelInput>,
) -> AppResult<Json<SalesChannel>> {
    let service = ChannelService::new(state.db);
    let channel = service.create(input).await?;
    Ok(Json(channel))
}

/// List all sales channels
pub async fn list_channels(State(state): State<AppState>) -> AppResult<Json<Vec<SalesChannel>>> {
    let service = ChannelService::new(state.db);
    let channels = service.list().await?;
    Ok(Json(channels))
}
