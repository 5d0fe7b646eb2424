//! Route definitions for the POS Inventory Platform

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Product catalog
        .nest("/products", product_routes())
        // Sales channels
        .nest("/channels", channel_routes())
        // Stock ledger and alerts
        .nest("/inventory", inventory_routes())
        // Orders
        .nest("/orders", order_routes())
        // Customers and credit
        .nest("/customers", customer_routes())
        // Vendors and payables
        .nest("/vendors", vendor_routes())
        // Barcode scanning
        .nest("/barcode", barcode_routes())
}

/// Product catalog routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route("/bulk", post(handlers::bulk_create_products))
        .route(
            "/:product_id",
            get(handlers::get_product).put(handlers::update_product),
        )
}

/// Sales channel routes
fn channel_routes() -> Router<AppState> {
    Router::new().route(
        "/",
        get(handlers::list_channels).post(handlers::create_channel),
    )
}

/// Stock ledger routes
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/adjust", post(handlers::adjust_stock))
        .route("/bulk-adjust", post(handlers::bulk_adjust_stock))
        .route("/alerts", get(handlers::list_alerts))
        .route("/alerts/:alert_id/resolve", post(handlers::resolve_alert))
        .route("/:product_id", get(handlers::get_stock_levels))
        .route(
            "/:product_id/transactions",
            get(handlers::list_stock_transactions),
        )
}

/// Order routes
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/:order_id", get(handlers::get_order))
        .route("/:order_id/cancel", post(handlers::cancel_order))
}

/// Customer routes
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route("/credit", get(handlers::customers_with_credit))
        .route("/:customer_id", get(handlers::get_customer))
        .route(
            "/:customer_id/payments",
            post(handlers::record_customer_payment),
        )
        .route("/:customer_id/ledger", get(handlers::customer_ledger))
}

/// Vendor routes
fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_vendors).post(handlers::create_vendor),
        )
        .route("/:vendor_id", get(handlers::get_vendor))
        .route("/:vendor_id/payments", post(handlers::record_vendor_payment))
        .route("/:vendor_id/ledger", get(handlers::vendor_ledger))
}

/// Barcode scanning routes
fn barcode_routes() -> Router<AppState> {
    Router::new()
        .route("/resolve/:code", get(handlers::resolve_barcode))
        .route("/sell/:code", post(handlers::sell_by_barcode))
}
