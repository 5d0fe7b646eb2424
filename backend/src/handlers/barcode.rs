//! HTTP handlers for barcode scanning endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::error::AppResult;
use crate::services::sales::{BarcodeSaleInput, BarcodeSaleOutcome, ResolvedProduct, SalesService};
use crate::AppState;

/// Resolve a scanned barcode to a product without selling
pub async fn resolve_barcode(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<ResolvedProduct>> {
    let service = SalesService::new(state.db);
    let resolved = service.resolve_product(&code).await?;
    Ok(Json(resolved))
}

/// Sell a scanned product in a single step
pub async fn sell_by_barcode(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(input): Json<BarcodeSaleInput>,
) -> AppResult<Json<BarcodeSaleOutcome>> {
    let service = SalesService::new(state.db);
    let outcome = service.sell_by_barcode(&code, input).await?;
    Ok(Json(outcome))
}
