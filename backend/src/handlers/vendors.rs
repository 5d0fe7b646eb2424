//! HTTP handlers for vendor endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::ledger::{
    LedgerEntry, LedgerPosting, LedgerService, PartyKind, RecordPaymentInput,
};
use crate::services::vendors::{CreateVendorInput, Vendor, VendorService};
use crate::AppState;

/// Create a vendor
pub async fn create_vendor(
    State(state): State<AppState>,
    Json(input): Json<CreateVendorInput>,
) -> AppResult<Json<Vendor>> {
    let service = VendorService::new(state.db);
    let vendor = service.create(input).await?;
    Ok(Json(vendor))
}

/// Get a vendor
pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<Vendor>> {
    let service = VendorService::new(state.db);
    let vendor = service.get(vendor_id).await?;
    Ok(Json(vendor))
}

/// List all vendors
pub async fn list_vendors(State(state): State<AppState>) -> AppResult<Json<Vec<Vendor>>> {
    let service = VendorService::new(state.db);
    let vendors = service.list().await?;
    Ok(Json(vendors))
}

/// Record a payment against a vendor's balance
pub async fn record_vendor_payment(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    Json(input): Json<RecordPaymentInput>,
) -> AppResult<Json<LedgerPosting>> {
    let service = LedgerService::new(state.db);
    let posting = service
        .record_payment(PartyKind::Vendor, vendor_id, input)
        .await?;
    Ok(Json(posting))
}

/// List a vendor's ledger entries
pub async fn vendor_ledger(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<Vec<LedgerEntry>>> {
    let service = LedgerService::new(state.db);
    let entries = service.history(PartyKind::Vendor, vendor_id).await?;
    Ok(Json(entries))
}
