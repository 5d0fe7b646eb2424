//! HTTP handlers for customer and customer credit endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::customers::{CreateCustomerInput, Customer, CustomerService};
use crate::services::ledger::{
    LedgerEntry, LedgerPosting, LedgerService, PartyKind, RecordPaymentInput,
};
use crate::AppState;

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service.create(input).await?;
    Ok(Json(customer))
}

/// Get a customer
pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Customer>> {
    let service = CustomerService::new(state.db);
    let customer = service.get(customer_id).await?;
    Ok(Json(customer))
}

/// List all customers
pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    let customers = service.list().await?;
    Ok(Json(customers))
}

/// List customers with a non-zero credit balance
pub async fn customers_with_credit(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Customer>>> {
    let service = CustomerService::new(state.db);
    let customers = service.list_with_credit().await?;
    Ok(Json(customers))
}

/// Record a payment against a customer's credit balance
pub async fn record_customer_payment(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<RecordPaymentInput>,
) -> AppResult<Json<LedgerPosting>> {
    let service = LedgerService::new(state.db);
    let posting = service
        .record_payment(PartyKind::Customer, customer_id, input)
        .await?;
    Ok(Json(posting))
}

/// List a customer's credit ledger entries
pub async fn customer_ledger(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Vec<LedgerEntry>>> {
    let service = LedgerService::new(state.db);
    let entries = service.history(PartyKind::Customer, customer_id).await?;
    Ok(Json(entries))
}
