//! Balance ledger service for customer credit and vendor balances
//!
//! Both party kinds share one entry engine: a CHARGE raises the party's
//! balance (they owe more) and a PAYMENT lowers it. Every balance change
//! pairs a locked balance update with an immutable ledger entry in the
//! same database transaction. Balances may go negative (overpayment).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_ledger_amount, validate_payment_amount};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Ledger entry directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ledger_entry_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LedgerEntryType {
    Payment,
    Charge,
}

/// Which party table a ledger entry targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    Customer,
    Vendor,
}

impl PartyKind {
    fn party_table(&self) -> &'static str {
        match self {
            PartyKind::Customer => "customers",
            PartyKind::Vendor => "vendors",
        }
    }

    fn balance_column(&self) -> &'static str {
        match self {
            PartyKind::Customer => "credit_balance",
            PartyKind::Vendor => "balance",
        }
    }

    fn ledger_table(&self) -> &'static str {
        match self {
            PartyKind::Customer => "customer_credit_transactions",
            PartyKind::Vendor => "vendor_transactions",
        }
    }

    fn party_column(&self) -> &'static str {
        match self {
            PartyKind::Customer => "customer_id",
            PartyKind::Vendor => "vendor_id",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            PartyKind::Customer => "Customer",
            PartyKind::Vendor => "Vendor",
        }
    }
}

/// Immutable balance ledger entry
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub party_id: Uuid,
    pub amount: Decimal,
    pub entry_type: LedgerEntryType,
    pub description: Option<String>,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// A ledger entry plus the balance it produced
#[derive(Debug, Clone, Serialize)]
pub struct LedgerPosting {
    pub entry: LedgerEntry,
    pub new_balance: Decimal,
}

/// Input for recording a payment against a party's balance
#[derive(Debug, Deserialize)]
pub struct RecordPaymentInput {
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Balance movement produced by an entry: CHARGE raises, PAYMENT lowers.
pub fn signed_delta(entry_type: LedgerEntryType, amount: Decimal) -> Decimal {
    match entry_type {
        LedgerEntryType::Charge => amount,
        LedgerEntryType::Payment => -amount,
    }
}

/// Apply a ledger entry on an open connection: lock the party row, move
/// the balance, and write the paired immutable entry. Returns the entry
/// and the new balance.
pub async fn apply_entry(
    conn: &mut PgConnection,
    kind: PartyKind,
    party_id: Uuid,
    amount: Decimal,
    entry_type: LedgerEntryType,
    description: Option<String>,
    order_id: Option<Uuid>,
) -> AppResult<LedgerPosting> {
    validate_ledger_amount(amount).map_err(|msg| AppError::Validation {
        field: "amount".to_string(),
        message: msg.to_string(),
    })?;
    if entry_type == LedgerEntryType::Payment {
        validate_payment_amount(amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
        })?;
    }

    let lock_sql = format!(
        "SELECT {balance} FROM {table} WHERE id = $1 FOR UPDATE",
        balance = kind.balance_column(),
        table = kind.party_table(),
    );
    let balance = sqlx::query_scalar::<_, Decimal>(&lock_sql)
        .bind(party_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::PartyNotFound(kind.label().to_string()))?;

    let new_balance = balance + signed_delta(entry_type, amount);

    let update_sql = format!(
        "UPDATE {table} SET {balance} = $2, updated_at = NOW() WHERE id = $1",
        table = kind.party_table(),
        balance = kind.balance_column(),
    );
    sqlx::query(&update_sql)
        .bind(party_id)
        .bind(new_balance)
        .execute(&mut *conn)
        .await?;

    let insert_sql = format!(
        r#"
        INSERT INTO {table} (id, {party}, amount, entry_type, description, order_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, {party} AS party_id, amount, entry_type, description, order_id, created_at
        "#,
        table = kind.ledger_table(),
        party = kind.party_column(),
    );
    let entry = sqlx::query_as::<_, LedgerEntry>(&insert_sql)
        .bind(Uuid::new_v4())
        .bind(party_id)
        .bind(amount)
        .bind(entry_type)
        .bind(description)
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(LedgerPosting { entry, new_balance })
}

/// Balance ledger service
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

impl LedgerService {
    /// Create a new LedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a payment against a party's outstanding balance
    pub async fn record_payment(
        &self,
        kind: PartyKind,
        party_id: Uuid,
        input: RecordPaymentInput,
    ) -> AppResult<LedgerPosting> {
        let mut tx = self.db.begin().await?;

        let posting = apply_entry(
            &mut *tx,
            kind,
            party_id,
            input.amount,
            LedgerEntryType::Payment,
            input.description,
            None,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            party_kind = ?kind,
            party_id = %party_id,
            amount = %input.amount,
            new_balance = %posting.new_balance,
            "ledger.payment"
        );

        Ok(posting)
    }

    /// List a party's ledger entries, most recent first
    pub async fn history(&self, kind: PartyKind, party_id: Uuid) -> AppResult<Vec<LedgerEntry>> {
        let exists_sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1)",
            table = kind.party_table(),
        );
        let exists = sqlx::query_scalar::<_, bool>(&exists_sql)
            .bind(party_id)
            .fetch_one(&self.db)
            .await?;

        if !exists {
            return Err(AppError::PartyNotFound(kind.label().to_string()));
        }

        let list_sql = format!(
            r#"
            SELECT id, {party} AS party_id, amount, entry_type, description, order_id, created_at
            FROM {table}
            WHERE {party} = $1
            ORDER BY created_at DESC
            "#,
            table = kind.ledger_table(),
            party = kind.party_column(),
        );
        let entries = sqlx::query_as::<_, LedgerEntry>(&list_sql)
            .bind(party_id)
            .fetch_all(&self.db)
            .await?;

        Ok(entries)
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
    fn charge_raises_balance() {
        assert_eq!(signed_delta(LedgerEntryType::Charge, dec("50")), dec("50"));
    }

    #[test]
    fn payment_lowers_balance() {
        assert_eq!(
            signed_delta(LedgerEntryType::Payment, dec("30")),
            dec("-30")
        );
    }

    #[test]
    fn party_kind_table_mapping() {
        assert_eq!(PartyKind::Customer.ledger_table(), "customer_credit_transactions");
        assert_eq!(PartyKind::Vendor.ledger_table(), "vendor_transactions");
        assert_eq!(PartyKind::Customer.balance_column(), "credit_balance");
        assert_eq!(PartyKind::Vendor.balance_column(), "balance");
    }
}
