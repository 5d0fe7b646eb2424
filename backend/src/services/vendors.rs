//! Vendor service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::validate_email;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Vendor service
#[derive(Clone)]
pub struct VendorService {
    db: PgPool,
}

/// Vendor with running payable balance
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a vendor
#[derive(Debug, Deserialize)]
pub struct CreateVendorInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

const VENDOR_COLUMNS: &str = "id, name, phone, email, balance, created_at, updated_at";

impl VendorService {
    /// Create a new VendorService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a vendor
    pub async fn create(&self, input: CreateVendorInput) -> AppResult<Vendor> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Vendor name cannot be empty".to_string(),
            });
        }
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            r#"
            INSERT INTO vendors (id, name, phone, email)
            VALUES ($1, $2, $3, $4)
            RETURNING {VENDOR_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(input.name.trim())
        .bind(&input.phone)
        .bind(&input.email)
        .fetch_one(&self.db)
        .await?;

        Ok(vendor)
    }

    /// Get a vendor by id
    pub async fn get(&self, vendor_id: Uuid) -> AppResult<Vendor> {
        sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors WHERE id = $1"
        ))
        .bind(vendor_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Vendor".to_string()))
    }

    /// List all vendors
    pub async fn list(&self) -> AppResult<Vec<Vendor>> {
        let vendors = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {VENDOR_COLUMNS} FROM vendors ORDER BY created_at"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(vendors)
    }
}
