//! Customer service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::validate_email;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Customer with running credit balance
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub credit_balance: Decimal,
    pub credit_limit: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a customer
#[derive(Debug, Deserialize)]
pub struct CreateCustomerInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub credit_limit: Option<Decimal>,
}

const CUSTOMER_COLUMNS: &str =
    "id, name, phone, email, credit_balance, credit_limit, created_at, updated_at";

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a customer. When a phone number is given and a customer
    /// already carries it, that customer is returned instead.
    pub async fn create(&self, input: CreateCustomerInput) -> AppResult<Customer> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Customer name cannot be empty".to_string(),
            });
        }
        if let Some(email) = &input.email {
            validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
            })?;
        }

        if let Some(phone) = &input.phone {
            let existing = sqlx::query_as::<_, Customer>(&format!(
                "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE phone = $1"
            ))
            .bind(phone)
            .fetch_optional(&self.db)
            .await?;

            if let Some(customer) = existing {
                return Ok(customer);
            }
        }

        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (id, name, phone, email, credit_limit)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0))
            RETURNING {CUSTOMER_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(input.name.trim())
        .bind(&input.phone)
        .bind(&input.email)
        .bind(input.credit_limit)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    /// Get a customer by id
    pub async fn get(&self, customer_id: Uuid) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))
    }

    /// List all customers
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY created_at"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }

    /// List customers carrying a non-zero credit balance
    pub async fn list_with_credit(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE credit_balance <> 0
            ORDER BY credit_balance DESC
            "#,
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }
}
