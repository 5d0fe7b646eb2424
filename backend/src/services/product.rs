//! Product catalog service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{validate_price, validate_sku};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Product catalog service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Catalog product
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub barcode: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub quantity: i64,
    pub low_stock_threshold: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a product
#[derive(Debug, Deserialize)]
pub struct CreateProductInput {
    pub sku: String,
    pub barcode: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Decimal,
    pub cost_price: Option<Decimal>,
    pub low_stock_threshold: Option<i64>,
}

/// Input for updating a product
#[derive(Debug, Deserialize)]
pub struct UpdateProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub cost_price: Option<Decimal>,
    pub low_stock_threshold: Option<i64>,
}

/// Input for bulk product upload
#[derive(Debug, Deserialize)]
pub struct BulkCreateInput {
    pub products: Vec<CreateProductInput>,
}

/// Result of a bulk upload: duplicates are skipped, not rejected
#[derive(Debug, Serialize)]
pub struct BulkCreateResult {
    pub created: u64,
    pub skipped: u64,
}

const PRODUCT_COLUMNS: &str = "id, sku, barcode, name, description, category, price, cost_price, \
                               quantity, low_stock_threshold, created_at, updated_at";

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn validate(input: &CreateProductInput) -> AppResult<()> {
        validate_sku(&input.sku).map_err(|msg| AppError::Validation {
            field: "sku".to_string(),
            message: msg.to_string(),
        })?;
        validate_price(input.price).map_err(|msg| AppError::Validation {
            field: "price".to_string(),
            message: msg.to_string(),
        })?;
        if let Some(threshold) = input.low_stock_threshold {
            if threshold < 0 {
                return Err(AppError::Validation {
                    field: "low_stock_threshold".to_string(),
                    message: "Threshold cannot be negative".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Create a product
    pub async fn create(&self, input: CreateProductInput) -> AppResult<Product> {
        Self::validate(&input)?;

        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (id, sku, barcode, name, description, category, price, cost_price, low_stock_threshold)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 10))
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(Uuid::new_v4())
        .bind(&input.sku)
        .bind(&input.barcode)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.cost_price)
        .bind(input.low_stock_threshold)
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Bulk upload products, skipping rows whose SKU already exists
    pub async fn bulk_create(&self, input: BulkCreateInput) -> AppResult<BulkCreateResult> {
        if input.products.is_empty() {
            return Err(AppError::Validation {
                field: "products".to_string(),
                message: "At least one product is required".to_string(),
            });
        }
        for product in &input.products {
            Self::validate(product)?;
        }

        let mut tx = self.db.begin().await?;
        let mut created = 0u64;

        for product in &input.products {
            let result = sqlx::query(
                r#"
                INSERT INTO products (id, sku, barcode, name, description, category, price, cost_price, low_stock_threshold)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, COALESCE($9, 10))
                ON CONFLICT (sku) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(&product.sku)
            .bind(&product.barcode)
            .bind(&product.name)
            .bind(&product.description)
            .bind(&product.category)
            .bind(product.price)
            .bind(product.cost_price)
            .bind(product.low_stock_threshold)
            .execute(&mut *tx)
            .await?;
            created += result.rows_affected();
        }

        tx.commit().await?;

        Ok(BulkCreateResult {
            created,
            skipped: input.products.len() as u64 - created,
        })
    }

    /// Get a product by id
    pub async fn get(&self, product_id: Uuid) -> AppResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }

    /// List all products
    pub async fn list(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Update product fields
    pub async fn update(&self, product_id: Uuid, input: UpdateProductInput) -> AppResult<Product> {
        if let Some(price) = input.price {
            validate_price(price).map_err(|msg| AppError::Validation {
                field: "price".to_string(),
                message: msg.to_string(),
            })?;
        }

        sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                cost_price = COALESCE($6, cost_price),
                low_stock_threshold = COALESCE($7, low_stock_threshold),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(product_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.category)
        .bind(input.price)
        .bind(input.cost_price)
        .bind(input.low_stock_threshold)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))
    }
}
