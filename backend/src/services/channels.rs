//! Sales channel service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Sales channel service
#[derive(Clone)]
pub struct ChannelService {
    db: PgPool,
}

/// A sales channel (storefront, online shop, market stall)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SalesChannel {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a sales channel
#[derive(Debug, Deserialize)]
pub struct CreateChannelInput {
    pub name: String,
    pub description: Option<String>,
}

impl ChannelService {
    /// Create a new ChannelService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a sales channel
    pub async fn create(&self, input: CreateChannelInput) -> AppResult<SalesChannel> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Channel name cannot be empty".to_string(),
            });
        }

        let channel = sqlx::query_as::<_, SalesChannel>(
            r#"
            INSERT INTO sales_channels (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(channel)
    }

    /// List all sales channels
    pub async fn list(&self) -> AppResult<Vec<SalesChannel>> {
        let channels = sqlx::query_as::<_, SalesChannel>(
            "SELECT id, name, description, created_at FROM sales_channels ORDER BY created_at",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(channels)
    }
}
