// src/models/production.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::{product::Product, status::Status};

// Ordem de produção de um produto
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: i32,
    pub product_id: i32,
    pub quantity_planned: i32,
    pub quantity_produced: i32,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ProductionRow {
    pub id: i32,
    pub product_id: i32,
    pub quantity_planned: i32,
    pub quantity_produced: i32,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub product_name: String,
    pub product_category: String,
    pub product_price: Decimal,
    pub product_stock: i32,
    pub product_image_url: Option<String>,
    pub product_created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductionWithProduct {
    #[serde(flatten)]
    pub production: Production,
    pub product: Product,
}

impl From<ProductionRow> for ProductionWithProduct {
    fn from(row: ProductionRow) -> Self {
        Self {
            production: Production {
                id: row.id,
                product_id: row.product_id,
                quantity_planned: row.quantity_planned,
                quantity_produced: row.quantity_produced,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            product: Product {
                id: row.product_id,
                name: row.product_name,
                category: row.product_category,
                price: row.product_price,
                stock: row.product_stock,
                image_url: row.product_image_url,
                created_at: row.product_created_at,
            },
        }
    }
}
