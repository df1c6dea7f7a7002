// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// Produto do catálogo, com o saldo de estoque
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub category: String,
    #[schema(value_type = f64)]
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Alterações parciais de um produto (campos `None` ficam como estão)
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub image_url: Option<String>,
}
