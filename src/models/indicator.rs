// src/models/indicator.rs

use serde::Serialize;
use utoipa::ToSchema;

// Indicadores gerais do painel admin
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Indicators {
    pub total_sales: i64,        // Total de pedidos
    pub total_open_tickets: i64, // Chamados com status "open"
    pub avg_stock: f64,          // Estoque médio dos produtos
}
