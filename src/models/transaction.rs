// src/models/transaction.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::{auth::Segment, status::Status};

// Snapshot desnormalizado de um pedido no momento da compra
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i32,
    pub order_id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub order_date: DateTime<Utc>,
    pub status: Status,
    pub status_detail: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub client_name: String,
    pub client_segment: Segment,
    pub product_name: String,
    pub product_category: String,
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub unit_price: Decimal,
    #[schema(value_type = f64)]
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub order_id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub order_date: DateTime<Utc>,
    pub status: Status,
    pub status_detail: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub client_name: String,
    pub client_segment: Segment,
    pub product_name: String,
    pub product_category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

// ---
// Regiões do Brasil
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    North,
    Northeast,
    CenterWest,
    Southeast,
    South,
}

impl Region {
    /// Aceita "Norte", "nordeste", "centro-oeste", "CentroOeste"...
    pub fn parse(value: &str) -> Option<Self> {
        let key: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| *c != '-')
            .collect();

        match key.as_str() {
            "norte" => Some(Region::North),
            "nordeste" => Some(Region::Northeast),
            "centrooeste" => Some(Region::CenterWest),
            "sudeste" => Some(Region::Southeast),
            "sul" => Some(Region::South),
            _ => None,
        }
    }

    pub fn states(self) -> &'static [&'static str] {
        match self {
            Region::North => &["AC", "AP", "AM", "PA", "RO", "RR", "TO"],
            Region::Northeast => &["AL", "BA", "CE", "MA", "PB", "PE", "PI", "RN", "SE"],
            Region::CenterWest => &["DF", "GO", "MT", "MS"],
            Region::Southeast => &["ES", "MG", "RJ", "SP"],
            Region::South => &["PR", "RS", "SC"],
        }
    }
}

// ---
// Relatório (admin) e feed do dashboard
// ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TransactionFilters {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// norte, nordeste, centro-oeste, sudeste ou sul
    pub region: Option<String>,
    pub product_category: Option<String>,
    pub client_segment: Option<Segment>,
}

// Linha "achatada" do JOIN transactions + orders + users + products
#[derive(Debug, Clone, FromRow)]
pub struct TransactionReportRow {
    pub id: i32,
    pub quantity: i32,
    pub total_price: Decimal,
    pub city: Option<String>,
    pub state: Option<String>,

    pub order_id: i32,
    pub order_status: Status,
    pub order_status_detail: Option<String>,
    pub order_created_at: DateTime<Utc>,

    pub user_id: i32,
    pub user_name: String,
    pub user_segment: Segment,
    pub user_city: String,
    pub user_state: String,

    pub product_id: i32,
    pub product_name: String,
    pub product_category: String,
    pub product_price: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportCustomer {
    pub id: i32,
    pub name: String,
    pub segment: Segment,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportProduct {
    pub id: i32,
    pub name: String,
    pub category: String,
    #[schema(value_type = f64)]
    pub unit_price: Decimal,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub transaction_id: i32,
    pub order_id: i32,
    pub date: DateTime<Utc>,
    pub status: Status,
    pub status_detail: Option<String>,
    pub customer: ReportCustomer,
    pub product: ReportProduct,
    #[schema(value_type = f64)]
    pub total_price: Decimal,
    pub city: Option<String>,
    pub state: Option<String>,
}

impl From<TransactionReportRow> for ReportEntry {
    fn from(row: TransactionReportRow) -> Self {
        Self {
            transaction_id: row.id,
            order_id: row.order_id,
            date: row.order_created_at,
            status: row.order_status,
            status_detail: row.order_status_detail,
            customer: ReportCustomer {
                id: row.user_id,
                name: row.user_name,
                segment: row.user_segment,
            },
            product: ReportProduct {
                id: row.product_id,
                name: row.product_name,
                category: row.product_category,
                unit_price: row.product_price,
                quantity: row.quantity,
            },
            total_price: row.total_price,
            city: row.city,
            state: row.state,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    #[schema(value_type = f64)]
    pub total_sales_value: Decimal,
    pub total_quantity_sold: i64,
    pub unique_clients: usize,
    pub unique_products: usize,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReport {
    pub total_records: usize,
    pub generated_at: DateTime<Utc>,
    pub filters_used: TransactionFilters,
    pub summary: ReportSummary,
    pub data: Vec<ReportEntry>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardCustomer {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
    pub segment: Segment,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardProduct {
    pub id: i32,
    pub name: String,
    pub category: String,
    #[schema(value_type = f64)]
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardEntry {
    pub transaction_id: i32,
    pub order_id: i32,
    pub date: DateTime<Utc>,
    pub status: Status,
    #[schema(value_type = f64)]
    pub total_price: Decimal,
    pub customer: DashboardCustomer,
    pub product: DashboardProduct,
}

impl From<TransactionReportRow> for DashboardEntry {
    fn from(row: TransactionReportRow) -> Self {
        Self {
            transaction_id: row.id,
            order_id: row.order_id,
            date: row.order_created_at,
            status: row.order_status,
            total_price: row.total_price,
            customer: DashboardCustomer {
                id: row.user_id,
                name: row.user_name,
                city: row.user_city,
                state: row.user_state,
                segment: row.user_segment,
            },
            product: DashboardProduct {
                id: row.product_id,
                name: row.product_name,
                category: row.product_category,
                unit_price: row.product_price,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardFeed {
    pub data: Vec<DashboardEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parse_is_case_and_hyphen_insensitive() {
        assert_eq!(Region::parse("Norte"), Some(Region::North));
        assert_eq!(Region::parse("centro-oeste"), Some(Region::CenterWest));
        assert_eq!(Region::parse("CentroOeste"), Some(Region::CenterWest));
        assert_eq!(Region::parse(" SUL "), Some(Region::South));
        assert_eq!(Region::parse("atlantida"), None);
    }

    #[test]
    fn test_region_states() {
        assert!(Region::Southeast.states().contains(&"SP"));
        assert!(Region::CenterWest.states().contains(&"DF"));
        assert_eq!(Region::Northeast.states().len(), 9);
    }
}
