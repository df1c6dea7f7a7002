// src/services/transaction_service.rs

use std::collections::HashSet;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::{
    common::{date_filter::DateRange, error::AppError},
    db::{transaction_repo::ReportQuery, TransactionRepository},
    models::transaction::{
        DashboardEntry, DashboardFeed, Region, ReportEntry, ReportSummary, Transaction,
        TransactionFilters, TransactionReport,
    },
};

#[derive(Clone)]
pub struct TransactionService {
    transaction_repo: TransactionRepository,
}

impl TransactionService {
    pub fn new(transaction_repo: TransactionRepository) -> Self {
        Self { transaction_repo }
    }

    pub async fn report(&self, filters: TransactionFilters) -> Result<TransactionReport, AppError> {
        let query = build_report_query(&filters)?;
        let rows = self.transaction_repo.list_report_rows(&query).await?;

        let data: Vec<ReportEntry> = rows.into_iter().map(ReportEntry::from).collect();
        let summary = summarize(&data);

        Ok(TransactionReport {
            total_records: data.len(),
            generated_at: Utc::now(),
            filters_used: filters,
            summary,
            data,
        })
    }

    pub async fn find(&self, id: i32) -> Result<Transaction, AppError> {
        self.transaction_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::TransactionNotFound)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        if !self.transaction_repo.delete(id).await? {
            return Err(AppError::TransactionNotFound);
        }
        tracing::info!("🗑️ Transação {} removida", id);
        Ok(())
    }

    pub async fn dashboard_feed(&self) -> Result<DashboardFeed, AppError> {
        let rows = self.transaction_repo
            .list_report_rows(&ReportQuery::default())
            .await?;

        Ok(DashboardFeed {
            data: rows.into_iter().map(DashboardEntry::from).collect(),
        })
    }
}

// Região desconhecida não filtra nada
fn build_report_query(filters: &TransactionFilters) -> Result<ReportQuery, AppError> {
    let range = DateRange::parse(filters.start_date.as_deref(), filters.end_date.as_deref())?;

    let states = filters
        .region
        .as_deref()
        .and_then(Region::parse)
        .map(|region| region.states().iter().map(|s| s.to_string()).collect());

    let product_category = filters
        .product_category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    Ok(ReportQuery {
        range,
        states,
        product_category,
        client_segment: filters.client_segment,
    })
}

pub fn summarize(entries: &[ReportEntry]) -> ReportSummary {
    let total_sales_value = entries.iter().map(|e| e.total_price).sum::<Decimal>();
    let total_quantity_sold = entries.iter().map(|e| i64::from(e.product.quantity)).sum();
    let unique_clients = entries.iter().map(|e| e.customer.id).collect::<HashSet<_>>().len();
    let unique_products = entries.iter().map(|e| e.product.id).collect::<HashSet<_>>().len();

    ReportSummary {
        total_sales_value,
        total_quantity_sold,
        unique_clients,
        unique_products,
    }
}
