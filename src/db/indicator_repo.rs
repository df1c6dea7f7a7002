// src/db/indicator_repo.rs

use sqlx::PgPool;

use crate::{common::error::AppError, models::indicator::Indicators};

#[derive(Clone)]
pub struct IndicatorRepository {
    pool: PgPool,
}

impl IndicatorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Contagens e média num único round-trip
    pub async fn get_indicators(&self) -> Result<Indicators, AppError> {
        let indicators = sqlx::query_as::<_, Indicators>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM orders) AS total_sales,
                (SELECT COUNT(*) FROM support_tickets WHERE status = 'open') AS total_open_tickets,
                (SELECT COALESCE(AVG(stock), 0)::float8 FROM products) AS avg_stock
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(indicators)
    }
}
