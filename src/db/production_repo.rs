// src/db/production_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        production::{Production, ProductionRow},
        status::Status,
    },
};

#[derive(Clone)]
pub struct ProductionRepository {
    pool: PgPool,
}

impl ProductionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_with_product(&self) -> Result<Vec<ProductionRow>, AppError> {
        let rows = sqlx::query_as::<_, ProductionRow>(
            r#"
            SELECT
                pr.id, pr.product_id, pr.quantity_planned, pr.quantity_produced,
                pr.status, pr.created_at, pr.updated_at,
                p.name       AS product_name,
                p.category   AS product_category,
                p.price      AS product_price,
                p.stock      AS product_stock,
                p.image_url  AS product_image_url,
                p.created_at AS product_created_at
            FROM productions pr
            JOIN products p ON p.id = pr.product_id
            ORDER BY pr.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, product_id: i32, quantity_planned: i32) -> Result<Production, AppError> {
        let production = sqlx::query_as::<_, Production>(
            r#"
            INSERT INTO productions (product_id, quantity_planned)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(quantity_planned)
        .fetch_one(&self.pool)
        .await?;
        Ok(production)
    }

    pub async fn update_status(
        &self,
        id: i32,
        status: Option<Status>,
        quantity_produced: Option<i32>,
    ) -> Result<Option<Production>, AppError> {
        let production = sqlx::query_as::<_, Production>(
            r#"
            UPDATE productions SET
                status            = COALESCE($2, status),
                quantity_produced = COALESCE($3, quantity_produced),
                updated_at        = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(quantity_produced)
        .fetch_optional(&self.pool)
        .await?;
        Ok(production)
    }
}
