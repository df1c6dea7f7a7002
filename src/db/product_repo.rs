// src/db/product_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::product::{Product, ProductChanges},
};

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn list(&self) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn create(
        &self,
        name: &str,
        category: &str,
        price: Decimal,
        stock: i32,
        image_url: Option<&str>,
    ) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, category, price, stock, image_url)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(category)
        .bind(price)
        .bind(stock)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    pub async fn update(&self, id: i32, changes: &ProductChanges) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name      = COALESCE($2, name),
                category  = COALESCE($3, category),
                price     = COALESCE($4, price),
                stock     = COALESCE($5, stock),
                image_url = COALESCE($6, image_url)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.category)
        .bind(changes.price)
        .bind(changes.stock)
        .bind(&changes.image_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    /// Baixa atômica de estoque: `None` quando não há saldo suficiente.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        id: i32,
        quantity: i32,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET stock = stock - $2
            WHERE id = $1 AND stock >= $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(executor)
        .await?;
        Ok(product)
    }
}
