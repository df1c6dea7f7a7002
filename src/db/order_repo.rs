// src/db/order_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{date_filter::DateRange, error::AppError},
    models::{
        order::{NewOrder, Order, OrderRelationRow},
        status::Status,
    },
};

// Pedido + produto + dono do pedido, com aliases compatíveis com `OrderRelationRow`
const ORDER_RELATION_SELECT: &str = r#"
    SELECT
        o.id, o.user_id, o.product_id, o.quantity, o.total_price,
        o.status, o.status_detail, o.city, o.state, o.created_at,
        p.name       AS product_name,
        p.category   AS product_category,
        p.price      AS product_price,
        p.stock      AS product_stock,
        p.image_url  AS product_image_url,
        p.created_at AS product_created_at,
        u.name  AS user_name,
        u.city  AS user_city,
        u.state AS user_state
    FROM orders o
    JOIN products p ON p.id = o.product_id
    JOIN users u ON u.id = o.user_id
"#;

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(&self, executor: E, new_order: &NewOrder) -> Result<Order, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let order = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                user_id, product_id, quantity, total_price,
                status, status_detail, city, state
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(new_order.user_id)
        .bind(new_order.product_id)
        .bind(new_order.quantity)
        .bind(new_order.total_price)
        .bind(new_order.status)
        .bind(&new_order.status_detail)
        .bind(&new_order.city)
        .bind(&new_order.state)
        .fetch_one(executor)
        .await?;
        Ok(order)
    }

    pub async fn find_with_relations(&self, id: i32) -> Result<Option<OrderRelationRow>, AppError> {
        let sql = format!("{} WHERE o.id = $1", ORDER_RELATION_SELECT);
        let row = sqlx::query_as::<_, OrderRelationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    // Filtros opcionais: `NULL` desliga a condição correspondente
    pub async fn list_with_relations(
        &self,
        user_id: Option<i32>,
        status: Option<Status>,
        range: DateRange,
    ) -> Result<Vec<OrderRelationRow>, AppError> {
        let sql = format!(
            r#"{}
            WHERE ($1::int4 IS NULL OR o.user_id = $1)
              AND ($2::record_status IS NULL OR o.status = $2)
              AND ($3::timestamptz IS NULL OR o.created_at >= $3)
              AND ($4::timestamptz IS NULL OR o.created_at < $4)
            ORDER BY o.created_at DESC
            "#,
            ORDER_RELATION_SELECT
        );

        let rows = sqlx::query_as::<_, OrderRelationRow>(&sql)
            .bind(user_id)
            .bind(status)
            .bind(range.from)
            .bind(range.until)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // Pedidos do próprio perfil (sem relações)
    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            "SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn update_status(
        &self,
        id: i32,
        status: Option<Status>,
        status_detail: Option<&str>,
    ) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders SET
                status        = COALESCE($2, status),
                status_detail = COALESCE($3, status_detail)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(status_detail)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }
}
