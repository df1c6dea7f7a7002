// src/db/transaction_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{date_filter::DateRange, error::AppError},
    models::{
        auth::Segment,
        transaction::{NewTransaction, Transaction, TransactionReportRow},
    },
};

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

// Filtros já resolvidos do relatório
#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    pub range: DateRange,
    pub states: Option<Vec<String>>,
    pub product_category: Option<String>,
    pub client_segment: Option<Segment>,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Grava o snapshot do pedido (sempre dentro da transação do pedido)
    pub async fn create<'e, E>(&self, executor: E, new_tx: &NewTransaction) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                order_id, user_id, product_id, order_date, status, status_detail,
                city, state, client_name, client_segment, product_name,
                product_category, quantity, unit_price, total_price
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(new_tx.order_id)
        .bind(new_tx.user_id)
        .bind(new_tx.product_id)
        .bind(new_tx.order_date)
        .bind(new_tx.status)
        .bind(&new_tx.status_detail)
        .bind(&new_tx.city)
        .bind(&new_tx.state)
        .bind(&new_tx.client_name)
        .bind(new_tx.client_segment)
        .bind(&new_tx.product_name)
        .bind(&new_tx.product_category)
        .bind(new_tx.quantity)
        .bind(new_tx.unit_price)
        .bind(new_tx.total_price)
        .fetch_one(executor)
        .await?;
        Ok(transaction)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Transaction>, AppError> {
        let transaction = sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(transaction)
    }

    /// Retorna `true` quando alguma linha foi apagada.
    pub async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_report_rows(&self, query: &ReportQuery) -> Result<Vec<TransactionReportRow>, AppError> {
        let category_pattern = query.product_category.as_deref().map(contains_pattern);

        let rows = sqlx::query_as::<_, TransactionReportRow>(
            r#"
            SELECT
                t.id, t.quantity, t.total_price, t.city, t.state,
                o.id         AS order_id,
                o.status     AS order_status,
                o.status_detail AS order_status_detail,
                o.created_at AS order_created_at,
                u.id      AS user_id,
                u.name    AS user_name,
                u.segment AS user_segment,
                u.city    AS user_city,
                u.state   AS user_state,
                p.id       AS product_id,
                p.name     AS product_name,
                p.category AS product_category,
                p.price    AS product_price
            FROM transactions t
            JOIN orders o ON o.id = t.order_id
            JOIN users u ON u.id = t.user_id
            JOIN products p ON p.id = t.product_id
            WHERE ($1::timestamptz IS NULL OR o.created_at >= $1)
              AND ($2::timestamptz IS NULL OR o.created_at < $2)
              AND ($3::text[] IS NULL OR t.state = ANY($3))
              AND ($4::text IS NULL OR p.category ILIKE $4 ESCAPE '\')
              AND ($5::client_segment IS NULL OR u.segment = $5)
            ORDER BY t.id DESC
            "#,
        )
        .bind(query.range.from)
        .bind(query.range.until)
        .bind(&query.states)
        .bind(category_pattern)
        .bind(query.client_segment)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Padrão `ILIKE` de "contém", com `%`, `_` e `\` do usuário tratados como literais.
fn contains_pattern(raw: &str) -> String {
    let mut pattern = String::with_capacity(raw.len() + 2);
    pattern.push('%');
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Móveis"), "%Móveis%");
        assert_eq!(contains_pattern("_"), "%\\_%");
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
