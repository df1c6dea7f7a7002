// src/db/support_repo.rs

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::{
        status::Status,
        support::{MessageSender, SupportTicket, TicketMessage, TicketRow},
    },
};

const TICKET_ROW_SELECT: &str = r#"
    SELECT
        t.id, t.user_id, t.product_id, t.description, t.status, t.opened_at, t.closed_at,
        u.name       AS user_name,
        p.name       AS product_name,
        p.category   AS product_category,
        p.price      AS product_price,
        p.stock      AS product_stock,
        p.image_url  AS product_image_url,
        p.created_at AS product_created_at
    FROM support_tickets t
    JOIN products p ON p.id = t.product_id
    LEFT JOIN users u ON u.id = t.user_id
"#;

// Como o `closed_at` deve ser tratado numa atualização
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosedAtChange {
    Keep,
    Set(Option<DateTime<Utc>>),
}

#[derive(Clone)]
pub struct SupportRepository {
    pool: PgPool,
}

impl SupportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<TicketRow>, AppError> {
        let sql = format!("{} ORDER BY t.opened_at DESC", TICKET_ROW_SELECT);
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<TicketRow>, AppError> {
        let sql = format!(
            "{} WHERE t.user_id = $1 ORDER BY t.opened_at DESC",
            TICKET_ROW_SELECT
        );
        let rows = sqlx::query_as::<_, TicketRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<SupportTicket>, AppError> {
        let ticket = sqlx::query_as::<_, SupportTicket>("SELECT * FROM support_tickets WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(ticket)
    }

    pub async fn create(
        &self,
        user_id: i32,
        product_id: i32,
        description: &str,
    ) -> Result<SupportTicket, AppError> {
        let ticket = sqlx::query_as::<_, SupportTicket>(
            r#"
            INSERT INTO support_tickets (user_id, product_id, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(product_id)
        .bind(description)
        .bind(Status::Open)
        .fetch_one(&self.pool)
        .await?;
        Ok(ticket)
    }

    pub async fn update(
        &self,
        id: i32,
        status: Option<Status>,
        closed_at: ClosedAtChange,
    ) -> Result<Option<SupportTicket>, AppError> {
        let (set_closed_at, closed_at_value) = match closed_at {
            ClosedAtChange::Keep => (false, None),
            ClosedAtChange::Set(value) => (true, value),
        };

        let ticket = sqlx::query_as::<_, SupportTicket>(
            r#"
            UPDATE support_tickets SET
                status    = COALESCE($2, status),
                closed_at = CASE WHEN $3 THEN $4 ELSE closed_at END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(set_closed_at)
        .bind(closed_at_value)
        .fetch_optional(&self.pool)
        .await?;
        Ok(ticket)
    }

    pub async fn create_message(
        &self,
        ticket_id: i32,
        sender: MessageSender,
        content: &str,
    ) -> Result<TicketMessage, AppError> {
        let message = sqlx::query_as::<_, TicketMessage>(
            r#"
            INSERT INTO ticket_messages (ticket_id, sender, content)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(ticket_id)
        .bind(sender)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;
        Ok(message)
    }

    pub async fn list_messages(&self, ticket_id: i32) -> Result<Vec<TicketMessage>, AppError> {
        let messages = sqlx::query_as::<_, TicketMessage>(
            "SELECT * FROM ticket_messages WHERE ticket_id = $1 ORDER BY created_at ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }
}
