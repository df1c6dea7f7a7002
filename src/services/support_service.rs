// src/services/support_service.rs

use chrono::{DateTime, Utc};

use crate::{
    common::error::AppError,
    db::{support_repo::ClosedAtChange, ProductRepository, SupportRepository},
    models::{
        auth::User,
        status::Status,
        support::{AdminTicketView, MessageSender, SupportTicket, TicketMessage, TicketWithProduct},
    },
};

#[derive(Clone)]
pub struct SupportService {
    support_repo: SupportRepository,
    product_repo: ProductRepository,
}

impl SupportService {
    pub fn new(support_repo: SupportRepository, product_repo: ProductRepository) -> Self {
        Self { support_repo, product_repo }
    }

    pub async fn user_tickets(&self, user_id: i32) -> Result<Vec<TicketWithProduct>, AppError> {
        let rows = self.support_repo.list_for_user(user_id).await?;
        Ok(rows.into_iter().map(|row| row.into_with_product()).collect())
    }

    pub async fn all_tickets(&self) -> Result<Vec<AdminTicketView>, AppError> {
        let rows = self.support_repo.list_all().await?;
        Ok(rows.into_iter().map(|row| row.into_admin_view()).collect())
    }

    pub async fn open_ticket(
        &self,
        user_id: i32,
        product_id: i32,
        description: &str,
    ) -> Result<SupportTicket, AppError> {
        self.product_repo
            .find_by_id(product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let ticket = self.support_repo
            .create(user_id, product_id, description.trim())
            .await?;
        tracing::info!("🎫 Chamado {} aberto pelo usuário {}", ticket.id, user_id);
        Ok(ticket)
    }

    pub async fn update_ticket(
        &self,
        id: i32,
        status: Option<Status>,
        closed_at: Option<DateTime<Utc>>,
    ) -> Result<SupportTicket, AppError> {
        if status.is_some_and(|s| !s.is_ticket_status()) {
            return Err(AppError::InvalidTicketStatus);
        }

        self.support_repo
            .update(id, status, closed_at_change(status, closed_at, Utc::now()))
            .await?
            .ok_or(AppError::TicketNotFound)
    }

    pub async fn send_message(
        &self,
        author: &User,
        ticket_id: i32,
        content: &str,
    ) -> Result<TicketMessage, AppError> {
        self.accessible_ticket(author, ticket_id).await?;

        let sender = MessageSender::from(author.role);
        self.support_repo
            .create_message(ticket_id, sender, content.trim())
            .await
    }

    pub async fn messages(&self, reader: &User, ticket_id: i32) -> Result<Vec<TicketMessage>, AppError> {
        self.accessible_ticket(reader, ticket_id).await?;
        self.support_repo.list_messages(ticket_id).await
    }

    // Admin vê qualquer chamado; cliente só os próprios
    async fn accessible_ticket(&self, user: &User, ticket_id: i32) -> Result<SupportTicket, AppError> {
        let ticket = self.support_repo
            .find_by_id(ticket_id)
            .await?
            .ok_or(AppError::TicketNotFound)?;

        if !user.is_admin() && ticket.user_id != user.id {
            return Err(AppError::NotTicketOwner);
        }
        Ok(ticket)
    }
}

/// `closedAt` explícito vence; fechar sem data usa `now`; reabrir limpa a data.
pub fn closed_at_change(
    status: Option<Status>,
    closed_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ClosedAtChange {
    match (closed_at, status) {
        (Some(at), _) => ClosedAtChange::Set(Some(at)),
        (None, Some(Status::Closed)) => ClosedAtChange::Set(Some(now)),
        (None, Some(Status::Open | Status::InProgress)) => ClosedAtChange::Set(None),
        (None, _) => ClosedAtChange::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_explicit_closed_at_wins() {
        let at = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
        let now = Utc::now();
        assert_eq!(
            closed_at_change(Some(Status::Closed), Some(at), now),
            ClosedAtChange::Set(Some(at))
        );
        assert_eq!(closed_at_change(None, Some(at), now), ClosedAtChange::Set(Some(at)));
    }

    #[test]
    fn test_closing_stamps_now() {
        let now = Utc::now();
        assert_eq!(
            closed_at_change(Some(Status::Closed), None, now),
            ClosedAtChange::Set(Some(now))
        );
    }

    #[test]
    fn test_reopening_clears_closed_at() {
        let now = Utc::now();
        assert_eq!(closed_at_change(Some(Status::Open), None, now), ClosedAtChange::Set(None));
        assert_eq!(
            closed_at_change(Some(Status::InProgress), None, now),
            ClosedAtChange::Set(None)
        );
    }

    #[test]
    fn test_no_changes_keeps_closed_at() {
        assert_eq!(closed_at_change(None, None, Utc::now()), ClosedAtChange::Keep);
    }
}
