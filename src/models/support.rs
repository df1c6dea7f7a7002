// src/models/support.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::{auth::Role, product::Product, status::Status};

pub const UNKNOWN_USER_NAME: &str = "Desconhecido";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "message_sender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Admin,
}

impl From<Role> for MessageSender {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => MessageSender::Admin,
            Role::User => MessageSender::User,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub description: String,
    pub status: Status,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TicketMessage {
    pub id: i32,
    pub ticket_id: i32,
    pub sender: MessageSender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// Linha "achatada" do JOIN support_tickets + products + users
#[derive(Debug, Clone, FromRow)]
pub struct TicketRow {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub description: String,
    pub status: Status,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,

    pub user_name: Option<String>,

    pub product_name: String,
    pub product_category: String,
    pub product_price: Decimal,
    pub product_stock: i32,
    pub product_image_url: Option<String>,
    pub product_created_at: DateTime<Utc>,
}

impl TicketRow {
    fn ticket(&self) -> SupportTicket {
        SupportTicket {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            description: self.description.clone(),
            status: self.status,
            opened_at: self.opened_at,
            closed_at: self.closed_at,
        }
    }

    pub fn into_with_product(self) -> TicketWithProduct {
        TicketWithProduct {
            ticket: self.ticket(),
            product: Product {
                id: self.product_id,
                name: self.product_name,
                category: self.product_category,
                price: self.product_price,
                stock: self.product_stock,
                image_url: self.product_image_url,
                created_at: self.product_created_at,
            },
        }
    }

    pub fn into_admin_view(self) -> AdminTicketView {
        AdminTicketView {
            id: self.id,
            user_id: self.user_id,
            user_name: self
                .user_name
                .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()),
            product_id: self.product_id,
            description: self.description,
            status: self.status,
            opened_at: self.opened_at,
            closed_at: self.closed_at,
            product: TicketProduct {
                id: self.product_id,
                name: self.product_name,
                category: self.product_category,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketWithProduct {
    #[serde(flatten)]
    pub ticket: SupportTicket,
    pub product: Product,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TicketProduct {
    pub id: i32,
    pub name: String,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminTicketView {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub product_id: i32,
    pub description: String,
    pub status: Status,
    pub opened_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub product: TicketProduct,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageCreatedResponse {
    pub message: TicketMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_follows_role() {
        assert_eq!(MessageSender::from(Role::Admin), MessageSender::Admin);
        assert_eq!(MessageSender::from(Role::User), MessageSender::User);
    }

    #[test]
    fn test_admin_view_uses_fallback_name() {
        let now = Utc::now();
        let row = TicketRow {
            id: 1,
            user_id: 42,
            product_id: 5,
            description: "Produto chegou quebrado".into(),
            status: Status::Open,
            opened_at: now,
            closed_at: None,
            user_name: None,
            product_name: "Mesa".into(),
            product_category: "Móveis".into(),
            product_price: Decimal::from(99),
            product_stock: 3,
            product_image_url: None,
            product_created_at: now,
        };

        let view = row.into_admin_view();
        assert_eq!(view.user_name, UNKNOWN_USER_NAME);
        assert_eq!(view.product.name, "Mesa");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["userName"], UNKNOWN_USER_NAME);
        assert!(json["closedAt"].is_null());
    }
}
