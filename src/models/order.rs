// src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::models::{product::Product, status::Status};

pub const NEW_ORDER_STATUS_DETAIL: &str = "Awaiting payment";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    #[schema(value_type = f64)]
    pub total_price: Decimal,
    pub status: Status,
    pub status_detail: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: Status,
    pub status_detail: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

// Linha "achatada" do JOIN orders + products + users
#[derive(Debug, Clone, FromRow)]
pub struct OrderRelationRow {
    pub id: i32,
    pub user_id: i32,
    pub product_id: i32,
    pub quantity: i32,
    pub total_price: Decimal,
    pub status: Status,
    pub status_detail: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub created_at: DateTime<Utc>,

    pub product_name: String,
    pub product_category: String,
    pub product_price: Decimal,
    pub product_stock: i32,
    pub product_image_url: Option<String>,
    pub product_created_at: DateTime<Utc>,

    pub user_name: String,
    pub user_city: String,
    pub user_state: String,
}

impl OrderRelationRow {
    fn product(&self) -> Product {
        Product {
            id: self.product_id,
            name: self.product_name.clone(),
            category: self.product_category.clone(),
            price: self.product_price,
            stock: self.product_stock,
            image_url: self.product_image_url.clone(),
            created_at: self.product_created_at,
        }
    }

    fn order(&self) -> Order {
        Order {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            quantity: self.quantity,
            total_price: self.total_price,
            status: self.status,
            status_detail: self.status_detail.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            created_at: self.created_at,
        }
    }

    /// Visão do admin: cidade/estado do pedido caem para os do usuário quando ausentes.
    pub fn into_with_relations(self) -> OrderWithRelations {
        let product = self.product();
        let mut order = self.order();
        order.city = order.city.or_else(|| Some(self.user_city.clone()));
        order.state = order.state.or_else(|| Some(self.user_state.clone()));

        OrderWithRelations {
            order,
            product,
            user: OrderCustomer {
                id: self.user_id,
                name: self.user_name,
                city: self.user_city,
                state: self.user_state,
            },
        }
    }

    pub fn into_with_product(self) -> OrderWithProduct {
        OrderWithProduct {
            order: self.order(),
            product: self.product(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderCustomer {
    pub id: i32,
    pub name: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderWithRelations {
    #[serde(flatten)]
    pub order: Order,
    pub product: Product,
    pub user: OrderCustomer,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderWithProduct {
    #[serde(flatten)]
    pub order: Order,
    pub product: Product,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    #[serde(flatten)]
    pub order: Order,
    pub product_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCreatedResponse {
    pub message: String,
    pub order: PlacedOrder,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderUpdatedResponse {
    pub message: String,
    pub order: OrderWithRelations,
}

// ---
// Filtros (query string)
// ---

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OrderFilters {
    pub user_id: Option<i32>,
    pub status: Option<Status>,
    /// RFC 3339 ou `YYYY-MM-DD`
    pub start_date: Option<String>,
    /// RFC 3339 ou `YYYY-MM-DD` (dia inteiro incluído)
    pub end_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_row(city: Option<&str>) -> OrderRelationRow {
        let created_at = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        OrderRelationRow {
            id: 7,
            user_id: 3,
            product_id: 9,
            quantity: 2,
            total_price: Decimal::from(300),
            status: Status::Pending,
            status_detail: Some(NEW_ORDER_STATUS_DETAIL.into()),
            city: city.map(str::to_string),
            state: None,
            created_at,
            product_name: "Cadeira".into(),
            product_category: "Móveis".into(),
            product_price: Decimal::from(150),
            product_stock: 10,
            product_image_url: None,
            product_created_at: created_at,
            user_name: "Maria".into(),
            user_city: "Rio Claro".into(),
            user_state: "SP".into(),
        }
    }

    #[test]
    fn test_admin_view_falls_back_to_user_location() {
        let view = sample_row(None).into_with_relations();
        assert_eq!(view.order.city.as_deref(), Some("Rio Claro"));
        assert_eq!(view.order.state.as_deref(), Some("SP"));
        assert_eq!(view.user.name, "Maria");
        assert_eq!(view.product.id, 9);
    }

    #[test]
    fn test_admin_view_keeps_order_location() {
        let view = sample_row(Some("Campinas")).into_with_relations();
        assert_eq!(view.order.city.as_deref(), Some("Campinas"));
    }

    #[test]
    fn test_flattened_json_shape() {
        let json = serde_json::to_value(sample_row(None).into_with_product()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["totalPrice"], 300.0);
        assert_eq!(json["statusDetail"], NEW_ORDER_STATUS_DETAIL);
        assert_eq!(json["product"]["name"], "Cadeira");
    }
}
