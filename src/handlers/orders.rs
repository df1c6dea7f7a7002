// src/handlers/orders.rs

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        order::{
            OrderCreatedResponse, OrderFilters, OrderUpdatedResponse, OrderWithProduct,
            OrderWithRelations,
        },
        status::Status,
    },
};

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderPayload {
    pub product_id: i32,

    #[validate(range(min = 1, message = "A quantidade deve ser de pelo menos 1."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusPayload {
    pub status: Option<Status>,
    pub status_detail: Option<String>,
}

// ---
// Handlers
// ---

#[utoipa::path(
    post,
    path = "/api/order/user",
    tag = "Orders",
    request_body = PlaceOrderPayload,
    responses(
        (status = 201, description = "Pedido criado", body = OrderCreatedResponse),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn place_order(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<PlaceOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let order = app_state
        .order_service
        .place_order(&user, payload.product_id, payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((
        StatusCode::CREATED,
        Json(OrderCreatedResponse {
            message: "Pedido realizado com sucesso".into(),
            order,
        }),
    ))
}

// Pedidos do próprio usuário
#[utoipa::path(
    get,
    path = "/api/order",
    tag = "Orders",
    params(OrderFilters),
    responses(
        (status = 200, description = "Pedidos do usuário autenticado", body = Vec<OrderWithProduct>),
        (status = 400, description = "Data inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_user_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    query: Result<Query<OrderFilters>, QueryRejection>,
) -> Result<Json<Vec<OrderWithProduct>>, ApiError> {
    let Query(filters) = query.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    let orders = app_state
        .order_service
        .list_user_orders(user.id, &filters)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(orders))
}

// Visão administrativa, com filtros por usuário, status e período
#[utoipa::path(
    get,
    path = "/api/order/admin",
    tag = "Orders",
    params(OrderFilters),
    responses(
        (status = 200, description = "Todos os pedidos", body = Vec<OrderWithRelations>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    query: Result<Query<OrderFilters>, QueryRejection>,
) -> Result<Json<Vec<OrderWithRelations>>, ApiError> {
    let Query(filters) = query.map_err(|e| AppError::from(e).to_api_error(&locale))?;

    let orders = app_state
        .order_service
        .list_orders(&filters)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(orders))
}

#[utoipa::path(
    put,
    path = "/api/order/{id}",
    tag = "Orders",
    params(("id" = i32, Path, description = "ID do pedido")),
    request_body = UpdateOrderStatusPayload,
    responses(
        (status = 200, description = "Pedido atualizado", body = OrderUpdatedResponse),
        (status = 400, description = "Nada para atualizar"),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<Json<OrderUpdatedResponse>, ApiError> {
    let order = app_state
        .order_service
        .update_order_status(id, payload.status, payload.status_detail.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(OrderUpdatedResponse {
        message: "Pedido atualizado com sucesso".into(),
        order,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_order_requires_positive_quantity() {
        let payload: PlaceOrderPayload =
            serde_json::from_str(r#"{"productId": 4, "quantity": 0}"#).unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));

        let payload: PlaceOrderPayload =
            serde_json::from_str(r#"{"productId": 4, "quantity": 3}"#).unwrap();
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_status_update_accepts_partial_body() {
        let payload: UpdateOrderStatusPayload =
            serde_json::from_str(r#"{"statusDetail": "Enviado"}"#).unwrap();
        assert!(payload.status.is_none());
        assert_eq!(payload.status_detail.as_deref(), Some("Enviado"));

        let payload: UpdateOrderStatusPayload =
            serde_json::from_str(r#"{"status": "in_progress"}"#).unwrap();
        assert_eq!(payload.status, Some(Status::InProgress));
    }
}
