// src/handlers/support.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::validate_not_blank,
    },
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        status::Status,
        support::{
            AdminTicketView, MessageCreatedResponse, SupportTicket, TicketMessage,
            TicketWithProduct,
        },
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTicketPayload {
    pub product_id: i32,

    #[validate(custom(function = "validate_not_blank"))]
    pub description: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicketPayload {
    pub status: Option<Status>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMessagePayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub content: String,
}

// Chamados do usuário autenticado
#[utoipa::path(
    get,
    path = "/api/support",
    tag = "Support",
    responses((status = 200, description = "Chamados do usuário", body = Vec<TicketWithProduct>)),
    security(("api_jwt" = []))
)]
pub async fn list_user_tickets(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<TicketWithProduct>>, ApiError> {
    let tickets = app_state
        .support_service
        .user_tickets(user.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(tickets))
}

#[utoipa::path(
    get,
    path = "/api/support/admin",
    tag = "Support",
    responses(
        (status = 200, description = "Todos os chamados", body = Vec<AdminTicketView>),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_all_tickets(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<AdminTicketView>>, ApiError> {
    let tickets = app_state
        .support_service
        .all_tickets()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(tickets))
}

#[utoipa::path(
    post,
    path = "/api/support",
    tag = "Support",
    request_body = CreateTicketPayload,
    responses(
        (status = 201, description = "Chamado aberto", body = SupportTicket),
        (status = 400, description = "Descrição vazia"),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn open_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateTicketPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let ticket = app_state
        .support_service
        .open_ticket(user.id, payload.product_id, &payload.description)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(ticket)))
}

#[utoipa::path(
    put,
    path = "/api/support/{id}",
    tag = "Support",
    params(("id" = i32, Path, description = "ID do chamado")),
    request_body = UpdateTicketPayload,
    responses(
        (status = 200, description = "Chamado atualizado", body = SupportTicket),
        (status = 400, description = "Status inválido para chamado"),
        (status = 404, description = "Chamado não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_ticket(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateTicketPayload>,
) -> Result<Json<SupportTicket>, ApiError> {
    let ticket = app_state
        .support_service
        .update_ticket(id, payload.status, payload.closed_at)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ticket))
}

#[utoipa::path(
    post,
    path = "/api/support/{id}/message",
    tag = "Support",
    params(("id" = i32, Path, description = "ID do chamado")),
    request_body = CreateMessagePayload,
    responses(
        (status = 201, description = "Mensagem enviada", body = MessageCreatedResponse),
        (status = 403, description = "Chamado de outro usuário"),
        (status = 404, description = "Chamado não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<CreateMessagePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let message = app_state
        .support_service
        .send_message(&user, id, &payload.content)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(MessageCreatedResponse { message })))
}

#[utoipa::path(
    get,
    path = "/api/support/{id}/message",
    tag = "Support",
    params(("id" = i32, Path, description = "ID do chamado")),
    responses(
        (status = 200, description = "Mensagens em ordem cronológica", body = Vec<TicketMessage>),
        (status = 403, description = "Chamado de outro usuário"),
        (status = 404, description = "Chamado não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_messages(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Vec<TicketMessage>>, ApiError> {
    let messages = app_state
        .support_service
        .messages(&user, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_is_rejected() {
        let payload: CreateTicketPayload =
            serde_json::from_str(r#"{"productId": 2, "description": "   "}"#).unwrap();
        assert!(payload.validate().unwrap_err().field_errors().contains_key("description"));
    }

    #[test]
    fn test_update_ticket_parses_closed_at() {
        let payload: UpdateTicketPayload = serde_json::from_str(
            r#"{"status": "closed", "closedAt": "2025-04-01T10:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(payload.status, Some(Status::Closed));
        assert!(payload.closed_at.is_some());
    }

    #[test]
    fn test_blank_message_is_rejected() {
        let payload: CreateMessagePayload = serde_json::from_str(r#"{"content": ""}"#).unwrap();
        assert!(payload.validate().is_err());
    }
}
