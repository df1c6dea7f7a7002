// src/handlers/production.rs

use axum::{
    extract::{Path, State},
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
    middleware::i18n::Locale,
    models::{
        production::{Production, ProductionWithProduct},
        status::Status,
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductionPayload {
    pub product_id: i32,

    #[validate(range(min = 1, message = "A quantidade planejada deve ser de pelo menos 1."))]
    pub quantity_planned: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductionPayload {
    pub status: Option<Status>,

    #[validate(range(min = 0, message = "A quantidade produzida não pode ser negativa."))]
    pub quantity_produced: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/production",
    tag = "Production",
    responses((status = 200, description = "Ordens de produção", body = Vec<ProductionWithProduct>)),
    security(("api_jwt" = []))
)]
pub async fn list(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<ProductionWithProduct>>, ApiError> {
    let productions = app_state
        .production_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(productions))
}

#[utoipa::path(
    post,
    path = "/api/production",
    tag = "Production",
    request_body = CreateProductionPayload,
    responses(
        (status = 201, description = "Produção planejada", body = Production),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateProductionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let production = app_state
        .production_service
        .plan(payload.product_id, payload.quantity_planned)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(production)))
}

#[utoipa::path(
    put,
    path = "/api/production/{id}",
    tag = "Production",
    params(("id" = i32, Path, description = "ID da produção")),
    request_body = UpdateProductionPayload,
    responses(
        (status = 200, description = "Produção atualizada", body = Production),
        (status = 404, description = "Produção não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductionPayload>,
) -> Result<Json<Production>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let production = app_state
        .production_service
        .update_status(id, payload.status, payload.quantity_produced)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(production))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_quantities() {
        let payload: CreateProductionPayload =
            serde_json::from_str(r#"{"productId": 1, "quantityPlanned": 0}"#).unwrap();
        assert!(payload.validate().is_err());

        let payload: UpdateProductionPayload =
            serde_json::from_str(r#"{"status": "completed", "quantityProduced": -5}"#).unwrap();
        assert!(payload.validate().is_err());

        let payload: UpdateProductionPayload =
            serde_json::from_str(r#"{"quantityProduced": 0}"#).unwrap();
        assert!(payload.validate().is_ok());
    }
}
