// src/handlers/stock.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::{validate_not_blank, validate_not_negative},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::product::{Product, ProductChanges},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank"))]
    pub category: String,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = f64)]
    pub price: Decimal,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    #[serde(default)] // Sem estoque informado, começa em 0
    pub stock: i32,

    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_not_blank"))]
    pub category: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock: Option<i32>,

    pub image_url: Option<String>,
}

impl From<UpdateProductPayload> for ProductChanges {
    fn from(payload: UpdateProductPayload) -> Self {
        Self {
            name: payload.name,
            category: payload.category,
            price: payload.price,
            stock: payload.stock,
            image_url: payload.image_url,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/stock",
    tag = "Stock",
    responses((status = 200, description = "Catálogo de produtos", body = Vec<Product>)),
    security(("api_jwt" = []))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = app_state
        .stock_service
        .list_products()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/stock",
    tag = "Stock",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let product = app_state
        .stock_service
        .create_product(
            payload.name.trim(),
            payload.category.trim(),
            payload.price,
            payload.stock,
            payload.image_url.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/stock/{id}",
    tag = "Stock",
    params(("id" = i32, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 404, description = "Produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<Json<Product>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let product = app_state
        .stock_service
        .update_product(id, &ProductChanges::from(payload))
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(product))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_product_defaults_stock_to_zero() {
        let payload: CreateProductPayload =
            serde_json::from_str(r#"{"name": "Mesa", "category": "Móveis", "price": 450.5}"#).unwrap();
        assert_eq!(payload.stock, 0);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_create_product_rejects_negative_values() {
        let payload: CreateProductPayload = serde_json::from_str(
            r#"{"name": " ", "category": "Móveis", "price": -1, "stock": -2}"#,
        )
        .unwrap();
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("price"));
        assert!(fields.contains_key("stock"));
    }

    #[test]
    fn test_update_payload_keeps_missing_fields_empty() {
        let payload: UpdateProductPayload = serde_json::from_str(r#"{"stock": 12}"#).unwrap();
        assert!(payload.validate().is_ok());

        let changes = ProductChanges::from(payload);
        assert_eq!(changes.stock, Some(12));
        assert!(changes.name.is_none());
        assert!(changes.price.is_none());
    }
}
