// src/handlers/indicators.rs

use axum::{extract::State, Json};

use crate::{
    common::error::ApiError, config::AppState, middleware::i18n::Locale,
    models::indicator::Indicators,
};

#[utoipa::path(
    get,
    path = "/api/indicators",
    tag = "Indicators",
    responses(
        (status = 200, description = "Indicadores gerais", body = Indicators),
        (status = 403, description = "Apenas administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_indicators(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Indicators>, ApiError> {
    let indicators = app_state
        .indicator_service
        .get_indicators()
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(indicators))
}
