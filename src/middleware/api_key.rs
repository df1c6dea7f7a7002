// src/middleware/api_key.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
};

// O nome do nosso cabeçalho HTTP customizado
pub const API_KEY_HEADER: &str = "x-api-key";

// Guarda das rotas consumidas pelo dashboard externo.
// Sem chave configurada, nenhuma requisição passa.
pub async fn dashboard_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    let authorized = match (provided, app_state.config.api_dashboard_key.as_deref()) {
        (Some(provided), Some(expected)) => provided == expected,
        _ => false,
    };

    if !authorized {
        tracing::warn!("🔒 Acesso ao dashboard negado: chave de API ausente ou inválida");
        return Err(AppError::InvalidApiKey.to_api_error(&locale));
    }

    Ok(next.run(request).await)
}
